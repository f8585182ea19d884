//! Windows location implementation using the WinRT geolocator.

use crate::{Accuracy, Coordinates, LocationError, Position, timestamp_now};

/// 100ns ticks between 1601-01-01 and 1970-01-01.
const UNIX_EPOCH_TICKS: i64 = 116_444_736_000_000_000;

fn unknown(err: &windows::core::Error) -> LocationError {
    LocationError::Unknown(err.message().to_string())
}

pub(crate) async fn get_position(accuracy: Accuracy) -> Result<Position, LocationError> {
    use windows::Devices::Geolocation::{GeolocationAccessStatus, Geolocator, PositionAccuracy};

    let access = Geolocator::RequestAccessAsync()
        .and_then(|op| op.get())
        .map_err(|e| unknown(&e))?;

    match access {
        GeolocationAccessStatus::Allowed => {}
        GeolocationAccessStatus::Denied => return Err(LocationError::PermissionDenied),
        _ => return Err(LocationError::NotAvailable),
    }

    let geolocator = Geolocator::new().map_err(|e| unknown(&e))?;
    let desired = match accuracy {
        Accuracy::High | Accuracy::Highest => PositionAccuracy::High,
        Accuracy::Lowest | Accuracy::Low | Accuracy::Balanced => PositionAccuracy::Default,
    };
    geolocator
        .SetDesiredAccuracy(desired)
        .map_err(|e| unknown(&e))?;

    let coordinate = geolocator
        .GetGeopositionAsync()
        .and_then(|op| op.get())
        .and_then(|position| position.Coordinate())
        .map_err(|e| unknown(&e))?;

    let point = coordinate
        .Point()
        .and_then(|point| point.Position())
        .map_err(|e| unknown(&e))?;

    let timestamp = coordinate
        .Timestamp()
        .ok()
        .and_then(|t| u64::try_from((t.UniversalTime - UNIX_EPOCH_TICKS) / 10_000).ok())
        .unwrap_or_else(timestamp_now);

    Ok(Position {
        coordinates: Coordinates::new(point.Latitude, point.Longitude),
        accuracy_meters: coordinate.Accuracy().ok(),
        timestamp,
    })
}
