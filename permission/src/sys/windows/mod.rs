//! Windows permission implementation using the WinRT geolocator.

use crate::{Permission, PermissionError, PermissionStatus};

pub(crate) async fn check(permission: Permission) -> PermissionStatus {
    match permission {
        // Windows has no separate background grant for desktop apps.
        Permission::ForegroundLocation | Permission::BackgroundLocation => {
            location_access().unwrap_or(PermissionStatus::NotDetermined)
        }
    }
}

pub(crate) async fn request(permission: Permission) -> Result<PermissionStatus, PermissionError> {
    match permission {
        // RequestAccessAsync both checks and prompts if needed
        Permission::ForegroundLocation | Permission::BackgroundLocation => location_access(),
    }
}

fn location_access() -> Result<PermissionStatus, PermissionError> {
    use windows::Devices::Geolocation::{GeolocationAccessStatus, Geolocator};

    let status = Geolocator::RequestAccessAsync()
        .and_then(|op| op.get())
        .map_err(|e| PermissionError::Unknown(e.message().to_string()))?;

    Ok(match status {
        GeolocationAccessStatus::Allowed => PermissionStatus::Granted,
        GeolocationAccessStatus::Denied => PermissionStatus::Denied,
        _ => PermissionStatus::NotDetermined,
    })
}
