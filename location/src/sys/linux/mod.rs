//! Linux location implementation using the GeoClue2 D-Bus service.
//!
//! A fresh GeoClue2 client has no location until it emits its first
//! `LocationUpdated` signal, so the signal is subscribed to before the client
//! is started and the fix is read from the path it carries.

use std::pin::pin;
use std::time::Duration;

use futures::StreamExt;
use futures::future::{self, Either};
use zbus::message::Type as MessageType;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};
use zbus::{Connection, MatchRule, Message, MessageStream};

use crate::{Accuracy, Coordinates, LocationError, Position, timestamp_now};

const GEOCLUE_BUS: &str = "org.freedesktop.GeoClue2";
const GEOCLUE_MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const GEOCLUE_MANAGER_IFACE: &str = "org.freedesktop.GeoClue2.Manager";
const GEOCLUE_CLIENT_IFACE: &str = "org.freedesktop.GeoClue2.Client";
const GEOCLUE_LOCATION_IFACE: &str = "org.freedesktop.GeoClue2.Location";
const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";
const DESKTOP_ID: &str = "venuekit";
const NO_LOCATION_PATH: &str = "/";

/// How long GeoClue2 gets to produce the first fix.
const FIX_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps an accuracy hint onto `GClueAccuracyLevel`.
const fn accuracy_level(accuracy: Accuracy) -> u32 {
    match accuracy {
        Accuracy::Lowest => 1,
        Accuracy::Low => 4,
        Accuracy::Balanced => 5,
        Accuracy::High => 6,
        Accuracy::Highest => 8,
    }
}

fn unknown(context: &str, err: impl std::fmt::Display) -> LocationError {
    LocationError::Unknown(format!("{context}: {err}"))
}

pub(crate) async fn get_position(accuracy: Accuracy) -> Result<Position, LocationError> {
    let connection = Connection::system()
        .await
        .map_err(|e| unknown("D-Bus connection failed", e))?;

    let (client_path,): (OwnedObjectPath,) = connection
        .call_method(
            Some(GEOCLUE_BUS),
            GEOCLUE_MANAGER_PATH,
            Some(GEOCLUE_MANAGER_IFACE),
            "GetClient",
            &(),
        )
        .await
        .map_err(|_| LocationError::ServiceDisabled)?
        .body()
        .deserialize()
        .map_err(|e| unknown("failed to parse client path", e))?;

    let set_client_property = |name: &'static str, value: Value<'static>| {
        let connection = &connection;
        let client_path = &client_path;
        async move {
            connection
                .call_method(
                    Some(GEOCLUE_BUS),
                    client_path.as_str(),
                    Some(PROPERTIES_IFACE),
                    "Set",
                    &(GEOCLUE_CLIENT_IFACE, name, value),
                )
                .await
                .map(|_| ())
                .map_err(|e| unknown(name, e))
        }
    };

    // GeoClue2 refuses to start a client without a desktop ID
    set_client_property("DesktopId", Value::from(DESKTOP_ID)).await?;
    set_client_property(
        "RequestedAccuracyLevel",
        Value::from(accuracy_level(accuracy)),
    )
    .await?;

    let updates = subscribe_location_updates(&connection, &client_path).await?;

    connection
        .call_method(
            Some(GEOCLUE_BUS),
            client_path.as_str(),
            Some(GEOCLUE_CLIENT_IFACE),
            "Start",
            &(),
        )
        .await
        .map_err(|e| unknown("failed to start GeoClue client", e))?;

    let location = async {
        let location_path = match current_location_path(&connection, &client_path).await? {
            Some(path) => path,
            None => wait_for_update(updates).await?,
        };
        read_fix(&connection, &location_path).await
    }
    .await;

    let _ = connection
        .call_method(
            Some(GEOCLUE_BUS),
            client_path.as_str(),
            Some(GEOCLUE_CLIENT_IFACE),
            "Stop",
            &(),
        )
        .await;

    location
}

async fn subscribe_location_updates(
    connection: &Connection,
    client_path: &OwnedObjectPath,
) -> Result<MessageStream, LocationError> {
    let rule = MatchRule::builder()
        .msg_type(MessageType::Signal)
        .path(client_path.as_str())
        .and_then(|rule| rule.interface(GEOCLUE_CLIENT_IFACE))
        .and_then(|rule| rule.member("LocationUpdated"))
        .map_err(|e| unknown("invalid match rule", e))?
        .build();

    MessageStream::for_match_rule(rule, connection, Some(4))
        .await
        .map_err(|e| unknown("failed to subscribe to LocationUpdated", e))
}

/// The client's current location path, if it already has a fix.
async fn current_location_path(
    connection: &Connection,
    client_path: &OwnedObjectPath,
) -> Result<Option<OwnedObjectPath>, LocationError> {
    let location_value: OwnedValue = connection
        .call_method(
            Some(GEOCLUE_BUS),
            client_path.as_str(),
            Some(PROPERTIES_IFACE),
            "Get",
            &(GEOCLUE_CLIENT_IFACE, "Location"),
        )
        .await
        .map_err(|e| unknown("failed to get location", e))?
        .body()
        .deserialize()
        .map_err(|e| unknown("failed to parse location path", e))?;

    let location_path = OwnedObjectPath::try_from(location_value)
        .map_err(|e| unknown("unexpected location path", e))?;
    Ok((location_path.as_str() != NO_LOCATION_PATH).then_some(location_path))
}

async fn wait_for_update(updates: MessageStream) -> Result<OwnedObjectPath, LocationError> {
    let mut updates = pin!(updates);
    let first_fix = pin!(async {
        while let Some(message) = updates.next().await {
            let message = message.map_err(|e| unknown("LocationUpdated", e))?;
            if let Some(path) = updated_location_path(&message)? {
                return Ok(path);
            }
        }
        Err(LocationError::NotAvailable)
    });

    match future::select(first_fix, futures_timer::Delay::new(FIX_TIMEOUT)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(LocationError::NotAvailable),
    }
}

/// Extracts the new location path from a `LocationUpdated(o old, o new)` signal.
fn updated_location_path(message: &Message) -> Result<Option<OwnedObjectPath>, LocationError> {
    let (_old, new): (OwnedObjectPath, OwnedObjectPath) = message
        .body()
        .deserialize()
        .map_err(|e| unknown("failed to parse LocationUpdated", e))?;
    Ok((new.as_str() != NO_LOCATION_PATH).then_some(new))
}

async fn read_fix(
    connection: &Connection,
    location_path: &OwnedObjectPath,
) -> Result<Position, LocationError> {
    let get_property = |prop: &'static str| async move {
        let value: OwnedValue = connection
            .call_method(
                Some(GEOCLUE_BUS),
                location_path.as_str(),
                Some(PROPERTIES_IFACE),
                "Get",
                &(GEOCLUE_LOCATION_IFACE, prop),
            )
            .await
            .map_err(|e| unknown(prop, e))?
            .body()
            .deserialize()
            .map_err(|e| unknown(prop, e))?;
        f64::try_from(value).map_err(|e| unknown(prop, e))
    };

    let latitude = get_property("Latitude").await?;
    let longitude = get_property("Longitude").await?;
    let accuracy_meters = get_property("Accuracy").await.ok();

    Ok(Position {
        coordinates: Coordinates::new(latitude, longitude),
        accuracy_meters,
        timestamp: timestamp_now(),
    })
}
