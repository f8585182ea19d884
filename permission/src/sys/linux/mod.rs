//! Linux permission implementation.
//!
//! GeoClue2 authorizes location access per D-Bus client, and sandboxed apps
//! (Flatpak/Snap) go through the location portal when the client starts. There
//! is no separate runtime prompt to drive from here.

use crate::{Permission, PermissionError, PermissionStatus};

pub(crate) async fn check(permission: Permission) -> PermissionStatus {
    match permission {
        Permission::ForegroundLocation => PermissionStatus::Granted,
        // Background access needs an autostart agent we don't ship.
        Permission::BackgroundLocation => PermissionStatus::Restricted,
    }
}

pub(crate) async fn request(permission: Permission) -> Result<PermissionStatus, PermissionError> {
    Ok(check(permission).await)
}
