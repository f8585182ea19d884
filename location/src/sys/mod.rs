//! Platform-specific location implementations.

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

// Re-export platform implementations
#[cfg(target_os = "windows")]
pub(crate) use windows::get_position;

#[cfg(target_os = "linux")]
pub(crate) use linux::get_position;

// Fallback for unsupported platforms
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub(crate) async fn get_position(
    _accuracy: crate::Accuracy,
) -> Result<crate::Position, crate::LocationError> {
    Err(crate::LocationError::NotAvailable)
}
