//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS. Everything above
//! it only sees the `ScreenSource` trait.

use image::RgbaImage;
use xcap::Monitor;

/// Anything that can produce the current contents of the primary display.
pub trait ScreenSource: Send + Sync {
    fn grab(&self) -> Result<RgbaImage, CaptureError>;
}

/// The OS primary monitor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryMonitor;

impl ScreenSource for PrimaryMonitor {
    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        capture_primary_monitor()
    }
}

/// Captures the primary monitor's screen.
///
/// If no monitor reports itself as primary, the first enumerated one is used.
pub fn capture_primary_monitor() -> Result<RgbaImage, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let mut fallback = None;
    let mut primary = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            primary = Some(monitor);
            break;
        }
        if fallback.is_none() {
            fallback = Some(monitor);
        }
    }

    let monitor = primary.or(fallback).ok_or(CaptureError::NoDisplay)?;

    monitor
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No display found")]
    NoDisplay,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),
}
