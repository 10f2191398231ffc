//! Tauri binding of the controller's `Desktop` capability.

use image::RgbaImage;
use tauri::{AppHandle, Manager, PhysicalPosition, WebviewWindow};
use tauri_plugin_notification::NotificationExt;

use crate::clipboard::{ClipboardError, ClipboardHost};
use crate::controller::{Desktop, WindowPosition};

/// Label of the controller's own (normally hidden) window.
pub const MAIN_WINDOW: &str = "main";

pub struct TauriDesktop {
    app: AppHandle,
    clipboard: ClipboardHost,
}

impl TauriDesktop {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            clipboard: ClipboardHost::new(),
        }
    }

    /// Gives up clipboard ownership ahead of exit.
    pub fn release_clipboard(&self) {
        self.clipboard.release();
    }

    fn main_window(&self) -> Option<WebviewWindow> {
        let window = self.app.get_webview_window(MAIN_WINDOW);
        if window.is_none() {
            log::warn!("Controller window is missing");
        }
        window
    }
}

impl Desktop for TauriDesktop {
    fn raise(&self) {
        let Some(window) = self.main_window() else {
            return;
        };
        // GTK shows a hidden window when it is focused.
        if !window.is_visible().unwrap_or(false) {
            log::debug!("Controller window hidden, not raising it");
            return;
        }
        if let Err(e) = window.set_focus() {
            log::debug!("Could not raise controller window: {}", e);
        }
    }

    fn window_position(&self) -> Option<WindowPosition> {
        let window = self.main_window()?;
        match window.outer_position() {
            Ok(PhysicalPosition { x, y }) => Some(WindowPosition { x, y }),
            Err(e) => {
                log::warn!("Could not read controller window position: {}", e);
                None
            }
        }
    }

    fn move_window(&self, position: WindowPosition) {
        if let Some(window) = self.main_window() {
            if let Err(e) = window.set_position(PhysicalPosition::new(position.x, position.y)) {
                log::warn!("Could not move controller window to {:?}: {}", position, e);
            }
        }
    }

    fn reveal_window(&self) {
        if let Some(window) = self.main_window() {
            let _ = window.show();
            let _ = window.set_focus();
        }
    }

    fn set_clipboard_image(&self, image: &RgbaImage) -> Result<(), ClipboardError> {
        self.clipboard.copy_image(image)
    }

    fn notify(&self, title: &str, body: &str) {
        notify(&self.app, title, body);
    }
}

/// Shows a transient desktop notification from the tray app.
pub fn notify(app: &AppHandle, title: &str, body: &str) {
    if let Err(e) = app.notification().builder().title(title).body(body).show() {
        log::warn!("Failed to show notification {:?}: {}", body, e);
    }
}
