//! The window capability shared by the choice dialog and the crop overlay.
//!
//! Dialog and overlay are plain state holders; they drive a `Surface` to
//! show, repaint and close themselves. `WebviewSurface` is the Tauri binding:
//! each surface is a webview window loading a page from `ui/`, and input comes
//! back as Tauri commands (see `commands.rs`).

use tauri::{AppHandle, Emitter, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::capture::CropRect;

/// Event carrying the current selection (or `null`) to the overlay page.
pub const SELECTION_EVENT: &str = "overlay-selection";

pub const DIALOG_LABEL: &str = "dialog";
pub const OVERLAY_LABEL: &str = "overlay";

pub trait Surface {
    fn show(&mut self) -> Result<(), SurfaceError>;

    /// Repaints with the given selection. Surfaces without a selection ignore it.
    fn paint(&mut self, _selection: Option<CropRect>) {}

    /// Closes the surface. Closing twice, or closing a surface that was never
    /// shown, is a no-op.
    fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// Frameless, covering the whole primary display.
    Fullscreen,
    /// Fixed-size, centered.
    Fixed { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSpec {
    pub label: &'static str,
    pub url: &'static str,
    pub title: &'static str,
    pub layout: Layout,
}

impl SurfaceSpec {
    pub const DIALOG: SurfaceSpec = SurfaceSpec {
        label: DIALOG_LABEL,
        url: "dialog.html",
        title: "Screenshot Options",
        layout: Layout::Fixed {
            width: 300.0,
            height: 150.0,
        },
    };

    pub const OVERLAY: SurfaceSpec = SurfaceSpec {
        label: OVERLAY_LABEL,
        url: "overlay.html",
        title: "Screenshot Overlay",
        layout: Layout::Fullscreen,
    };
}

/// A `Surface` backed by a Tauri webview window.
pub struct WebviewSurface {
    app: AppHandle,
    spec: SurfaceSpec,
    window: Option<WebviewWindow>,
}

impl WebviewSurface {
    pub fn new(app: &AppHandle, spec: SurfaceSpec) -> Self {
        Self {
            app: app.clone(),
            spec,
            window: None,
        }
    }
}

impl Surface for WebviewSurface {
    fn show(&mut self) -> Result<(), SurfaceError> {
        let builder = WebviewWindowBuilder::new(
            &self.app,
            self.spec.label,
            WebviewUrl::App(self.spec.url.into()),
        )
        .title(self.spec.title)
        .always_on_top(true)
        .resizable(false)
        .focused(true);

        let builder = match self.spec.layout {
            Layout::Fullscreen => builder
                .fullscreen(true)
                .decorations(false)
                .skip_taskbar(true),
            Layout::Fixed { width, height } => builder.inner_size(width, height).center(),
        };

        let window = builder.build().map_err(|source| SurfaceError::Open {
            label: self.spec.label,
            source,
        })?;

        if let Err(e) = window.set_focus() {
            log::debug!("Could not focus {} window: {}", self.spec.label, e);
        }

        self.window = Some(window);
        Ok(())
    }

    fn paint(&mut self, selection: Option<CropRect>) {
        if self.window.is_none() {
            return;
        }
        if let Err(e) = self.app.emit_to(self.spec.label, SELECTION_EVENT, selection) {
            log::warn!("Failed to repaint {} window: {}", self.spec.label, e);
        }
    }

    fn close(&mut self) {
        if let Some(window) = self.window.take() {
            if let Err(e) = window.close() {
                log::debug!("Closing {} window failed: {}", self.spec.label, e);
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Failed to open {label} window: {source}")]
    Open {
        label: &'static str,
        #[source]
        source: tauri::Error,
    },
}
