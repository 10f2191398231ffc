//! Crop overlay — a full-screen view of a frozen screen grab on which the
//! user drags out the region to keep.
//!
//! Lifecycle: `Idle -> Armed -> Dragging -> Committed -> Closed`. The overlay
//! only tracks geometry; painting and input delivery belong to its `Surface`.

use image::RgbaImage;
use std::sync::Arc;

use crate::capture::{CaptureService, CropRect, Point, SavedScreenshot};
use crate::error::Error;
use crate::surface::{Surface, SurfaceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Idle,
    Armed,
    Dragging {
        origin: Point,
        selection: Option<CropRect>,
    },
    Committed,
    Closed,
}

/// How a crop session ended.
#[derive(Debug)]
pub enum CropOutcome {
    /// Escape, window closed, or a zero-area release. Nothing was written.
    Cancelled,
    Saved(SavedScreenshot),
    Failed(Error),
}

pub struct CropOverlay<S: Surface> {
    surface: S,
    frame: Arc<RgbaImage>,
    phase: OverlayPhase,
}

impl<S: Surface> CropOverlay<S> {
    pub fn new(surface: S, frame: RgbaImage) -> Self {
        Self {
            surface,
            frame: Arc::new(frame),
            phase: OverlayPhase::Idle,
        }
    }

    /// The frozen screen grab being cropped.
    pub fn frame(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.frame)
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Current selection, clipped to the frame.
    pub fn selection(&self) -> Option<CropRect> {
        match self.phase {
            OverlayPhase::Dragging { selection, .. } => selection.and_then(|r| self.clip(r)),
            _ => None,
        }
    }

    /// Shows the overlay window over the frozen frame.
    pub fn arm(&mut self) -> Result<(), SurfaceError> {
        if self.phase != OverlayPhase::Idle {
            return Ok(());
        }
        self.surface.show()?;
        self.phase = OverlayPhase::Armed;
        Ok(())
    }

    /// Mouse down: starts a new drag, discarding any previous selection.
    pub fn press(&mut self, at: Point) {
        match self.phase {
            OverlayPhase::Armed | OverlayPhase::Dragging { .. } => {
                self.phase = OverlayPhase::Dragging {
                    origin: at,
                    selection: None,
                };
                self.surface.paint(None);
            }
            _ => log::debug!("Ignoring press in {:?}", self.phase),
        }
    }

    /// Mouse move: recomputes the selection from the drag origin.
    pub fn drag(&mut self, to: Point) -> Option<CropRect> {
        let OverlayPhase::Dragging { origin, .. } = self.phase else {
            return None;
        };

        let selection = CropRect::from_corners(origin, to);
        self.phase = OverlayPhase::Dragging {
            origin,
            selection: Some(selection),
        };

        let visible = self.clip(selection);
        self.surface.paint(visible);
        visible
    }

    /// Mouse up: saves the selected region, or cancels on an empty selection.
    /// The overlay is closed either way.
    pub fn release(&mut self, at: Point, service: &CaptureService) -> CropOutcome {
        let OverlayPhase::Dragging { origin, .. } = self.phase else {
            log::debug!("Release without a drag, cancelling crop");
            self.close();
            return CropOutcome::Cancelled;
        };

        let Some(rect) = self.clip(CropRect::from_corners(origin, at)) else {
            log::debug!("Zero-area selection, cancelling crop");
            self.close();
            return CropOutcome::Cancelled;
        };

        self.phase = OverlayPhase::Committed;
        log::info!(
            "Cropping ({},{})-({},{}) from {}x{} frame",
            rect.left,
            rect.top,
            rect.right,
            rect.bottom,
            self.frame.width(),
            self.frame.height()
        );

        let outcome = match service.save_crop(&self.frame, rect) {
            Ok(saved) => CropOutcome::Saved(saved),
            Err(e) => CropOutcome::Failed(e),
        };
        self.close();
        outcome
    }

    pub fn cancel(&mut self) {
        log::debug!("Crop cancelled");
        self.close();
    }

    fn close(&mut self) {
        self.surface.close();
        self.phase = OverlayPhase::Closed;
    }

    fn clip(&self, rect: CropRect) -> Option<CropRect> {
        rect.clip_to(self.frame.width(), self.frame.height())
    }
}
