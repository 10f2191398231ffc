//! One screenshot session at a time: the controller plus the dialog and
//! overlay it currently owns.
//!
//! Every window-facing entry point lands here, whether it comes from a
//! command, a tray item or a window event. Dialog and overlay are taken out
//! of their slot before they are closed, and no lock is held while a surface
//! closes, since closing can re-enter through a `Destroyed` window event. A
//! close that finds its slot empty is stale and does nothing.

use image::RgbaImage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::capture::{CaptureKind, CaptureService, Point, SavedScreenshot};
use crate::controller::{Controller, Desktop, Phase};
use crate::dialog::{Choice, ChoiceDialog};
use crate::error::Error;
use crate::overlay::{CropOutcome, CropOverlay};
use crate::surface::Surface;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Session<D: Desktop, S: Surface> {
    controller: Mutex<Controller<D>>,
    dialog: Mutex<Option<ChoiceDialog<S>>>,
    overlay: Mutex<Option<CropOverlay<S>>>,
}

impl<D: Desktop, S: Surface> Session<D, S> {
    pub fn new(desktop: D) -> Self {
        Self {
            controller: Mutex::new(Controller::new(desktop)),
            dialog: Mutex::new(None),
            overlay: Mutex::new(None),
        }
    }

    pub fn phase(&self) -> Phase {
        lock(&self.controller).phase()
    }

    pub fn with_desktop<T>(&self, f: impl FnOnce(&D) -> T) -> T {
        f(lock(&self.controller).desktop())
    }

    /// Hotkey or tray request. Shows the choice dialog on `surface` if idle.
    ///
    /// Returns `true` when the dialog is open.
    pub fn trigger(&self, surface: S) -> bool {
        if !lock(&self.controller).trigger() {
            return false;
        }

        match ChoiceDialog::open(surface) {
            Ok(dialog) => {
                *lock(&self.dialog) = Some(dialog);
                true
            }
            Err(e) => {
                lock(&self.controller).dialog_failed(&Error::from(e));
                false
            }
        }
    }

    /// Resolves the open dialog. Returns the capture to schedule, if any.
    pub fn submit_choice(&self, choice: Choice) -> Option<CaptureKind> {
        let Some(dialog) = lock(&self.dialog).take() else {
            log::debug!("No open dialog for {:?}", choice);
            return None;
        };

        let choice = dialog.resolve(choice);
        lock(&self.controller).choose(choice)
    }

    /// The dialog window went away without a choice.
    pub fn dialog_closed(&self) {
        self.submit_choice(Choice::Cancelled);
    }

    pub fn finish_full(&self, result: Result<SavedScreenshot, Error>) {
        lock(&self.controller).finish_full(result);
    }

    /// Shows the crop overlay on `surface` over the grabbed frame.
    ///
    /// Returns `true` when the overlay is up; otherwise the session is
    /// already back to idle.
    pub fn begin_crop(&self, grab: Result<RgbaImage, Error>, surface: S) -> bool {
        let Some(frame) = lock(&self.controller).begin_crop(grab) else {
            return false;
        };

        // In the slot before the window exists, so the page can fetch its frame.
        let armed = lock(&self.overlay)
            .insert(CropOverlay::new(surface, frame))
            .arm();

        match armed {
            Ok(()) => true,
            Err(e) => {
                drop(lock(&self.overlay).take());
                lock(&self.controller).finish_crop(CropOutcome::Failed(e.into()));
                false
            }
        }
    }

    /// The frozen frame of the overlay on screen.
    pub fn overlay_frame(&self) -> Option<Arc<RgbaImage>> {
        lock(&self.overlay).as_ref().map(CropOverlay::frame)
    }

    pub fn press(&self, at: Point) {
        if let Some(overlay) = lock(&self.overlay).as_mut() {
            overlay.press(at);
        }
    }

    pub fn drag(&self, to: Point) {
        if let Some(overlay) = lock(&self.overlay).as_mut() {
            overlay.drag(to);
        }
    }

    pub fn release(&self, at: Point, service: &CaptureService) {
        let Some(mut overlay) = lock(&self.overlay).take() else {
            return;
        };
        let outcome = overlay.release(at, service);
        lock(&self.controller).finish_crop(outcome);
    }

    /// Escape, or the overlay window went away.
    pub fn overlay_closed(&self) {
        let Some(mut overlay) = lock(&self.overlay).take() else {
            return;
        };
        overlay.cancel();
        lock(&self.controller).finish_crop(CropOutcome::Cancelled);
    }
}
