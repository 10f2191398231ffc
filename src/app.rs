//! Tauri glue for the screenshot session: managed state, window events and
//! the trigger → dialog → delayed capture flow.
//!
//! Everything here runs on the UI thread except `post_trigger` (called from
//! the hotkey listener) and the capture delay timer.

use std::sync::Mutex;
use tauri::{AppHandle, Manager, Window, WindowEvent};

use crate::capture::{CaptureKind, CaptureService, Point};
use crate::config::Settings;
use crate::desktop::{self, TauriDesktop, MAIN_WINDOW};
use crate::dialog::Choice;
use crate::error::Error;
use crate::hotkey::{self, HotkeyListener};
use crate::session::{lock, Session};
use crate::surface::{SurfaceSpec, WebviewSurface, DIALOG_LABEL, OVERLAY_LABEL};
use crate::tray;

pub type AppSession = Session<TauriDesktop, WebviewSurface>;

pub struct HotkeyState(Mutex<Option<HotkeyListener>>);

/// Tauri `setup` hook: session, hotkey listener, tray.
pub fn setup(app: &tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    let handle = app.handle().clone();
    let settings = app.state::<Settings>().inner().clone();

    app.manage(AppSession::new(TauriDesktop::new(handle.clone())));

    let listener = HotkeyListener::spawn({
        let handle = handle.clone();
        move || post_trigger(&handle)
    })?;
    if let Err(e) = hotkey::register(&handle, &settings.hotkey, listener.sender()) {
        // Still usable from the tray menu.
        log::error!("{}", e);
        desktop::notify(&handle, "Error", &e.to_string());
    }
    app.manage(HotkeyState(Mutex::new(Some(listener))));

    tray::setup_tray(&handle, &settings)?;
    Ok(())
}

pub fn on_window_event(window: &Window, event: &WindowEvent) {
    match event {
        WindowEvent::CloseRequested { api, .. } if window.label() == MAIN_WINDOW => {
            // The controller window lives as long as the tray icon.
            api.prevent_close();
            let _ = window.hide();
        }
        WindowEvent::Destroyed => surface_destroyed(window.app_handle(), window.label()),
        _ => {}
    }
}

/// A dialog or overlay window that disappears on its own counts as a cancel.
fn surface_destroyed(app: &AppHandle, label: &str) {
    let session = app.state::<AppSession>();
    match label {
        DIALOG_LABEL => session.dialog_closed(),
        OVERLAY_LABEL => session.overlay_closed(),
        _ => {}
    }
}

/// Queues a trigger onto the UI thread. Callable from any thread.
pub fn post_trigger(app: &AppHandle) {
    let handle = app.clone();
    if let Err(e) = app.run_on_main_thread(move || trigger(&handle)) {
        log::error!("Failed to deliver hotkey trigger: {}", e);
    }
}

/// Hotkey or "Take Screenshot Now": opens the choice dialog if idle.
pub fn trigger(app: &AppHandle) {
    app.state::<AppSession>()
        .trigger(WebviewSurface::new(app, SurfaceSpec::DIALOG));
}

pub fn submit_choice(app: &AppHandle, choice: Choice) {
    if let Some(kind) = app.state::<AppSession>().submit_choice(choice) {
        schedule_capture(app, kind);
    }
}

/// Waits out the capture delay off the UI thread, then captures on it.
fn schedule_capture(app: &AppHandle, kind: CaptureKind) {
    let delay = app.state::<Settings>().capture_delay;
    let app = app.clone();

    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(delay).await;
        let handle = app.clone();
        if let Err(e) = app.run_on_main_thread(move || capture(&handle, kind)) {
            log::error!("Failed to schedule {} capture: {}", kind.prefix(), e);
        }
    });
}

fn capture(app: &AppHandle, kind: CaptureKind) {
    let service = app.state::<CaptureService>();
    let session = app.state::<AppSession>();

    match kind {
        CaptureKind::Full => session.finish_full(service.capture_full_screen()),
        CaptureKind::Cropped => {
            let grab = service.grab_frame().map_err(Error::from);
            session.begin_crop(grab, WebviewSurface::new(app, SurfaceSpec::OVERLAY));
        }
    }
}

pub fn overlay_released(app: &AppHandle, at: Point) {
    let service = app.state::<CaptureService>();
    app.state::<AppSession>().release(at, &service);
}

pub fn overlay_cancelled(app: &AppHandle) {
    app.state::<AppSession>().overlay_closed();
}

pub fn open_screenshots_folder(app: &AppHandle) {
    let service = app.state::<CaptureService>();
    let dir = match service.store().ensure_dir() {
        Ok(dir) => dir.to_path_buf(),
        Err(e) => {
            log::error!("{}", e);
            desktop::notify(app, "Error", &e.to_string());
            return;
        }
    };

    if let Err(e) = open::that_detached(&dir) {
        log::error!("Failed to open {}: {}", dir.display(), e);
        desktop::notify(
            app,
            "Error",
            &format!("Failed to open {}: {}", dir.display(), e),
        );
    }
}

/// Stops the hotkey listener, releases the OS hotkey and the clipboard, and
/// exits with 0.
pub fn quit(app: &AppHandle) {
    log::info!("Quit requested from tray menu");

    let listener = lock(&app.state::<HotkeyState>().0).take();
    if let Some(listener) = listener {
        listener.shutdown(hotkey::SHUTDOWN_TIMEOUT);
    }
    hotkey::unregister_all(app);
    app.state::<AppSession>()
        .with_desktop(TauriDesktop::release_clipboard);

    app.exit(0);
}
