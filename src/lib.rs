//! Screenshot Service: tray-resident screen capture.
//!
//! This is the app shell that wires together:
//! - Single-instance guard (instance.rs)
//! - System tray (tray.rs) and global hotkey (hotkey.rs)
//! - Choice dialog and crop overlay windows (dialog.rs, overlay.rs, session.rs)
//! - Screen capture and storage (capture/)
//! - Tauri command handlers for the webview pages (commands.rs)

pub mod app;
pub mod capture;
pub mod clipboard;
mod commands;
pub mod config;
pub mod controller;
pub mod desktop;
pub mod dialog;
pub mod error;
pub mod hotkey;
pub mod instance;
pub mod overlay;
pub mod session;
pub mod surface;
mod tray;

use capture::{CaptureService, PrimaryMonitor, ScreenshotStore};
use config::Settings;
use instance::InstanceGuard;

pub use error::Error;

/// Entry point — called by Tauri runtime.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let guard = match InstanceGuard::acquire(&instance::lock_path()) {
        Ok(Some(guard)) => Some(guard),
        Ok(None) => {
            log::warn!("Another instance is already running, exiting");
            instance::warn_already_running();
            std::process::exit(0);
        }
        Err(e) => {
            log::warn!("Single-instance check unavailable: {}", e);
            None
        }
    };

    let settings = Settings::from_env();
    log::info!(
        "Screenshot Service starting up (hotkey {}, saving to {})",
        settings.hotkey,
        settings.screenshots_dir.display()
    );
    let service = CaptureService::new(
        PrimaryMonitor,
        ScreenshotStore::new(settings.screenshots_dir.clone()),
    );

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_notification::init())
        .manage(settings)
        .manage(service)
        .invoke_handler(tauri::generate_handler![
            commands::submit_choice,
            commands::overlay_frame,
            commands::overlay_press,
            commands::overlay_move,
            commands::overlay_release,
            commands::overlay_cancel,
        ])
        .setup(|app| {
            app::setup(app)?;
            log::info!("Ready for captures");
            Ok(())
        })
        .on_window_event(app::on_window_event)
        .build(tauri::generate_context!())
        .expect("Error building Screenshot Service");

    app.run(move |_app, event| match event {
        // Closing the last window must not end a tray-resident service.
        tauri::RunEvent::ExitRequested { code: None, api, .. } => api.prevent_exit(),
        tauri::RunEvent::Exit => {
            if let Some(guard) = &guard {
                log::info!("Releasing instance lock {}", guard.path().display());
            }
        }
        _ => {}
    });
}
