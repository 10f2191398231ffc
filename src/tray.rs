//! System tray icon and menu.
//!
//! The tray icon is the only always-visible surface of the service. Its menu
//! opens the screenshots folder, starts a capture, or quits.

use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle,
};

use crate::app;
use crate::config::Settings;
use crate::desktop;

const OPEN_FOLDER: &str = "open_folder";
const TAKE_SCREENSHOT: &str = "take_screenshot";
const QUIT: &str = "quit";

const TRAY_ID: &str = "screenshot-service";

/// Builds the tray icon and announces that the service is running.
pub fn setup_tray(app: &AppHandle, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let open_item = MenuItemBuilder::with_id(OPEN_FOLDER, "Open Screenshots Folder").build(app)?;
    let take_item = MenuItemBuilder::with_id(TAKE_SCREENSHOT, "Take Screenshot Now").build(app)?;
    let quit_item = MenuItemBuilder::with_id(QUIT, "Quit").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&open_item)
        .separator()
        .item(&take_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::with_id(TRAY_ID)
        .icon(tray_icon)
        .tooltip(tooltip(&settings.hotkey))
        .menu(&menu)
        .show_menu_on_left_click(true)
        .on_menu_event(|app, event| match event.id().as_ref() {
            OPEN_FOLDER => app::open_screenshots_folder(app),
            TAKE_SCREENSHOT => {
                log::info!("Capture requested from tray menu");
                app::trigger(app);
            }
            QUIT => app::quit(app),
            other => log::debug!("Unhandled tray menu item {:?}", other),
        })
        .build(app)?;

    log::info!("System tray initialized");
    desktop::notify(app, "Screenshot Service", &running_message(&settings.hotkey));
    Ok(())
}

fn tooltip(hotkey: &str) -> String {
    format!("Screenshot Service (Press {} to capture)", hotkey)
}

fn running_message(hotkey: &str) -> String {
    format!("Service is running. Press {} to take a screenshot.", hotkey)
}
