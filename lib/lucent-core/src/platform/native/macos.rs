#![allow(unused_unsafe)]

use crate::overlay::OverlayWindowConfig;
use crate::platform::{OverlayLevel, PlatformResult};
use objc2::rc::Retained;
use objc2_app_kit::{NSView, NSWindow, NSWindowCollectionBehavior};
use winit::platform::macos::WindowAttributesExtMacOS;
use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::window::{Window, WindowAttributes};

// NSNormalWindowLevel, NSFloatingWindowLevel and NSScreenSaverWindowLevel
const NORMAL_WINDOW_LEVEL: isize = 0;
const FLOATING_WINDOW_LEVEL: isize = 3;
const SCREEN_SAVER_WINDOW_LEVEL: isize = 1000;

fn ns_window(window: &Window) -> PlatformResult<Retained<NSWindow>> {
    let window_handle = window
        .window_handle()
        .map_err(|e| format!("Failed to get window handle: {}", e))?;

    let RawWindowHandle::AppKit(handle) = window_handle.as_raw() else {
        return Err("Expected AppKit window handle".into());
    };

    let ns_view = handle.ns_view.as_ptr() as *mut NSView;
    if ns_view.is_null() {
        return Err("NSView pointer is null".into());
    }

    unsafe {
        let ns_view = &*ns_view;
        ns_view
            .window()
            .ok_or_else(|| "Failed to get NSWindow from NSView".into())
    }
}

pub fn platform_attributes(
    attributes: WindowAttributes,
    config: &OverlayWindowConfig,
) -> WindowAttributes {
    attributes.with_has_shadow(config.shadow)
}

pub fn apply_overlay_style(window: &Window, config: &OverlayWindowConfig) -> PlatformResult<()> {
    let ns_window = ns_window(window)?;
    unsafe {
        ns_window.setHasShadow(config.shadow);
        ns_window.setOpaque(!config.transparent);
        ns_window.setMovable(config.movable);
    }
    Ok(())
}

pub fn set_level(window: &Window, on_top: bool, level: OverlayLevel) -> PlatformResult<()> {
    let ns_window = ns_window(window)?;
    let level = match (on_top, level) {
        (false, _) => NORMAL_WINDOW_LEVEL,
        (true, OverlayLevel::Floating) => FLOATING_WINDOW_LEVEL,
        (true, OverlayLevel::ScreenSaver) => SCREEN_SAVER_WINDOW_LEVEL,
    };
    unsafe {
        ns_window.setLevel(level);
    }
    Ok(())
}

pub fn set_visible_on_all_workspaces(
    window: &Window,
    config: &OverlayWindowConfig,
    visible: bool,
    include_fullscreen: bool,
) -> PlatformResult<()> {
    let ns_window = ns_window(window)?;
    unsafe {
        ns_window.setCollectionBehavior(collection_behavior(
            config.fullscreenable,
            visible,
            include_fullscreen,
        ));
    }
    Ok(())
}

/// Brings the window on screen without making it key or activating the application.
pub fn show_inactive(window: &Window) -> PlatformResult<()> {
    let ns_window = ns_window(window)?;
    unsafe {
        ns_window.orderFrontRegardless();
    }
    Ok(())
}

pub fn hide(window: &Window) -> PlatformResult<()> {
    let ns_window = ns_window(window)?;
    unsafe {
        ns_window.orderOut(None);
    }
    Ok(())
}

fn collection_behavior(
    fullscreenable: bool,
    all_spaces: bool,
    include_fullscreen: bool,
) -> NSWindowCollectionBehavior {
    // Never part of the Cmd+` window cycle, not moved by Exposé.
    let mut behavior =
        NSWindowCollectionBehavior::IgnoresCycle | NSWindowCollectionBehavior::Stationary;
    if !fullscreenable {
        behavior = behavior | NSWindowCollectionBehavior::FullScreenNone;
    }
    if all_spaces {
        behavior = behavior | NSWindowCollectionBehavior::CanJoinAllSpaces;
    }
    if include_fullscreen {
        behavior = behavior | NSWindowCollectionBehavior::FullScreenAuxiliary;
    }
    behavior
}
