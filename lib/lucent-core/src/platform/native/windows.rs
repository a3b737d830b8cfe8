use crate::overlay::OverlayWindowConfig;
use crate::platform::{OverlayLevel, PlatformResult};
use log::trace;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowLongW, SetWindowLongW, SetWindowPos, ShowWindow, GWL_EXSTYLE, HWND_NOTOPMOST,
    HWND_TOPMOST, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    SW_HIDE, SW_SHOWNOACTIVATE, WS_EX_APPWINDOW, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
};
use winit::platform::windows::WindowAttributesExtWindows;
use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::window::{Window, WindowAttributes};

fn get_hwnd(window: &Window) -> PlatformResult<HWND> {
    let window_handle = window
        .window_handle()
        .map_err(|e| format!("Failed to get window handle: {}", e))?;

    if let RawWindowHandle::Win32(handle) = window_handle.as_raw() {
        Ok(HWND(handle.hwnd.get() as _))
    } else {
        Err("Expected Win32 window handle".into())
    }
}

pub fn platform_attributes(
    attributes: WindowAttributes,
    config: &OverlayWindowConfig,
) -> WindowAttributes {
    attributes
        .with_skip_taskbar(config.skip_taskbar)
        .with_undecorated_shadow(config.shadow)
}

/// The extended style an overlay needs on top of `current`. Tool windows stay out of the taskbar
/// and Alt+Tab; no-activate windows never take focus.
fn overlay_ex_style(current: i32, config: &OverlayWindowConfig) -> i32 {
    let mut ex_style = current & !(WS_EX_APPWINDOW.0 as i32);
    if config.skip_taskbar {
        ex_style |= WS_EX_TOOLWINDOW.0 as i32;
    }
    if !config.focusable {
        ex_style |= WS_EX_NOACTIVATE.0 as i32;
    }
    ex_style
}

/// winit rewrites `GWL_EXSTYLE` from its own flags whenever one of them changes (hit testing,
/// window level), dropping these bits. Call again after every such change.
pub fn apply_overlay_style(window: &Window, config: &OverlayWindowConfig) -> PlatformResult<()> {
    let hwnd = get_hwnd(window)?;
    unsafe {
        let current = GetWindowLongW(hwnd, GWL_EXSTYLE);
        let ex_style = overlay_ex_style(current, config);
        if ex_style == current {
            return Ok(());
        }

        SetWindowLongW(hwnd, GWL_EXSTYLE, ex_style);
        SetWindowPos(
            hwnd,
            None,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
        )
        .map_err(|err| err.to_string())?;
    }
    Ok(())
}

pub fn set_level(window: &Window, on_top: bool, _level: OverlayLevel) -> PlatformResult<()> {
    let hwnd = get_hwnd(window)?;
    let insert_after = if on_top { HWND_TOPMOST } else { HWND_NOTOPMOST };
    unsafe {
        SetWindowPos(
            hwnd,
            Some(insert_after),
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
        )
        .map_err(|err| err.to_string())?;
    }
    Ok(())
}

pub fn set_visible_on_all_workspaces(
    _window: &Window,
    _config: &OverlayWindowConfig,
    visible: bool,
    _include_fullscreen: bool,
) -> PlatformResult<()> {
    // Topmost tool windows already follow the user across virtual desktops and full-screen
    // applications.
    trace!("Visible on all workspaces: {visible}");
    Ok(())
}

// Showing and hiding both go through ShowWindow. winit keeps its own copy of the visibility
// flag, which a native show does not update, so mixing the two loses hides.
pub fn show_inactive(window: &Window) -> PlatformResult<()> {
    let hwnd = get_hwnd(window)?;
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);
    }
    Ok(())
}

pub fn hide(window: &Window) -> PlatformResult<()> {
    let hwnd = get_hwnd(window)?;
    unsafe {
        let _ = ShowWindow(hwnd, SW_HIDE);
    }
    Ok(())
}
