use crate::overlay::OverlayWindowConfig;
use crate::platform::{OverlayLevel, PlatformResult};
use log::trace;
use winit::window::{Window, WindowAttributes};

#[cfg(target_os = "linux")]
pub fn platform_attributes(
    attributes: WindowAttributes,
    config: &OverlayWindowConfig,
) -> WindowAttributes {
    use winit::platform::x11::WindowAttributesExtX11;

    // Unmanaged X11 windows never get focus or a taskbar entry. Ignored on Wayland.
    attributes.with_override_redirect(config.skip_taskbar && !config.focusable)
}

#[cfg(not(target_os = "linux"))]
pub fn platform_attributes(
    attributes: WindowAttributes,
    _config: &OverlayWindowConfig,
) -> WindowAttributes {
    attributes
}

pub fn apply_overlay_style(_window: &Window, _config: &OverlayWindowConfig) -> PlatformResult<()> {
    Ok(())
}

pub fn set_level(_window: &Window, _on_top: bool, _level: OverlayLevel) -> PlatformResult<()> {
    Ok(())
}

pub fn set_visible_on_all_workspaces(
    _window: &Window,
    _config: &OverlayWindowConfig,
    visible: bool,
    _include_fullscreen: bool,
) -> PlatformResult<()> {
    trace!("Visible on all workspaces is not supported here (requested {visible})");
    Ok(())
}

pub fn show_inactive(window: &Window) -> PlatformResult<()> {
    window.set_visible(true);
    Ok(())
}

pub fn hide(window: &Window) -> PlatformResult<()> {
    window.set_visible(false);
    Ok(())
}
