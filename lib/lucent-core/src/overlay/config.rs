use crate::config::Config;
use crate::hotkeys::{HotkeyAction, HotkeyCombo};
use crate::platform::{Bounds, ContentSource, Display, OverlayLevel};

/// What closing the last overlay window means for the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessLifetime {
    /// The process lifetime is decoupled from window lifetime: only the quit hotkey or an
    /// external termination request ends it.
    Explicit,
    /// Quit once every overlay window has been closed.
    QuitWhenAllWindowsClosed,
}

/// The parts of [`Config`] the overlay manager works from.
#[derive(Debug, Clone)]
pub struct OverlaySettings {
    pub content: ContentSource,
    pub mute_secondary_displays: bool,
    pub forward_mouse_events: bool,
    pub level: OverlayLevel,
    pub visible_on_fullscreen: bool,
    pub autoplay: bool,
    pub lifetime: ProcessLifetime,
    pub hotkeys: Vec<(HotkeyAction, HotkeyCombo)>,
}

impl OverlaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content: ContentSource::File(config.content_path()),
            mute_secondary_displays: config.mute_secondary_displays,
            forward_mouse_events: config.forward_mouse_events,
            level: config.window_level,
            visible_on_fullscreen: config.visible_on_fullscreen,
            autoplay: config.autoplay,
            lifetime: if config.quit_when_all_windows_closed {
                ProcessLifetime::QuitWhenAllWindowsClosed
            } else {
                ProcessLifetime::Explicit
            },
            hotkeys: config.hotkey_bindings(),
        }
    }
}

/// Creation-time flags for one overlay window.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayWindowConfig {
    pub title: String,
    pub bounds: Bounds,
    pub decorations: bool,
    pub resizable: bool,
    pub movable: bool,
    pub shadow: bool,
    pub fullscreenable: bool,
    pub focusable: bool,
    pub visible: bool,
    pub transparent: bool,
    pub skip_taskbar: bool,
    pub autoplay: bool,
    pub muted: bool,
}

impl OverlayWindowConfig {
    pub fn for_display(display: &Display, settings: &OverlaySettings, primary: bool) -> Self {
        Self {
            title: format!("Lucent overlay ({})", display.name),
            bounds: display.bounds.clone(),
            decorations: false,
            resizable: false,
            movable: false,
            shadow: false,
            fullscreenable: false,
            focusable: false,
            visible: false,
            transparent: true,
            skip_taskbar: true,
            autoplay: settings.autoplay,
            muted: settings.mute_secondary_displays && !primary,
        }
    }
}
