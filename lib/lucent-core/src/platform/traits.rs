use crate::hotkeys::{HotkeyAction, HotkeyCombo};
use crate::overlay::OverlayWindowConfig;
use crate::platform::{
    Bounds, ContentSource, Display, DisplayId, OverlayId, OverlayLevel, PlatformResult,
};

/// The windowing side of a GUI host. Implementations are only used from the event loop thread.
pub trait OverlayHostImpl {
    type Window: OverlayWindowImpl;

    /// Returns every connected display, in the host's enumeration order.
    fn enumerate_displays(&self) -> PlatformResult<Vec<Display>>;

    /// The display the host considers primary, if it can tell.
    fn primary_display_id(&self) -> PlatformResult<Option<DisplayId>>;

    /// Creates a window with the given configuration. The window must start hidden.
    fn create_window(&mut self, config: &OverlayWindowConfig) -> PlatformResult<Self::Window>;
}

/// A single host window. Dropping it without calling `destroy` is allowed but the host may keep
/// the native window alive until the value is dropped.
pub trait OverlayWindowImpl {
    fn id(&self) -> OverlayId;
    fn bounds(&self) -> Bounds;

    /// Releases the native window. The handle must not be used afterwards.
    fn destroy(&mut self);

    /// Shows the window without activating it or taking keyboard focus.
    fn show_inactive(&mut self) -> PlatformResult<()>;
    fn hide(&mut self) -> PlatformResult<()>;
    fn is_visible(&self) -> bool;

    /// Makes the window transparent to mouse input. `forward` asks the host to still deliver
    /// hover and scroll events to the content where it supports that.
    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) -> PlatformResult<()>;
    fn set_always_on_top(&mut self, on_top: bool, level: OverlayLevel) -> PlatformResult<()>;
    fn set_visible_on_all_workspaces(
        &mut self,
        visible: bool,
        include_fullscreen: bool,
    ) -> PlatformResult<()>;

    fn mute_audio(&mut self, muted: bool) -> PlatformResult<()>;
    fn is_audio_muted(&self) -> bool;

    /// Starts loading the content. Completion is reported asynchronously by the host as a
    /// content-loaded event carrying this window's id.
    fn load_content(&mut self, content: &ContentSource) -> PlatformResult<()>;
}

/// System-wide hotkey registration.
pub trait HotkeyRegistrarImpl {
    fn register(&mut self, action: HotkeyAction, combo: &HotkeyCombo) -> PlatformResult<()>;

    /// Maps a host hotkey id back to the action it was registered for.
    fn action_for(&self, hotkey_id: u32) -> Option<HotkeyAction>;

    /// Releases every combo registered through this registrar.
    fn unregister_all(&mut self) -> PlatformResult<()>;
}
