use super::content::{ContentOptions, OverlayContent};
use crate::event_loop_main::LucentEvent;
use crate::overlay::OverlayWindowConfig;
use crate::platform::native;
use crate::platform::{
    Bounds, ContentSource, OverlayId, OverlayLevel, OverlayWindowImpl, PlatformResult,
};
use log::trace;
use winit::event_loop::EventLoopProxy;
use winit::window::{Window, WindowLevel};

pub struct WinitOverlayWindow {
    id: OverlayId,
    bounds: Bounds,
    // The webview must be dropped before the window it is attached to.
    content: Option<OverlayContent>,
    window: Option<Window>,
    config: OverlayWindowConfig,
    visible: bool,
    muted: bool,
    autoplay: bool,
    proxy: EventLoopProxy<LucentEvent>,
}

impl WinitOverlayWindow {
    pub(super) fn new(
        window: Window,
        config: &OverlayWindowConfig,
        proxy: EventLoopProxy<LucentEvent>,
    ) -> Self {
        Self {
            id: u64::from(window.id()),
            bounds: config.bounds.clone(),
            content: None,
            window: Some(window),
            config: config.clone(),
            visible: config.visible,
            muted: false,
            autoplay: config.autoplay,
            proxy,
        }
    }

    fn window(&self) -> PlatformResult<&Window> {
        self.window
            .as_ref()
            .ok_or_else(|| format!("Overlay {} was destroyed", self.id).into())
    }
}

impl OverlayWindowImpl for WinitOverlayWindow {
    fn id(&self) -> OverlayId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        self.bounds.clone()
    }

    fn destroy(&mut self) {
        self.content.take();
        self.window.take();
        self.visible = false;
    }

    fn show_inactive(&mut self) -> PlatformResult<()> {
        native::show_inactive(self.window()?)?;
        self.visible = true;
        Ok(())
    }

    fn hide(&mut self) -> PlatformResult<()> {
        native::hide(self.window()?)?;
        self.visible = false;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        // Not every backend can report visibility (Wayland cannot).
        self.window
            .as_ref()
            .and_then(|window| window.is_visible())
            .unwrap_or(self.visible)
    }

    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) -> PlatformResult<()> {
        let window = self.window()?;
        window
            .set_cursor_hittest(!ignore)
            .map_err(|e| format!("Could not make overlay click-through: {e}"))?;
        native::apply_overlay_style(window, &self.config)?;
        if ignore && forward {
            trace!("Overlay {}: mouse events pass through to the windows below", self.id);
        }
        Ok(())
    }

    fn set_always_on_top(&mut self, on_top: bool, level: OverlayLevel) -> PlatformResult<()> {
        let window = self.window()?;
        window.set_window_level(if on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        });
        native::set_level(window, on_top, level)?;
        native::apply_overlay_style(window, &self.config)
    }

    fn set_visible_on_all_workspaces(
        &mut self,
        visible: bool,
        include_fullscreen: bool,
    ) -> PlatformResult<()> {
        native::set_visible_on_all_workspaces(
            self.window()?,
            &self.config,
            visible,
            include_fullscreen,
        )
    }

    fn mute_audio(&mut self, muted: bool) -> PlatformResult<()> {
        self.muted = muted;
        if let Some(content) = &self.content {
            content.set_muted(muted)?;
        }
        Ok(())
    }

    fn is_audio_muted(&self) -> bool {
        self.muted
    }

    fn load_content(&mut self, content: &ContentSource) -> PlatformResult<()> {
        let url = content.to_url()?;
        let options = ContentOptions {
            autoplay: self.autoplay,
            muted: self.muted,
        };

        // Replacing the content drops the previous webview first.
        self.content.take();
        let loaded = OverlayContent::load(self.window()?, &url, self.id, options, self.proxy.clone())?;
        self.content = Some(loaded);
        Ok(())
    }
}
