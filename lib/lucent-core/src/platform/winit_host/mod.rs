pub use content::{content_pump_interval, init_content_backend, pump_content_events};
pub use hotkeys::GlobalHotkeys;
pub use window::WinitOverlayWindow;

mod content;
mod hotkeys;
mod window;

use crate::event_loop_main::LucentEvent;
use crate::overlay::OverlayWindowConfig;
use crate::platform::native;
use crate::platform::{
    Bounds, Display, DisplayId, OverlayHostImpl, PlatformErrorType, PlatformResult, Position, Size,
};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::monitor::MonitorHandle;
use winit::window::{WindowAttributes, WindowButtons, WindowLevel};

/// The winit event loop seen as an overlay host. Only lives for the duration of one event
/// callback, since winit only hands out the active event loop there.
pub struct WinitHost<'a> {
    event_loop: &'a ActiveEventLoop,
    proxy: EventLoopProxy<LucentEvent>,
}

impl<'a> WinitHost<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop, proxy: EventLoopProxy<LucentEvent>) -> Self {
        Self { event_loop, proxy }
    }
}

impl OverlayHostImpl for WinitHost<'_> {
    type Window = WinitOverlayWindow;

    fn enumerate_displays(&self) -> PlatformResult<Vec<Display>> {
        Ok(self
            .event_loop
            .available_monitors()
            .map(|monitor| display_from_monitor(&monitor))
            .collect())
    }

    fn primary_display_id(&self) -> PlatformResult<Option<DisplayId>> {
        Ok(self
            .event_loop
            .primary_monitor()
            .map(|monitor| display_id(&monitor)))
    }

    fn create_window(&mut self, config: &OverlayWindowConfig) -> PlatformResult<Self::Window> {
        let bounds = &config.bounds;
        let attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_position(PhysicalPosition::new(
                bounds.position.x,
                bounds.position.y,
            ))
            .with_inner_size(PhysicalSize::new(bounds.size.width, bounds.size.height))
            .with_decorations(config.decorations)
            .with_resizable(config.resizable)
            .with_enabled_buttons(WindowButtons::empty())
            .with_transparent(config.transparent)
            .with_visible(config.visible)
            .with_active(config.focusable)
            .with_window_level(WindowLevel::AlwaysOnTop);
        let attributes = native::platform_attributes(attributes, config);

        let window = self
            .event_loop
            .create_window(attributes)
            .map_err(|e| PlatformErrorType::WindowCreation(e.to_string()))?;
        native::apply_overlay_style(&window, config)?;

        Ok(WinitOverlayWindow::new(window, config, self.proxy.clone()))
    }
}

fn display_from_monitor(monitor: &MonitorHandle) -> Display {
    let position = monitor.position();
    let size = monitor.size();
    let name = monitor
        .name()
        .unwrap_or_else(|| format!("Display at {},{}", position.x, position.y));

    Display {
        id: display_id(monitor),
        name,
        bounds: Bounds::from_position(
            Position::new(position.x, position.y),
            Size::new(size.width, size.height),
        ),
        scale_factor: monitor.scale_factor(),
    }
}

/// A display id that stays the same between enumerations for as long as the monitor stays
/// connected.
#[cfg(target_os = "macos")]
fn display_id(monitor: &MonitorHandle) -> DisplayId {
    use winit::platform::macos::MonitorHandleExtMacOS;
    monitor.native_id() as DisplayId
}

#[cfg(not(target_os = "macos"))]
fn display_id(monitor: &MonitorHandle) -> DisplayId {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    match monitor.name() {
        Some(name) => name.hash(&mut hasher),
        None => {
            let position = monitor.position();
            (position.x, position.y).hash(&mut hasher);
        }
    }
    hasher.finish()
}
