use crate::config::Config;
use crate::lifecycle::{HostEvent, LifecycleState, LoopControl, OverlayController};
use crate::overlay::OverlaySettings;
use crate::platform::{
    content_pump_interval, init_content_backend, pump_content_events, GlobalHotkeys,
    HotkeyRegistrarImpl, OverlayId, WinitHost, WinitOverlayWindow,
};
use crate::{LucentFatalError, LucentResult};
use log::{error, trace};
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::WindowId;

#[derive(Debug)]
pub enum LucentEvent {
    /// A global hotkey with this id was pressed.
    Hotkey(u32),
    /// An overlay finished loading its content.
    ContentLoaded(OverlayId),
    /// Termination was requested from outside the event loop (Ctrl+C, SIGTERM).
    QuitRequested,
}

pub static EVENT_LOOP_PROXY: std::sync::OnceLock<EventLoopProxy<LucentEvent>> =
    std::sync::OnceLock::new();

pub struct EventLoopMain {}

impl EventLoopMain {
    pub fn run(config: &Config) -> LucentResult<()> {
        #[cfg_attr(not(target_os = "macos"), allow(unused_mut))]
        let mut builder = EventLoop::<LucentEvent>::with_user_event();

        // No dock icon and no entry in the application switcher.
        #[cfg(target_os = "macos")]
        {
            use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
            builder.with_activation_policy(ActivationPolicy::Accessory);
        }

        let event_loop = builder
            .build()
            .map_err(|e| format!("Failed to create event loop: {e}"))?;
        let proxy = event_loop.create_proxy();
        EVENT_LOOP_PROXY
            .set(proxy.clone())
            .map_err(|_| "Event loop proxy already initialized")?;
        event_loop.set_control_flow(ControlFlow::Wait);
        init_content_backend();

        let mut app = App::new(config, proxy);
        event_loop
            .run_app(&mut app)
            .map_err(|e| format!("Failed to run event loop: {e}"))?;

        match app.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Asks the running event loop to shut down. Can be called from any thread.
    pub fn request_quit() {
        if let Some(proxy) = EVENT_LOOP_PROXY.get() {
            let _ = proxy.send_event(LucentEvent::QuitRequested);
        }
    }
}

struct App {
    controller: OverlayController<WinitOverlayWindow>,
    hotkeys: Option<GlobalHotkeys>,
    proxy: EventLoopProxy<LucentEvent>,
    fatal: Option<LucentFatalError>,
}

impl App {
    fn new(config: &Config, proxy: EventLoopProxy<LucentEvent>) -> Self {
        Self {
            controller: OverlayController::new(
                OverlaySettings::from_config(config),
                config.display_poll_interval(),
            ),
            hotkeys: None,
            proxy,
            fatal: None,
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        let mut host = WinitHost::new(event_loop, self.proxy.clone());
        let hotkeys = self
            .hotkeys
            .get_or_insert_with(|| GlobalHotkeys::new(self.proxy.clone()));

        let result = self.controller.handle_event(&mut host, hotkeys, event);
        self.apply(event_loop, result);
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, result: LucentResult<LoopControl>) {
        match result {
            Ok(LoopControl::Continue) => {
                if self.controller.state() == LifecycleState::Active {
                    let mut deadline = self.controller.watcher().next_poll();
                    if let Some(interval) = content_pump_interval() {
                        deadline = deadline.min(Instant::now() + interval);
                    }
                    event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                }
            }
            Ok(LoopControl::Exit) => event_loop.exit(),
            Err(e) => {
                error!("Fatal: {e}");
                if let Some(hotkeys) = self.hotkeys.as_mut() {
                    self.controller.shutdown(hotkeys);
                }
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler<LucentEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.dispatch(event_loop, HostEvent::Ready);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LucentEvent) {
        match event {
            LucentEvent::Hotkey(id) => {
                let action = self.hotkeys.as_ref().and_then(|h| h.action_for(id));
                match action {
                    Some(action) => self.dispatch(event_loop, HostEvent::Hotkey(action)),
                    None => trace!("Ignoring unknown hotkey {id}"),
                }
            }
            LucentEvent::ContentLoaded(id) => {
                self.dispatch(event_loop, HostEvent::ContentLoaded(id));
            }
            LucentEvent::QuitRequested => {
                self.dispatch(event_loop, HostEvent::QuitRequested);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            // Closing overlays never ends the process on its own; the controller decides.
            WindowEvent::CloseRequested => {
                self.dispatch(event_loop, HostEvent::WindowCloseRequested(u64::from(id)));
            }
            WindowEvent::Destroyed => trace!("Window {id:?} destroyed"),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        pump_content_events();
        if self.controller.state() != LifecycleState::Active {
            return;
        }

        let mut host = WinitHost::new(event_loop, self.proxy.clone());
        let hotkeys = self
            .hotkeys
            .get_or_insert_with(|| GlobalHotkeys::new(self.proxy.clone()));

        let result = self
            .controller
            .poll_displays(&mut host, hotkeys, Instant::now());
        self.apply(event_loop, result);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(hotkeys) = self.hotkeys.as_mut() {
            self.controller.shutdown(hotkeys);
        }
        trace!("Event loop exiting");
    }
}
