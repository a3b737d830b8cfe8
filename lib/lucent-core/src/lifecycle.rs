use crate::display_watcher::{DisplayChange, DisplayWatcher};
use crate::hotkeys::{register_hotkeys, HotkeyAction};
use crate::overlay::{OverlayManager, OverlaySettings, ProcessLifetime};
use crate::platform::{HotkeyRegistrarImpl, OverlayHostImpl, OverlayId, OverlayWindowImpl};
use crate::LucentResult;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The host has not signalled that it can create windows yet.
    Uninitialized,
    /// The host is ready; startup is running.
    Ready,
    /// Overlays exist, hotkeys are registered and displays are being watched.
    Active,
    /// Hotkeys were released and the windows destroyed. Nothing happens anymore.
    Stopped,
}

/// Named host notifications that drive the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Ready,
    ContentLoaded(OverlayId),
    DisplaysChanged(Vec<DisplayChange>),
    Hotkey(HotkeyAction),
    WindowCloseRequested(OverlayId),
    QuitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// The overlay window manager as a state machine over host events.
pub struct OverlayController<W: OverlayWindowImpl> {
    state: LifecycleState,
    manager: OverlayManager<W>,
    watcher: DisplayWatcher,
}

impl<W: OverlayWindowImpl> OverlayController<W> {
    pub fn new(settings: OverlaySettings, display_poll_interval: Duration) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            manager: OverlayManager::new(settings),
            watcher: DisplayWatcher::new(display_poll_interval),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn manager(&self) -> &OverlayManager<W> {
        &self.manager
    }

    pub fn watcher(&self) -> &DisplayWatcher {
        &self.watcher
    }

    pub fn handle_event<H, R>(
        &mut self,
        host: &mut H,
        hotkeys: &mut R,
        event: HostEvent,
    ) -> LucentResult<LoopControl>
    where
        H: OverlayHostImpl<Window = W>,
        R: HotkeyRegistrarImpl,
    {
        match (self.state, event) {
            (LifecycleState::Stopped, _) => Ok(LoopControl::Exit),

            (_, HostEvent::QuitRequested) | (_, HostEvent::Hotkey(HotkeyAction::Quit)) => {
                info!("Quit requested");
                self.shutdown(hotkeys);
                Ok(LoopControl::Exit)
            }

            (LifecycleState::Uninitialized, HostEvent::Ready) => {
                self.state = LifecycleState::Ready;
                self.start(host, hotkeys)?;
                Ok(LoopControl::Continue)
            }

            (LifecycleState::Active, HostEvent::Ready) => {
                debug!("Host signalled readiness again, ignoring");
                Ok(LoopControl::Continue)
            }

            (LifecycleState::Active, HostEvent::ContentLoaded(id)) => {
                self.manager.on_content_loaded(id);
                Ok(LoopControl::Continue)
            }

            (LifecycleState::Active, HostEvent::Hotkey(HotkeyAction::ToggleVisibility)) => {
                self.manager.toggle_show_hide();
                Ok(LoopControl::Continue)
            }

            (LifecycleState::Active, HostEvent::DisplaysChanged(changes)) => {
                if changes.is_empty() {
                    return Ok(LoopControl::Continue);
                }
                self.manager.reconcile_displays(host, &changes)?;
                self.prime_watcher();
                Ok(LoopControl::Continue)
            }

            (LifecycleState::Active, HostEvent::WindowCloseRequested(id)) => {
                if !self.manager.on_window_closed(id) {
                    return Ok(LoopControl::Continue);
                }

                match self.manager.settings().lifetime {
                    ProcessLifetime::Explicit => {
                        info!("All overlay windows closed, still running until quit");
                        Ok(LoopControl::Continue)
                    }
                    ProcessLifetime::QuitWhenAllWindowsClosed => {
                        info!("All overlay windows closed, quitting");
                        self.shutdown(hotkeys);
                        Ok(LoopControl::Exit)
                    }
                }
            }

            (state, event) => {
                warn!("Ignoring {event:?} while {state:?}");
                Ok(LoopControl::Continue)
            }
        }
    }

    /// Enumerates displays when the polling interval has elapsed and rebuilds the overlays if
    /// the topology changed. All changes seen in one poll cause a single rebuild.
    pub fn poll_displays<H, R>(
        &mut self,
        host: &mut H,
        hotkeys: &mut R,
        now: Instant,
    ) -> LucentResult<LoopControl>
    where
        H: OverlayHostImpl<Window = W>,
        R: HotkeyRegistrarImpl,
    {
        if self.state != LifecycleState::Active || !self.watcher.is_due(now) {
            return Ok(LoopControl::Continue);
        }

        let displays = host.enumerate_displays()?;
        let changes = self.watcher.poll(displays);
        if changes.is_empty() {
            return Ok(LoopControl::Continue);
        }

        self.handle_event(host, hotkeys, HostEvent::DisplaysChanged(changes))
    }

    /// Releases every global hotkey and destroys the overlays. Safe to call more than once.
    pub fn shutdown<R: HotkeyRegistrarImpl>(&mut self, hotkeys: &mut R) {
        if self.state == LifecycleState::Stopped {
            return;
        }

        if let Err(e) = hotkeys.unregister_all() {
            error!("Could not unregister hotkeys: {e}");
        }
        self.manager.destroy_all();
        self.state = LifecycleState::Stopped;
        debug!("Overlay controller stopped");
    }

    fn start<H, R>(&mut self, host: &mut H, hotkeys: &mut R) -> LucentResult<()>
    where
        H: OverlayHostImpl<Window = W>,
        R: HotkeyRegistrarImpl,
    {
        self.manager.create_overlay_windows(host)?;

        let bindings = self.manager.settings().hotkeys.clone();
        let registered = register_hotkeys(hotkeys, &bindings);
        if registered < bindings.len() {
            warn!(
                "{} of {} hotkeys are unavailable",
                bindings.len() - registered,
                bindings.len()
            );
        }

        self.prime_watcher();
        self.state = LifecycleState::Active;
        info!("Overlays active");
        Ok(())
    }

    fn prime_watcher(&mut self) {
        let displays = self
            .manager
            .windows()
            .iter()
            .map(|entry| entry.display.clone())
            .collect();
        self.watcher.prime(displays);
    }
}
