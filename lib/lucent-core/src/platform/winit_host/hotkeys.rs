use crate::event_loop_main::LucentEvent;
use crate::hotkeys::{HotkeyAction, HotkeyCombo};
use crate::platform::{HotkeyRegistrarImpl, PlatformError, PlatformErrorType, PlatformResult};
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use log::error;
use winit::event_loop::EventLoopProxy;

/// System-wide hotkeys through the `global-hotkey` crate. Presses are forwarded to the event
/// loop as [`LucentEvent::Hotkey`]. Must be created on the event loop thread.
pub struct GlobalHotkeys {
    manager: Option<GlobalHotKeyManager>,
    registered: Vec<(HotKey, HotkeyAction)>,
}

impl GlobalHotkeys {
    pub fn new(proxy: EventLoopProxy<LucentEvent>) -> Self {
        let manager = match GlobalHotKeyManager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                error!("Global hotkeys are unavailable: {e}");
                None
            }
        };

        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if event.state == HotKeyState::Pressed {
                let _ = proxy.send_event(LucentEvent::Hotkey(event.id));
            }
        }));

        Self {
            manager,
            registered: Vec::new(),
        }
    }

    fn manager(&self) -> PlatformResult<&GlobalHotKeyManager> {
        self.manager.as_ref().ok_or_else(|| {
            PlatformError::from(PlatformErrorType::Hotkey(
                "the hotkey manager could not be created".to_string(),
            ))
        })
    }
}

impl HotkeyRegistrarImpl for GlobalHotkeys {
    fn register(&mut self, action: HotkeyAction, combo: &HotkeyCombo) -> PlatformResult<()> {
        let hotkey = combo.hotkey();
        self.manager()?
            .register(hotkey)
            .map_err(|e| PlatformErrorType::Hotkey(format!("{combo}: {e}")))?;
        self.registered.push((hotkey, action));
        Ok(())
    }

    fn action_for(&self, hotkey_id: u32) -> Option<HotkeyAction> {
        self.registered
            .iter()
            .find(|(hotkey, _)| hotkey.id() == hotkey_id)
            .map(|(_, action)| *action)
    }

    fn unregister_all(&mut self) -> PlatformResult<()> {
        if self.registered.is_empty() {
            return Ok(());
        }

        let hotkeys: Vec<HotKey> = self.registered.drain(..).map(|(hotkey, _)| hotkey).collect();
        self.manager()?
            .unregister_all(&hotkeys)
            .map_err(|e| PlatformErrorType::Hotkey(e.to_string()))?;
        Ok(())
    }
}

impl Drop for GlobalHotkeys {
    fn drop(&mut self) {
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
    }
}
