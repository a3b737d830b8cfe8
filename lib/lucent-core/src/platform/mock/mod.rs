//! In-memory host used by the tests. Window state lives behind shared cells so a test can keep
//! observing a window after the manager destroyed or replaced it.

use crate::hotkeys::{HotkeyAction, HotkeyCombo};
use crate::overlay::OverlayWindowConfig;
use crate::platform::{
    Bounds, ContentSource, Display, DisplayId, HotkeyRegistrarImpl, OverlayHostImpl, OverlayId,
    OverlayLevel, OverlayWindowImpl, PlatformErrorType, PlatformResult,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct MockWindowState {
    pub id: OverlayId,
    pub config: OverlayWindowConfig,
    pub alive: bool,
    pub visible: bool,
    pub focused: bool,
    pub muted: bool,
    pub ignore_mouse: bool,
    pub forward_mouse: bool,
    pub always_on_top: Option<OverlayLevel>,
    pub all_workspaces: bool,
    pub include_fullscreen: bool,
    pub content: Option<ContentSource>,
}

pub type MockWindowRef = Rc<RefCell<MockWindowState>>;

#[derive(Default)]
pub struct MockPlatform {
    pub displays: Vec<Display>,
    pub primary: Option<DisplayId>,
    /// Every window ever created, in creation order.
    pub created: Vec<MockWindowRef>,
    /// Fail the n-th (zero based) window creation.
    pub fail_creation_at: Option<usize>,
    next_id: OverlayId,
}

impl MockPlatform {
    pub fn new(displays: Vec<Display>, primary: Option<DisplayId>) -> Self {
        Self {
            displays,
            primary,
            ..Default::default()
        }
    }

    pub fn set_displays(&mut self, displays: Vec<Display>, primary: Option<DisplayId>) {
        self.displays = displays;
        self.primary = primary;
    }

    pub fn alive_windows(&self) -> Vec<MockWindowRef> {
        self.created
            .iter()
            .filter(|w| w.borrow().alive)
            .cloned()
            .collect()
    }

    pub fn window(&self, id: OverlayId) -> Option<MockWindowRef> {
        self.created.iter().find(|w| w.borrow().id == id).cloned()
    }
}

impl OverlayHostImpl for MockPlatform {
    type Window = MockOverlayWindow;

    fn enumerate_displays(&self) -> PlatformResult<Vec<Display>> {
        Ok(self.displays.clone())
    }

    fn primary_display_id(&self) -> PlatformResult<Option<DisplayId>> {
        Ok(self.primary)
    }

    fn create_window(&mut self, config: &OverlayWindowConfig) -> PlatformResult<Self::Window> {
        if self.fail_creation_at == Some(self.created.len()) {
            return Err(PlatformErrorType::WindowCreation("mock failure".to_string()).into());
        }

        self.next_id += 1;
        let state = Rc::new(RefCell::new(MockWindowState {
            id: self.next_id,
            config: config.clone(),
            alive: true,
            visible: config.visible,
            focused: false,
            muted: false,
            ignore_mouse: false,
            forward_mouse: false,
            always_on_top: None,
            all_workspaces: false,
            include_fullscreen: false,
            content: None,
        }));
        self.created.push(state.clone());

        Ok(MockOverlayWindow { state })
    }
}

pub struct MockOverlayWindow {
    state: MockWindowRef,
}

impl MockOverlayWindow {
    fn ensure_alive(&self) -> PlatformResult<()> {
        if self.state.borrow().alive {
            Ok(())
        } else {
            Err("Window was destroyed".into())
        }
    }
}

impl OverlayWindowImpl for MockOverlayWindow {
    fn id(&self) -> OverlayId {
        self.state.borrow().id
    }

    fn bounds(&self) -> Bounds {
        self.state.borrow().config.bounds.clone()
    }

    fn destroy(&mut self) {
        let mut state = self.state.borrow_mut();
        state.alive = false;
        state.visible = false;
    }

    fn show_inactive(&mut self) -> PlatformResult<()> {
        self.ensure_alive()?;
        self.state.borrow_mut().visible = true;
        Ok(())
    }

    fn hide(&mut self) -> PlatformResult<()> {
        self.ensure_alive()?;
        self.state.borrow_mut().visible = false;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) -> PlatformResult<()> {
        self.ensure_alive()?;
        let mut state = self.state.borrow_mut();
        state.ignore_mouse = ignore;
        state.forward_mouse = forward;
        Ok(())
    }

    fn set_always_on_top(&mut self, on_top: bool, level: OverlayLevel) -> PlatformResult<()> {
        self.ensure_alive()?;
        self.state.borrow_mut().always_on_top = on_top.then_some(level);
        Ok(())
    }

    fn set_visible_on_all_workspaces(
        &mut self,
        visible: bool,
        include_fullscreen: bool,
    ) -> PlatformResult<()> {
        self.ensure_alive()?;
        let mut state = self.state.borrow_mut();
        state.all_workspaces = visible;
        state.include_fullscreen = include_fullscreen;
        Ok(())
    }

    fn mute_audio(&mut self, muted: bool) -> PlatformResult<()> {
        self.ensure_alive()?;
        self.state.borrow_mut().muted = muted;
        Ok(())
    }

    fn is_audio_muted(&self) -> bool {
        self.state.borrow().muted
    }

    fn load_content(&mut self, content: &ContentSource) -> PlatformResult<()> {
        self.ensure_alive()?;
        self.state.borrow_mut().content = Some(content.clone());
        Ok(())
    }
}

/// The system-wide hotkey table. Shared between registrars to model other applications (or a
/// later run of this one) competing for the same combos.
pub type MockHotkeyTable = Rc<RefCell<HashMap<u32, String>>>;

pub struct MockHotkeys {
    owner: String,
    table: MockHotkeyTable,
    registered: Vec<(u32, HotkeyAction)>,
}

impl MockHotkeys {
    pub fn new(owner: impl Into<String>, table: MockHotkeyTable) -> Self {
        Self {
            owner: owner.into(),
            table,
            registered: Vec::new(),
        }
    }

    pub fn registered(&self) -> &[(u32, HotkeyAction)] {
        &self.registered
    }
}

impl HotkeyRegistrarImpl for MockHotkeys {
    fn register(&mut self, action: HotkeyAction, combo: &HotkeyCombo) -> PlatformResult<()> {
        let mut table = self.table.borrow_mut();
        if let Some(owner) = table.get(&combo.id()) {
            return Err(PlatformErrorType::Hotkey(format!("{combo} is already bound by {owner}"))
                .into());
        }

        table.insert(combo.id(), self.owner.clone());
        self.registered.push((combo.id(), action));
        Ok(())
    }

    fn action_for(&self, hotkey_id: u32) -> Option<HotkeyAction> {
        self.registered
            .iter()
            .find(|(id, _)| *id == hotkey_id)
            .map(|(_, action)| *action)
    }

    fn unregister_all(&mut self) -> PlatformResult<()> {
        let mut table = self.table.borrow_mut();
        for (id, _) in self.registered.drain(..) {
            table.remove(&id);
        }
        Ok(())
    }
}
