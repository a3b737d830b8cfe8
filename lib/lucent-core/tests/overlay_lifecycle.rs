use lucent_core::display_watcher::DisplayChange;
use lucent_core::hotkeys::{HotkeyAction, HotkeyCombo};
use lucent_core::lifecycle::{HostEvent, LifecycleState, LoopControl, OverlayController};
use lucent_core::overlay::{OverlaySettings, ProcessLifetime};
use lucent_core::platform::mock::{MockHotkeyTable, MockHotkeys, MockOverlayWindow, MockPlatform};
use lucent_core::platform::{
    Bounds, ContentSource, Display, DisplayId, OverlayLevel, OverlayWindowImpl,
};
use std::time::{Duration, Instant};

const P1: DisplayId = 1;
const P2: DisplayId = 2;
const P3: DisplayId = 3;

fn p1() -> Display {
    Display::new(P1, "Built-in", Bounds::new(0, 0, 1728, 1117))
}

fn p2() -> Display {
    Display::new(P2, "External", Bounds::new(1728, 0, 2560, 1440))
}

fn p3() -> Display {
    Display::new(P3, "Portrait", Bounds::new(-1080, 0, 1080, 1920))
}

fn settings(lifetime: ProcessLifetime) -> OverlaySettings {
    OverlaySettings {
        content: ContentSource::Url("file:///overlay/index.html".to_string()),
        mute_secondary_displays: true,
        forward_mouse_events: true,
        level: OverlayLevel::ScreenSaver,
        visible_on_fullscreen: true,
        autoplay: true,
        lifetime,
        hotkeys: vec![
            (
                HotkeyAction::ToggleVisibility,
                HotkeyCombo::parse("CmdOrCtrl+Alt+F11").expect("Error parsing hotkey"),
            ),
            (
                HotkeyAction::Quit,
                HotkeyCombo::parse("CmdOrCtrl+Alt+F12").expect("Error parsing hotkey"),
            ),
        ],
    }
}

struct Harness {
    host: MockPlatform,
    hotkeys: MockHotkeys,
    table: MockHotkeyTable,
    controller: OverlayController<MockOverlayWindow>,
}

impl Harness {
    fn new(displays: Vec<Display>, primary: Option<DisplayId>) -> Self {
        Self::with_lifetime(displays, primary, ProcessLifetime::Explicit)
    }

    fn with_lifetime(
        displays: Vec<Display>,
        primary: Option<DisplayId>,
        lifetime: ProcessLifetime,
    ) -> Self {
        let table = MockHotkeyTable::default();
        Self {
            host: MockPlatform::new(displays, primary),
            hotkeys: MockHotkeys::new("lucent", table.clone()),
            table,
            controller: OverlayController::new(settings(lifetime), Duration::from_millis(100)),
        }
    }

    fn send(&mut self, event: HostEvent) -> LoopControl {
        self.controller
            .handle_event(&mut self.host, &mut self.hotkeys, event)
            .expect("Error handling host event")
    }

    fn start(&mut self) {
        assert_eq!(self.send(HostEvent::Ready), LoopControl::Continue);
        assert_eq!(self.controller.state(), LifecycleState::Active);
    }

    fn ids(&self) -> Vec<u64> {
        self.controller
            .manager()
            .windows()
            .iter()
            .map(|entry| entry.window.id())
            .collect()
    }

    fn load_all(&mut self) {
        for id in self.ids() {
            self.send(HostEvent::ContentLoaded(id));
        }
    }

    fn visible(&self) -> Vec<bool> {
        self.controller
            .manager()
            .windows()
            .iter()
            .map(|entry| entry.window.is_visible())
            .collect()
    }

    fn bound_displays(&self) -> Vec<(DisplayId, Bounds, bool)> {
        self.controller
            .manager()
            .windows()
            .iter()
            .map(|entry| {
                (
                    entry.display.id,
                    entry.window.bounds(),
                    entry.window.is_audio_muted(),
                )
            })
            .collect()
    }
}

#[test]
fn test_one_window_per_display_for_any_count() {
    let all = [p1(), p2(), p3()];
    for n in 0..=all.len() {
        let displays = all[..n].to_vec();
        let mut harness = Harness::new(displays.clone(), displays.first().map(|d| d.id));
        harness.start();

        let bound = harness.bound_displays();
        assert_eq!(bound.len(), n);
        for (display, (id, bounds, _)) in displays.iter().zip(bound) {
            assert_eq!(id, display.id);
            assert_eq!(bounds, display.bounds);
        }
        assert_eq!(harness.host.alive_windows().len(), n);
    }
}

#[test]
fn test_only_primary_is_unmuted() {
    let configurations: Vec<(Vec<Display>, Option<DisplayId>)> = vec![
        (vec![p1()], Some(P1)),
        (vec![p1(), p2()], Some(P1)),
        (vec![p1(), p2()], Some(P2)),
        (vec![p3(), p2(), p1()], Some(P2)),
        // Unknown hint: the display at the origin is primary
        (vec![p2(), p1(), p3()], Some(99)),
        (vec![p2(), p1()], None),
    ];

    for (displays, hint) in configurations {
        let mut harness = Harness::new(displays, hint);
        harness.start();

        let unmuted: Vec<DisplayId> = harness
            .bound_displays()
            .into_iter()
            .filter(|(_, _, muted)| !muted)
            .map(|(id, _, _)| id)
            .collect();
        let expected = match hint {
            Some(id) if id != 99 => id,
            _ => P1,
        };
        assert_eq!(unmuted, vec![expected]);
    }
}

#[test]
fn test_windows_stay_hidden_until_their_own_load() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    assert_eq!(harness.visible(), vec![false, false]);

    let ids = harness.ids();
    harness.send(HostEvent::ContentLoaded(ids[1]));
    assert_eq!(harness.visible(), vec![false, true]);

    harness.send(HostEvent::ContentLoaded(ids[0]));
    assert_eq!(harness.visible(), vec![true, true]);

    for window in harness.host.alive_windows() {
        assert!(!window.borrow().focused);
    }
}

#[test]
fn test_two_display_scenario() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();

    assert_eq!(
        harness.bound_displays(),
        vec![(P1, p1().bounds, false), (P2, p2().bounds, true)]
    );
    assert_eq!(harness.visible(), vec![false, false]);

    harness.load_all();
    assert_eq!(harness.visible(), vec![true, true]);
}

#[test]
fn test_toggle_is_a_two_step_involution() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    assert_eq!(harness.visible(), vec![false, false]);

    harness.send(HostEvent::Hotkey(HotkeyAction::ToggleVisibility));
    assert_eq!(harness.visible(), vec![true, true]);

    harness.send(HostEvent::Hotkey(HotkeyAction::ToggleVisibility));
    assert_eq!(harness.visible(), vec![false, false]);
}

#[test]
fn test_toggle_hides_all_when_any_is_visible() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    let ids = harness.ids();
    harness.send(HostEvent::ContentLoaded(ids[0]));
    assert_eq!(harness.visible(), vec![true, false]);

    harness.send(HostEvent::Hotkey(HotkeyAction::ToggleVisibility));
    assert_eq!(harness.visible(), vec![false, false]);
}

#[test]
fn test_unplugging_secondary_rebuilds() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    harness.load_all();
    let old = harness.host.alive_windows();

    harness.host.set_displays(vec![p1()], Some(P1));
    harness.send(HostEvent::DisplaysChanged(vec![DisplayChange::Removed(p2())]));

    assert!(old.iter().all(|window| !window.borrow().alive));
    assert_eq!(harness.bound_displays(), vec![(P1, p1().bounds, false)]);
    assert_eq!(harness.host.alive_windows().len(), 1);
}

#[test]
fn test_every_change_kind_leaves_no_leaked_windows() {
    let mut moved = p2();
    moved.bounds = Bounds::new(-2560, 0, 2560, 1440);
    let scaled = p1().with_scale_factor(2.0);

    let topologies: Vec<(Vec<Display>, DisplayChange)> = vec![
        (vec![p1(), p2(), p3()], DisplayChange::Added(p3())),
        (vec![p1()], DisplayChange::Removed(p2())),
        (
            vec![p1(), moved.clone()],
            DisplayChange::MetricsChanged {
                before: p2(),
                after: moved,
            },
        ),
        (
            vec![scaled.clone(), p2()],
            DisplayChange::MetricsChanged {
                before: p1(),
                after: scaled,
            },
        ),
        (vec![], DisplayChange::Removed(p1())),
    ];

    for (displays, change) in topologies {
        let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
        harness.start();
        let old = harness.host.alive_windows();

        harness.host.set_displays(displays.clone(), Some(P1));
        harness.send(HostEvent::DisplaysChanged(vec![change]));

        assert!(old.iter().all(|window| !window.borrow().alive));
        assert_eq!(harness.controller.manager().windows().len(), displays.len());
        assert_eq!(harness.host.alive_windows().len(), displays.len());
    }
}

#[test]
fn test_polling_batches_changes_into_one_rebuild() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    let created_before = harness.host.created.len();

    // Two displays disappear and one appears within one poll interval
    harness.host.set_displays(vec![p3()], Some(P3));
    let later = Instant::now() + Duration::from_secs(1);
    let control = harness
        .controller
        .poll_displays(&mut harness.host, &mut harness.hotkeys, later)
        .expect("Error polling displays");

    assert_eq!(control, LoopControl::Continue);
    assert_eq!(harness.host.created.len(), created_before + 1);
    assert_eq!(harness.bound_displays(), vec![(P3, p3().bounds, false)]);

    // Nothing changed since, so the next poll creates nothing
    let much_later = later + Duration::from_secs(1);
    harness
        .controller
        .poll_displays(&mut harness.host, &mut harness.hotkeys, much_later)
        .expect("Error polling displays");
    assert_eq!(harness.host.created.len(), created_before + 1);
}

#[test]
fn test_stale_content_loaded_is_ignored() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    let stale = harness.ids();

    harness.host.set_displays(vec![p1()], Some(P1));
    harness.send(HostEvent::DisplaysChanged(vec![DisplayChange::Removed(p2())]));

    for id in stale {
        assert_eq!(harness.send(HostEvent::ContentLoaded(id)), LoopControl::Continue);
    }
    assert_eq!(harness.visible(), vec![false]);
    for window in harness.host.created.iter().take(2) {
        assert!(!window.borrow().visible);
    }
}

#[test]
fn test_closing_every_window_keeps_running() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();

    for id in harness.ids() {
        assert_eq!(
            harness.send(HostEvent::WindowCloseRequested(id)),
            LoopControl::Continue
        );
    }
    assert!(harness.controller.manager().windows().is_empty());
    assert_eq!(harness.controller.state(), LifecycleState::Active);

    // Hotkeys still work; only quit ends the process
    assert_eq!(
        harness.send(HostEvent::Hotkey(HotkeyAction::ToggleVisibility)),
        LoopControl::Continue
    );
    assert_eq!(
        harness.send(HostEvent::Hotkey(HotkeyAction::Quit)),
        LoopControl::Exit
    );
}

#[test]
fn test_quit_when_all_windows_closed_policy() {
    let mut harness = Harness::with_lifetime(
        vec![p1(), p2()],
        Some(P1),
        ProcessLifetime::QuitWhenAllWindowsClosed,
    );
    harness.start();
    let ids = harness.ids();

    assert_eq!(
        harness.send(HostEvent::WindowCloseRequested(ids[0])),
        LoopControl::Continue
    );
    assert_eq!(
        harness.send(HostEvent::WindowCloseRequested(ids[1])),
        LoopControl::Exit
    );
    assert_eq!(harness.controller.state(), LifecycleState::Stopped);
    assert!(harness.table.borrow().is_empty());
}

#[test]
fn test_quit_releases_hotkeys_for_the_next_run() {
    let mut harness = Harness::new(vec![p1()], Some(P1));
    harness.start();
    assert_eq!(harness.hotkeys.registered().len(), 2);
    assert_eq!(harness.table.borrow().len(), 2);

    assert_eq!(
        harness.send(HostEvent::Hotkey(HotkeyAction::Quit)),
        LoopControl::Exit
    );
    assert!(harness.host.alive_windows().is_empty());
    assert!(harness.table.borrow().is_empty());

    // A second instance can take the same combos without conflict
    let mut next = MockHotkeys::new("lucent (restarted)", harness.table.clone());
    let mut controller: OverlayController<MockOverlayWindow> =
        OverlayController::new(settings(ProcessLifetime::Explicit), Duration::from_secs(1));
    controller
        .handle_event(&mut harness.host, &mut next, HostEvent::Ready)
        .expect("Error starting second instance");
    assert_eq!(next.registered().len(), 2);
}

#[test]
fn test_external_quit_request_unregisters() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();

    assert_eq!(harness.send(HostEvent::QuitRequested), LoopControl::Exit);
    assert!(harness.table.borrow().is_empty());
    assert!(harness.host.alive_windows().is_empty());

    // Nothing happens after stopping
    assert_eq!(harness.send(HostEvent::Ready), LoopControl::Exit);
    assert!(harness.host.alive_windows().is_empty());
}

#[test]
fn test_hotkey_conflict_is_not_fatal() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    let toggle = HotkeyCombo::parse("CmdOrCtrl+Alt+F11").expect("Error parsing hotkey");
    harness
        .table
        .borrow_mut()
        .insert(toggle.id(), "another app".to_string());

    harness.start();
    assert_eq!(harness.controller.manager().windows().len(), 2);
    assert_eq!(
        harness.hotkeys.registered(),
        &[(
            HotkeyCombo::parse("CmdOrCtrl+Alt+F12")
                .expect("Error parsing hotkey")
                .id(),
            HotkeyAction::Quit
        )]
    );

    // Quitting must not release the combo the other application owns
    harness.send(HostEvent::QuitRequested);
    assert_eq!(
        harness.table.borrow().get(&toggle.id()).map(String::as_str),
        Some("another app")
    );
}

#[test]
fn test_window_creation_failure_is_fatal_without_leaks() {
    let mut harness = Harness::new(vec![p1(), p2(), p3()], Some(P1));
    harness.host.fail_creation_at = Some(2);

    let result = harness
        .controller
        .handle_event(&mut harness.host, &mut harness.hotkeys, HostEvent::Ready);
    assert!(result.is_err());
    assert_eq!(harness.host.created.len(), 2);
    assert!(harness.host.alive_windows().is_empty());
    assert!(harness.controller.manager().windows().is_empty());
}

#[test]
fn test_rebuild_failure_is_fatal_without_leaks() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();

    harness.host.set_displays(vec![p1(), p2(), p3()], Some(P1));
    harness.host.fail_creation_at = Some(harness.host.created.len() + 1);
    let result = harness.controller.handle_event(
        &mut harness.host,
        &mut harness.hotkeys,
        HostEvent::DisplaysChanged(vec![DisplayChange::Added(p3())]),
    );

    assert!(result.is_err());
    assert!(harness.host.alive_windows().is_empty());
}

#[test]
fn test_events_before_ready_are_ignored() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));

    for event in [
        HostEvent::ContentLoaded(1),
        HostEvent::Hotkey(HotkeyAction::ToggleVisibility),
        HostEvent::DisplaysChanged(vec![DisplayChange::Added(p3())]),
        HostEvent::WindowCloseRequested(1),
    ] {
        assert_eq!(harness.send(event), LoopControl::Continue);
    }
    assert_eq!(harness.controller.state(), LifecycleState::Uninitialized);
    assert!(harness.host.created.is_empty());
    assert!(harness.table.borrow().is_empty());

    harness.start();
    assert_eq!(harness.host.created.len(), 2);
}

#[test]
fn test_repeated_ready_does_not_duplicate_windows() {
    let mut harness = Harness::new(vec![p1(), p2()], Some(P1));
    harness.start();
    harness.send(HostEvent::Ready);

    assert_eq!(harness.host.created.len(), 2);
    assert_eq!(harness.hotkeys.registered().len(), 2);
}

#[test]
fn test_zero_displays_is_a_valid_state() {
    let mut harness = Harness::new(vec![], None);
    harness.start();
    assert!(harness.controller.manager().windows().is_empty());

    assert_eq!(
        harness.send(HostEvent::Hotkey(HotkeyAction::ToggleVisibility)),
        LoopControl::Continue
    );

    harness.host.set_displays(vec![p1()], Some(P1));
    harness.send(HostEvent::DisplaysChanged(vec![DisplayChange::Added(p1())]));
    assert_eq!(harness.bound_displays(), vec![(P1, p1().bounds, false)]);
}
