use crate::platform::Display;
use std::fmt;
use std::time::{Duration, Instant};

/// The shortest polling interval accepted, to keep the event loop mostly idle.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayChange {
    Added(Display),
    Removed(Display),
    MetricsChanged { before: Display, after: Display },
}

impl fmt::Display for DisplayChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayChange::Added(d) => write!(f, "Display added: {}", d.name),
            DisplayChange::Removed(d) => write!(f, "Display removed: {}", d.name),
            DisplayChange::MetricsChanged { before, after } => write!(
                f,
                "Display changed: {} ({}x{}@{} -> {}x{}@{})",
                after.name,
                before.bounds.size.width,
                before.bounds.size.height,
                before.scale_factor,
                after.bounds.size.width,
                after.bounds.size.height,
                after.scale_factor
            ),
        }
    }
}

/// Detects topology changes by comparing successive display enumerations.
///
/// The host used here has no display-change notifications, so the event loop polls and feeds
/// each enumeration to [`DisplayWatcher::poll`].
pub struct DisplayWatcher {
    known: Vec<Display>,
    interval: Duration,
    next_poll: Instant,
}

impl DisplayWatcher {
    pub fn new(interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        Self {
            known: Vec::new(),
            interval,
            next_poll: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Records the enumeration the current window set was built from.
    pub fn prime(&mut self, displays: Vec<Display>) {
        self.known = displays;
        self.next_poll = Instant::now() + self.interval;
    }

    pub fn known(&self) -> &[Display] {
        &self.known
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_poll
    }

    pub fn next_poll(&self) -> Instant {
        self.next_poll
    }

    /// Compares `current` against the last enumeration and remembers it.
    pub fn poll(&mut self, current: Vec<Display>) -> Vec<DisplayChange> {
        let changes = diff_displays(&self.known, &current);
        self.known = current;
        self.next_poll = Instant::now() + self.interval;
        changes
    }
}

/// Removed displays come first, then added and changed ones in the order of `current`.
pub fn diff_displays(previous: &[Display], current: &[Display]) -> Vec<DisplayChange> {
    let mut changes: Vec<DisplayChange> = previous
        .iter()
        .filter(|old| !current.iter().any(|new| new.id == old.id))
        .cloned()
        .map(DisplayChange::Removed)
        .collect();

    for display in current {
        match previous.iter().find(|old| old.id == display.id) {
            None => changes.push(DisplayChange::Added(display.clone())),
            Some(old) if old.metrics_differ(display) => {
                changes.push(DisplayChange::MetricsChanged {
                    before: old.clone(),
                    after: display.clone(),
                })
            }
            Some(_) => {}
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Bounds;

    fn display(id: u64, x: i32, width: u32) -> Display {
        Display::new(id, format!("D{id}"), Bounds::new(x, 0, width, 1080))
    }

    #[test]
    fn test_no_changes() {
        let displays = vec![display(1, 0, 1920), display(2, 1920, 1920)];
        assert!(diff_displays(&displays, &displays.clone()).is_empty());
    }

    #[test]
    fn test_added_and_removed() {
        let previous = vec![display(1, 0, 1920), display(2, 1920, 1920)];
        let current = vec![display(1, 0, 1920), display(3, -2560, 2560)];

        let changes = diff_displays(&previous, &current);
        assert_eq!(
            changes,
            vec![
                DisplayChange::Removed(display(2, 1920, 1920)),
                DisplayChange::Added(display(3, -2560, 2560)),
            ]
        );
    }

    #[test]
    fn test_resolution_change() {
        let previous = vec![display(1, 0, 1920)];
        let current = vec![display(1, 0, 2560)];

        let changes = diff_displays(&previous, &current);
        assert!(matches!(
            changes.as_slice(),
            [DisplayChange::MetricsChanged { before, after }]
                if before.bounds.size.width == 1920 && after.bounds.size.width == 2560
        ));
    }

    #[test]
    fn test_scale_change() {
        let previous = vec![display(1, 0, 1920)];
        let current = vec![display(1, 0, 1920).with_scale_factor(1.5)];
        assert_eq!(diff_displays(&previous, &current).len(), 1);
    }

    #[test]
    fn test_reordering_is_not_a_change() {
        let previous = vec![display(1, 0, 1920), display(2, 1920, 1920)];
        let current = vec![display(2, 1920, 1920), display(1, 0, 1920)];
        assert!(diff_displays(&previous, &current).is_empty());
    }

    #[test]
    fn test_poll_remembers_last_enumeration() {
        let mut watcher = DisplayWatcher::new(Duration::from_secs(1));
        watcher.prime(vec![display(1, 0, 1920)]);

        let changes = watcher.poll(vec![display(1, 0, 1920), display(2, 1920, 1920)]);
        assert_eq!(changes.len(), 1);
        assert!(watcher.poll(vec![display(1, 0, 1920), display(2, 1920, 1920)]).is_empty());
        assert_eq!(watcher.known().len(), 2);
    }

    #[test]
    fn test_interval_is_clamped() {
        let watcher = DisplayWatcher::new(Duration::from_millis(1));
        assert_eq!(watcher.interval(), MIN_POLL_INTERVAL);
    }
}
