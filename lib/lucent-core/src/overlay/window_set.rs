use crate::platform::{Display, OverlayId, OverlayWindowImpl};
use log::trace;

pub struct OverlayEntry<W: OverlayWindowImpl> {
    pub display: Display,
    pub window: W,
    /// Set once the window reported that its initial content load finished.
    pub loaded: bool,
}

/// The overlay windows of one display enumeration, in enumeration order.
pub struct OverlayWindowSet<W: OverlayWindowImpl> {
    entries: Vec<OverlayEntry<W>>,
}

impl<W: OverlayWindowImpl> Default for OverlayWindowSet<W> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<W: OverlayWindowImpl> OverlayWindowSet<W> {
    pub fn push(&mut self, display: Display, window: W) {
        self.entries.push(OverlayEntry {
            display,
            window,
            loaded: false,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry<W>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OverlayEntry<W>> {
        self.entries.iter_mut()
    }

    pub fn any_visible(&self) -> bool {
        self.entries.iter().any(|entry| entry.window.is_visible())
    }

    pub fn find_mut(&mut self, id: OverlayId) -> Option<&mut OverlayEntry<W>> {
        self.entries.iter_mut().find(|entry| entry.window.id() == id)
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<OverlayEntry<W>> {
        let index = self.entries.iter().position(|e| e.window.id() == id)?;
        Some(self.entries.remove(index))
    }

    /// Destroys every window and leaves the set empty.
    pub fn destroy_all(&mut self) {
        for mut entry in self.entries.drain(..) {
            trace!(
                "Destroying overlay {} on {}",
                entry.window.id(),
                entry.display.name
            );
            entry.window.destroy();
        }
    }
}
