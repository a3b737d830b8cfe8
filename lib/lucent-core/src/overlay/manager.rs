use crate::display_watcher::DisplayChange;
use crate::overlay::{OverlaySettings, OverlayWindowConfig, OverlayWindowSet};
use crate::platform::{
    resolve_primary, Display, OverlayHostImpl, OverlayId, OverlayWindowImpl, PlatformResult,
};
use log::{debug, info, trace, warn};

/// Owns the overlay window set. Only ever touched from the event loop thread.
pub struct OverlayManager<W: OverlayWindowImpl> {
    settings: OverlaySettings,
    windows: OverlayWindowSet<W>,
}

impl<W: OverlayWindowImpl> OverlayManager<W> {
    pub fn new(settings: OverlaySettings) -> Self {
        Self {
            settings,
            windows: OverlayWindowSet::default(),
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn windows(&self) -> &OverlayWindowSet<W> {
        &self.windows
    }

    /// Creates one hidden overlay per connected display, replacing the current set. Each window
    /// shows itself once its content reports it has loaded.
    ///
    /// Any failure is fatal: windows created by this call are destroyed before the error is
    /// returned, so a failed call leaves the set empty.
    pub fn create_overlay_windows<H>(&mut self, host: &mut H) -> PlatformResult<usize>
    where
        H: OverlayHostImpl<Window = W>,
    {
        if !self.windows.is_empty() {
            warn!(
                "Replacing {} overlay windows that were not destroyed first",
                self.windows.len()
            );
            self.windows.destroy_all();
        }

        let displays = host.enumerate_displays()?;
        let primary = resolve_primary(&displays, host.primary_display_id()?);

        let mut windows = OverlayWindowSet::default();
        for display in displays {
            let is_primary = primary == Some(display.id);
            match self.create_window_for(host, &display, is_primary) {
                Ok(window) => {
                    debug!(
                        "Created overlay {} on {} ({}x{} at {},{}){}",
                        window.id(),
                        display.name,
                        display.bounds.size.width,
                        display.bounds.size.height,
                        display.bounds.position.x,
                        display.bounds.position.y,
                        if is_primary { ", primary" } else { "" }
                    );
                    windows.push(display, window);
                }
                Err(e) => {
                    windows.destroy_all();
                    return Err(e);
                }
            }
        }

        if windows.is_empty() {
            info!("No displays connected, overlay set is empty");
        } else {
            info!("Created {} overlay windows", windows.len());
        }

        self.windows = windows;
        Ok(self.windows.len())
    }

    fn create_window_for<H>(
        &self,
        host: &mut H,
        display: &Display,
        primary: bool,
    ) -> PlatformResult<W>
    where
        H: OverlayHostImpl<Window = W>,
    {
        let config = OverlayWindowConfig::for_display(display, &self.settings, primary);
        let mut window = host.create_window(&config)?;

        if let Err(e) = self.configure_window(&mut window, &config) {
            window.destroy();
            return Err(e);
        }

        Ok(window)
    }

    fn configure_window(&self, window: &mut W, config: &OverlayWindowConfig) -> PlatformResult<()> {
        if config.muted {
            window.mute_audio(true)?;
        }
        window.set_ignore_mouse_events(true, self.settings.forward_mouse_events)?;
        window.set_always_on_top(true, self.settings.level)?;
        window.set_visible_on_all_workspaces(true, self.settings.visible_on_fullscreen)?;
        window.load_content(&self.settings.content)?;
        Ok(())
    }

    /// Shows the window whose content just finished loading. Events for windows that were
    /// destroyed by a rebuild in the meantime are ignored, as are later loads of a window that
    /// already loaded once (in-page navigation must not undo a toggle).
    pub fn on_content_loaded(&mut self, id: OverlayId) -> bool {
        let Some(entry) = self.windows.find_mut(id) else {
            trace!("Content loaded for stale overlay {id}");
            return false;
        };
        if entry.loaded {
            trace!("Overlay {id} reloaded its content");
            return false;
        }

        entry.loaded = true;
        if let Err(e) = entry.window.show_inactive() {
            warn!("Could not show overlay on {}: {e}", entry.display.name);
            return false;
        }

        debug!("Overlay on {} is ready", entry.display.name);
        true
    }

    /// Hides every window if any of them is visible, otherwise shows all of them without taking
    /// focus. Returns whether the overlays are now shown.
    pub fn toggle_show_hide(&mut self) -> bool {
        let any_visible = self.windows.any_visible();

        for entry in self.windows.iter_mut() {
            let result = if any_visible {
                entry.window.hide()
            } else {
                entry.window.show_inactive()
            };

            if let Err(e) = result {
                warn!("Could not toggle overlay on {}: {e}", entry.display.name);
            }
        }

        info!(
            "Overlays {}",
            if any_visible { "hidden" } else { "shown" }
        );
        !any_visible
    }

    /// Rebuilds the whole set after a topology change: every window is destroyed before any new
    /// window is created.
    pub fn reconcile_displays<H>(
        &mut self,
        host: &mut H,
        changes: &[DisplayChange],
    ) -> PlatformResult<usize>
    where
        H: OverlayHostImpl<Window = W>,
    {
        for change in changes {
            info!("{change}");
        }

        self.windows.destroy_all();
        self.create_overlay_windows(host)
    }

    /// Destroys a single window the user or the system closed. Returns whether the set is now
    /// empty.
    pub fn on_window_closed(&mut self, id: OverlayId) -> bool {
        if let Some(mut entry) = self.windows.remove(id) {
            debug!("Overlay on {} was closed", entry.display.name);
            entry.window.destroy();
        }
        self.windows.is_empty()
    }

    pub fn destroy_all(&mut self) {
        self.windows.destroy_all();
    }
}
