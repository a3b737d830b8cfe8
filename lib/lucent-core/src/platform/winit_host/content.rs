use crate::event_loop_main::LucentEvent;
use crate::platform::{OverlayId, PlatformResult};
use cfg_if::cfg_if;
use log::warn;
use std::time::Duration;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

#[derive(Debug, Clone, Copy)]
pub struct ContentOptions {
    pub autoplay: bool,
    pub muted: bool,
}

/// Installed before any page script runs. Keeps every media element muted while the overlay is
/// muted, including elements created after load and detached `new Audio()` players, and holds
/// Web Audio contexts suspended.
const MEDIA_MUTE_SCRIPT: &str = r#"
(function () {
  let muted = __LUCENT_MUTED__;
  const contexts = [];
  const apply = () => {
    document.querySelectorAll('audio, video').forEach((media) => { media.muted = muted; });
  };
  const applyContexts = () => {
    contexts.forEach((entry) => {
      if (muted && entry.context.state === 'running') {
        entry.held = true;
        entry.context.suspend();
      } else if (!muted && entry.held) {
        entry.held = false;
        entry.resume.call(entry.context);
      }
    });
  };
  const play = HTMLMediaElement.prototype.play;
  HTMLMediaElement.prototype.play = function () {
    if (muted) { this.muted = true; }
    return play.apply(this, arguments);
  };
  ['AudioContext', 'webkitAudioContext'].forEach((name) => {
    const Original = window[name];
    if (!Original) { return; }
    const resume = Original.prototype.resume;
    Original.prototype.resume = function () {
      if (muted) { return Promise.resolve(); }
      return resume.apply(this, arguments);
    };
    const Wrapped = function () {
      const context = new Original(...arguments);
      const entry = { context, resume, held: false };
      contexts.push(entry);
      if (muted) {
        entry.held = true;
        context.suspend();
      }
      return context;
    };
    Wrapped.prototype = Original.prototype;
    window[name] = Wrapped;
  });
  window.__lucentSetMuted = (value) => { muted = value; apply(); applyContexts(); };
  new MutationObserver(() => { if (muted) { apply(); } })
    .observe(document, { childList: true, subtree: true });
  document.addEventListener('DOMContentLoaded', () => { if (muted) { apply(); } });
})();
"#;

fn mute_script(muted: bool) -> String {
    MEDIA_MUTE_SCRIPT.replace("__LUCENT_MUTED__", if muted { "true" } else { "false" })
}

fn set_muted_script(muted: bool) -> String {
    format!("window.__lucentSetMuted && window.__lucentSetMuted({muted});")
}

/// The overlay's content: a transparent webview filling the window, or nothing when the session
/// cannot host one.
pub struct OverlayContent {
    #[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
    webview: Option<wry::WebView>,
}

impl OverlayContent {
    pub fn load(
        window: &Window,
        url: &str,
        id: OverlayId,
        options: ContentOptions,
        proxy: EventLoopProxy<LucentEvent>,
    ) -> PlatformResult<Self> {
        if let Some(reason) = webview_unavailable(window) {
            warn!("Overlay {id} stays blank, {reason} ({url})");
            proxy
                .send_event(LucentEvent::ContentLoaded(id))
                .map_err(|_| "Event loop is gone")?;
            return Ok(Self::blank());
        }

        Self::build(window, url, id, options, proxy)
    }

    pub fn set_muted(&self, muted: bool) -> PlatformResult<()> {
        #[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
        if let Some(webview) = &self.webview {
            set_native_muted(webview, muted)?;
            webview
                .evaluate_script(&set_muted_script(muted))
                .map_err(|e| format!("Could not change overlay audio: {e}"))?;
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        let _ = muted;
        Ok(())
    }
}

cfg_if! {
    if #[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))] {
        use wry::{PageLoadEvent, WebView, WebViewBuilder};

        impl OverlayContent {
            fn blank() -> Self {
                Self { webview: None }
            }

            fn build(
                window: &Window,
                url: &str,
                id: OverlayId,
                options: ContentOptions,
                proxy: EventLoopProxy<LucentEvent>,
            ) -> PlatformResult<Self> {
                let webview = WebViewBuilder::new()
                    .with_url(url)
                    .with_transparent(true)
                    .with_focused(false)
                    .with_autoplay(options.autoplay)
                    .with_initialization_script(&mute_script(options.muted))
                    .with_on_page_load_handler(move |event, _url| {
                        if matches!(event, PageLoadEvent::Finished) {
                            let _ = proxy.send_event(LucentEvent::ContentLoaded(id));
                        }
                    })
                    .build(window)
                    .map_err(|e| format!("Could not load overlay content from {url}: {e}"))?;

                if options.muted {
                    set_native_muted(&webview, true)?;
                }
                Ok(Self { webview: Some(webview) })
            }
        }
    } else {
        impl OverlayContent {
            fn blank() -> Self {
                Self {}
            }

            fn build(
                _window: &Window,
                _url: &str,
                _id: OverlayId,
                _options: ContentOptions,
                _proxy: EventLoopProxy<LucentEvent>,
            ) -> PlatformResult<Self> {
                Ok(Self::blank())
            }
        }
    }
}

cfg_if! {
    if #[cfg(target_os = "windows")] {
        /// Mutes the WebView2 instance itself. The page script alone cannot reach audio played by
        /// plugins or out-of-process frames.
        fn set_native_muted(webview: &WebView, muted: bool) -> PlatformResult<()> {
            use webview2_com::Microsoft::Web::WebView2::Win32::ICoreWebView2_8;
            use windows::core::Interface;
            use wry::WebViewExtWindows;

            unsafe {
                webview
                    .webview()
                    .cast::<ICoreWebView2_8>()
                    .and_then(|core| core.SetIsMuted(muted.into()))
                    .map_err(|e| format!("Could not change overlay audio: {e}").into())
            }
        }
    } else if #[cfg(any(target_os = "macos", target_os = "linux"))] {
        fn set_native_muted(_webview: &WebView, _muted: bool) -> PlatformResult<()> {
            Ok(())
        }
    }
}

cfg_if! {
    if #[cfg(target_os = "linux")] {
        use std::sync::atomic::{AtomicBool, Ordering};
        use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};

        static GTK_READY: AtomicBool = AtomicBool::new(false);

        /// Prepares the webview toolkit. Call once on the event loop thread before any content
        /// loads.
        pub fn init_content_backend() {
            match gtk::init() {
                Ok(()) => GTK_READY.store(true, Ordering::Release),
                Err(e) => warn!("Could not initialize GTK, overlays will stay blank: {e}"),
            }
        }

        /// Runs pending GTK work. Nothing else drives the GTK main loop, so the winit loop
        /// calls this on every iteration.
        pub fn pump_content_events() {
            if !GTK_READY.load(Ordering::Acquire) {
                return;
            }
            while gtk::events_pending() {
                gtk::main_iteration_do(false);
            }
        }

        /// Longest the event loop may sleep while webviews need pumping.
        pub fn content_pump_interval() -> Option<Duration> {
            GTK_READY
                .load(Ordering::Acquire)
                .then(|| Duration::from_millis(16))
        }

        // wry can only embed into X11 windows.
        fn webview_unavailable(window: &Window) -> Option<&'static str> {
            if !GTK_READY.load(Ordering::Acquire) {
                return Some("GTK is not initialized");
            }
            match window.window_handle().map(|handle| handle.as_raw()) {
                Ok(RawWindowHandle::Xlib(_) | RawWindowHandle::Xcb(_)) => None,
                Ok(RawWindowHandle::Wayland(_)) => Some("webviews are not supported on Wayland"),
                _ => Some("the window has no X11 handle"),
            }
        }
    } else if #[cfg(any(target_os = "macos", target_os = "windows"))] {
        pub fn init_content_backend() {}

        pub fn pump_content_events() {}

        pub fn content_pump_interval() -> Option<Duration> {
            None
        }

        fn webview_unavailable(_window: &Window) -> Option<&'static str> {
            None
        }
    } else {
        pub fn init_content_backend() {}

        pub fn pump_content_events() {}

        pub fn content_pump_interval() -> Option<Duration> {
            None
        }

        fn webview_unavailable(_window: &Window) -> Option<&'static str> {
            Some("no webview backend is built for this platform")
        }
    }
}
