use crate::config::ConfigError;
use crate::event_loop_main::EventLoopMain;
use crate::platform::PlatformError;
use log::{info, warn};
use thiserror::Error;

pub mod config;
pub mod display_watcher;
mod event_loop_main;
pub mod hotkeys;
pub mod lifecycle;
pub mod overlay;
pub mod paths;
pub mod platform;

pub use config::Config;
pub use event_loop_main::LucentEvent;

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}

/// Runs the overlay manager on the current thread until a quit is requested. Must be called
/// from the main thread.
pub fn start(config: Config) -> LucentResult<()> {
    let content = config.content_path();
    if content.exists() {
        info!("Overlay content: {}", content.display());
    } else {
        warn!(
            "Overlay content {} does not exist, overlays will stay blank",
            content.display()
        );
    }

    EventLoopMain::run(&config)
}

/// Asks a running [`start`] to shut down cleanly. Safe to call from any thread, including a
/// signal handler thread.
pub fn request_shutdown() {
    EventLoopMain::request_quit();
}

#[derive(Debug, Error)]
pub enum LucentFatalError {
    #[error("{0}")]
    Error(String),
    #[error("Platform error: {0}")]
    PlatformError(#[from] PlatformError),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

pub type LucentResult<T> = Result<T, LucentFatalError>;

impl From<&str> for LucentFatalError {
    fn from(value: &str) -> Self {
        LucentFatalError::Error(value.to_owned())
    }
}

impl From<String> for LucentFatalError {
    fn from(error: String) -> Self {
        LucentFatalError::Error(error)
    }
}
