use crate::config::serialize_config;
use crate::hotkeys::{HotkeyAction, HotkeyCombo};
use crate::paths;
use crate::platform::OverlayLevel;
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use log::{trace, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the default config directory")]
    NoConfigDir,
    #[error("Failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to write config file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The path the config file was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Shows or hides every overlay
    #[schemars(with = "String")]
    pub toggle_hotkey: HotkeyCombo,
    /// Closes all overlays and exits
    #[schemars(with = "String")]
    pub quit_hotkey: HotkeyCombo,
    /// The page shown in the overlays. Relative paths start at this file's directory. When empty, index.html next to the executable is used
    pub content_path: Option<PathBuf>,
    /// Mutes the overlays on every display except the primary one
    pub mute_secondary_displays: bool,
    /// Lets mouse movement reach the windows below the overlays
    pub forward_mouse_events: bool,
    /// How high the overlays sit: floating or screen_saver
    pub window_level: OverlayLevel,
    /// Keeps the overlays visible above full-screen applications
    pub visible_on_fullscreen: bool,
    /// Lets media in the overlay start playing without user interaction
    pub autoplay: bool,
    /// How often to check for connected, removed or rearranged displays, in milliseconds
    pub display_poll_interval_ms: u64,
    /// Exits once every overlay window has been closed
    pub quit_when_all_windows_closed: bool,
}

impl Config {
    pub fn load(config_path: Option<&Path>, save: bool) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => paths::default_config_path().ok_or(ConfigError::NoConfigDir)?,
        };

        if !path.exists() {
            Self::create_default_config_file(&path)?;
            trace!("Created default config file at: {}", path.display());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let mut config = Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.config_path = Some(path.clone());

        // Writing back fills in any fields the file is missing
        if save {
            if let Err(e) = config.save_to_file(&path) {
                warn!("Failed to update config file with missing fields: {e}");
            }
        }

        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid config that uses every default
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    fn create_default_config_file(path: &Path) -> Result<(), ConfigError> {
        Config::default().save_to_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let contents = serialize_config(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn content_path(&self) -> PathBuf {
        match &self.content_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => match self.config_path.as_ref().and_then(|p| p.parent()) {
                Some(dir) => dir.join(path),
                None => path.clone(),
            },
            None => paths::default_content_path(),
        }
    }

    pub fn hotkey_bindings(&self) -> Vec<(HotkeyAction, HotkeyCombo)> {
        vec![
            (HotkeyAction::ToggleVisibility, self.toggle_hotkey.clone()),
            (HotkeyAction::Quit, self.quit_hotkey.clone()),
        ]
    }

    pub fn display_poll_interval(&self) -> Duration {
        Duration::from_millis(self.display_poll_interval_ms)
    }
}

fn cmd_or_ctrl_alt(key: Code, key_name: &str) -> HotkeyCombo {
    let cmd_or_ctrl = if cfg!(target_os = "macos") {
        Modifiers::SUPER
    } else {
        Modifiers::CONTROL
    };

    HotkeyCombo::from_hotkey(
        format!("CmdOrCtrl+Alt+{key_name}"),
        HotKey::new(Some(cmd_or_ctrl | Modifiers::ALT), key),
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            toggle_hotkey: cmd_or_ctrl_alt(Code::F11, "F11"),
            quit_hotkey: cmd_or_ctrl_alt(Code::F12, "F12"),
            content_path: None,
            mute_secondary_displays: true,
            forward_mouse_events: true,
            window_level: OverlayLevel::ScreenSaver,
            visible_on_fullscreen: true,
            autoplay: true,
            display_poll_interval_ms: 1000,
            quit_when_all_windows_closed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.toggle_hotkey.as_str(), "CmdOrCtrl+Alt+F11");
        assert_eq!(config.quit_hotkey.as_str(), "CmdOrCtrl+Alt+F12");
        assert!(config.mute_secondary_displays);
        assert!(config.forward_mouse_events);
        assert_eq!(config.window_level, OverlayLevel::ScreenSaver);
        assert!(config.visible_on_fullscreen);
        assert_eq!(config.display_poll_interval(), Duration::from_secs(1));
        assert!(!config.quit_when_all_windows_closed);

        assert!(Config::from_yaml("").is_ok());
    }

    #[test]
    fn test_default_hotkeys_match_parsed_text() {
        let config = Config::default();
        let parsed = HotkeyCombo::parse("CmdOrCtrl+Alt+F11").unwrap();
        assert_eq!(config.toggle_hotkey.id(), parsed.id());
    }

    #[test]
    fn test_partial_document() {
        let config = Config::from_yaml(
            "window_level: floating\nmute_secondary_displays: false\nquit_hotkey: Ctrl+Shift+KeyQ\n",
        )
        .unwrap();
        assert_eq!(config.window_level, OverlayLevel::Floating);
        assert!(!config.mute_secondary_displays);
        assert_eq!(config.quit_hotkey.as_str(), "Ctrl+Shift+KeyQ");
        assert_eq!(config.toggle_hotkey.as_str(), "CmdOrCtrl+Alt+F11");
    }

    #[test]
    fn test_invalid_hotkey_rejected() {
        assert!(Config::from_yaml("toggle_hotkey: Ctrl+Nope\n").is_err());
    }

    #[test]
    fn test_invalid_window_level_rejected() {
        assert!(Config::from_yaml("window_level: desktop\n").is_err());
    }

    #[test]
    fn test_hotkey_bindings_cover_both_actions() {
        let actions: Vec<_> = Config::default()
            .hotkey_bindings()
            .into_iter()
            .map(|(action, _)| action)
            .collect();
        assert_eq!(
            actions,
            vec![HotkeyAction::ToggleVisibility, HotkeyAction::Quit]
        );
    }

    #[test]
    fn test_relative_content_uses_config_dir() {
        let mut config = Config::default();
        config.config_path = Some(PathBuf::from("/etc/lucent/config.yaml"));
        config.content_path = Some(PathBuf::from("page/index.html"));
        assert_eq!(
            config.content_path(),
            PathBuf::from("/etc/lucent/page/index.html")
        );
    }

    #[test]
    fn test_missing_content_uses_default() {
        assert_eq!(Config::default().content_path(), paths::default_content_path());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = std::env::temp_dir().join(format!("lucent-config-test-{}", std::process::id()));
        let path = dir.join("config.yaml");
        let _ = fs::remove_dir_all(&dir);

        let config = Config::load(Some(&path), false).unwrap();
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert!(path.exists());

        let reloaded = Config::load(Some(&path), false).unwrap();
        assert_eq!(reloaded.toggle_hotkey, config.toggle_hotkey);

        let _ = fs::remove_dir_all(&dir);
    }
}
