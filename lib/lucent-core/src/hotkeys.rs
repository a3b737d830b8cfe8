use crate::platform::HotkeyRegistrarImpl;
use global_hotkey::hotkey::HotKey;
use log::{debug, error};
use serde::de::Visitor;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    ToggleVisibility,
    Quit,
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyAction::ToggleVisibility => write!(f, "toggle visibility"),
            HotkeyAction::Quit => write!(f, "quit"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid hotkey '{accelerator}': {reason}")]
pub struct HotkeyParseError {
    pub accelerator: String,
    pub reason: String,
}

/// A global key combination such as `CmdOrCtrl+Alt+F11`. `CmdOrCtrl` resolves to Command on
/// macOS and Control elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyCombo {
    accelerator: String,
    hotkey: HotKey,
}

impl HotkeyCombo {
    pub fn parse(accelerator: &str) -> Result<Self, HotkeyParseError> {
        let trimmed = accelerator.trim();
        let hotkey = HotKey::from_str(trimmed).map_err(|e| HotkeyParseError {
            accelerator: accelerator.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            accelerator: trimmed.to_string(),
            hotkey,
        })
    }

    /// Pairs an already built hotkey with the text it is written as in the config file.
    pub fn from_hotkey(accelerator: impl Into<String>, hotkey: HotKey) -> Self {
        Self {
            accelerator: accelerator.into(),
            hotkey,
        }
    }

    pub fn hotkey(&self) -> HotKey {
        self.hotkey
    }

    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }

    pub fn as_str(&self) -> &str {
        &self.accelerator
    }
}

impl FromStr for HotkeyCombo {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HotkeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.accelerator)
    }
}

impl Serialize for HotkeyCombo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.accelerator)
    }
}

impl<'de> Deserialize<'de> for HotkeyCombo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ComboVisitor;

        impl Visitor<'_> for ComboVisitor {
            type Value = HotkeyCombo;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a key combination such as \"CmdOrCtrl+Alt+F11\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                HotkeyCombo::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ComboVisitor)
    }
}

/// Registers every binding. A combo that cannot be registered (usually because another
/// application owns it) is logged and skipped; the remaining bindings are still attempted.
/// Returns the number of bindings that were registered.
pub fn register_hotkeys<R: HotkeyRegistrarImpl>(
    registrar: &mut R,
    bindings: &[(HotkeyAction, HotkeyCombo)],
) -> usize {
    let mut registered = 0;
    for (action, combo) in bindings {
        match registrar.register(*action, combo) {
            Ok(()) => {
                debug!("Registered {combo} for {action}");
                registered += 1;
            }
            Err(e) => {
                error!("Could not register {combo} for {action}: {e}");
            }
        }
    }
    registered
}
