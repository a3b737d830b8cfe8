use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;

#[derive(Debug)]
pub struct PlatformError {
    pub error_type: PlatformErrorType,
    pub backtrace: Backtrace,
}

#[derive(Debug)]
pub enum PlatformErrorType {
    Error(String),
    WindowCreation(String),
    Hotkey(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            PlatformErrorType::Error(msg) => write!(f, "{msg}"),
            PlatformErrorType::WindowCreation(msg) => {
                write!(f, "Could not create overlay window: {msg}")
            }
            PlatformErrorType::Hotkey(msg) => write!(f, "Hotkey error: {msg}"),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<PlatformErrorType> for PlatformError {
    fn from(error_type: PlatformErrorType) -> Self {
        Self {
            error_type,
            backtrace: Backtrace::capture(),
        }
    }
}

impl From<&str> for PlatformError {
    fn from(error: &str) -> Self {
        PlatformErrorType::Error(error.to_string()).into()
    }
}

impl From<String> for PlatformError {
    fn from(error: String) -> Self {
        PlatformErrorType::Error(error).into()
    }
}

pub type PlatformResult<T> = Result<T, PlatformError>;

pub type DisplayId = u64;
/// Host-assigned identity of one overlay window. Only meaningful until the window is destroyed.
pub type OverlayId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub position: Position,
    pub size: Size,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_position(position: Position, size: Size) -> Self {
        Self { position, size }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub id: DisplayId,
    pub name: String,
    pub bounds: Bounds,
    pub scale_factor: f64,
}

impl Display {
    pub fn new(id: DisplayId, name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id,
            name: name.into(),
            bounds,
            scale_factor: 1.0,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Whether the resolution, position or scale of two snapshots of the same display differ.
    pub fn metrics_differ(&self, other: &Display) -> bool {
        self.bounds != other.bounds || (self.scale_factor - other.scale_factor).abs() > f64::EPSILON
    }
}

/// Picks the primary display out of an enumeration.
///
/// The host's own answer wins when it names one of the enumerated displays. Some hosts (Wayland
/// for one) cannot tell, in which case the display sitting at the desktop origin is used, and
/// failing that the first display.
pub fn resolve_primary(displays: &[Display], hint: Option<DisplayId>) -> Option<DisplayId> {
    if let Some(id) = hint {
        if displays.iter().any(|d| d.id == id) {
            return Some(id);
        }
    }

    let origin = Position::new(0, 0);
    displays
        .iter()
        .find(|d| d.bounds.position == origin)
        .or_else(|| displays.first())
        .map(|d| d.id)
}

/// Always-on-top tiers, lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OverlayLevel {
    /// Above normal windows, below system panels
    Floating,
    /// The highest tier the host offers; stays above full-screen applications
    #[default]
    ScreenSaver,
}

/// The document every overlay window displays. Its contents are opaque to Lucent.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    File(PathBuf),
    Url(String),
}

impl ContentSource {
    pub fn to_url(&self) -> PlatformResult<String> {
        match self {
            ContentSource::Url(url) => Ok(url.clone()),
            ContentSource::File(path) => {
                let absolute = if path.is_absolute() {
                    path.clone()
                } else {
                    std::env::current_dir()
                        .map_err(|e| format!("Could not resolve working directory: {e}"))?
                        .join(path)
                };
                url::Url::from_file_path(&absolute)
                    .map(|url| url.to_string())
                    .map_err(|_| format!("Invalid content path: {}", absolute.display()).into())
            }
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::File(path) => write!(f, "{}", path.display()),
            ContentSource::Url(url) => write!(f, "{url}"),
        }
    }
}
