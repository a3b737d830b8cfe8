use std::path::PathBuf;

const APP_DIR: &str = "Lucent";

fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR))
}

fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

pub fn log_file_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("lucent.log"))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `index.html` next to the running executable, or in the working directory when the
/// executable path is unknown.
pub fn default_content_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("index.html")))
        .unwrap_or_else(|| PathBuf::from("index.html"))
}

/// Creates the data directory (where the log file lives) if needed.
pub fn ensure_data_dir() -> Option<PathBuf> {
    data_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir).ok()?;
        Some(dir)
    })
}
