use colored::*;
use log::{Level, Log, Metadata, Record};
use lucent_core::paths;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Prints `[I] [target] message` lines to stdout with colored tags and mirrors them, uncolored,
/// to the log file.
pub struct LucentLogger {
    max_level: Level,
    log_file: Mutex<Option<File>>,
    target_colors: Mutex<HashMap<String, usize>>,
    next_color_index: AtomicUsize,
}

impl LucentLogger {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            max_level: max_level(quiet, verbose),
            log_file: Mutex::new(open_log_file()),
            target_colors: Mutex::new(HashMap::new()),
            next_color_index: AtomicUsize::new(0),
        }
    }

    fn color_for_target(&self, target: &str) -> ColoredString {
        let colors: &[fn(&str) -> ColoredString] = &[
            |s| s.green(),
            |s| s.yellow(),
            |s| s.blue(),
            |s| s.magenta(),
            |s| s.cyan(),
            |s| s.purple(),
        ];

        let color_index = {
            let mut target_colors = self
                .target_colors
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *target_colors.entry(target.to_string()).or_insert_with(|| {
                self.next_color_index.fetch_add(1, Ordering::SeqCst) % colors.len()
            })
        };

        colors[color_index](target)
    }

    fn format_log(&self, record: &Record, colored: bool) -> String {
        let level = level_tag(record.level());
        let target = short_target(record.target());

        let (level, target) = if colored {
            let level = match record.level() {
                Level::Info => level.green().bold(),
                Level::Debug => level.blue().bold(),
                _ => level.white().bold(),
            };
            let target = target.map(|t| self.color_for_target(t).dimmed().to_string());
            (level.to_string(), target)
        } else {
            (level.to_string(), target.map(str::to_string))
        };

        let message = match target {
            Some(target) => format!("{level} [{target}] {}", record.args()),
            None => format!("{level} {}", record.args()),
        };

        if !colored {
            return message;
        }
        match record.level() {
            Level::Error => message.red().bold().to_string(),
            Level::Warn => message.yellow().bold().to_string(),
            _ => message,
        }
    }
}

fn max_level(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::Info
    } else if verbose {
        Level::Trace
    } else {
        Level::Debug
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[E]",
        Level::Warn => "[W]",
        Level::Info => "[I]",
        Level::Debug => "[D]",
        Level::Trace => "[T]",
    }
}

fn short_target(target: &str) -> Option<&str> {
    if target.is_empty() {
        None
    } else {
        target.rsplit("::").next()
    }
}

fn open_log_file() -> Option<File> {
    paths::ensure_data_dir()?;
    let path = paths::log_file_path()?;
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open log file at {}: {e}", path.display());
            None
        }
    }
}

impl Log for LucentLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        println!("{}", self.format_log(record, true));

        if let Ok(mut file) = self.log_file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = writeln!(file, "{}", self.format_log(record, false));
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {}
}

pub fn init_logger(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let logger = LucentLogger::new(quiet, verbose);
    log::set_max_level(logger.max_level.to_level_filter());
    log::set_boxed_logger(Box::new(logger))
}
