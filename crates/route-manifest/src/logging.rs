// File: src/logging.rs
// Purpose: Leveled logger capability backed by tracing

use std::fmt;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

static GLOBAL_LEVEL: OnceCell<LogLevel> = OnceCell::new();

// ============================================================================
// Levels
// ============================================================================

/// Minimum severity a logger lets through
///
/// `Silent` is only ever a configured level; nothing is logged at it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn weight(self) -> u8 {
        match self {
            LogLevel::Debug => 20,
            LogLevel::Info => 30,
            LogLevel::Warn => 40,
            LogLevel::Error => 50,
            LogLevel::Silent => 90,
        }
    }

    /// Whether a logger configured at `self` emits messages at `level`
    ///
    /// # Examples
    ///
    /// ```
    /// use route_manifest::logging::LogLevel;
    ///
    /// assert!(LogLevel::Info.enables(LogLevel::Warn));
    /// assert!(!LogLevel::Warn.enables(LogLevel::Info));
    /// assert!(!LogLevel::Silent.enables(LogLevel::Error));
    /// ```
    pub fn enables(self, level: LogLevel) -> bool {
        self.weight() <= level.weight()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level `{0}` (expected debug, info, warn, error or silent)")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" | "off" => Ok(LogLevel::Silent),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

// ============================================================================
// Process-wide level
// ============================================================================

/// Sets the process-wide minimum level
///
/// Only the first call wins. A later call gets back the level already in
/// effect as `Err`.
pub fn set_global_level(level: LogLevel) -> Result<(), LogLevel> {
    GLOBAL_LEVEL.set(level).map_err(|_| global_level())
}

/// The process-wide minimum level, `Info` until set
pub fn global_level() -> LogLevel {
    GLOBAL_LEVEL.get().copied().unwrap_or_default()
}

/// Sets the global level and installs a `tracing-subscriber` fmt subscriber
/// filtered to it
pub fn init_tracing(level: LogLevel) -> anyhow::Result<()> {
    if let Err(current) = set_global_level(level) {
        if current != level {
            anyhow::bail!("log level already set to {current}");
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(level.filter())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

// ============================================================================
// Logger capability
// ============================================================================

/// Leveled logger handed to components that report what they do
///
/// Implementors provide [`write`](Logger::write) and [`level`](Logger::level);
/// the level methods drop messages below the configured level.
pub trait Logger: Send + Sync {
    fn level(&self) -> LogLevel;

    /// Emits a message that already passed the level check
    fn write(&self, level: LogLevel, message: &str);

    fn enabled(&self, level: LogLevel) -> bool {
        self.level().enables(level)
    }

    fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            self.write(LogLevel::Debug, message);
        }
    }

    fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            self.write(LogLevel::Info, message);
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            self.write(LogLevel::Warn, message);
        }
    }

    fn error(&self, message: &str) {
        if self.enabled(LogLevel::Error) {
            self.write(LogLevel::Error, message);
        }
    }
}

impl<L: Logger + ?Sized> Logger for &L {
    fn level(&self) -> LogLevel {
        (**self).level()
    }

    fn write(&self, level: LogLevel, message: &str) {
        (**self).write(level, message)
    }
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn level(&self) -> LogLevel {
        (**self).level()
    }

    fn write(&self, level: LogLevel, message: &str) {
        (**self).write(level, message)
    }
}

fn emit(level: LogLevel, label: &str, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(label, "{}", message),
        LogLevel::Info => tracing::info!(label, "{}", message),
        LogLevel::Warn => tracing::warn!(label, "{}", message),
        LogLevel::Error => tracing::error!(label, "{}", message),
        LogLevel::Silent => {}
    }
}

/// Logger that forwards to `tracing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracingLogger {
    level: LogLevel,
}

impl TracingLogger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Logger at the process-wide level
    pub fn global() -> Self {
        Self::new(global_level())
    }

    /// Labeled logger sharing this logger's level
    pub fn fork(&self, label: impl Into<String>) -> LabeledLogger {
        LabeledLogger {
            level: self.level,
            label: label.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn write(&self, level: LogLevel, message: &str) {
        emit(level, "", message);
    }
}

/// Logger that tags every message with a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledLogger {
    level: LogLevel,
    label: String,
}

impl LabeledLogger {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Same level, new label
    pub fn fork(&self, label: impl Into<String>) -> Self {
        Self {
            level: self.level,
            label: label.into(),
        }
    }
}

impl Logger for LabeledLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn write(&self, level: LogLevel, message: &str) {
        emit(level, &self.label, message);
    }
}
