//! Host logging sink abstraction.
//!
//! Lets the core mirror its structured `tracing` output into the host's own
//! logging pipeline (browser console, `os_log`, Logcat, a file).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{error::Result, platform::PlatformSendSync};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name as accepted by `EnvFilter` directives.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Structured log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Target module/component
    pub target: String,
    pub message: String,
    /// Structured fields recorded on the event
    pub fields: HashMap<String, String>,
    /// Name of the enclosing span, if any
    pub span: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: HashMap::new(),
            span: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }
}

/// Logger sink trait
///
/// Implementations must not block: the core calls `log` from inside its
/// tracing layer, usually on a spawned task.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LoggerSink: PlatformSendSync {
    /// Forward a log entry to the host logging system
    async fn log(&self, entry: LogEntry) -> Result<()>;

    /// Flush any buffered logs
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Entries below this level are dropped before reaching `log`.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Sink that prints to stdout, for demos and development hosts.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level < self.min_level {
            return Ok(());
        }

        let mut fields: Vec<_> = entry.fields.iter().collect();
        fields.sort();
        let fields = fields
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");

        println!(
            "[{}] {:>5} {}: {} {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.level.as_filter_str().to_uppercase(),
            entry.target,
            entry.message,
            fields
        );
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
