//! # Logging & Tracing Infrastructure
//!
//! Configures `tracing-subscriber` for hosts embedding the playback controller:
//! - JSON, pretty and compact output formats
//! - Crate-level filtering through `EnvFilter`
//! - Optional mirroring of every event into a host [`LoggerSink`]
//! - URL redaction helpers for stream locations
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use std::sync::Arc;
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Compact)
//!     .with_level(LogLevel::Debug)
//!     .with_logger_sink(Arc::new(ConsoleLogger::default()));
//!
//! init_logging(config)?;
//! tracing::info!("Player mounted");
//! ```
//!
//! ## LoggerSink integration
//!
//! When a sink is configured, each event surviving the filter is converted to
//! a [`LogEntry`](bridge_traits::LogEntry) carrying the message, the event's
//! fields and the name of the enclosing span, then handed to the sink on the
//! current Tokio runtime. Outside a runtime the entry is delivered inline.

use crate::error::{Error, Result};

use bridge_traits::{LogEntry, LogLevel, LoggerSink};

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{span, Event, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Crates whose output follows the configured level; everything else stays at `warn`.
const WORKSPACE_TARGETS: &[&str] = &["core_playback", "core_runtime", "bridge_traits"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Single-line format
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Minimum log level for workspace crates
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_playback=trace"); replaces the default
    pub filter: Option<String>,
    /// Optional logger sink for forwarding logs to host
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Emit span enter/exit in pretty output and span lists in JSON
    pub enable_spans: bool,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.is_some())
            .field("enable_spans", &self.enable_spans)
            .finish()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the global logging subscriber.
///
/// Call once during host startup.
///
/// # Errors
///
/// Returns [`Error::InvalidFilter`] for a malformed filter string and
/// [`Error::LoggingInit`] if a global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let sink_layer = LoggerSinkLayer::new(config.logger_sink.clone());
    let registry = tracing_subscriber::registry().with(filter).with(sink_layer);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_span_events(if config.enable_spans {
                        tracing_subscriber::fmt::format::FmtSpan::ACTIVE
                    } else {
                        tracing_subscriber::fmt::format::FmtSpan::NONE
                    })
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(config.enable_spans)
                    .with_span_list(config.enable_spans)
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_writer(io::stdout),
            )
            .try_init(),
    };

    result.map_err(|e| Error::LoggingInit(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = match &config.filter {
        Some(custom) => custom.clone(),
        None => default_filter(config.level),
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| Error::InvalidFilter(e.to_string()))
}

fn default_filter(level: LogLevel) -> String {
    let level = level.as_filter_str();
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

/// Span fields recorded for sink delivery, stored in the span's extensions.
#[derive(Default)]
struct SpanFields(HashMap<String, String>);

/// Layer that mirrors events into a host [`LoggerSink`].
///
/// Fields recorded on enclosing spans (a controller's `controller` id, for
/// instance) are copied onto each entry; event fields win on conflict.
struct LoggerSinkLayer {
    sink: Option<Arc<dyn LoggerSink>>,
}

impl LoggerSinkLayer {
    fn new(sink: Option<Arc<dyn LoggerSink>>) -> Self {
        Self { sink }
    }

    fn deliver(sink: Arc<dyn LoggerSink>, entry: LogEntry) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(err) = sink.log(entry).await {
                        eprintln!("LoggerSink error: {}", err);
                    }
                });
            }
            Err(_) => {
                if let Err(err) = futures::executor::block_on(sink.log(entry)) {
                    eprintln!("LoggerSink error: {}", err);
                }
            }
        }
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if self.sink.is_none() {
            return;
        }
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = FieldCollector::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(SpanFields(fields.fields));
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(SpanFields(fields)) = extensions.get_mut::<SpanFields>() {
            let mut update = FieldCollector::default();
            values.record(&mut update);
            fields.extend(update.fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        let metadata = event.metadata();
        let level = log_level(metadata.level());
        if level < sink.min_level() {
            return;
        }

        let mut fields = HashMap::new();
        let mut innermost = None;
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(SpanFields(span_fields)) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.clone());
                }
                innermost = Some(span.name());
            }
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        fields.extend(collector.fields);

        let message = collector
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        entry.fields = fields;
        entry.span = innermost.map(str::to_string);

        Self::deliver(Arc::clone(sink), entry);
    }
}

/// Collects `tracing` fields as strings, pulling `message` out separately.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: HashMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{:?}", value));
    }
}

fn log_level(level: &tracing::Level) -> LogLevel {
    match *level {
        tracing::Level::TRACE => LogLevel::Trace,
        tracing::Level::DEBUG => LogLevel::Debug,
        tracing::Level::INFO => LogLevel::Info,
        tracing::Level::WARN => LogLevel::Warn,
        tracing::Level::ERROR => LogLevel::Error,
    }
}

/// Strip the query string and fragment from a stream URL before logging it.
///
/// Signed stream URLs carry credentials in their query parameters.
///
/// ```ignore
/// use core_runtime::logging::redact_url;
///
/// tracing::info!(url = %redact_url("https://cdn.example/a.m3u8?token=abc"), "Binding track");
/// // Logs: url="https://cdn.example/a.m3u8?[REDACTED]"
/// ```
pub fn redact_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let (base, rest) = url.split_at(end);
    if rest.starts_with('?') {
        format!("{base}?[REDACTED]")
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as SinkResult;
    use std::sync::Mutex;

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(LogLevel::Debug)
            .with_filter("core_playback=trace")
            .with_spans(false)
            .with_target(true)
            .with_thread_info(true);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.filter, Some("core_playback=trace".to_string()));
        assert!(!config.enable_spans);
        assert!(config.display_target);
        assert!(config.display_thread_info);
    }

    #[test]
    fn test_default_filter_covers_workspace() {
        let filter = default_filter(LogLevel::Debug);
        assert!(filter.starts_with("warn"));
        assert!(filter.contains("core_playback=debug"));
        assert!(filter.contains("core_runtime=debug"));
    }

    #[test]
    fn test_build_filter() {
        let config = LoggingConfig::default().with_level(LogLevel::Debug);
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_build_custom_filter() {
        let config = LoggingConfig::default().with_filter("core_playback=trace");
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("core_playback=trace"));
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let config = LoggingConfig::default().with_filter("core_playback=loudest");
        assert!(matches!(build_filter(&config), Err(Error::InvalidFilter(_))));
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("https://cdn.example/live.m3u8?token=abc&exp=1"),
            "https://cdn.example/live.m3u8?[REDACTED]"
        );
        assert_eq!(
            redact_url("https://cdn.example/a.mp3#t=30"),
            "https://cdn.example/a.mp3"
        );
        assert_eq!(
            redact_url("https://cdn.example/a.mp3"),
            "https://cdn.example/a.mp3"
        );
    }

    #[test]
    fn test_logger_sink_layer_forwards_event() {
        let sink = Arc::new(TestLoggerSink::default());
        let trait_sink: Arc<dyn LoggerSink> = sink.clone();
        let layer = LoggerSinkLayer::new(Some(trait_sink));
        let subscriber = tracing_subscriber::registry().with(layer);
        let _guard = tracing::subscriber::set_default(subscriber);

        tracing::warn!(target: "core_playback", failure = "load_timeout", "Loading timed out");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.target, "core_playback");
        assert_eq!(entry.message, "Loading timed out");
        assert_eq!(
            entry.fields.get("failure"),
            Some(&"load_timeout".to_string())
        );
    }

    #[test]
    fn test_logger_sink_layer_lifts_span_fields() {
        let sink = Arc::new(TestLoggerSink::default());
        let trait_sink: Arc<dyn LoggerSink> = sink.clone();
        let subscriber = tracing_subscriber::registry().with(LoggerSinkLayer::new(Some(trait_sink)));
        let _guard = tracing::subscriber::set_default(subscriber);

        let span = tracing::info_span!("request_play", controller = "c-42", forced = false);
        let _entered = span.enter();
        tracing::info!(target: "core_playback", forced = true, "Requesting playback");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.span.as_deref(), Some("request_play"));
        assert_eq!(entry.fields.get("controller"), Some(&"c-42".to_string()));
        assert_eq!(entry.fields.get("forced"), Some(&"true".to_string()));
    }

    #[test]
    fn test_logger_sink_respects_min_level() {
        let sink = Arc::new(TestLoggerSink::default());
        let trait_sink: Arc<dyn LoggerSink> = sink.clone();
        let subscriber = tracing_subscriber::registry().with(LoggerSinkLayer::new(Some(trait_sink)));
        let _guard = tracing::subscriber::set_default(subscriber);

        tracing::trace!("too chatty");

        assert!(sink.entries.lock().unwrap().is_empty());
    }

    #[derive(Default)]
    struct TestLoggerSink {
        entries: Mutex<Vec<LogEntry>>,
    }

    #[async_trait]
    impl LoggerSink for TestLoggerSink {
        async fn log(&self, entry: LogEntry) -> SinkResult<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            LogLevel::Debug
        }
    }
}
