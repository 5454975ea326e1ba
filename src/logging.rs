//! Structured logging and run reports for gravelkit
//!
//! Console output goes through `tracing`; an optional JSON file layer
//! rotates daily. Each `generate` run also leaves a [`RunReport`] next to
//! its output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Output format (pretty, json, compact)
    pub format: LogFormat,

    /// Log file path (None for stderr only)
    pub file_path: Option<PathBuf>,

    /// Rotate the log file daily
    pub rotation: bool,

    /// Include span information
    pub include_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file_path: None,
            rotation: true,
            include_spans: false,
        }
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    pub fn to_filter(&self) -> String {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
        .to_string()
    }

    /// Map a `-v` count onto a level, never going below `base`.
    pub fn from_verbosity(count: u8, base: LogLevel) -> LogLevel {
        let requested = match count {
            0 => return base,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        if requested.to_tracing_level() > base.to_tracing_level() {
            requested
        } else {
            base
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON lines
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Initialize the logging system
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("gravelkit={}", config.level.to_filter()))
    });

    // Console output goes to stderr so generated content on stdout stays clean
    let console_layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true)
            .with_span_events(if config.include_spans {
                FmtSpan::ENTER | FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            })
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    if let Some(file_path) = &config.file_path {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if config.rotation {
            let file_appender = tracing_appender::rolling::daily(
                file_path.parent().unwrap_or_else(|| Path::new(".")),
                file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("gravelkit.log"),
            );

            let file_layer = fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_target(true)
                .with_current_span(config.include_spans)
                .with_span_list(config.include_spans);

            subscriber.with(file_layer).try_init()?;
        } else {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .json()
                .with_writer(file)
                .with_target(true)
                .with_current_span(config.include_spans)
                .with_span_list(config.include_spans);

            subscriber.with(file_layer).try_init()?;
        }
    } else {
        subscriber.try_init()?;
    }

    tracing::debug!(
        level = ?config.level,
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(())
}

/// Summary of one generation run, saved as JSON beside the output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started
    pub timestamp: DateTime<Utc>,

    /// Operation name, e.g. "generate"
    pub operation: String,

    /// Whether every step succeeded
    pub success: bool,

    /// Wall-clock duration
    #[serde(with = "duration_serde")]
    pub duration: Duration,

    /// Errors encountered
    pub errors: Vec<ErrorDetail>,

    /// Recoverable problems (missing data, fallbacks used)
    pub warnings: Vec<String>,

    /// Files written, relative to the report's directory where possible
    pub outputs: Vec<PathBuf>,

    /// Additional context
    pub context: Vec<(String, String)>,

    /// gravelkit version that produced the run
    pub version: String,
}

/// Error detail for a run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Error message
    pub message: String,

    /// Error type
    pub error_type: String,

    /// When the error occurred
    pub timestamp: DateTime<Utc>,
}

impl RunReport {
    /// Create a new run report
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            success: false,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            warnings: Vec::new(),
            outputs: Vec::new(),
            context: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn set_success(&mut self, success: bool) {
        self.success = success;
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Add an error
    pub fn add_error(&mut self, error: &dyn std::error::Error) {
        self.errors.push(ErrorDetail {
            message: error.to_string(),
            error_type: std::any::type_name_of_val(error).to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Add a warning and log it
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn add_output(&mut self, path: impl Into<PathBuf>) {
        self.outputs.push(path.into());
    }

    /// Add context information
    pub fn add_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.push((key.into(), value.into()));
    }

    /// Save report to file
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::info!("Run report saved to {}", path.display());
        Ok(())
    }

    /// Save report into `dir` with a timestamped filename
    pub fn save_in(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let filename = format!(
            "gravelkit_{}_{}.json",
            self.operation.replace(' ', "_"),
            self.timestamp.format("%Y%m%d_%H%M%S")
        );
        fs::create_dir_all(dir)?;
        let full_path = dir.join(filename);
        self.save_to_file(&full_path)?;
        Ok(full_path)
    }
}

// Durations are stored as milliseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogLevel::from_verbosity(0, LogLevel::Warn), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1, LogLevel::Warn), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2, LogLevel::Warn), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(5, LogLevel::Warn), LogLevel::Trace);
        // A configured debug level is not lowered by a single -v
        assert_eq!(LogLevel::from_verbosity(1, LogLevel::Debug), LogLevel::Debug);
    }

    #[test]
    fn test_run_report_round_trip() {
        let dir = tempdir().unwrap();
        let mut report = RunReport::new("generate");
        report.add_warning("race_hooks.dark_mile missing, using 150");
        report.add_output("workouts/W01_Mon_Rest.zwo");
        report.add_context("race", "Unbound 200");
        report.set_duration(Duration::from_millis(1250));
        report.set_success(true);

        let path = report.save_in(dir.path()).unwrap();
        let loaded: RunReport =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert!(loaded.success);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.outputs.len(), 1);
        assert_eq!(loaded.duration, Duration::from_millis(1250));
    }
}
