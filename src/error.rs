//! Unified error hierarchy for gravelkit
//!
//! Library code returns these structured errors; the CLI wraps them in
//! `anyhow` with additional context.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all gravelkit operations
#[derive(Debug, Error)]
pub enum GravelKitError {
    /// Race or plan input problems
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Template filling problems
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Problems writing generated files
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Generated content failed a validation rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZWO XML errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Race and plan input errors
#[derive(Debug, Error)]
pub enum DataError {
    /// Input file not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input file could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Unknown workout archetype
    #[error("Unknown archetype: {key}")]
    UnknownArchetype { key: String },

    /// Progression level outside 1-6
    #[error("Invalid progression level: {level}")]
    InvalidLevel { level: u8 },

    /// Unknown plan tier or level
    #[error("Unknown plan variant: {tier}/{level}")]
    UnknownVariant { tier: String, level: String },

    /// A ZWO block string could not be interpreted
    #[error("Malformed workout block: {reason}")]
    MalformedBlock { reason: String },

    /// Week outside a fixed training block
    #[error("Week {week} is outside the {weeks}-week block")]
    InvalidBlockWeek { week: u8, weeks: u8 },

    /// Race name that cannot be used as a folder name
    #[error("Race name {name:?} cannot be used as a folder name")]
    InvalidRaceName { name: String },
}

/// Template filling errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Tokens still present after filling
    #[error("Unreplaced tokens: {}", tokens.join(", "))]
    Unreplaced { tokens: Vec<String> },

    /// Elementor widget not present in the base document
    #[error("Widget not found: {selector}")]
    WidgetNotFound { selector: String },

    /// Base document is not an Elementor export
    #[error("Invalid base document: {reason}")]
    InvalidBase { reason: String },
}

/// Output writing errors
#[derive(Debug, Error)]
pub enum OutputError {
    /// Could not create an output directory
    #[error("Failed to create directory {path}: {reason}")]
    CreateDir { path: PathBuf, reason: String },

    /// Could not write an output file
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Result type alias for gravelkit operations
pub type Result<T> = std::result::Result<T, GravelKitError>;

impl GravelKitError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GravelKitError::Data(DataError::UnknownArchetype { .. }) => ErrorSeverity::Warning,
            GravelKitError::Data(DataError::MissingField { .. }) => ErrorSeverity::Warning,
            GravelKitError::Template(TemplateError::WidgetNotFound { .. }) => {
                ErrorSeverity::Warning
            }
            GravelKitError::Validation(_) => ErrorSeverity::Warning,
            GravelKitError::Output(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            GravelKitError::Data(DataError::FileNotFound { path }) => {
                format!("Could not find input file: {}", path.display())
            }
            GravelKitError::Data(DataError::Parse { path, .. }) => {
                format!(
                    "{} is not valid JSON for this command. Check the file against the sample data.",
                    path.display()
                )
            }
            GravelKitError::Data(DataError::InvalidLevel { level }) => {
                format!("Level {} is out of range. Levels run from 1 to 6.", level)
            }
            GravelKitError::Template(TemplateError::Unreplaced { tokens }) => {
                format!(
                    "Generated output still contains {} placeholder(s): {}",
                    tokens.len(),
                    tokens.join(", ")
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Output could not be produced at all
    Critical,
    /// Error that prevents this operation but the run can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = GravelKitError::Data(DataError::UnknownArchetype {
            key: "vo2_99".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = GravelKitError::Output(OutputError::WriteFailed {
            path: PathBuf::from("/tmp/out.zwo"),
            reason: "disk full".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err = GravelKitError::Data(DataError::FileNotFound {
            path: PathBuf::from("unbound_200.json"),
        });
        assert!(err.user_message().contains("Could not find"));

        let err = GravelKitError::Template(TemplateError::Unreplaced {
            tokens: vec!["{{RACE_NAME}}".to_string()],
        });
        assert!(err.user_message().contains("{{RACE_NAME}}"));
    }

    #[test]
    fn test_unreplaced_display_lists_tokens() {
        let err = TemplateError::Unreplaced {
            tokens: vec!["{{A}}".to_string(), "{{B}}".to_string()],
        };
        assert_eq!(err.to_string(), "Unreplaced tokens: {{A}}, {{B}}");
    }
}
