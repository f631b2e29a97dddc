// RUNTIME PREFERENCES (tunable thresholds and output options)

use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::env;

/// Settings validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid group size range: min {min} is greater than max {max}")]
    InvalidGroupSizeRange { min: usize, max: usize },

    #[error("Group size must be at least 1, got {value}")]
    GroupSizeTooSmall { value: usize },

    #[error("Minimum occurrences must be at least 1, got {value}")]
    OccurrencesTooSmall { value: usize },

    #[error("Threshold '{name}' must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
}

impl SettingsError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SettingsError::InvalidGroupSizeRange { .. }
            | SettingsError::GroupSizeTooSmall { .. } => codes::config::INVALID_GROUP_SIZE,
            SettingsError::OccurrencesTooSmall { .. } => codes::config::INVALID_OCCURRENCES,
            SettingsError::ThresholdOutOfRange { .. } => codes::config::THRESHOLD_OUT_OF_RANGE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionPreferences {
    /// Score an expression must strictly exceed to count as complex
    pub complexity_threshold: u32,

    /// Word `>=`/`<=` before the single-character operators in paraphrases.
    /// Off by default: the legacy order turns `a >= b` into
    /// "a is greater than equals b", and downstream reports expect that text.
    pub fix_compound_operator_order: bool,

    /// Whether parser translation hints are attached to results
    pub include_translation_hints: bool,
}

impl Default for ExpressionPreferences {
    fn default() -> Self {
        Self {
            complexity_threshold: env::var("FORM_ANALYSIS_COMPLEXITY_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            fix_compound_operator_order: env::var("FORM_ANALYSIS_FIX_OPERATOR_ORDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_translation_hints: env::var("FORM_ANALYSIS_INCLUDE_HINTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningPreferences {
    /// Distinct forms a group must appear in
    pub min_occurrences: usize,

    /// Smallest window size
    pub min_group_size: usize,

    /// Largest window size (clamped to the compile-time limit)
    pub max_group_size: usize,

    /// Group similarity needed to merge two candidates
    pub merge_similarity_threshold: f64,

    /// Normalized edit similarity needed for two labels to count as similar
    pub label_similarity_threshold: f64,
}

impl Default for MiningPreferences {
    fn default() -> Self {
        Self {
            min_occurrences: env::var("FORM_ANALYSIS_MIN_OCCURRENCES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            min_group_size: env::var("FORM_ANALYSIS_MIN_GROUP_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            max_group_size: env::var("FORM_ANALYSIS_MAX_GROUP_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            merge_similarity_threshold: env::var("FORM_ANALYSIS_MERGE_SIMILARITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.8),
            label_similarity_threshold: env::var("FORM_ANALYSIS_LABEL_SIMILARITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.7),
        }
    }
}

impl MiningPreferences {
    /// Preferences with explicit window and occurrence settings, thresholds from defaults
    pub fn with_sizes(min_occurrences: usize, min_group_size: usize, max_group_size: usize) -> Self {
        Self {
            min_occurrences,
            min_group_size,
            max_group_size,
            ..Self::default()
        }
    }

    /// Check that the preferences describe a meaningful search
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_occurrences == 0 {
            return Err(SettingsError::OccurrencesTooSmall {
                value: self.min_occurrences,
            });
        }

        if self.min_group_size == 0 {
            return Err(SettingsError::GroupSizeTooSmall {
                value: self.min_group_size,
            });
        }

        if self.min_group_size > self.max_group_size {
            return Err(SettingsError::InvalidGroupSizeRange {
                min: self.min_group_size,
                max: self.max_group_size,
            });
        }

        check_threshold("merge_similarity_threshold", self.merge_similarity_threshold)?;
        check_threshold("label_similarity_threshold", self.label_similarity_threshold)?;

        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::ThresholdOutOfRange { name, value })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level written by the configured logger
    pub min_log_level: LogLevel,

    /// Whether timing events are emitted
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("FORM_ANALYSIS_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("FORM_ANALYSIS_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("FORM_ANALYSIS_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env::var("FORM_ANALYSIS_LOGGING_LOG_PERFORMANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub expression: ExpressionPreferences,
    pub mining: MiningPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Expression
    pub const COMPLEXITY_THRESHOLD: &str = "FORM_ANALYSIS_COMPLEXITY_THRESHOLD";
    pub const FIX_OPERATOR_ORDER: &str = "FORM_ANALYSIS_FIX_OPERATOR_ORDER";
    pub const INCLUDE_HINTS: &str = "FORM_ANALYSIS_INCLUDE_HINTS";

    // Mining
    pub const MIN_OCCURRENCES: &str = "FORM_ANALYSIS_MIN_OCCURRENCES";
    pub const MIN_GROUP_SIZE: &str = "FORM_ANALYSIS_MIN_GROUP_SIZE";
    pub const MAX_GROUP_SIZE: &str = "FORM_ANALYSIS_MAX_GROUP_SIZE";
    pub const MERGE_SIMILARITY: &str = "FORM_ANALYSIS_MERGE_SIMILARITY";
    pub const LABEL_SIMILARITY: &str = "FORM_ANALYSIS_LABEL_SIMILARITY";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "FORM_ANALYSIS_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "FORM_ANALYSIS_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "FORM_ANALYSIS_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "FORM_ANALYSIS_LOGGING_LOG_PERFORMANCE";
}
