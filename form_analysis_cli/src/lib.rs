//! # Form Analyzer CLI support
//!
//! Corpus loading and report rendering for the `form-analyzer` binary.
//! The analysis engines themselves live in `form_analysis` and never touch
//! the filesystem.

pub mod corpus;
pub mod report;

use form_analysis::logging::Code;
use form_analysis::{BatchError, SettingsError};

pub use corpus::{load_corpus, load_expressions, CorpusError};
pub use report::{ExpressionReport, MiningReport};

/// Anything that can stop a command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Invalid mining settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn error_code(&self) -> Code {
        match self {
            CliError::Corpus(err) => err.error_code(),
            CliError::Batch(err) => err.error_code(),
            CliError::Settings(err) => err.error_code(),
            CliError::Json(_) => form_analysis::logging::codes::system::INTERNAL_ERROR,
        }
    }
}
