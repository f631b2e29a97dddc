//! Configuration module for form analysis
//! Compile-time limits come from the TOML profile compiled in by build.rs;
//! runtime preferences are read from `FORM_ANALYSIS_*` environment variables.

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    ExpressionPreferences, LogLevel, LoggingPreferences, MiningPreferences, RuntimeConfig,
    SettingsError,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("FORM_ANALYSIS_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("FORM_ANALYSIS_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}
