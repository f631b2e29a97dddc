// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    expression: ExpressionLimits,
    mining: MiningLimits,
    batch: BatchLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ExpressionLimits {
    max_decomposition_depth: usize,
    max_decomposition_input_length: usize,
    max_sub_expressions_per_node: usize,
}

#[derive(serde::Deserialize)]
struct MiningLimits {
    max_group_size_limit: usize,
    max_controls_per_form: usize,
    max_forms_per_corpus: usize,
}

#[derive(serde::Deserialize)]
struct BatchLimits {
    max_worker_threads: usize,
    max_expressions_per_batch: usize,
    min_expressions_for_parallel: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_context_entries: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FORM_ANALYSIS_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=FORM_ANALYSIS_CONFIG_DIR");

    let profile =
        env::var("FORM_ANALYSIS_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("FORM_ANALYSIS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of form_analysis directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_DECOMPOSITION_DEPTH: usize = 1_024;
    const ABSOLUTE_MAX_GROUP_SIZE: usize = 1_000;
    const ABSOLUTE_MAX_WORKER_THREADS: usize = 512;

    if config.expression.max_decomposition_depth == 0 {
        panic!("LIMITS: max_decomposition_depth must be at least 1");
    }

    if config.expression.max_decomposition_depth > ABSOLUTE_MAX_DECOMPOSITION_DEPTH {
        panic!("LIMITS: max_decomposition_depth exceeds absolute maximum");
    }

    if config.mining.max_group_size_limit < 2 {
        panic!("LIMITS: max_group_size_limit must allow groups of at least 2 controls");
    }

    if config.mining.max_group_size_limit > ABSOLUTE_MAX_GROUP_SIZE {
        panic!("LIMITS: max_group_size_limit exceeds absolute maximum");
    }

    if config.batch.max_worker_threads == 0
        || config.batch.max_worker_threads > ABSOLUTE_MAX_WORKER_THREADS
    {
        panic!("LIMITS: max_worker_threads must be between 1 and 512");
    }

    if config.logging.max_log_message_length < 64 {
        panic!("LIMITS: max_log_message_length too small (min: 64)");
    }

    if profile == "production" && config.expression.max_decomposition_depth > 128 {
        panic!("PRODUCTION: max_decomposition_depth too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod expression {{
        pub const MAX_DECOMPOSITION_DEPTH: usize = {};
        pub const MAX_DECOMPOSITION_INPUT_LENGTH: usize = {};
        pub const MAX_SUB_EXPRESSIONS_PER_NODE: usize = {};
    }}

    pub mod mining {{
        pub const MAX_GROUP_SIZE_LIMIT: usize = {};
        pub const MAX_CONTROLS_PER_FORM: usize = {};
        pub const MAX_FORMS_PER_CORPUS: usize = {};
    }}

    pub mod batch {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_EXPRESSIONS_PER_BATCH: usize = {};
        pub const MIN_EXPRESSIONS_FOR_PARALLEL: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_CONTEXT_ENTRIES: usize = {};
    }}
}}
"#,
        profile,
        // Expression
        config.expression.max_decomposition_depth,
        config.expression.max_decomposition_input_length,
        config.expression.max_sub_expressions_per_node,
        // Mining
        config.mining.max_group_size_limit,
        config.mining.max_controls_per_form,
        config.mining.max_forms_per_corpus,
        // Batch
        config.batch.max_worker_threads,
        config.batch.max_expressions_per_batch,
        config.batch.min_expressions_for_parallel,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_context_entries,
    );

    fs::write(output_path, constants_code).unwrap();
}
