//! # Form Analyzer CLI
//!
//! Explains form expressions and mines reusable control groups from a JSON
//! form corpus.

use chrono::Utc;
use clap::{Parser, Subcommand};
use form_analysis::config::compile_time::batch::MAX_WORKER_THREADS;
use form_analysis::config::runtime::parse_log_level;
use form_analysis::config::{LogLevel, LoggingPreferences};
use form_analysis::logging::{self, codes, LogCrateLogger, LoggingService};
use form_analysis::{
    analyze_expressions, log_error, log_info, log_performance, BatchConfig, ControlGroupMiner,
    ExpressionAnalyzer, MiningPreferences,
};
use form_analysis_cli::{
    load_corpus, load_expressions, CliError, ExpressionReport, MiningReport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "form-analyzer", version, about = "Form expression analysis and control group mining")]
struct Cli {
    /// Minimum level for analysis events: error, warning, info or debug
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one or more expressions given on the command line
    Expr {
        #[arg(required = true)]
        expressions: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Analyze a file holding one expression per line
    ExprFile {
        file: PathBuf,

        /// Worker threads (defaults to the CPU count)
        #[arg(long)]
        threads: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Print the simplified form of an expression
    Simplify { expression: String },

    /// Mine reusable control groups from a form file or directory
    Mine {
        path: PathBuf,

        #[arg(long)]
        min_occurrences: Option<usize>,

        #[arg(long)]
        min_group_size: Option<usize>,

        #[arg(long)]
        max_group_size: Option<usize>,

        /// Only read `.json` files directly inside the directory
        #[arg(long)]
        no_recursive: bool,

        #[arg(long)]
        json: bool,
    },
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error!(err.error_code(), "Command failed",
                "error" => &err
            );
            eprintln!("Error [{}]: {}", err.error_code(), err);
            ExitCode::FAILURE
        }
    }
}

/// Environment preferences with the command-line level on top. Console or
/// structured output uses the library's own loggers; otherwise events go
/// through `env_logger`.
fn logging_preferences(level: Option<LogLevel>) -> LoggingPreferences {
    let mut preferences = LoggingPreferences::default();
    if let Some(level) = level {
        preferences.min_log_level = level;
    }
    preferences
}

fn init_logging(level: Option<LogLevel>) -> Result<(), String> {
    logging::config::init_runtime_preferences(logging_preferences(level))?;

    if logging::config::use_console_logging() || logging::config::use_structured_logging() {
        return logging::init_global_logging();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .map_err(|e| e.to_string())?;

    let service = LoggingService::new(
        Arc::new(LogCrateLogger::new()),
        logging::config::get_min_log_level(),
    );
    logging::init_global_logging_with_service(Arc::new(service))
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Expr { expressions, json } => {
            let analyzer = ExpressionAnalyzer::new();
            let results: Vec<_> = expressions.iter().map(|e| analyzer.analyze(e)).collect();
            print_expressions(&expressions, &results, json)
        }

        Command::ExprFile {
            file,
            threads,
            json,
        } => {
            let expressions = load_expressions(&file)?;
            let config = BatchConfig {
                max_threads: threads.unwrap_or_else(default_threads),
                ..BatchConfig::default()
            };

            let batch = analyze_expressions(&expressions, &config)?;
            print_expressions(&expressions, &batch.results, json)?;
            if !json {
                println!("\n{}", batch.summary());
            }
            Ok(())
        }

        Command::Simplify { expression } => {
            println!("{}", ExpressionAnalyzer::new().simplify(&expression));
            Ok(())
        }

        Command::Mine {
            path,
            min_occurrences,
            min_group_size,
            max_group_size,
            no_recursive,
            json,
        } => {
            let defaults = MiningPreferences::default();
            let preferences = MiningPreferences {
                min_occurrences: min_occurrences.unwrap_or(defaults.min_occurrences),
                min_group_size: min_group_size.unwrap_or(defaults.min_group_size),
                max_group_size: max_group_size.unwrap_or(defaults.max_group_size),
                ..defaults
            };
            let miner = ControlGroupMiner::try_with_preferences(preferences)?;

            let forms = load_corpus(&path, !no_recursive)?;
            log_info!("Mining control groups",
                "path" => path.display(),
                "forms" => forms.len()
            );
            let started = Instant::now();
            let result = miner.analyze(&forms);
            log_performance!(codes::success::MINING_COMPLETE, "Mining run timed",
                duration = started.elapsed(),
                "forms" => forms.len(),
                "groups" => result.identified_groups.len()
            );

            let report = MiningReport {
                generated_at: Utc::now(),
                source: path.display().to_string(),
                preferences: miner.preferences(),
                result: &result,
            };
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.to_text());
            }
            Ok(())
        }
    }
}

fn print_expressions(
    expressions: &[String],
    results: &[Option<form_analysis::EnhancedExpression>],
    json: bool,
) -> Result<(), CliError> {
    let report = ExpressionReport::new(Utc::now(), expressions, results);
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn default_threads() -> usize {
    num_cpus::get().clamp(1, MAX_WORKER_THREADS)
}
