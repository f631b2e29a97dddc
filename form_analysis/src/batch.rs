//! Batch expression analysis
//!
//! Runs independent expression analyses sequentially or on scoped worker
//! threads over contiguous chunks. Results always come back in input order.

use crate::config::compile_time::batch::{
    MAX_EXPRESSIONS_PER_BATCH, MAX_WORKER_THREADS, MIN_EXPRESSIONS_FOR_PARALLEL,
};
use crate::config::ExpressionPreferences;
use crate::expression::{EnhancedExpression, ExpressionAnalyzer};
use crate::logging::{codes, Code};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    /// Caller-imposed input cap, below the compile-time limit
    pub max_expressions: Option<usize>,
    pub preferences: ExpressionPreferences,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: num_cpus::get().clamp(1, 8).min(MAX_WORKER_THREADS),
            max_expressions: None,
            preferences: ExpressionPreferences::default(),
        }
    }
}

impl BatchConfig {
    pub fn with_threads(max_threads: usize) -> Self {
        Self {
            max_threads,
            ..Self::default()
        }
    }

    fn expression_limit(&self) -> usize {
        self.max_expressions
            .map(|max| max.min(MAX_EXPRESSIONS_PER_BATCH))
            .unwrap_or(MAX_EXPRESSIONS_PER_BATCH)
    }
}

/// Batch processing results
#[derive(Debug)]
pub struct BatchResults {
    /// One entry per input, in input order; `None` for empty input
    pub results: Vec<Option<EnhancedExpression>>,
    pub processing_duration: Duration,
    pub threads_used: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            processing_duration: Duration::new(0, 0),
            threads_used: 0,
        }
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn analyzed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.total_count() - self.analyzed_count()
    }

    pub fn complex_count(&self) -> usize {
        self.results
            .iter()
            .flatten()
            .filter(|analysis| analysis.is_complex)
            .count()
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch analysis completed: {} expressions, {} analyzed, {} empty, {} complex, {} threads, {:.2}s total",
            self.total_count(),
            self.analyzed_count(),
            self.empty_count(),
            self.complex_count(),
            self.threads_used,
            self.processing_duration.as_secs_f64()
        )
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Too many expressions: {count} (max: {max})")]
    TooManyExpressions { count: usize, max: usize },

    #[error("Invalid thread count: {requested} (allowed: 1..={max})")]
    InvalidThreadCount { requested: usize, max: usize },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            BatchError::TooManyExpressions { .. } => codes::batch::TOO_MANY_EXPRESSIONS,
            BatchError::InvalidThreadCount { .. } => codes::batch::INVALID_THREAD_COUNT,
            BatchError::ThreadError { .. } => codes::batch::WORKER_PANICKED,
        }
    }
}

fn validate(expressions: &[String], config: &BatchConfig) -> Result<(), BatchError> {
    if config.max_threads == 0 || config.max_threads > MAX_WORKER_THREADS {
        return Err(BatchError::InvalidThreadCount {
            requested: config.max_threads,
            max: MAX_WORKER_THREADS,
        });
    }

    let max = config.expression_limit();
    if expressions.len() > max {
        return Err(BatchError::TooManyExpressions {
            count: expressions.len(),
            max,
        });
    }

    Ok(())
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Analyze every expression on the calling thread
pub fn analyze_expressions_sequential(
    expressions: &[String],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    validate(expressions, config)?;
    let start_time = Instant::now();

    let analyzer = ExpressionAnalyzer::new().with_preferences(config.preferences.clone());
    let results = expressions.iter().map(|e| analyzer.analyze(e)).collect();

    Ok(finish(results, 1, start_time))
}

/// Analyze expressions on scoped worker threads, one contiguous chunk each
pub fn analyze_expressions_parallel(
    expressions: &[String],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    validate(expressions, config)?;
    let start_time = Instant::now();

    if expressions.is_empty() {
        return Ok(finish(Vec::new(), 0, start_time));
    }

    let analyzer = ExpressionAnalyzer::new().with_preferences(config.preferences.clone());
    let chunk_size = calculate_chunk_size(expressions.len(), config.max_threads);
    let threads_used = expressions.len().div_ceil(chunk_size);

    crate::log_debug!("Parallel analysis configuration",
        "total_expressions" => expressions.len(),
        "chunk_size" => chunk_size,
        "threads" => threads_used
    );

    let results = thread::scope(|scope| {
        let analyzer = &analyzer;
        let handles: Vec<_> = expressions
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|e| analyzer.analyze(e))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut results = Vec::with_capacity(expressions.len());
        for (thread_id, handle) in handles.into_iter().enumerate() {
            let part = handle.join().map_err(|_| {
                crate::log_error!(codes::batch::WORKER_PANICKED,
                    "Worker thread panicked during analysis",
                    "thread_id" => thread_id
                );
                BatchError::ThreadError {
                    message: format!("worker {} panicked during analysis", thread_id),
                }
            })?;
            results.extend(part);
        }
        Ok::<_, BatchError>(results)
    })?;

    Ok(finish(results, threads_used, start_time))
}

fn finish(
    results: Vec<Option<EnhancedExpression>>,
    threads_used: usize,
    start_time: Instant,
) -> BatchResults {
    let batch = BatchResults {
        results,
        processing_duration: start_time.elapsed(),
        threads_used,
    };

    crate::log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch expression analysis completed",
        "expressions" => batch.total_count(),
        "analyzed" => batch.analyzed_count(),
        "complex" => batch.complex_count(),
        "threads_used" => threads_used,
        "duration_ms" => format!("{:.2}", batch.processing_duration.as_secs_f64() * 1000.0)
    );

    batch
}

/// Contiguous chunk length spreading `total` items over at most `max_threads`
fn calculate_chunk_size(total: usize, max_threads: usize) -> usize {
    total.div_ceil(max_threads.max(1)).max(1)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Sequential for one thread or small inputs, parallel otherwise
pub fn analyze_expressions(
    expressions: &[String],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    crate::log_info!("Starting batch expression analysis",
        "expressions" => expressions.len(),
        "max_threads" => config.max_threads
    );

    if config.max_threads == 1 || expressions.len() < MIN_EXPRESSIONS_FOR_PARALLEL {
        analyze_expressions_sequential(expressions, config)
    } else {
        analyze_expressions_parallel(expressions, config)
    }
}
