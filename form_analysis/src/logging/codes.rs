//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes emitted by the analysis engines,
//! the batch driver and the corpus loader, together with their metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Runtime settings validation codes
pub mod config {
    use super::Code;

    pub const INVALID_GROUP_SIZE: Code = Code::new("S001");
    pub const INVALID_OCCURRENCES: Code = Code::new("S002");
    pub const THRESHOLD_OUT_OF_RANGE: Code = Code::new("S003");
}

/// Expression analysis codes
pub mod expression {
    use super::Code;

    pub const RENDER_FAILED: Code = Code::new("X001");
    pub const TEMPLATE_PATTERN_INVALID: Code = Code::new("X002");
    pub const DECOMPOSITION_DEPTH_EXCEEDED: Code = Code::new("X003");
    pub const DECOMPOSITION_INPUT_TOO_LONG: Code = Code::new("X004");
    pub const SUB_EXPRESSION_LIMIT: Code = Code::new("X005");
}

/// Control group mining codes
pub mod mining {
    use super::Code;

    pub const GROUP_SIZE_CLAMPED: Code = Code::new("M001");
    pub const FORM_CONTROLS_TRUNCATED: Code = Code::new("M002");
    pub const CORPUS_TRUNCATED: Code = Code::new("M003");
}

/// Batch expression analysis codes
pub mod batch {
    use super::Code;

    pub const TOO_MANY_EXPRESSIONS: Code = Code::new("B001");
    pub const WORKER_PANICKED: Code = Code::new("B002");
    pub const INVALID_THREAD_COUNT: Code = Code::new("B003");
}

/// Corpus loading codes (command line front end)
pub mod corpus {
    use super::Code;

    pub const PATH_NOT_FOUND: Code = Code::new("L001");
    pub const READ_FAILED: Code = Code::new("L002");
    pub const INVALID_JSON: Code = Code::new("L003");
    pub const EMPTY_CORPUS: Code = Code::new("L004");
    pub const WALK_FAILED: Code = Code::new("L005");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I002");

    pub const EXPRESSION_ANALYZED: Code = Code::new("I010");
    pub const MINING_COMPLETE: Code = Code::new("I020");
    pub const BATCH_COMPLETE: Code = Code::new("I030");
    pub const CORPUS_LOADED: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        registry.insert(
            "ERR001",
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
                "File a bug report with the failing input",
            ),
        );
        registry.insert(
            "ERR002",
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "Logging or configuration initialization failure",
                "Check FORM_ANALYSIS_* environment variables",
            ),
        );

        // Settings
        registry.insert(
            "S001",
            ErrorMetadata::new(
                "S001",
                "Settings",
                Severity::Medium,
                true,
                "Group size range is empty or starts at zero",
                "Use 1 <= min_group_size <= max_group_size",
            ),
        );
        registry.insert(
            "S002",
            ErrorMetadata::new(
                "S002",
                "Settings",
                Severity::Medium,
                true,
                "Minimum occurrence count is zero",
                "Require at least one form per group",
            ),
        );
        registry.insert(
            "S003",
            ErrorMetadata::new(
                "S003",
                "Settings",
                Severity::Medium,
                true,
                "Similarity threshold outside [0, 1]",
                "Use a fraction between 0 and 1",
            ),
        );

        // Expression analysis
        registry.insert(
            "X001",
            ErrorMetadata::new(
                "X001",
                "Expression",
                Severity::Low,
                true,
                "Human-readable rendering failed; original text used",
                "Inspect the expression for unusual field references",
            ),
        );
        registry.insert(
            "X002",
            ErrorMetadata::new(
                "X002",
                "Expression",
                Severity::High,
                true,
                "Paraphrase template pattern failed to compile",
                "Fix the template pattern table",
            ),
        );
        registry.insert(
            "X003",
            ErrorMetadata::new(
                "X003",
                "Expression",
                Severity::Low,
                true,
                "Sub-expression decomposition reached the depth limit",
                "Raise max_decomposition_depth in the build profile if deeper breakdowns are needed",
            ),
        );
        registry.insert(
            "X004",
            ErrorMetadata::new(
                "X004",
                "Expression",
                Severity::Low,
                true,
                "Expression too long to decompose",
                "Raise max_decomposition_input_length in the build profile",
            ),
        );
        registry.insert(
            "X005",
            ErrorMetadata::new(
                "X005",
                "Expression",
                Severity::Low,
                true,
                "Sub-expression candidates truncated",
                "Raise max_sub_expressions_per_node in the build profile",
            ),
        );

        // Mining
        registry.insert(
            "M001",
            ErrorMetadata::new(
                "M001",
                "Mining",
                Severity::Low,
                true,
                "Maximum group size clamped to the compile-time limit",
                "Request a smaller max_group_size or raise max_group_size_limit",
            ),
        );
        registry.insert(
            "M002",
            ErrorMetadata::new(
                "M002",
                "Mining",
                Severity::Medium,
                true,
                "Form control sequence truncated",
                "Raise max_controls_per_form in the build profile",
            ),
        );
        registry.insert(
            "M003",
            ErrorMetadata::new(
                "M003",
                "Mining",
                Severity::Medium,
                true,
                "Corpus truncated to the maximum form count",
                "Split the corpus or raise max_forms_per_corpus",
            ),
        );

        // Batch
        registry.insert(
            "B001",
            ErrorMetadata::new(
                "B001",
                "Batch",
                Severity::Medium,
                true,
                "Batch exceeds the maximum expression count",
                "Split the input into smaller batches",
            ),
        );
        registry.insert(
            "B002",
            ErrorMetadata::new(
                "B002",
                "Batch",
                Severity::High,
                false,
                "A batch worker thread panicked",
                "Re-run sequentially to isolate the failing expression",
            ),
        );
        registry.insert(
            "B003",
            ErrorMetadata::new(
                "B003",
                "Batch",
                Severity::Low,
                true,
                "Worker thread count out of range",
                "Use a thread count between 1 and max_worker_threads",
            ),
        );

        // Corpus loading
        registry.insert(
            "L001",
            ErrorMetadata::new(
                "L001",
                "Corpus",
                Severity::Medium,
                false,
                "Corpus path does not exist",
                "Check the path passed to the mine command",
            ),
        );
        registry.insert(
            "L002",
            ErrorMetadata::new(
                "L002",
                "Corpus",
                Severity::Medium,
                false,
                "Corpus file could not be read",
                "Check file permissions",
            ),
        );
        registry.insert(
            "L003",
            ErrorMetadata::new(
                "L003",
                "Corpus",
                Severity::Medium,
                true,
                "Corpus file is not a valid form definition",
                "Validate the JSON against the form model",
            ),
        );
        registry.insert(
            "L004",
            ErrorMetadata::new(
                "L004",
                "Corpus",
                Severity::Low,
                true,
                "No form definitions found",
                "Point the loader at a directory containing .json forms",
            ),
        );
        registry.insert(
            "L005",
            ErrorMetadata::new(
                "L005",
                "Corpus",
                Severity::Medium,
                true,
                "Directory traversal failed",
                "Check directory permissions and symlinks",
            ),
        );

        // Success codes
        registry.insert(
            "I001",
            ErrorMetadata::new(
                "I001",
                "Success",
                Severity::Low,
                true,
                "Operation completed successfully",
                "None",
            ),
        );
        registry.insert(
            "I002",
            ErrorMetadata::new(
                "I002",
                "Success",
                Severity::Low,
                true,
                "Logging system initialized",
                "None",
            ),
        );
        registry.insert(
            "I010",
            ErrorMetadata::new(
                "I010",
                "Expression",
                Severity::Low,
                true,
                "Expression analyzed",
                "None",
            ),
        );
        registry.insert(
            "I020",
            ErrorMetadata::new(
                "I020",
                "Mining",
                Severity::Low,
                true,
                "Control group mining completed",
                "None",
            ),
        );
        registry.insert(
            "I030",
            ErrorMetadata::new(
                "I030",
                "Batch",
                Severity::Low,
                true,
                "Batch analysis completed",
                "None",
            ),
        );
        registry.insert(
            "I040",
            ErrorMetadata::new(
                "I040",
                "Corpus",
                Severity::Low,
                true,
                "Corpus loaded",
                "None",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_is_registered() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            config::INVALID_GROUP_SIZE,
            config::INVALID_OCCURRENCES,
            config::THRESHOLD_OUT_OF_RANGE,
            expression::RENDER_FAILED,
            expression::TEMPLATE_PATTERN_INVALID,
            expression::DECOMPOSITION_DEPTH_EXCEEDED,
            expression::DECOMPOSITION_INPUT_TOO_LONG,
            expression::SUB_EXPRESSION_LIMIT,
            mining::GROUP_SIZE_CLAMPED,
            mining::FORM_CONTROLS_TRUNCATED,
            mining::CORPUS_TRUNCATED,
            batch::TOO_MANY_EXPRESSIONS,
            batch::WORKER_PANICKED,
            batch::INVALID_THREAD_COUNT,
            corpus::PATH_NOT_FOUND,
            corpus::READ_FAILED,
            corpus::INVALID_JSON,
            corpus::EMPTY_CORPUS,
            corpus::WALK_FAILED,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::EXPRESSION_ANALYZED,
            success::MINING_COMPLETE,
            success::BATCH_COMPLETE,
            success::CORPUS_LOADED,
        ];

        for code in declared {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "missing metadata for {}", code);
            assert_eq!(metadata.map(|m| m.code), Some(code.as_str()));
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
        assert!(is_recoverable("Z999"));
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("X003"), "Expression");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(!is_recoverable("B002"));
        assert!(get_action("M001").contains("max_group_size"));
    }
}
