// Internal modules
pub mod batch;
pub mod config;
pub mod expression;
pub mod forms;
#[macro_use]
pub mod logging;
pub mod mining;
pub mod parser;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{analyze_expressions, BatchConfig, BatchError, BatchResults};
pub use config::{ExpressionPreferences, MiningPreferences, RuntimeConfig, SettingsError};
pub use expression::{
    analyze_expression, simplify_expression, EnhancedExpression, ExpressionAnalyzer, RenderError,
};
pub use forms::{FormControl, FormDefinition, FormView};
pub use mining::{analyze_for_reusable_groups, AnalysisResult, ControlGroup, ControlGroupMiner};
pub use parser::{ExpressionParser, ExpressionType, ParsedExpression, ReturnType, XPathParser};
