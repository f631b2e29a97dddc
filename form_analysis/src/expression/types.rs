//! Expression analysis result types

use crate::parser::{ExpressionType, ReturnType, TranslationHint};
use serde::Serialize;

/// Points contributed by each complexity check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplexityBreakdown {
    pub field_references: u32,
    pub function_calls: u32,
    pub unknown_functions: u32,
    pub nested_parentheses: u32,
    pub logical_constructs: u32,
    pub data_lookup: u32,
}

impl ComplexityBreakdown {
    pub fn total(&self) -> u32 {
        self.field_references
            + self.function_calls
            + self.unknown_functions
            + self.nested_parentheses
            + self.logical_constructs
            + self.data_lookup
    }
}

/// Everything the analyzer learned about one expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedExpression {
    pub original_expression: String,
    /// Trimmed text every other field was derived from
    pub parsed_expression: String,
    pub expression_type: ExpressionType,
    pub referenced_fields: Vec<String>,
    pub used_functions: Vec<String>,
    /// Double-quoted literals, then single-quoted, then numbers; first occurrence kept
    pub constants: Vec<String>,
    pub is_complex: bool,
    pub has_nested_conditions: bool,
    pub requires_data_lookup: bool,
    pub complexity: ComplexityBreakdown,
    pub complexity_score: u32,
    pub human_readable: String,
    pub return_type: ReturnType,
    /// Populated only when `is_complex`
    pub sub_expressions: Vec<EnhancedExpression>,
    pub translation_hints: Vec<TranslationHint>,
}

impl EnhancedExpression {
    /// Number of nodes in the decomposition tree, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .sub_expressions
            .iter()
            .map(EnhancedExpression::node_count)
            .sum::<usize>()
    }

    /// Height of the decomposition tree; a leaf has depth 0
    pub fn depth(&self) -> usize {
        self.sub_expressions
            .iter()
            .map(|sub| sub.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}
