//! Complexity scoring

use super::types::ComplexityBreakdown;
use crate::parser::{catalog, ParsedExpression};

pub const FIELD_REFERENCE_POINTS: u32 = 1;
pub const FUNCTION_CALL_POINTS: u32 = 2;
pub const UNKNOWN_FUNCTION_POINTS: u32 = 3;
pub const NESTED_PARENTHESES_POINTS: u32 = 5;
pub const LOGICAL_CONSTRUCT_POINTS: u32 = 4;
pub const DATA_LOOKUP_POINTS: u32 = 3;

const LOGICAL_MARKERS: [&str; 5] = [" and ", " or ", "if(", "choose(", "not("];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityAssessment {
    pub breakdown: ComplexityBreakdown,
    pub has_nested_conditions: bool,
    pub requires_data_lookup: bool,
}

impl ComplexityAssessment {
    pub fn score(&self) -> u32 {
        self.breakdown.total()
    }

    /// Strictly greater than the threshold; a score equal to it is not complex
    pub fn is_complex(&self, threshold: u32) -> bool {
        self.score() > threshold
    }
}

/// Deepest parenthesis nesting, by running counter. Stray `)` never go negative.
pub fn max_paren_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

pub fn has_logical_construct(text: &str) -> bool {
    let lowered = text.to_lowercase();
    LOGICAL_MARKERS.iter().any(|marker| lowered.contains(marker))
}

pub fn requires_data_lookup(text: &str, parsed: &ParsedExpression) -> bool {
    parsed
        .function_calls
        .iter()
        .any(|call| call.is_known && catalog::is_identity_function(&call.name))
        || text.contains("../")
        || text.contains('[')
}

pub fn assess(text: &str, parsed: &ParsedExpression) -> ComplexityAssessment {
    let unknown = parsed
        .function_calls
        .iter()
        .filter(|call| !call.is_known)
        .count() as u32;
    let has_nested_conditions = max_paren_depth(text) > 1;
    let lookup = requires_data_lookup(text, parsed);

    let breakdown = ComplexityBreakdown {
        field_references: parsed.field_references.len() as u32 * FIELD_REFERENCE_POINTS,
        function_calls: parsed.function_calls.len() as u32 * FUNCTION_CALL_POINTS,
        unknown_functions: unknown * UNKNOWN_FUNCTION_POINTS,
        nested_parentheses: if has_nested_conditions {
            NESTED_PARENTHESES_POINTS
        } else {
            0
        },
        logical_constructs: if has_logical_construct(text) {
            LOGICAL_CONSTRUCT_POINTS
        } else {
            0
        },
        data_lookup: if lookup { DATA_LOOKUP_POINTS } else { 0 },
    };

    ComplexityAssessment {
        breakdown,
        has_nested_conditions,
        requires_data_lookup: lookup,
    }
}
