//! Return type inference

use crate::parser::{FunctionCall, ReturnType};

const BOOLEAN_MARKERS: [&str; 7] = ["=", "!=", ">", "<", "and", "or", "not("];
const NUMBER_MARKERS: [&str; 7] = ["+", "-", "*", "/", "sum(", "count(", "avg("];
const DATE_MARKERS: [&str; 3] = ["today(", "now(", "adddays("];

/// The last recognised call decides. Without one, the lowercased text is
/// scanned for boolean, then numeric, then date markers; anything else is a
/// string. The scan is plain substring matching, so `/` in a path reads as
/// division and `or` inside a name reads as a connective.
pub fn infer(text: &str, calls: &[FunctionCall]) -> ReturnType {
    if let Some(declared) = calls.iter().rev().find_map(FunctionCall::return_type) {
        return declared;
    }

    let lowered = text.to_lowercase();
    let contains_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    if contains_any(&BOOLEAN_MARKERS) {
        ReturnType::Boolean
    } else if contains_any(&NUMBER_MARKERS) {
        ReturnType::Number
    } else if contains_any(&DATE_MARKERS) {
        ReturnType::Date
    } else {
        ReturnType::String
    }
}
