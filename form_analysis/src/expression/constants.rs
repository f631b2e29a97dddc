//! Literal constant extraction

use crate::log_error;
use crate::logging::codes;
use regex::Regex;
use std::sync::OnceLock;

const DOUBLE_QUOTED: &str = r#""([^"]*)""#;
const SINGLE_QUOTED: &str = r"'([^']*)'";
const NUMERIC: &str = r"\b\d+(?:\.\d+)?\b";

struct LiteralPatterns {
    double_quoted: Regex,
    single_quoted: Regex,
    numeric: Regex,
}

static PATTERNS: OnceLock<Option<LiteralPatterns>> = OnceLock::new();

fn patterns() -> Option<&'static LiteralPatterns> {
    PATTERNS
        .get_or_init(|| {
            let compiled = (|| -> Result<LiteralPatterns, regex::Error> {
                Ok(LiteralPatterns {
                    double_quoted: Regex::new(DOUBLE_QUOTED)?,
                    single_quoted: Regex::new(SINGLE_QUOTED)?,
                    numeric: Regex::new(NUMERIC)?,
                })
            })();
            match compiled {
                Ok(patterns) => Some(patterns),
                Err(e) => {
                    log_error!(codes::system::INTERNAL_ERROR, "Literal patterns failed to compile",
                        "error" => e
                    );
                    None
                }
            }
        })
        .as_ref()
}

/// Quoted literals (double, then single) and standalone numbers, deduplicated
/// in first-seen order. Numbers are scanned over the whole text, literals
/// included.
pub fn extract_constants(expression: &str) -> Vec<String> {
    let Some(patterns) = patterns() else {
        return Vec::new();
    };

    let mut constants: Vec<String> = Vec::new();
    let mut push = |value: &str| {
        if !constants.iter().any(|c| c == value) {
            constants.push(value.to_string());
        }
    };

    for regex in [&patterns.double_quoted, &patterns.single_quoted] {
        for captures in regex.captures_iter(expression) {
            if let Some(value) = captures.get(1) {
                push(value.as_str());
            }
        }
    }

    for number in patterns.numeric.find_iter(expression) {
        push(number.as_str());
    }

    constants
}
