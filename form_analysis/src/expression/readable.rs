//! Human-readable paraphrase of an expression
//!
//! Rendering is a fixed sequence of textual substitutions: bracket field
//! references, apply function idiom templates, uppercase logical connectors,
//! word comparison operators, then collapse whitespace.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("Template pattern '{pattern}' failed to compile: {reason}")]
    InvalidTemplate {
        pattern: &'static str,
        reason: String,
    },
}

impl RenderError {
    pub fn error_code(&self) -> crate::logging::Code {
        use crate::logging::codes;
        match self {
            RenderError::InvalidTemplate { .. } => codes::expression::TEMPLATE_PATTERN_INVALID,
        }
    }
}

// ============================================================================
// SUBSTITUTION TABLES
// ============================================================================

/// Function idiom templates, applied in order
const TEMPLATES: [(&str, &str); 6] = [
    (
        r"string-length\(\s*([^()]+?)\s*\)\s*>\s*0\b",
        "${1} is not empty",
    ),
    (r"string-length\(\s*([^()]+?)\s*\)\s*=\s*0\b", "${1} is empty"),
    (
        r"count\(\s*([^()]+?)\s*\)\s*>\s*(\d+(?:\.\d+)?)",
        "${1} has more than ${2} items",
    ),
    (
        r"count\(\s*([^()]+?)\s*\)\s*=\s*(\d+(?:\.\d+)?)",
        "${1} has exactly ${2} items",
    ),
    (r"sum\(\s*([^()]+?)\s*\)", "sum of ${1}"),
    (r"concat\(\s*([^()]+?)\s*\)", "combine ${1}"),
];

const LOGICAL_WORDS: [(&str, &str); 3] = [(" and ", " AND "), (" or ", " OR "), ("not(", "NOT (")];

/// Legacy order: single-character operators run before `>=`/`<=`,
/// so `a >= b` renders as "a is greater than equals b".
const LEGACY_OPERATOR_ORDER: [(&str, &str); 6] = [
    ("!=", " is not equal to "),
    ("=", " equals "),
    (">", " is greater than "),
    ("<", " is less than "),
    (">=", " is greater than or equal to "),
    ("<=", " is less than or equal to "),
];

const FIXED_OPERATOR_ORDER: [(&str, &str); 6] = [
    ("!=", " is not equal to "),
    (">=", " is greater than or equal to "),
    ("<=", " is less than or equal to "),
    ("=", " equals "),
    (">", " is greater than "),
    ("<", " is less than "),
];

/// Compiled `(pattern, replacement)` pairs
pub type TemplateSet = Vec<(Regex, &'static str)>;

static COMPILED_TEMPLATES: OnceLock<Result<TemplateSet, RenderError>> = OnceLock::new();

/// Compile a template table; the first bad pattern fails the whole set
pub fn compile_templates(
    table: &[(&'static str, &'static str)],
) -> Result<TemplateSet, RenderError> {
    table
        .iter()
        .map(|(pattern, replacement)| {
            Regex::new(pattern)
                .map(|regex| (regex, *replacement))
                .map_err(|e| RenderError::InvalidTemplate {
                    pattern: *pattern,
                    reason: e.to_string(),
                })
        })
        .collect()
}

fn templates() -> Result<&'static [(Regex, &'static str)], RenderError> {
    COMPILED_TEMPLATES
        .get_or_init(|| compile_templates(&TEMPLATES))
        .as_ref()
        .map(|compiled| compiled.as_slice())
        .map_err(Clone::clone)
}

// ============================================================================
// RENDERING
// ============================================================================

/// Display name for a field: last path segment, predicate, `@` and
/// namespace prefix removed (`../my:Group/my:Name` -> `Name`)
pub fn display_name(field: &str) -> String {
    let last = field
        .rsplit('/')
        .find(|segment| !segment.trim().is_empty())
        .unwrap_or(field);
    let without_predicate = match last.find('[') {
        Some(idx) if idx > 0 => &last[..idx],
        _ => last,
    };
    let without_attr = without_predicate.trim_start_matches('@');
    let local = match without_attr.rfind(':') {
        Some(idx) => &without_attr[idx + 1..],
        None => without_attr,
    };
    if local.is_empty() {
        field.to_string()
    } else {
        local.to_string()
    }
}

fn is_reference_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | ':' | '-' | '.' | '/' | '@')
}

/// Replace every field occurrence with `[display]`, longest fields first.
/// Matches inside an already claimed range or glued to other name
/// characters are skipped.
pub fn bracket_fields(text: &str, fields: &[String]) -> String {
    let mut ordered: Vec<&String> = fields.iter().filter(|f| !f.is_empty()).collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut claimed: Vec<(usize, usize, String)> = Vec::new();
    for field in ordered {
        let display = format!("[{}]", display_name(field));
        for (start, matched) in text.match_indices(field.as_str()) {
            let end = start + matched.len();
            let glued_before = text[..start]
                .chars()
                .next_back()
                .map(is_reference_char)
                .unwrap_or(false);
            let glued_after = text[end..]
                .chars()
                .next()
                .map(is_reference_char)
                .unwrap_or(false);
            let overlaps = claimed.iter().any(|(s, e, _)| start < *e && end > *s);
            if !glued_before && !glued_after && !overlaps {
                claimed.push((start, end, display.clone()));
            }
        }
    }

    claimed.sort_by_key(|(start, _, _)| *start);
    let mut output = String::with_capacity(text.len() + claimed.len() * 2);
    let mut cursor = 0;
    for (start, end, display) in claimed {
        output.push_str(&text[cursor..start]);
        output.push_str(&display);
        cursor = end;
    }
    output.push_str(&text[cursor..]);
    output
}

pub fn apply_templates(text: &str, templates: &[(Regex, &'static str)]) -> String {
    let mut output = text.to_string();
    for (regex, replacement) in templates {
        output = regex.replace_all(&output, *replacement).into_owned();
    }
    output
}

pub fn word_operators(text: &str, fix_compound_operator_order: bool) -> String {
    let mut output = text.to_string();
    for (from, to) in LOGICAL_WORDS {
        output = output.replace(from, to);
    }

    let operators = if fix_compound_operator_order {
        &FIXED_OPERATOR_ORDER
    } else {
        &LEGACY_OPERATOR_ORDER
    };
    for (from, to) in operators {
        output = output.replace(from, to);
    }
    output
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Full rendering pipeline over the built-in templates
pub fn render(
    text: &str,
    fields: &[String],
    fix_compound_operator_order: bool,
) -> Result<String, RenderError> {
    render_with(text, fields, fix_compound_operator_order, templates())
}

/// Rendering pipeline over a caller-supplied template source
pub fn render_with(
    text: &str,
    fields: &[String],
    fix_compound_operator_order: bool,
    templates: Result<&[(Regex, &'static str)], RenderError>,
) -> Result<String, RenderError> {
    let templates = templates?;
    let bracketed = bracket_fields(text, fields);
    let templated = apply_templates(&bracketed, templates);
    let worded = word_operators(&templated, fix_compound_operator_order);
    Ok(collapse_whitespace(&worded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("my:Name"), "Name");
        assert_eq!(display_name("../my:Group/my:Amount"), "Amount");
        assert_eq!(display_name("my:Rows/my:Row[my:Qty > 0]"), "Row");
        assert_eq!(display_name("@my:Id"), "Id");
        assert_eq!(display_name("Plain"), "Plain");
    }

    #[test]
    fn test_bracket_fields_longest_first_with_boundaries() {
        let text = "my:Field1 + my:Field10 + my:Group/my:Field1";
        let result = bracket_fields(
            text,
            &fields(&["my:Field1", "my:Field10", "my:Group/my:Field1"]),
        );
        assert_eq!(result, "[Field1] + [Field10] + [Field1]");
    }

    #[test]
    fn test_string_length_template() {
        let result = render("string-length(my:Name) > 0", &fields(&["my:Name"]), false).unwrap();
        assert!(result.contains("is not empty"));
        assert!(result.contains("[Name]"));
        assert_eq!(result, "[Name] is not empty");
    }

    #[test]
    fn test_count_and_sum_templates() {
        assert_eq!(
            render("count(my:Items) > 3", &fields(&["my:Items"]), false).unwrap(),
            "[Items] has more than 3 items"
        );
        assert_eq!(
            render("count(my:Items) = 0", &fields(&["my:Items"]), false).unwrap(),
            "[Items] has exactly 0 items"
        );
        assert_eq!(
            render("sum(my:Lines/my:Amount)", &fields(&["my:Lines/my:Amount"]), false).unwrap(),
            "sum of [Amount]"
        );
        assert_eq!(
            render("string-length(my:A) = 0", &fields(&["my:A"]), false).unwrap(),
            "[A] is empty"
        );
    }

    #[test]
    fn test_logical_words_and_operators() {
        let result = render(
            r#"my:A = "x" and not(my:B != 2) or my:C < 1"#,
            &fields(&["my:A", "my:B", "my:C"]),
            false,
        )
        .unwrap();
        assert_eq!(
            result,
            r#"[A] equals "x" AND NOT ([B] is not equal to 2) OR [C] is less than 1"#
        );
    }

    #[test]
    fn test_compound_operator_legacy_order() {
        let result = render("my:A >= 5", &fields(&["my:A"]), false).unwrap();
        assert_eq!(result, "[A] is greater than equals 5");
        let result = render("my:A <= 5", &fields(&["my:A"]), false).unwrap();
        assert_eq!(result, "[A] is less than equals 5");
    }

    #[test]
    fn test_compound_operator_fixed_order() {
        let result = render("my:A >= 5", &fields(&["my:A"]), true).unwrap();
        assert_eq!(result, "[A] is greater than or equal to 5");
        let result = render("my:A <= 5 and my:B > 1", &fields(&["my:A", "my:B"]), true).unwrap();
        assert_eq!(
            result,
            "[A] is less than or equal to 5 AND [B] is greater than 1"
        );
    }

    #[test]
    fn test_whitespace_only_renders_empty() {
        assert_eq!(render("   ", &[], false).unwrap(), "");
    }

    #[test]
    fn test_templates_compile() {
        assert_eq!(templates().map(|t| t.len()), Ok(TEMPLATES.len()));
    }

    #[test]
    fn test_bad_template_fails_render() {
        let err = compile_templates(&[("sum(", "sum of")]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidTemplate { pattern: "sum(", .. }));
        assert_eq!(err.error_code(), crate::logging::codes::expression::TEMPLATE_PATTERN_INVALID);

        let result = render_with("sum(my:A)", &fields(&["my:A"]), false, Err(err.clone()));
        assert_eq!(result, Err(err));
    }

    #[test]
    fn test_custom_template_set() {
        let set = compile_templates(&[(r"abs\(\s*([^()]+?)\s*\)", "absolute ${1}")]).unwrap();
        let result = render_with("abs(my:A)", &fields(&["my:A"]), false, Ok(set.as_slice())).unwrap();
        assert_eq!(result, "absolute [A]");
    }
}
