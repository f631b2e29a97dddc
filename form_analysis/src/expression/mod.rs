//! Expression Analyzer
//!
//! Turns a rule or calculation expression into an `EnhancedExpression`:
//! parser facts, literal constants, a complexity score, a human-readable
//! paraphrase, an inferred return type and, for complex expressions, a tree
//! of analysed sub-expressions.

pub mod complexity;
pub mod constants;
pub mod decompose;
pub mod readable;
pub mod return_type;
pub mod types;

pub use complexity::ComplexityAssessment;
pub use readable::RenderError;
pub use types::{ComplexityBreakdown, EnhancedExpression};

use crate::config::compile_time::expression::MAX_DECOMPOSITION_DEPTH;
use crate::config::ExpressionPreferences;
use crate::logging::codes;
use crate::parser::{ExpressionParser, XPathParser};
use crate::{log_debug, log_warning};

/// Stateless analyzer; one instance may serve any number of threads
#[derive(Debug, Clone)]
pub struct ExpressionAnalyzer<P: ExpressionParser = XPathParser> {
    parser: P,
    preferences: ExpressionPreferences,
}

impl ExpressionAnalyzer<XPathParser> {
    pub fn new() -> Self {
        Self::with_parser(XPathParser::new())
    }
}

impl Default for ExpressionAnalyzer<XPathParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ExpressionParser> ExpressionAnalyzer<P> {
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            preferences: ExpressionPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: ExpressionPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn preferences(&self) -> &ExpressionPreferences {
        &self.preferences
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// `None` only for the empty string. Whitespace-only input is analysed
    /// as an empty expression.
    pub fn analyze(&self, expression: &str) -> Option<EnhancedExpression> {
        let root = self.analyze_node(expression)?;
        let tree = decompose::expand(root, MAX_DECOMPOSITION_DEPTH, |text| {
            self.analyze_node(text)
        })?;

        log_debug!("Expression analyzed",
            "type" => tree.expression_type,
            "score" => tree.complexity_score,
            "nodes" => tree.node_count()
        );
        Some(tree)
    }

    pub fn simplify(&self, expression: &str) -> String {
        self.parser.simplify(expression)
    }

    /// Everything except decomposition
    pub(crate) fn analyze_node(&self, expression: &str) -> Option<EnhancedExpression> {
        self.analyze_node_with(expression, readable::render)
    }

    /// `analyze_node` with the paraphrase step supplied by the caller. A
    /// failed paraphrase falls back to the untouched input text.
    fn analyze_node_with<R>(&self, expression: &str, render: R) -> Option<EnhancedExpression>
    where
        R: Fn(&str, &[String], bool) -> Result<String, RenderError>,
    {
        if expression.is_empty() {
            return None;
        }

        let text = expression.trim();
        let parsed = self.parser.parse(text);
        let assessment = complexity::assess(text, &parsed);

        let human_readable = match render(
            text,
            &parsed.field_references,
            self.preferences.fix_compound_operator_order,
        ) {
            Ok(rendered) => rendered,
            Err(err) => {
                log_warning!(code = codes::expression::RENDER_FAILED,
                    "Human-readable rendering failed; using original text",
                    "cause" => err.error_code(),
                    "error" => err,
                    "expression" => expression
                );
                expression.to_string()
            }
        };

        let return_type = return_type::infer(text, &parsed.function_calls);
        let used_functions = parsed
            .function_calls
            .iter()
            .map(|call| call.name.clone())
            .collect();
        let translation_hints = if self.preferences.include_translation_hints {
            parsed.hints
        } else {
            Vec::new()
        };

        Some(EnhancedExpression {
            original_expression: expression.to_string(),
            parsed_expression: text.to_string(),
            expression_type: parsed.expression_type,
            referenced_fields: parsed.field_references,
            used_functions,
            constants: constants::extract_constants(text),
            is_complex: assessment.is_complex(self.preferences.complexity_threshold),
            has_nested_conditions: assessment.has_nested_conditions,
            requires_data_lookup: assessment.requires_data_lookup,
            complexity: assessment.breakdown,
            complexity_score: assessment.score(),
            human_readable,
            return_type,
            sub_expressions: Vec::new(),
            translation_hints,
        })
    }
}

/// Analyze with the default parser and environment-derived preferences
pub fn analyze_expression(expression: &str) -> Option<EnhancedExpression> {
    ExpressionAnalyzer::new().analyze(expression)
}

pub fn simplify_expression(expression: &str) -> String {
    ExpressionAnalyzer::new().simplify(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ExpressionType, HintKind, ParsedExpression, ReturnType};

    fn analyzer() -> ExpressionAnalyzer {
        ExpressionAnalyzer::new().with_preferences(ExpressionPreferences {
            complexity_threshold: 5,
            fix_compound_operator_order: false,
            include_translation_hints: true,
        })
    }

    #[test]
    fn test_absent_only_for_empty_input() {
        assert!(analyzer().analyze("").is_none());

        let blank = analyzer().analyze("   ").unwrap();
        assert_eq!(blank.original_expression, "   ");
        assert_eq!(blank.parsed_expression, "");
        assert_eq!(blank.expression_type, ExpressionType::Empty);
        assert!(!blank.is_complex);
    }

    #[test]
    fn test_original_and_parsed_text() {
        let result = analyzer().analyze("  my:Amount  ").unwrap();
        assert_eq!(result.original_expression, "  my:Amount  ");
        assert_eq!(result.parsed_expression, "my:Amount");
        assert_eq!(result.expression_type, ExpressionType::FieldReference);
        assert_eq!(result.referenced_fields, vec!["my:Amount"]);
        assert_eq!(result.human_readable, "[Amount]");
    }

    #[test]
    fn test_two_field_conjunction() {
        let result = analyzer()
            .analyze(r#"my:Field1 = "A" and my:Field2 = "B""#)
            .unwrap();

        assert_eq!(result.complexity_score, 6);
        assert!(result.is_complex);
        assert!(!result.has_nested_conditions);
        assert!(!result.requires_data_lookup);
        assert_eq!(result.expression_type, ExpressionType::Logical);
        assert_eq!(result.return_type, ReturnType::Boolean);
        assert_eq!(result.constants, vec!["A", "B"]);
        assert_eq!(
            result.human_readable,
            r#"[Field1] equals "A" AND [Field2] equals "B""#
        );

        let subs: Vec<&str> = result
            .sub_expressions
            .iter()
            .map(|s| s.parsed_expression.as_str())
            .collect();
        assert_eq!(subs, vec![r#"my:Field1 = "A""#, r#"my:Field2 = "B""#]);
        assert!(result.sub_expressions.iter().all(|s| !s.is_complex));
        assert_eq!(result.depth(), 1);
    }

    #[test]
    fn test_string_length_paraphrase() {
        let result = analyzer().analyze("string-length(my:Name) > 0").unwrap();
        assert!(result.human_readable.contains("is not empty"));
        assert!(result.human_readable.contains("[Name]"));
        assert_eq!(result.used_functions, vec!["string-length"]);
        // last known call decides
        assert_eq!(result.return_type, ReturnType::Number);
    }

    #[test]
    fn test_sub_expressions_only_when_complex() {
        let simple = analyzer().analyze("my:A > 1 and my:B").unwrap();
        assert_eq!(simple.complexity_score, 6);

        let threshold_six = ExpressionAnalyzer::new().with_preferences(ExpressionPreferences {
            complexity_threshold: 6,
            ..analyzer().preferences().clone()
        });
        let result = threshold_six.analyze("my:A > 1 and my:B").unwrap();
        assert!(!result.is_complex);
        assert!(result.sub_expressions.is_empty());
    }

    #[test]
    fn test_mixed_decomposition_tree() {
        let result = analyzer()
            .analyze("string-length(my:Name) > 0 and my:Age > 17")
            .unwrap();
        assert_eq!(result.complexity_score, 8);
        assert_eq!(
            result.human_readable,
            "[Name] is not empty AND [Age] is greater than 17"
        );

        let subs: Vec<&str> = result
            .sub_expressions
            .iter()
            .map(|s| s.parsed_expression.as_str())
            .collect();
        assert_eq!(
            subs,
            vec!["my:Name", "string-length(my:Name) > 0", "my:Age > 17"]
        );
        assert_eq!(result.node_count(), 4);
    }

    #[test]
    fn test_data_lookup_and_hints() {
        let result = analyzer()
            .analyze("sum(../my:Lines/my:Line[my:Taxable = 'yes']/my:Amount)")
            .unwrap();
        assert!(result.requires_data_lookup);
        assert!(result.is_complex);
        let kinds: Vec<HintKind> = result.translation_hints.iter().map(|h| h.kind).collect();
        assert!(kinds.contains(&HintKind::ParentPath));
        assert!(kinds.contains(&HintKind::Predicate));
    }

    #[test]
    fn test_hints_can_be_disabled() {
        let quiet = ExpressionAnalyzer::new().with_preferences(ExpressionPreferences {
            include_translation_hints: false,
            ..analyzer().preferences().clone()
        });
        let result = quiet.analyze("frob(my:A)").unwrap();
        assert!(result.translation_hints.is_empty());
        assert_eq!(result.complexity.unknown_functions, 3);
    }

    #[test]
    fn test_compound_operator_preference() {
        let legacy = analyzer().analyze("my:A >= 5").unwrap();
        assert_eq!(legacy.human_readable, "[A] is greater than equals 5");

        let fixed = ExpressionAnalyzer::new()
            .with_preferences(ExpressionPreferences {
                fix_compound_operator_order: true,
                ..analyzer().preferences().clone()
            })
            .analyze("my:A >= 5")
            .unwrap();
        assert_eq!(fixed.human_readable, "[A] is greater than or equal to 5");
    }

    struct FixedParser;

    impl ExpressionParser for FixedParser {
        fn parse(&self, _expression: &str) -> ParsedExpression {
            ParsedExpression {
                expression_type: ExpressionType::FieldReference,
                field_references: vec!["x".to_string()],
                function_calls: Vec::new(),
                hints: Vec::new(),
            }
        }

        fn simplify(&self, expression: &str) -> String {
            expression.to_uppercase()
        }
    }

    #[test]
    fn test_custom_parser_seam() {
        let custom = ExpressionAnalyzer::with_parser(FixedParser);
        let result = custom.analyze("x").unwrap();
        assert_eq!(result.referenced_fields, vec!["x"]);
        assert_eq!(result.human_readable, "[x]");
        assert_eq!(custom.simplify("abc"), "ABC");
    }

    #[test]
    fn test_simplify_delegates_to_parser() {
        assert_eq!(
            simplify_expression("xdDate:Today()  >  my:Group/my:Start"),
            "today() > Group/Start"
        );
    }

    #[test]
    fn test_render_failure_keeps_original_text() {
        let broken = readable::compile_templates(&[("count(", "")]).unwrap_err();
        let result = analyzer()
            .analyze_node_with("  my:A >= 5 ", |text, fields, fix| {
                readable::render_with(text, fields, fix, Err(broken.clone()))
            })
            .unwrap();

        assert_eq!(result.human_readable, result.original_expression);
        assert_eq!(result.human_readable, "  my:A >= 5 ");
        // the remaining steps are unaffected
        assert_eq!(result.parsed_expression, "my:A >= 5");
        assert_eq!(result.referenced_fields, vec!["my:A"]);
        assert_eq!(result.return_type, ReturnType::Boolean);
        assert_eq!(result.constants, vec!["5"]);
    }

    #[test]
    fn test_return_type_scans_text_without_known_calls() {
        assert_eq!(
            analyze_expression("my:Group/my:Name").unwrap().return_type,
            ReturnType::Number
        );
        assert_eq!(
            analyze_expression("my:First-Name").unwrap().return_type,
            ReturnType::Number
        );
        assert_eq!(
            analyze_expression(r#""a = b""#).unwrap().return_type,
            ReturnType::Boolean
        );
        assert_eq!(
            analyze_expression("my:Brand").unwrap().return_type,
            ReturnType::Boolean
        );
    }

    #[test]
    fn test_numbers_inside_literals_are_constants() {
        let result = analyze_expression(r#"my:Room = "Room 5""#).unwrap();
        assert_eq!(result.constants, vec!["Room 5", "5"]);
    }
}
