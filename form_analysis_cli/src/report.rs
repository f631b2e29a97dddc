//! Text and JSON rendering for analysis output

use chrono::{DateTime, Utc};
use form_analysis::{AnalysisResult, EnhancedExpression, MiningPreferences};
use serde::Serialize;
use std::fmt::Write;

const INDENT: &str = "  ";

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExpressionReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub expressions: Vec<ExpressionEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ExpressionEntry<'a> {
    pub input: &'a str,
    /// `None` for empty input
    pub analysis: Option<&'a EnhancedExpression>,
}

impl<'a> ExpressionReport<'a> {
    pub fn new(
        generated_at: DateTime<Utc>,
        inputs: &'a [String],
        results: &'a [Option<EnhancedExpression>],
    ) -> Self {
        let expressions = inputs
            .iter()
            .zip(results)
            .map(|(input, analysis)| ExpressionEntry {
                input,
                analysis: analysis.as_ref(),
            })
            .collect();

        Self {
            generated_at,
            expressions,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (index, entry) in self.expressions.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            match entry.analysis {
                Some(analysis) => write_expression(&mut out, analysis, 0),
                None => out.push_str("(empty expression)\n"),
            }
        }
        out
    }
}

fn write_expression(out: &mut String, analysis: &EnhancedExpression, level: usize) {
    let pad = INDENT.repeat(level);

    let _ = writeln!(out, "{}Expression: {}", pad, analysis.parsed_expression);
    let _ = writeln!(out, "{}  Readable:   {}", pad, analysis.human_readable);
    let _ = writeln!(
        out,
        "{}  Type:       {} -> {}",
        pad, analysis.expression_type, analysis.return_type
    );
    let _ = writeln!(
        out,
        "{}  Complexity: {}{}",
        pad,
        analysis.complexity_score,
        if analysis.is_complex { " (complex)" } else { "" }
    );

    if !analysis.referenced_fields.is_empty() {
        let _ = writeln!(out, "{}  Fields:     {}", pad, analysis.referenced_fields.join(", "));
    }
    if !analysis.used_functions.is_empty() {
        let _ = writeln!(out, "{}  Functions:  {}", pad, analysis.used_functions.join(", "));
    }
    if !analysis.constants.is_empty() {
        let _ = writeln!(out, "{}  Constants:  {}", pad, analysis.constants.join(", "));
    }
    for hint in &analysis.translation_hints {
        let _ = writeln!(out, "{}  Hint:       {}", pad, hint.text);
    }

    for sub in &analysis.sub_expressions {
        write_expression(out, sub, level + 1);
    }
}

// ============================================================================
// MINING
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MiningReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub preferences: &'a MiningPreferences,
    pub result: &'a AnalysisResult,
}

impl<'a> MiningReport<'a> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let result = self.result;
        let mut out = String::new();

        let _ = writeln!(out, "Control group report for {}", self.source);
        let _ = writeln!(out, "Generated {}", self.generated_at.to_rfc3339());
        let _ = writeln!(out, "{}", result.summary());

        if result.identified_groups.is_empty() {
            out.push_str("\nNo reusable groups found\n");
        } else {
            out.push_str("\nReusable groups:\n");
            for (rank, group) in result.identified_groups.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}. {} ({} controls, {} forms)",
                    rank + 1,
                    group.suggested_name,
                    group.control_count(),
                    group.occurrence_count()
                );
                let labels: Vec<&str> = group.controls.iter().map(|c| c.label.as_str()).collect();
                let _ = writeln!(out, "     controls: {}", labels.join(", "));
                let forms: Vec<&str> = group.found_in_forms.iter().map(String::as_str).collect();
                let _ = writeln!(out, "     forms:    {}", forms.join(", "));
            }
        }

        if !result.repeating_sections.is_empty() {
            out.push_str("\nRepeating sections:\n");
            for section in &result.repeating_sections {
                let _ = writeln!(
                    out,
                    "  {} in {} ({:?}, {} controls)",
                    section.name, section.form_name, section.source, section.control_count
                );
            }
        }

        if !result.common_patterns.is_empty() {
            out.push_str("\nPatterns:\n");
            for pattern in &result.common_patterns {
                let _ = writeln!(out, "  {}", pattern);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use form_analysis::{
        analyze_expression, ControlGroupMiner, FormControl, FormDefinition, FormView,
    };

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn name_form(name: &str) -> FormDefinition {
        FormDefinition::new(name).with_view(FormView::new(
            "View1",
            vec![
                FormControl::new("TextField", "first").with_label("First Name"),
                FormControl::new("TextField", "last").with_label("Last Name"),
            ],
        ))
    }

    #[test]
    fn test_expression_text_nests_sub_expressions() {
        let inputs = vec![r#"my:A = "x" and my:B = "y""#.to_string(), String::new()];
        let results: Vec<_> = inputs.iter().map(|e| analyze_expression(e)).collect();
        let report = ExpressionReport::new(fixed_time(), &inputs, &results);

        let text = report.to_text();
        assert!(text.starts_with("Expression: my:A = \"x\" and my:B = \"y\"\n"));
        assert!(text.contains("  Expression: my:A = \"x\"\n"));
        assert!(text.contains("(complex)"));
        assert!(text.ends_with("(empty expression)\n"));
    }

    #[test]
    fn test_expression_json_keeps_empty_entries() {
        let inputs = vec!["today()".to_string(), String::new()];
        let results: Vec<_> = inputs.iter().map(|e| analyze_expression(e)).collect();
        let report = ExpressionReport::new(fixed_time(), &inputs, &results);

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["generated_at"], "2024-01-02T03:04:05Z");
        assert_eq!(json["expressions"][0]["input"], "today()");
        assert_eq!(json["expressions"][0]["analysis"]["return_type"], "Date");
        assert!(json["expressions"][1]["analysis"].is_null());
    }

    #[test]
    fn test_mining_text_lists_groups() {
        let forms = vec![name_form("F1"), name_form("F2")];
        let miner = ControlGroupMiner::with_preferences(MiningPreferences::with_sizes(2, 2, 10));
        let result = miner.analyze(&forms);
        let report = MiningReport {
            generated_at: fixed_time(),
            source: "corpus/".to_string(),
            preferences: miner.preferences(),
            result: &result,
        };

        let text = report.to_text();
        assert!(text.starts_with("Control group report for corpus/\n"));
        assert!(text.contains("Generated 2024-01-02T03:04:05+00:00"));
        assert!(text.contains("  1. NameFields (2 controls, 2 forms)"));
        assert!(text.contains("controls: First Name, Last Name"));
        assert!(text.contains("forms:    F1, F2"));
    }

    #[test]
    fn test_mining_text_without_groups() {
        let result = AnalysisResult::empty();
        let preferences = MiningPreferences::with_sizes(2, 2, 10);
        let report = MiningReport {
            generated_at: fixed_time(),
            source: "x.json".to_string(),
            preferences: &preferences,
            result: &result,
        };
        assert!(report.to_text().contains("No reusable groups found"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["preferences"]["min_group_size"], 2);
        assert_eq!(json["result"]["total_forms_analyzed"], 0);
    }
}
