//! Reusable Control Group Miner
//!
//! Finds contiguous runs of input controls that recur across forms, merges
//! near-duplicates and ranks the survivors as candidate reusable components.
//! The search is greedy and heuristic; it does not look for a minimal set.

pub mod candidates;
pub mod merge;
pub mod naming;
pub mod patterns;
pub mod sequence;
pub mod similarity;
pub mod types;

pub use types::{
    AnalysisResult, ControlGroup, ControlSignature, RepeatingSectionInfo, RepeatingSource,
    SignatureFrequency, SignatureKey,
};

use crate::config::compile_time::mining::{MAX_FORMS_PER_CORPUS, MAX_GROUP_SIZE_LIMIT};
use crate::config::{MiningPreferences, SettingsError};
use crate::forms::control_types::{REPEATING_SECTION, REPEATING_TABLE};
use crate::forms::FormDefinition;
use crate::logging::codes;
use crate::{log_success, log_warning};
use candidates::CandidateGroup;

/// Stateless miner; every call builds its own working maps
#[derive(Debug, Clone)]
pub struct ControlGroupMiner {
    preferences: MiningPreferences,
}

impl Default for ControlGroupMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlGroupMiner {
    pub fn new() -> Self {
        Self {
            preferences: MiningPreferences::default(),
        }
    }

    /// Accepts any preferences; degenerate values simply yield fewer groups
    pub fn with_preferences(preferences: MiningPreferences) -> Self {
        Self { preferences }
    }

    /// Like `with_preferences`, rejecting values that cannot describe a search
    pub fn try_with_preferences(preferences: MiningPreferences) -> Result<Self, SettingsError> {
        preferences.validate()?;
        Ok(Self { preferences })
    }

    pub fn preferences(&self) -> &MiningPreferences {
        &self.preferences
    }

    pub fn analyze(&self, forms: &[FormDefinition]) -> AnalysisResult {
        let prefs = &self.preferences;

        let forms = if forms.len() > MAX_FORMS_PER_CORPUS {
            log_warning!(code = codes::mining::CORPUS_TRUNCATED,
                "Corpus exceeds the form limit; extra forms ignored",
                "forms" => forms.len(),
                "limit" => MAX_FORMS_PER_CORPUS
            );
            &forms[..MAX_FORMS_PER_CORPUS]
        } else {
            forms
        };

        let max_group_size = if prefs.max_group_size > MAX_GROUP_SIZE_LIMIT {
            log_warning!(code = codes::mining::GROUP_SIZE_CLAMPED,
                "Requested maximum group size clamped",
                "requested" => prefs.max_group_size,
                "limit" => MAX_GROUP_SIZE_LIMIT
            );
            MAX_GROUP_SIZE_LIMIT
        } else {
            prefs.max_group_size
        };

        let repeating_sections = sequence::repeating_inventory(forms);
        let sequences: Vec<(String, Vec<ControlSignature>)> = forms
            .iter()
            .enumerate()
            .map(|(index, form)| {
                (
                    sequence::form_id(form, index),
                    sequence::extract_sequence(form),
                )
            })
            .collect();
        let total_controls_analyzed: usize = sequences.iter().map(|(_, seq)| seq.len()).sum();

        let candidates = candidates::mine_candidates(
            &sequences,
            prefs.min_group_size,
            max_group_size,
            prefs.min_occurrences,
        );
        let candidate_count = candidates.len();
        let merged = merge::merge_similar(
            candidates,
            prefs.merge_similarity_threshold,
            prefs.label_similarity_threshold,
        );

        let mut identified_groups: Vec<ControlGroup> =
            merged.into_iter().map(into_control_group).collect();
        // Stable: ties keep merge order
        identified_groups.sort_by(|a, b| {
            b.occurrence_count()
                .cmp(&a.occurrence_count())
                .then_with(|| b.control_count().cmp(&a.control_count()))
        });

        let control_frequency = patterns::control_frequency(&sequences);
        let common_patterns = patterns::common_patterns(&identified_groups);

        log_success!(codes::success::MINING_COMPLETE, "Control group mining complete",
            "forms" => forms.len(),
            "controls" => total_controls_analyzed,
            "candidates" => candidate_count,
            "groups" => identified_groups.len()
        );

        AnalysisResult {
            identified_groups,
            control_frequency,
            repeating_sections,
            total_forms_analyzed: forms.len(),
            total_controls_analyzed,
            common_patterns,
        }
    }
}

fn into_control_group(candidate: CandidateGroup) -> ControlGroup {
    let CandidateGroup {
        key,
        signatures,
        forms,
    } = candidate;

    let common_section = signatures.first().and_then(|first| {
        signatures
            .iter()
            .all(|s| s.section == first.section)
            .then(|| first.section.clone())
    });
    let contains_repeating_controls = signatures
        .iter()
        .any(|s| s.control_type == REPEATING_SECTION || s.control_type == REPEATING_TABLE);

    ControlGroup {
        suggested_name: naming::suggest_name(&key, &signatures),
        group_id: key,
        controls: signatures,
        found_in_forms: forms,
        is_sequential: true,
        contains_repeating_controls,
        common_section,
    }
}

/// Mine `forms` with explicit window and occurrence settings; similarity
/// thresholds come from the environment-derived defaults
pub fn analyze_for_reusable_groups(
    forms: &[FormDefinition],
    min_occurrences: usize,
    min_group_size: usize,
    max_group_size: usize,
) -> AnalysisResult {
    ControlGroupMiner::with_preferences(MiningPreferences::with_sizes(
        min_occurrences,
        min_group_size,
        max_group_size,
    ))
    .analyze(forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormControl, FormView};
    use assert_matches::assert_matches;

    fn prefs(min_occurrences: usize, min_group_size: usize, max_group_size: usize) -> MiningPreferences {
        MiningPreferences {
            min_occurrences,
            min_group_size,
            max_group_size,
            merge_similarity_threshold: 0.8,
            label_similarity_threshold: 0.7,
        }
    }

    fn form(name: &str, controls: &[(&str, &str)]) -> FormDefinition {
        FormDefinition::new(name).with_view(FormView::new(
            "Main",
            controls
                .iter()
                .enumerate()
                .map(|(i, (control_type, label))| {
                    FormControl::new(*control_type, format!("c{}", i)).with_label(*label)
                })
                .collect(),
        ))
    }

    const PERSON: [(&str, &str); 3] = [
        ("TextField", "First Name"),
        ("TextField", "Last Name"),
        ("DatePicker", "Start Date"),
    ];

    #[test]
    fn test_identical_forms_yield_one_full_group() {
        let corpus = vec![form("A", &PERSON), form("B", &PERSON)];

        let result = ControlGroupMiner::with_preferences(prefs(2, 3, 10)).analyze(&corpus);
        assert_eq!(result.identified_groups.len(), 1);
        let group = &result.identified_groups[0];
        assert_eq!(group.occurrence_count(), 2);
        assert_eq!(group.control_count(), 3);
        assert_eq!(group.suggested_name, "NameFields");
        assert_eq!(group.common_section.as_deref(), Some("Main"));
        assert!(group.is_sequential);
        assert!(!group.contains_repeating_controls);

        let defaults = ControlGroupMiner::with_preferences(prefs(2, 2, 10)).analyze(&corpus);
        let full: Vec<&ControlGroup> = defaults
            .identified_groups
            .iter()
            .filter(|g| g.control_count() == 3)
            .collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].occurrence_count(), 2);
        assert_eq!(defaults.total_forms_analyzed, 2);
        assert_eq!(defaults.total_controls_analyzed, 6);
    }

    #[test]
    fn test_min_occurrences_boundary() {
        let corpus = vec![form("A", &PERSON), form("B", &PERSON), form("C", &[])];
        let result = ControlGroupMiner::with_preferences(prefs(3, 2, 10)).analyze(&corpus);
        assert!(result.identified_groups.is_empty());

        let result = ControlGroupMiner::with_preferences(prefs(2, 2, 10)).analyze(&corpus);
        assert!(!result.identified_groups.is_empty());
    }

    #[test]
    fn test_repeating_section_controls_never_mined() {
        let repeating = |name: &str| {
            FormDefinition::new(name).with_view(FormView::new(
                "Main",
                vec![
                    FormControl::new("TextField", "amount")
                        .with_label("Amount")
                        .in_repeating_section("lines"),
                    FormControl::new("TextField", "memo")
                        .with_label("Memo")
                        .in_repeating_section("lines"),
                    FormControl::new("TextField", "tax")
                        .with_label("Tax")
                        .in_repeating_section("lines"),
                ],
            ))
        };
        let corpus = vec![repeating("A"), repeating("B"), repeating("C")];

        let result = ControlGroupMiner::with_preferences(prefs(2, 2, 10)).analyze(&corpus);
        assert!(result.identified_groups.is_empty());
        assert!(result.control_frequency.is_empty());
        assert_eq!(result.total_controls_analyzed, 0);
        assert_eq!(result.repeating_sections.len(), 3);
    }

    #[test]
    fn test_near_duplicates_merge() {
        let corpus = vec![
            form("A", &[("TextField", "Address"), ("TextField", "City")]),
            form("B", &[("TextField", "Address"), ("TextField", "City")]),
            form("C", &[("TextField", "Addres"), ("TextField", "City")]),
            form("D", &[("TextField", "Addres"), ("TextField", "City")]),
        ];
        let result = ControlGroupMiner::with_preferences(prefs(2, 2, 2)).analyze(&corpus);
        assert_eq!(result.identified_groups.len(), 1);
        let group = &result.identified_groups[0];
        // Equal counts: the smaller key anchors ('S' sorts before '|')
        assert_eq!(group.group_id, "TextField_ADDRESS|TextField_CITY");
        assert_eq!(group.occurrence_count(), 4);
        assert_eq!(group.suggested_name, "AddressFields");
    }

    #[test]
    fn test_ranking_by_occurrence_then_size() {
        let abc = [
            ("TextField", "Email"),
            ("TextField", "Department"),
            ("TextField", "Quantity"),
        ];
        let abd = [
            ("TextField", "Email"),
            ("TextField", "Department"),
            ("TextField", "Notes"),
        ];
        let corpus = vec![form("A", &abc), form("B", &abc), form("C", &abd)];
        let result = ControlGroupMiner::with_preferences(prefs(2, 2, 10)).analyze(&corpus);

        let ranked: Vec<(usize, usize)> = result
            .identified_groups
            .iter()
            .map(|g| (g.occurrence_count(), g.control_count()))
            .collect();
        assert_eq!(ranked, vec![(3, 2), (2, 3), (2, 2)]);
        assert_eq!(
            result.common_patterns,
            vec!["3 groups of consecutive text fields"]
        );
        assert_eq!(result.control_frequency[0].form_count, 3);
    }

    #[test]
    fn test_mining_is_idempotent() {
        let corpus = vec![
            form("A", &PERSON),
            form("B", &PERSON),
            form("C", &[("TextField", "First Name"), ("TextField", "Last Name")]),
        ];
        let miner = ControlGroupMiner::with_preferences(prefs(2, 2, 10));
        let first = miner.analyze(&corpus);
        let second = miner.analyze(&corpus);
        assert_eq!(first.group_forms(), second.group_forms());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_corpus() {
        let result = analyze_for_reusable_groups(&[], 2, 2, 10);
        assert_eq!(result, AnalysisResult::empty());
    }

    #[test]
    fn test_oversized_window_request_is_clamped() {
        let corpus = vec![form("A", &PERSON), form("B", &PERSON)];
        let result = ControlGroupMiner::with_preferences(prefs(2, 3, usize::MAX)).analyze(&corpus);
        assert_eq!(result.identified_groups.len(), 1);
    }

    #[test]
    fn test_invalid_preferences_rejected() {
        assert_matches!(
            ControlGroupMiner::try_with_preferences(prefs(2, 5, 3)),
            Err(SettingsError::InvalidGroupSizeRange { min: 5, max: 3 })
        );
        assert!(ControlGroupMiner::try_with_preferences(prefs(2, 2, 10)).is_ok());
    }

    #[test]
    fn test_result_serializes_occurrence_count() {
        let corpus = vec![form("A", &PERSON), form("B", &PERSON)];
        let result = ControlGroupMiner::with_preferences(prefs(2, 3, 3)).analyze(&corpus);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["identified_groups"][0]["occurrence_count"], 2);
        assert_eq!(json["identified_groups"][0]["found_in_forms"][1], "B");
    }
}
