//! Sliding-window candidate mining

use super::types::ControlSignature;
use std::collections::{BTreeMap, BTreeSet};

/// A window key with the forms it was seen in
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateGroup {
    pub key: String,
    /// Signatures from the first sighting
    pub signatures: Vec<ControlSignature>,
    pub forms: BTreeSet<String>,
}

impl CandidateGroup {
    pub fn occurrence_count(&self) -> usize {
        self.forms.len()
    }
}

/// `Type_LABEL` for each control, joined with `|`
pub fn group_key(window: &[ControlSignature]) -> String {
    window
        .iter()
        .map(|signature| signature.key().to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Every window of every size in `min_size..=max_size` over every sequence,
/// keeping keys seen in at least `min_occurrences` distinct forms. Output is
/// ordered by key.
pub fn mine_candidates(
    sequences: &[(String, Vec<ControlSignature>)],
    min_size: usize,
    max_size: usize,
    min_occurrences: usize,
) -> Vec<CandidateGroup> {
    let min_size = min_size.max(1);
    let mut groups: BTreeMap<String, CandidateGroup> = BTreeMap::new();

    for (form, sequence) in sequences {
        for size in min_size..=max_size {
            if size > sequence.len() {
                break;
            }
            for window in sequence.windows(size) {
                let key = group_key(window);
                groups
                    .entry(key)
                    .or_insert_with_key(|key| CandidateGroup {
                        key: key.clone(),
                        signatures: window.to_vec(),
                        forms: BTreeSet::new(),
                    })
                    .forms
                    .insert(form.clone());
            }
        }
    }

    groups
        .into_values()
        .filter(|group| group.occurrence_count() >= min_occurrences)
        .collect()
}
