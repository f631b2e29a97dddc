//! Signature frequency table and descriptive pattern summary

use super::types::{ControlGroup, ControlSignature, SignatureFrequency, SignatureKey};
use crate::forms::control_types::{DATE_PICKER, LABEL, TEXT_FIELD};
use std::collections::{BTreeMap, BTreeSet};

/// Forms containing each signature, counted once per form; descending by
/// count, ties in key order
pub fn control_frequency(sequences: &[(String, Vec<ControlSignature>)]) -> Vec<SignatureFrequency> {
    let mut counts: BTreeMap<SignatureKey, usize> = BTreeMap::new();
    for (_, sequence) in sequences {
        let distinct: BTreeSet<SignatureKey> = sequence.iter().map(ControlSignature::key).collect();
        for key in distinct {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut frequency: Vec<SignatureFrequency> = counts
        .into_iter()
        .map(|(signature, form_count)| SignatureFrequency {
            signature,
            form_count,
        })
        .collect();
    // Stable: equal counts stay in key order
    frequency.sort_by(|a, b| b.form_count.cmp(&a.form_count));
    frequency
}

fn is_type(control: &ControlSignature, control_type: &str) -> bool {
    control.control_type == control_type
}

pub fn common_patterns(groups: &[ControlGroup]) -> Vec<String> {
    let text_field_groups = groups
        .iter()
        .filter(|g| g.control_count() >= 2 && g.controls.iter().all(|c| is_type(c, TEXT_FIELD)))
        .count();
    let label_pairs = groups
        .iter()
        .filter(|g| {
            g.control_count() == 2
                && is_type(&g.controls[0], LABEL)
                && !is_type(&g.controls[1], LABEL)
        })
        .count();
    let date_groups = groups
        .iter()
        .filter(|g| g.control_count() >= 2 && g.controls.iter().any(|c| is_type(c, DATE_PICKER)))
        .count();

    let mut patterns = Vec::new();
    if text_field_groups > 0 {
        patterns.push(format!(
            "{} groups of consecutive text fields",
            text_field_groups
        ));
    }
    if label_pairs > 0 {
        patterns.push(format!("{} label and input pairs", label_pairs));
    }
    if date_groups > 0 {
        patterns.push(format!("{} groups containing date pickers", date_groups));
    }
    patterns
}
