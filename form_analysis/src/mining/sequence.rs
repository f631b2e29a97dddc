//! Sequence extraction and the repeating-section inventory

use super::types::{ControlSignature, RepeatingSectionInfo, RepeatingSource};
use crate::config::compile_time::mining::MAX_CONTROLS_PER_FORM;
use crate::forms::control_types::{self, REPEATING_SECTION_TYPE, REPEATING_TABLE};
use crate::forms::{FormControl, FormDefinition};
use crate::log_warning;
use crate::logging::codes;
use std::collections::{BTreeMap, BTreeSet};

/// Identifier a form is counted under; unnamed forms get a positional id
pub fn form_id(form: &FormDefinition, index: usize) -> String {
    if form.name.trim().is_empty() {
        format!("form_{}", index)
    } else {
        form.name.clone()
    }
}

/// Uppercase alphanumerics of the label, or of the name when there is no
/// label. A blank label normalizes to the empty string.
pub fn normalize_label(label: Option<&str>, name: &str) -> String {
    let source = label.unwrap_or(name);
    source
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn is_mineable(control: &FormControl) -> bool {
    !control.is_merged_into_parent
        && !control.is_in_repeating_section
        && !control_types::is_excluded_from_mining(&control.control_type)
        && control.section_type.as_deref() != Some(REPEATING_SECTION_TYPE)
}

/// Eligible top-level controls of every view, in order
pub fn extract_sequence(form: &FormDefinition) -> Vec<ControlSignature> {
    let mut sequence = Vec::new();
    let eligible = form.views.iter().flat_map(|view| {
        view.controls
            .iter()
            .filter(|control| is_mineable(control))
            .map(move |control| (view, control))
    });

    for (view, control) in eligible {
        if sequence.len() == MAX_CONTROLS_PER_FORM {
            log_warning!(code = codes::mining::FORM_CONTROLS_TRUNCATED,
                "Form has more eligible controls than the mining limit; remainder ignored",
                "form" => form.name,
                "limit" => MAX_CONTROLS_PER_FORM
            );
            break;
        }
        sequence.push(ControlSignature {
            label: control.label.clone().unwrap_or_default(),
            control_type: control.control_type.clone(),
            name: control.name.clone(),
            relative_position: sequence.len(),
            normalized_label: normalize_label(control.label.as_deref(), &control.name),
            section: view.name.clone(),
        });
    }

    sequence
}

/// Repeating tables in encounter order, then named repeating sections
/// ordered by form and section name
pub fn repeating_inventory(forms: &[FormDefinition]) -> Vec<RepeatingSectionInfo> {
    let mut inventory = Vec::new();
    let mut sections: BTreeMap<(String, String), (usize, BTreeSet<String>)> = BTreeMap::new();

    for form in forms {
        for control in form.all_controls() {
            if control.control_type == REPEATING_TABLE {
                let types: BTreeSet<&str> = control
                    .controls
                    .iter()
                    .map(|child| child.control_type.as_str())
                    .collect();
                inventory.push(RepeatingSectionInfo {
                    name: control.name.clone(),
                    form_name: form.name.clone(),
                    source: RepeatingSource::Table,
                    control_count: control.controls.len(),
                    control_types: types.into_iter().map(str::to_string).collect(),
                });
            }

            if !control.is_in_repeating_section {
                continue;
            }
            let section = control
                .repeating_section_name
                .as_deref()
                .filter(|name| !name.trim().is_empty());
            if let Some(section) = section {
                let entry = sections
                    .entry((form.name.clone(), section.to_string()))
                    .or_default();
                entry.0 += 1;
                entry.1.insert(control.control_type.clone());
            }
        }
    }

    inventory.extend(
        sections
            .into_iter()
            .map(|((form_name, name), (count, types))| RepeatingSectionInfo {
                name,
                form_name,
                source: RepeatingSource::Section,
                control_count: count,
                control_types: types.into_iter().collect(),
            }),
    );
    inventory
}
