//! Miner input signatures and output types

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of a control for mining: type plus normalized label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct SignatureKey {
    pub control_type: String,
    pub normalized_label: String,
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.control_type, self.normalized_label)
    }
}

/// One eligible control at its position in a form's mined sequence
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ControlSignature {
    /// Label as authored; empty when the control had none
    pub label: String,
    pub control_type: String,
    pub name: String,
    /// Zero-based, continuous across the form's views
    pub relative_position: usize,
    pub normalized_label: String,
    /// Name of the view the control sits in
    pub section: String,
}

impl ControlSignature {
    pub fn key(&self) -> SignatureKey {
        SignatureKey {
            control_type: self.control_type.clone(),
            normalized_label: self.normalized_label.clone(),
        }
    }
}

/// A contiguous control sequence found in several forms
#[derive(Debug, Clone, PartialEq)]
pub struct ControlGroup {
    /// Pre-merge key of the anchor sequence
    pub group_id: String,
    pub controls: Vec<ControlSignature>,
    pub found_in_forms: BTreeSet<String>,
    pub suggested_name: String,
    pub is_sequential: bool,
    pub contains_repeating_controls: bool,
    /// View shared by every control, when there is one
    pub common_section: Option<String>,
}

impl ControlGroup {
    pub fn occurrence_count(&self) -> usize {
        self.found_in_forms.len()
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }
}

impl Serialize for ControlGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ControlGroup", 8)?;
        state.serialize_field("group_id", &self.group_id)?;
        state.serialize_field("suggested_name", &self.suggested_name)?;
        state.serialize_field("occurrence_count", &self.occurrence_count())?;
        state.serialize_field("controls", &self.controls)?;
        state.serialize_field("found_in_forms", &self.found_in_forms)?;
        state.serialize_field("is_sequential", &self.is_sequential)?;
        state.serialize_field("contains_repeating_controls", &self.contains_repeating_controls)?;
        state.serialize_field("common_section", &self.common_section)?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RepeatingSource {
    /// A `RepeatingTable` control and its children
    Table,
    /// Controls flagged as members of a named repeating section
    Section,
}

/// Descriptive inventory entry; never affects mining
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RepeatingSectionInfo {
    pub name: String,
    pub form_name: String,
    pub source: RepeatingSource,
    pub control_count: usize,
    /// Distinct, sorted
    pub control_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SignatureFrequency {
    pub signature: SignatureKey,
    /// Number of forms containing the signature at least once
    pub form_count: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnalysisResult {
    /// Ranked by occurrence, then by size
    pub identified_groups: Vec<ControlGroup>,
    /// Sorted by descending form count
    pub control_frequency: Vec<SignatureFrequency>,
    pub repeating_sections: Vec<RepeatingSectionInfo>,
    pub total_forms_analyzed: usize,
    /// Eligible controls across all mined sequences
    pub total_controls_analyzed: usize,
    pub common_patterns: Vec<String>,
}

impl AnalysisResult {
    pub fn empty() -> Self {
        Self {
            identified_groups: Vec::new(),
            control_frequency: Vec::new(),
            repeating_sections: Vec::new(),
            total_forms_analyzed: 0,
            total_controls_analyzed: 0,
            common_patterns: Vec::new(),
        }
    }

    /// Group id to the forms it was found in
    pub fn group_forms(&self) -> BTreeMap<&str, &BTreeSet<String>> {
        self.identified_groups
            .iter()
            .map(|group| (group.group_id.as_str(), &group.found_in_forms))
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} forms, {} controls analyzed; {} reusable groups, {} repeating sections",
            self.total_forms_analyzed,
            self.total_controls_analyzed,
            self.identified_groups.len(),
            self.repeating_sections.len()
        )
    }
}
