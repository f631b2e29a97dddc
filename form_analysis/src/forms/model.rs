//! Form definitions as supplied by the form model provider
//!
//! Views hold ordered controls; controls may nest. JSON field names are
//! accepted in camelCase or snake_case.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub views: Vec<FormView>,
}

impl FormDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            views: Vec::new(),
        }
    }

    pub fn with_view(mut self, view: FormView) -> Self {
        self.views.push(view);
        self
    }

    /// Every control in every view, children included, depth first
    pub fn all_controls(&self) -> Vec<&FormControl> {
        let mut out = Vec::new();
        for view in &self.views {
            for control in &view.controls {
                control.collect_into(&mut out);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub controls: Vec<FormControl>,
}

impl FormView {
    pub fn new(name: impl Into<String>, controls: Vec<FormControl>) -> Self {
        Self {
            name: name.into(),
            controls,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormControl {
    #[serde(alias = "type", alias = "control_type")]
    pub control_type: String,

    #[serde(default)]
    pub name: String,

    /// `None` when the control has no label at all; the miner then falls
    /// back to `name`
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default, alias = "is_merged_into_parent")]
    pub is_merged_into_parent: bool,

    #[serde(default, alias = "is_in_repeating_section")]
    pub is_in_repeating_section: bool,

    #[serde(default, alias = "repeating_section_name")]
    pub repeating_section_name: Option<String>,

    #[serde(default, alias = "section_type")]
    pub section_type: Option<String>,

    #[serde(default)]
    pub controls: Vec<FormControl>,
}

impl FormControl {
    pub fn new(control_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            control_type: control_type.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn in_repeating_section(mut self, section_name: impl Into<String>) -> Self {
        self.is_in_repeating_section = true;
        self.repeating_section_name = Some(section_name.into());
        self
    }

    pub fn merged_into_parent(mut self) -> Self {
        self.is_merged_into_parent = true;
        self
    }

    pub fn with_section_type(mut self, section_type: impl Into<String>) -> Self {
        self.section_type = Some(section_type.into());
        self
    }

    pub fn with_children(mut self, controls: Vec<FormControl>) -> Self {
        self.controls = controls;
        self
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a FormControl>) {
        out.push(self);
        for child in &self.controls {
            child.collect_into(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "name": "Expense",
            "views": [{
                "name": "Main",
                "controls": [
                    {"controlType": "TextField", "name": "first", "label": "First Name"},
                    {"type": "RepeatingTable", "name": "lines", "controls": [
                        {"controlType": "TextField", "name": "amount",
                         "isInRepeatingSection": true, "repeatingSectionName": "lines"}
                    ]}
                ]
            }]
        }"#;
        let form: FormDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(form.views[0].controls.len(), 2);
        assert_eq!(form.views[0].controls[0].label.as_deref(), Some("First Name"));
        let nested = &form.views[0].controls[1].controls[0];
        assert!(nested.is_in_repeating_section);
        assert_eq!(nested.repeating_section_name.as_deref(), Some("lines"));
        assert_eq!(form.all_controls().len(), 3);
    }

    #[test]
    fn test_deserialize_snake_case() {
        let json = r#"{"control_type": "DatePicker", "name": "start",
                       "is_merged_into_parent": true, "section_type": "repeating"}"#;
        let control: FormControl = serde_json::from_str(json).unwrap();
        assert_eq!(control.control_type, "DatePicker");
        assert!(control.is_merged_into_parent);
        assert_eq!(control.section_type.as_deref(), Some("repeating"));
        assert!(control.label.is_none());
    }
}
