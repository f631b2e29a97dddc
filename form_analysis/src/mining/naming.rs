//! Suggested names for mined groups

use super::types::ControlSignature;

/// Keyword sets in priority order
const KEYWORD_SETS: [(&[&str], &str); 5] = [
    (&["first", "last", "name"], "NameFields"),
    (&["address", "city", "state", "zip"], "AddressFields"),
    (&["email", "phone"], "ContactFields"),
    (&["department", "division", "unit"], "OrganizationFields"),
    (&["date", "time"], "DateTimeFields"),
];

const FALLBACK_PREFIX: &str = "ControlGroup_";
const FALLBACK_KEY_CHARS: usize = 8;

pub fn suggest_name(group_key: &str, controls: &[ControlSignature]) -> String {
    let labels: Vec<&str> = controls
        .iter()
        .map(|control| control.label.trim())
        .filter(|label| !label.is_empty())
        .collect();

    let (first, last) = match (labels.first(), labels.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            let prefix: String = group_key.chars().take(FALLBACK_KEY_CHARS).collect();
            return format!("{}{}", FALLBACK_PREFIX, prefix);
        }
    };

    let joined = labels.join(" ").to_lowercase();
    for (keywords, name) in KEYWORD_SETS {
        let hits = keywords.iter().filter(|k| joined.contains(*k)).count();
        if hits * 2 >= keywords.len() {
            return name.to_string();
        }
    }

    if labels.len() == 1 {
        format!("{}Group", strip_whitespace(first))
    } else {
        format!("{}To{}", strip_whitespace(first), strip_whitespace(last))
    }
}

fn strip_whitespace(label: &str) -> String {
    label.chars().filter(|ch| !ch.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(labels: &[&str]) -> Vec<ControlSignature> {
        labels
            .iter()
            .enumerate()
            .map(|(position, label)| ControlSignature {
                label: label.to_string(),
                control_type: "TextField".to_string(),
                name: format!("c{}", position),
                relative_position: position,
                normalized_label: label.to_uppercase(),
                section: "Main".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_unlabelled_group_uses_key_prefix() {
        assert_eq!(
            suggest_name("TextField_A|TextField_B", &controls(&["", "  "])),
            "ControlGroup_TextFiel"
        );
    }

    #[test]
    fn test_keyword_sets() {
        assert_eq!(
            suggest_name("k", &controls(&["First Name", "Last Name"])),
            "NameFields"
        );
        assert_eq!(
            suggest_name("k", &controls(&["Street Address", "City"])),
            "AddressFields"
        );
        assert_eq!(suggest_name("k", &controls(&["Work Phone", "Fax"])), "ContactFields");
        assert_eq!(
            suggest_name("k", &controls(&["Start Date", "Reason"])),
            "DateTimeFields"
        );
    }

    #[test]
    fn test_priority_order() {
        // Matches both Name and DateTime sets; Name comes first
        assert_eq!(
            suggest_name("k", &controls(&["First Name", "Date"])),
            "NameFields"
        );
        // One of three name keywords is not enough
        assert_eq!(
            suggest_name("k", &controls(&["Name", "Date"])),
            "DateTimeFields"
        );
    }

    #[test]
    fn test_first_to_last_fallback() {
        assert_eq!(
            suggest_name("k", &controls(&["Cost Center", "Approver", "Budget Code"])),
            "CostCenterToBudgetCode"
        );
        assert_eq!(
            suggest_name("k", &controls(&["Cost Center", ""])),
            "CostCenterGroup"
        );
    }
}
