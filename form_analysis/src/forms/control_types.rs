//! Control type tags with special meaning to the miner
//!
//! The type domain is open; any other tag is treated as an ordinary input.

pub const SECTION: &str = "Section";
pub const REPEATING_SECTION: &str = "RepeatingSection";
pub const REPEATING_TABLE: &str = "RepeatingTable";
pub const LABEL: &str = "Label";
pub const TEXT_FIELD: &str = "TextField";
pub const DATE_PICKER: &str = "DatePicker";

/// Section value marking a repeating region
pub const REPEATING_SECTION_TYPE: &str = "repeating";

/// Container and display-only types never mined
pub const EXCLUDED_FROM_MINING: [&str; 4] = [SECTION, REPEATING_SECTION, REPEATING_TABLE, LABEL];

pub fn is_excluded_from_mining(control_type: &str) -> bool {
    EXCLUDED_FROM_MINING.contains(&control_type)
}
