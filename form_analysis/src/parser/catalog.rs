//! Function catalog for the default parser
//!
//! Covers XPath 1.0 core functions plus the extension functions legacy form
//! designers emit (`xdDate:`, `xdMath:`, `xdUser:` and friends). Lookup is
//! case-insensitive and ignores the namespace prefix and a leading `get-`,
//! so `xdUser:get-UserName` resolves to `username`.

use super::types::{FunctionCategory, FunctionInfo, ReturnType};

macro_rules! entry {
    ($name:literal, $ret:ident, $cat:ident) => {
        FunctionInfo {
            name: $name,
            return_type: ReturnType::$ret,
            category: FunctionCategory::$cat,
        }
    };
}

static CATALOG: &[FunctionInfo] = &[
    // String
    entry!("concat", String, String),
    entry!("substring", String, String),
    entry!("substring-before", String, String),
    entry!("substring-after", String, String),
    entry!("normalize-space", String, String),
    entry!("translate", String, String),
    entry!("string", String, String),
    entry!("string-length", Number, String),
    // Boolean
    entry!("not", Boolean, Boolean),
    entry!("true", Boolean, Boolean),
    entry!("false", Boolean, Boolean),
    entry!("boolean", Boolean, Boolean),
    entry!("contains", Boolean, Boolean),
    entry!("starts-with", Boolean, Boolean),
    entry!("isnull", Boolean, Boolean),
    // Numeric
    entry!("number", Number, Numeric),
    entry!("floor", Number, Numeric),
    entry!("ceiling", Number, Numeric),
    entry!("round", Number, Numeric),
    entry!("nz", Number, Numeric),
    entry!("eval", String, Numeric),
    // Aggregate
    entry!("count", Number, Aggregate),
    entry!("sum", Number, Aggregate),
    entry!("avg", Number, Aggregate),
    entry!("max", Number, Aggregate),
    entry!("min", Number, Aggregate),
    // Date
    entry!("today", Date, Date),
    entry!("now", Date, Date),
    entry!("adddays", Date, Date),
    entry!("addseconds", Date, Date),
    // Identity
    entry!("user", String, Identity),
    entry!("username", String, Identity),
    entry!("useremail", String, Identity),
    entry!("role", String, Identity),
    // Conditional
    entry!("if", String, Conditional),
    entry!("choose", String, Conditional),
    // Node
    entry!("position", Number, Node),
    entry!("last", Number, Node),
    entry!("name", String, Node),
    entry!("local-name", String, Node),
    entry!("current", String, Node),
];

/// Lowercase lookup key: namespace prefix and leading `get-` removed
pub fn normalize_function_name(name: &str) -> String {
    let local = match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    };
    let lowered = local.trim().to_lowercase();
    match lowered.strip_prefix("get-") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => lowered,
    }
}

/// Find the catalog entry for a function name as written
pub fn lookup(name: &str) -> Option<&'static FunctionInfo> {
    let key = normalize_function_name(name);
    CATALOG.iter().find(|entry| entry.name == key)
}

/// Whether a normalized name is a current-user lookup
pub fn is_identity_function(name: &str) -> bool {
    lookup(name)
        .map(|entry| entry.category == FunctionCategory::Identity)
        .unwrap_or(false)
}

pub fn entries() -> &'static [FunctionInfo] {
    CATALOG
}
