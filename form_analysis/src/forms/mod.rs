//! Form model: forms contain views, views contain controls
//!
//! Plain data handed in by whatever loads the legacy definitions. Field
//! names deserialize from either camelCase or snake_case.

pub mod control_types;
pub mod model;

pub use model::{FormControl, FormDefinition, FormView};
