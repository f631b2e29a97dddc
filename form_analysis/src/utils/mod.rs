//! Shared primitive types used by the parser and the logging system

pub mod span;

pub use span::Span;
