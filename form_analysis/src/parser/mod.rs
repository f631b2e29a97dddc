//! Function/field parser seam
//!
//! The expression analyzer only sees `ParsedExpression` facts, so a host can
//! swap in its own grammar by implementing `ExpressionParser`. `XPathParser`
//! is the default.

pub mod catalog;
pub mod tokenizer;
pub mod types;
pub mod xpath;

pub use types::{
    ExpressionType, FunctionCall, FunctionCategory, FunctionInfo, HintKind, ParsedExpression,
    ReturnType, TranslationHint,
};
pub use xpath::XPathParser;

/// Turns raw expression text into structured facts
pub trait ExpressionParser: Send + Sync {
    /// Classify and extract references. Never fails; unrecognised input
    /// yields fewer facts.
    fn parse(&self, expression: &str) -> ParsedExpression;

    /// Syntactically simplified rendering of the expression
    fn simplify(&self, expression: &str) -> String;
}

impl<P: ExpressionParser + ?Sized> ExpressionParser for &P {
    fn parse(&self, expression: &str) -> ParsedExpression {
        (**self).parse(expression)
    }

    fn simplify(&self, expression: &str) -> String {
        (**self).simplify(expression)
    }
}
