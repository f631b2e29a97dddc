//! Facts the parser hands to the expression analyzer

use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// Syntactic classification of a whole expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpressionType {
    Empty,
    Literal,
    FieldReference,
    FunctionCall,
    Comparison,
    Arithmetic,
    Logical,
    Conditional,
}

impl ExpressionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionType::Empty => "Empty",
            ExpressionType::Literal => "Literal",
            ExpressionType::FieldReference => "FieldReference",
            ExpressionType::FunctionCall => "FunctionCall",
            ExpressionType::Comparison => "Comparison",
            ExpressionType::Arithmetic => "Arithmetic",
            ExpressionType::Logical => "Logical",
            ExpressionType::Conditional => "Conditional",
        }
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type an expression or function produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    Boolean,
    Number,
    Date,
    String,
}

impl ReturnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnType::Boolean => "boolean",
            ReturnType::Number => "number",
            ReturnType::Date => "date",
            ReturnType::String => "string",
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog grouping, used for hints and pattern checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FunctionCategory {
    String,
    Numeric,
    Aggregate,
    Boolean,
    Date,
    Identity,
    Conditional,
    Node,
}

/// Catalog entry for a known function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    /// Canonical spelling used by `simplify`
    pub name: &'static str,
    pub return_type: ReturnType,
    pub category: FunctionCategory,
}

/// A function invocation found in an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCall {
    /// Name as written, namespace prefix included
    pub name: String,
    pub is_known: bool,
    pub entry: Option<&'static FunctionInfo>,
    #[serde(skip)]
    pub span: Span,
}

impl FunctionCall {
    pub fn return_type(&self) -> Option<ReturnType> {
        self.entry.map(|entry| entry.return_type)
    }

    pub fn category(&self) -> Option<FunctionCategory> {
        self.entry.map(|entry| entry.category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HintKind {
    UnknownFunction,
    ParentPath,
    Predicate,
    IdentityLookup,
    DateFunction,
}

/// Migration advice attached to an expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationHint {
    pub kind: HintKind,
    pub text: String,
}

impl TranslationHint {
    pub fn new(kind: HintKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Parser output for one expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedExpression {
    pub expression_type: ExpressionType,
    /// Field paths in order of first appearance, without duplicates
    pub field_references: Vec<String>,
    /// Calls in source order, duplicates kept
    pub function_calls: Vec<FunctionCall>,
    pub hints: Vec<TranslationHint>,
}

impl ParsedExpression {
    pub fn empty() -> Self {
        Self {
            expression_type: ExpressionType::Empty,
            field_references: Vec::new(),
            function_calls: Vec::new(),
            hints: Vec::new(),
        }
    }
}
