//! Default parser for XPath-flavoured form expressions

use super::catalog;
use super::tokenizer::{tokenize, Token, TokenKind};
use super::types::{
    ExpressionType, FunctionCall, FunctionCategory, HintKind, ParsedExpression, TranslationHint,
};
use super::ExpressionParser;
use crate::config::compile_time::expression::MAX_DECOMPOSITION_DEPTH;
use crate::utils::Span;

/// Token-level parser with a built-in function catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct XPathParser;

impl XPathParser {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionParser for XPathParser {
    fn parse(&self, expression: &str) -> ParsedExpression {
        let tokens = tokenize(expression);
        if tokens.is_empty() {
            return ParsedExpression::empty();
        }

        let mut scan = Scanner::new(expression, &tokens);
        scan.scan_range(0, tokens.len(), 0);
        scan.finish()
    }

    fn simplify(&self, expression: &str) -> String {
        let tokens = tokenize(expression);
        let mut scan = Scanner::new(expression, &tokens);
        scan.scan_range(0, tokens.len(), 0);

        let mut renames = scan.renames;
        renames.sort_by_key(|(span, _)| span.start);
        let mut renames = renames.into_iter().peekable();

        let mut output = String::with_capacity(expression.len());
        let mut previous_end: Option<usize> = None;
        for token in &tokens {
            if let Some(end) = previous_end {
                if token.span.start > end {
                    output.push(' ');
                }
            }
            match renames.peek() {
                Some((span, replacement)) if *span == token.span => {
                    output.push_str(replacement);
                    renames.next();
                }
                _ => output.push_str(token.span.slice(expression).unwrap_or_default()),
            }
            previous_end = Some(token.span.end);
        }

        output
    }
}

// ============================================================================
// TOKEN SCANNER
// ============================================================================

struct Scanner<'a> {
    source: &'a str,
    tokens: &'a [Token],
    fields: Vec<(usize, String)>,
    calls: Vec<FunctionCall>,
    hints: Vec<TranslationHint>,
    renames: Vec<(Span, String)>,
    has_logical: bool,
    has_comparison: bool,
    has_arithmetic: bool,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            fields: Vec::new(),
            calls: Vec::new(),
            hints: Vec::new(),
            renames: Vec::new(),
            has_logical: false,
            has_comparison: false,
            has_arithmetic: false,
        }
    }

    fn kind(&self, index: usize) -> Option<&TokenKind> {
        self.tokens.get(index).map(|t| &t.kind)
    }

    fn is_call_at(&self, index: usize) -> bool {
        matches!(self.kind(index), Some(TokenKind::Name(_)))
            && matches!(self.kind(index + 1), Some(TokenKind::LParen))
    }

    /// A path step may start here (name not followed by `(`, `@`, `*`, `.`, `..`)
    fn is_step_start(&self, index: usize) -> bool {
        match self.kind(index) {
            Some(TokenKind::Name(_)) => !self.is_call_at(index),
            Some(TokenKind::At | TokenKind::Star | TokenKind::Dot | TokenKind::DotDot) => true,
            _ => false,
        }
    }

    fn push_hint(&mut self, kind: HintKind, text: String) {
        if !self.hints.iter().any(|h| h.kind == kind && h.text == text) {
            self.hints.push(TranslationHint::new(kind, text));
        }
    }

    fn scan_range(&mut self, start: usize, end: usize, depth: usize) {
        let tokens = self.tokens;
        let top_level = depth == 0;
        let mut index = start;
        let mut prev_is_operand = false;

        while index < end {
            let token = &tokens[index];
            match &token.kind {
                TokenKind::Name(name) if prev_is_operand && is_operator_keyword(name) => {
                    if top_level {
                        match name.as_str() {
                            "and" | "or" => self.has_logical = true,
                            _ => self.has_arithmetic = true,
                        }
                    }
                    prev_is_operand = false;
                    index += 1;
                }

                TokenKind::Name(name) if self.is_call_at(index) => {
                    self.record_call(name, token.span);
                    prev_is_operand = false;
                    index += 1;
                }

                TokenKind::Star if prev_is_operand => {
                    self.has_arithmetic |= top_level;
                    prev_is_operand = false;
                    index += 1;
                }

                TokenKind::Name(_)
                | TokenKind::Star
                | TokenKind::At
                | TokenKind::Dot
                | TokenKind::DotDot
                | TokenKind::Slash
                | TokenKind::DoubleSlash => {
                    index = self.scan_path(index, end, depth);
                    prev_is_operand = true;
                }

                TokenKind::Dollar => {
                    // Variable reference: `$name`
                    index += 1;
                    if matches!(self.kind(index), Some(TokenKind::Name(_))) && index < end {
                        index += 1;
                    }
                    prev_is_operand = true;
                }

                TokenKind::Str(_) | TokenKind::Number(_) => {
                    prev_is_operand = true;
                    index += 1;
                }

                TokenKind::Plus | TokenKind::Minus => {
                    if prev_is_operand && top_level {
                        self.has_arithmetic = true;
                    }
                    prev_is_operand = false;
                    index += 1;
                }

                TokenKind::RParen | TokenKind::RBracket => {
                    prev_is_operand = true;
                    index += 1;
                }

                _ => {
                    if token.is_comparison() && top_level {
                        self.has_comparison = true;
                    }
                    prev_is_operand = false;
                    index += 1;
                }
            }
        }
    }

    fn record_call(&mut self, name: &str, span: Span) {
        let entry = catalog::lookup(name);
        let call = FunctionCall {
            name: name.to_string(),
            is_known: entry.is_some(),
            entry,
            span,
        };

        match entry {
            None => self.push_hint(
                HintKind::UnknownFunction,
                format!(
                    "Function '{}' is not in the function catalog; translate it manually",
                    name
                ),
            ),
            Some(info) => {
                if info.name != name {
                    self.renames.push((span, info.name.to_string()));
                }
                match info.category {
                    FunctionCategory::Identity => self.push_hint(
                        HintKind::IdentityLookup,
                        format!(
                            "'{}' reads the signed-in user; map it to the target platform's user context",
                            name
                        ),
                    ),
                    FunctionCategory::Date => self.push_hint(
                        HintKind::DateFunction,
                        format!(
                            "'{}' depends on the evaluation clock; use the target platform's date functions",
                            name
                        ),
                    ),
                    _ => {}
                }
            }
        }

        self.calls.push(call);
    }

    /// Consume a location path starting at `start`; returns the index after it
    fn scan_path(&mut self, start: usize, end: usize, depth: usize) -> usize {
        let tokens = self.tokens;
        let mut index = start;
        let mut has_name_step = false;
        let mut has_parent = false;
        let mut has_predicate = false;
        let mut last_end = tokens[start].span.end;

        loop {
            // Optional separator
            if matches!(
                self.kind(index),
                Some(TokenKind::Slash | TokenKind::DoubleSlash)
            ) && index < end
            {
                last_end = tokens[index].span.end;
                index += 1;
                if index >= end || !self.is_step_start(index) {
                    break;
                }
            }

            if index >= end || !self.is_step_start(index) {
                break;
            }

            // Step
            if matches!(self.kind(index), Some(TokenKind::At)) {
                last_end = tokens[index].span.end;
                index += 1;
            }
            match tokens.get(index).filter(|_| index < end) {
                Some(Token {
                    kind: TokenKind::Name(name),
                    span,
                }) if !self.is_call_at(index) => {
                    has_name_step = true;
                    if let Some(colon) = name.find(':') {
                        self.renames.push((*span, name[colon + 1..].to_string()));
                    }
                    last_end = span.end;
                    index += 1;
                }
                Some(Token {
                    kind: TokenKind::Star | TokenKind::Dot,
                    span,
                }) => {
                    last_end = span.end;
                    index += 1;
                }
                Some(Token {
                    kind: TokenKind::DotDot,
                    span,
                }) => {
                    has_parent = true;
                    last_end = span.end;
                    index += 1;
                }
                _ => break,
            }

            // Predicates
            while matches!(self.kind(index), Some(TokenKind::LBracket)) && index < end {
                let close = self.matching_bracket(index, end);
                has_predicate = true;
                if depth < MAX_DECOMPOSITION_DEPTH {
                    self.scan_range(index + 1, close, depth + 1);
                }
                last_end = match tokens.get(close).filter(|_| close < end) {
                    Some(token) => token.span.end,
                    None => tokens[close.min(end) - 1].span.end,
                };
                index = (close + 1).min(end);
            }

            let continues = matches!(
                self.kind(index),
                Some(TokenKind::Slash | TokenKind::DoubleSlash)
            ) && index + 1 < end
                && self.is_step_start(index + 1);
            if !continues {
                break;
            }
        }

        // A lone separator consumed nothing; step past it
        if index == start {
            return start + 1;
        }

        if has_name_step {
            let span = Span::new(tokens[start].span.start, last_end);
            let text = span.slice(self.source).unwrap_or_default().to_string();

            if has_parent {
                self.push_hint(
                    HintKind::ParentPath,
                    format!(
                        "'{}' navigates to a parent group; rewrite it relative to the target data source",
                        text
                    ),
                );
            }
            if has_predicate {
                self.push_hint(
                    HintKind::Predicate,
                    format!(
                        "'{}' filters with a predicate; express the filter as a lookup or query",
                        text
                    ),
                );
            }

            self.fields.push((span.start, text));
        }

        index
    }

    /// Index of the `]` closing the `[` at `open`, or `end` if unbalanced
    fn matching_bracket(&self, open: usize, end: usize) -> usize {
        let mut depth = 0usize;
        for index in open..end {
            match self.tokens[index].kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return index;
                    }
                }
                _ => {}
            }
        }
        end
    }

    fn finish(mut self) -> ParsedExpression {
        self.fields.sort_by_key(|(start, _)| *start);
        let mut field_references: Vec<String> = Vec::with_capacity(self.fields.len());
        for (_, field) in self.fields {
            if !field_references.contains(&field) {
                field_references.push(field);
            }
        }

        let category_of = |call: &FunctionCall| call.category();
        let expression_type = if self
            .calls
            .iter()
            .any(|c| category_of(c) == Some(FunctionCategory::Conditional))
        {
            ExpressionType::Conditional
        } else if self.has_logical
            || self
                .calls
                .iter()
                .any(|c| c.entry.map(|e| e.name == "not").unwrap_or(false))
        {
            ExpressionType::Logical
        } else if self.has_comparison {
            ExpressionType::Comparison
        } else if self.has_arithmetic {
            ExpressionType::Arithmetic
        } else if !self.calls.is_empty() {
            ExpressionType::FunctionCall
        } else if !field_references.is_empty() {
            ExpressionType::FieldReference
        } else {
            ExpressionType::Literal
        };

        ParsedExpression {
            expression_type,
            field_references,
            function_calls: self.calls,
            hints: self.hints,
        }
    }
}

fn is_operator_keyword(name: &str) -> bool {
    matches!(name, "and" | "or" | "div" | "mod")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::ReturnType;

    fn parse(expression: &str) -> ParsedExpression {
        XPathParser::new().parse(expression)
    }

    #[test]
    fn test_field_references_in_source_order() {
        let parsed = parse(r#"my:Field1 = "A" and my:Field2 = "B" or my:Field1 = "C""#);
        assert_eq!(parsed.field_references, vec!["my:Field1", "my:Field2"]);
        assert!(parsed.function_calls.is_empty());
        assert_eq!(parsed.expression_type, ExpressionType::Logical);
    }

    #[test]
    fn test_function_calls_and_catalog() {
        let parsed = parse("string-length(my:Name) > 0");
        assert_eq!(parsed.field_references, vec!["my:Name"]);
        assert_eq!(parsed.function_calls.len(), 1);
        let call = &parsed.function_calls[0];
        assert_eq!(call.name, "string-length");
        assert!(call.is_known);
        assert_eq!(call.return_type(), Some(ReturnType::Number));
        assert_eq!(parsed.expression_type, ExpressionType::Comparison);
    }

    #[test]
    fn test_paths_with_parents_and_predicates() {
        let parsed = parse("count(../my:Items/my:Item[my:Qty > 0])");
        assert_eq!(
            parsed.field_references,
            vec!["../my:Items/my:Item[my:Qty > 0]", "my:Qty"]
        );
        let kinds: Vec<HintKind> = parsed.hints.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![HintKind::ParentPath, HintKind::Predicate]);
        assert_eq!(parsed.expression_type, ExpressionType::FunctionCall);
    }

    #[test]
    fn test_unknown_and_identity_hints() {
        let parsed = parse("xdUser:get-UserName() = my:Owner and frob(my:X)");
        assert_eq!(parsed.function_calls.len(), 2);
        assert!(parsed.function_calls[0].is_known);
        assert!(!parsed.function_calls[1].is_known);
        let kinds: Vec<HintKind> = parsed.hints.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![HintKind::IdentityLookup, HintKind::UnknownFunction]);
    }

    #[test]
    fn test_classification() {
        assert_eq!(parse("").expression_type, ExpressionType::Empty);
        assert_eq!(parse("  ").expression_type, ExpressionType::Empty);
        assert_eq!(parse("\"text\"").expression_type, ExpressionType::Literal);
        assert_eq!(parse("42").expression_type, ExpressionType::Literal);
        assert_eq!(parse("my:Total").expression_type, ExpressionType::FieldReference);
        assert_eq!(parse("my:A + my:B").expression_type, ExpressionType::Arithmetic);
        assert_eq!(parse("my:A * 2").expression_type, ExpressionType::Arithmetic);
        assert_eq!(parse("my:A div 2").expression_type, ExpressionType::Arithmetic);
        assert_eq!(parse("not(my:Flag)").expression_type, ExpressionType::Logical);
        assert_eq!(
            parse("if(my:A > 1, \"x\", \"y\")").expression_type,
            ExpressionType::Conditional
        );
    }

    #[test]
    fn test_wildcard_and_attribute_steps() {
        let parsed = parse("count(my:Rows/*) + @my:Id");
        assert_eq!(parsed.field_references, vec!["my:Rows/*", "@my:Id"]);
    }

    #[test]
    fn test_context_node_is_not_a_field() {
        let parsed = parse(". != \"\"");
        assert!(parsed.field_references.is_empty());
        assert_eq!(parsed.expression_type, ExpressionType::Comparison);
    }

    #[test]
    fn test_simplify() {
        let parser = XPathParser::new();
        assert_eq!(
            parser.simplify("xdDate:Today()  >   my:Group/my:Start"),
            "today() > Group/Start"
        );
        assert_eq!(
            parser.simplify(r#"concat(my:First,  "  ", my:Last)"#),
            r#"concat(First, "  ", Last)"#
        );
        assert_eq!(parser.simplify("   "), "");
    }
}
