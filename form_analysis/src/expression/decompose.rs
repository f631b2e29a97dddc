//! Sub-expression decomposition
//!
//! A complex expression is broken into candidate sub-expressions, each
//! analysed in turn and decomposed again if it is itself complex. The tree is
//! built breadth-first from an explicit worklist so adversarial input is
//! bounded by a depth cut-off rather than by the call stack.

use super::types::EnhancedExpression;
use crate::config::compile_time::expression::{
    MAX_DECOMPOSITION_INPUT_LENGTH, MAX_SUB_EXPRESSIONS_PER_NODE,
};
use crate::log_warning;
use crate::logging::codes;
use std::collections::VecDeque;

/// Candidate sub-expression texts of `whole`, in order: innermost
/// parenthesised spans, then the `and`/`or` split parts
pub fn candidates(whole: &str) -> Vec<String> {
    let mut found = innermost_parenthesized(whole);
    found.extend(connective_parts(whole));
    found
}

/// Contents of every parenthesised span containing no further parentheses,
/// trimmed. Unbalanced parentheses are ignored.
pub fn innermost_parenthesized(whole: &str) -> Vec<String> {
    let mut found = Vec::new();
    // (byte offset after '(', encloses another pair)
    let mut open: Vec<(usize, bool)> = Vec::new();

    for (index, ch) in whole.char_indices() {
        match ch {
            '(' => {
                if let Some(parent) = open.last_mut() {
                    parent.1 = true;
                }
                open.push((index + 1, false));
            }
            ')' => {
                if let Some((start, has_child)) = open.pop() {
                    let inner = whole[start..index].trim();
                    if !has_child && !inner.is_empty() && inner != whole {
                        found.push(inner.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    found
}

/// Split on ` and `, then each part on ` or `; trimmed, deduplicated, with
/// empty parts and the whole expression dropped
pub fn connective_parts(whole: &str) -> Vec<String> {
    if !whole.contains(" and ") && !whole.contains(" or ") {
        return Vec::new();
    }

    let mut parts: Vec<String> = Vec::new();
    for conjunct in whole.split(" and ") {
        for part in conjunct.split(" or ") {
            let part = part.trim();
            if part.is_empty() || part == whole || parts.iter().any(|p| p == part) {
                continue;
            }
            parts.push(part.to_string());
        }
    }
    parts
}

/// Expand `root` into its decomposition tree. `analyze` produces an
/// undecomposed node for a candidate text. Nodes at `max_depth` keep an
/// empty `sub_expressions`. Returns `None` only if the root was lost,
/// which assembly never does.
pub fn expand<F>(
    root: EnhancedExpression,
    max_depth: usize,
    analyze: F,
) -> Option<EnhancedExpression>
where
    F: Fn(&str) -> Option<EnhancedExpression>,
{
    let mut nodes: Vec<Option<EnhancedExpression>> = vec![Some(root)];
    let mut children: Vec<Vec<usize>> = vec![Vec::new()];
    let mut worklist: VecDeque<(usize, usize)> = VecDeque::from([(0, 0)]);

    while let Some((index, depth)) = worklist.pop_front() {
        let Some(node) = nodes[index].as_ref() else {
            continue;
        };
        if !node.is_complex {
            continue;
        }

        let text = node.parsed_expression.clone();
        if depth >= max_depth {
            log_warning!(code = codes::expression::DECOMPOSITION_DEPTH_EXCEEDED,
                "Decomposition depth limit reached; sub-expressions not expanded",
                "depth" => depth,
                "expression" => text
            );
            continue;
        }
        if text.len() > MAX_DECOMPOSITION_INPUT_LENGTH {
            log_warning!(code = codes::expression::DECOMPOSITION_INPUT_TOO_LONG,
                "Expression too long to decompose",
                "length" => text.len(),
                "limit" => MAX_DECOMPOSITION_INPUT_LENGTH
            );
            continue;
        }

        let mut texts = candidates(&text);
        if texts.len() > MAX_SUB_EXPRESSIONS_PER_NODE {
            log_warning!(code = codes::expression::SUB_EXPRESSION_LIMIT,
                "Too many sub-expression candidates; extra candidates dropped",
                "candidates" => texts.len(),
                "limit" => MAX_SUB_EXPRESSIONS_PER_NODE
            );
            texts.truncate(MAX_SUB_EXPRESSIONS_PER_NODE);
        }

        for candidate in texts {
            if let Some(child) = analyze(&candidate) {
                let child_index = nodes.len();
                nodes.push(Some(child));
                children.push(Vec::new());
                children[index].push(child_index);
                worklist.push_back((child_index, depth + 1));
            }
        }
    }

    // Children always sit after their parent, so assembling back to front
    // attaches finished subtrees.
    for index in (0..nodes.len()).rev() {
        let subs: Vec<EnhancedExpression> = children[index]
            .iter()
            .filter_map(|&child| nodes[child].take())
            .collect();
        if let Some(node) = nodes[index].as_mut() {
            node.sub_expressions = subs;
        }
    }

    nodes.into_iter().next().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ExpressionAnalyzer;

    #[test]
    fn test_innermost_spans() {
        assert_eq!(
            innermost_parenthesized("f(g(a), h(b)) and (c)"),
            vec!["a", "b", "c"]
        );
        assert!(innermost_parenthesized("today()").is_empty());
        assert!(innermost_parenthesized("(a").is_empty());
        assert_eq!(innermost_parenthesized("a) (b"), Vec::<String>::new());
    }

    #[test]
    fn test_whole_expression_excluded() {
        assert!(innermost_parenthesized("(a)").contains(&"a".to_string()));
        assert!(connective_parts("a").is_empty());
    }

    #[test]
    fn test_connective_parts() {
        assert_eq!(
            connective_parts("a = 1 and b = 2 or c = 3 and a = 1"),
            vec!["a = 1", "b = 2", "c = 3"]
        );
        assert!(connective_parts("a = 1").is_empty());
    }

    #[test]
    fn test_candidates_order() {
        assert_eq!(
            candidates("string-length(my:Name) > 0 and my:Age > 17"),
            vec!["my:Name", "string-length(my:Name) > 0", "my:Age > 17"]
        );
    }

    #[test]
    fn test_depth_cut_off_leaves_children_empty() {
        let analyzer = ExpressionAnalyzer::new();
        let root = analyzer
            .analyze_node(r#"my:A = "x" and my:B = "y""#)
            .unwrap();
        assert!(root.is_complex);

        let cut = expand(root.clone(), 0, |text| analyzer.analyze_node(text)).unwrap();
        assert!(cut.sub_expressions.is_empty());

        let full = expand(root, 4, |text| analyzer.analyze_node(text)).unwrap();
        assert_eq!(full.sub_expressions.len(), 2);
        assert_eq!(full.sub_expressions[0].parsed_expression, r#"my:A = "x""#);
    }
}
