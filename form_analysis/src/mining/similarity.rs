//! Label and group similarity for near-duplicate merging

use super::types::ControlSignature;

/// Levenshtein edit distance over chars (Wagner-Fischer, two rows)
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[s2_chars.len()]
}

/// `1 - distance / max_len` on case-folded text; two empty labels score 1.0
pub fn label_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(&a, &b) as f64 / max_len as f64
}

pub fn labels_similar(a: &str, b: &str, threshold: f64) -> bool {
    a.to_lowercase() == b.to_lowercase() || label_similarity(a, b) >= threshold
}

/// Per position: one point for matching type, one for similar labels;
/// normalized by twice the length. Groups of different sizes score 0.
pub fn group_similarity(
    a: &[ControlSignature],
    b: &[ControlSignature],
    label_threshold: f64,
) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let points: usize = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            usize::from(x.control_type == y.control_type)
                + usize::from(labels_similar(&x.label, &y.label, label_threshold))
        })
        .sum();

    points as f64 / (2 * a.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(control_type: &str, label: &str) -> ControlSignature {
        ControlSignature {
            label: label.to_string(),
            control_type: control_type.to_string(),
            name: label.to_lowercase(),
            relative_position: 0,
            normalized_label: label.to_uppercase(),
            section: "Main".to_string(),
        }
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("Address", "Addres"), 1);
        assert_eq!(levenshtein_distance("Email", "Phone"), 5);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_label_similarity_examples() {
        let near = label_similarity("Address", "Addres");
        assert!((near - 6.0 / 7.0).abs() < 1e-9);
        assert!(labels_similar("Address", "Addres", 0.7));

        assert_eq!(label_similarity("Email", "Phone"), 0.0);
        assert!(!labels_similar("Email", "Phone", 0.7));
    }

    #[test]
    fn test_case_insensitive_equality() {
        assert!(labels_similar("ZIP Code", "zip code", 1.0));
    }

    #[test]
    fn test_group_similarity() {
        let a = vec![signature("TextField", "City"), signature("TextField", "State")];
        let b = vec![signature("TextField", "city"), signature("DropDown", "State")];
        assert!((group_similarity(&a, &b, 0.7) - 0.75).abs() < 1e-9);
        assert_eq!(group_similarity(&a, &a[..1], 0.7), 0.0);
    }
}
