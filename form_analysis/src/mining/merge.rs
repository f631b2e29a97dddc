//! Greedy near-duplicate merging

use super::candidates::CandidateGroup;
use super::similarity::group_similarity;

/// Descending occurrence order, ties broken by key
pub fn sort_by_occurrence(groups: &mut [CandidateGroup]) {
    groups.sort_by(|a, b| {
        b.occurrence_count()
            .cmp(&a.occurrence_count())
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Each unprocessed anchor absorbs the forms of every later unprocessed
/// group of the same size scoring at least `merge_threshold`. Absorbed
/// groups are dropped; anchors are returned in processing order.
pub fn merge_similar(
    mut groups: Vec<CandidateGroup>,
    merge_threshold: f64,
    label_threshold: f64,
) -> Vec<CandidateGroup> {
    sort_by_occurrence(&mut groups);

    let mut processed = vec![false; groups.len()];
    let mut absorbed = vec![false; groups.len()];
    for anchor in 0..groups.len() {
        if processed[anchor] {
            continue;
        }
        processed[anchor] = true;

        let matches: Vec<usize> = (anchor + 1..groups.len())
            .filter(|&other| {
                !processed[other]
                    && groups[other].signatures.len() == groups[anchor].signatures.len()
                    && group_similarity(
                        &groups[anchor].signatures,
                        &groups[other].signatures,
                        label_threshold,
                    ) >= merge_threshold
            })
            .collect();

        for other in matches {
            processed[other] = true;
            absorbed[other] = true;
            let forms = std::mem::take(&mut groups[other].forms);
            groups[anchor].forms.extend(forms);
        }
    }

    groups
        .into_iter()
        .zip(absorbed)
        .filter_map(|(group, absorbed)| (!absorbed).then_some(group))
        .collect()
}
