use std::collections::HashSet;

use tracing::debug;

use crate::model::{Dataset, Subgraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub index_a: usize,
    pub index_b: usize,
    pub equal: usize,
}

/// Two subgraphs drawn side by side in one row band. `b` is `None` for the
/// leftover subgraph of an odd-sized dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubgraphGroup {
    pub a: usize,
    pub b: Option<usize>,
}

/// Grouping and attribute partition decided before any coordinate is assigned.
/// All values are indices: subgraphs into [`Dataset::subgraphs`], attributes
/// into [`Dataset::attributes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub groups: Vec<SubgraphGroup>,
    /// Subgraphs in placement order; even positions go left, odd right.
    pub frequencies: Vec<usize>,
    /// Attributes owned by a single subgraph, aligned with `frequencies`.
    pub single_linked: Vec<Vec<usize>>,
    /// Attributes shared between subgraphs, drawn in the center column.
    pub multi_linked: Vec<usize>,
}

pub fn plan_layout(dataset: &Dataset) -> LayoutPlan {
    let comparisons = compare_all_subgraphs(dataset);
    let (groups, frequencies) = group_subgraphs(dataset, &comparisons);
    let (single_linked, multi_linked) = partition_attributes(dataset, &groups);
    debug!(
        groups = groups.len(),
        shared = multi_linked.len(),
        "planned hypergraph layout"
    );
    LayoutPlan {
        groups,
        frequencies,
        single_linked,
        multi_linked,
    }
}

/// Counts attributes of `a` that also occur in `b`. Attribute indices are
/// shared per id after normalization, so index equality is id equality.
pub fn count_equal_attributes(a: &Subgraph, b: &Subgraph) -> usize {
    let mut equal = 0;
    for attr in &a.attributes {
        for other in &b.attributes {
            if other == attr {
                equal += 1;
                break;
            }
        }
    }
    equal
}

/// Scores every pair `i < j` and orders them by descending similarity.
/// `sort_by` is stable, so ties keep generation order.
pub fn compare_all_subgraphs(dataset: &Dataset) -> Vec<Comparison> {
    let subgraphs = &dataset.subgraphs;
    let mut comparisons = Vec::new();
    for i in 0..subgraphs.len().saturating_sub(1) {
        for j in (i + 1)..subgraphs.len() {
            comparisons.push(Comparison {
                index_a: i,
                index_b: j,
                equal: count_equal_attributes(&subgraphs[i], &subgraphs[j]),
            });
        }
    }
    comparisons.sort_by(|a, b| b.equal.cmp(&a.equal));
    comparisons
}

/// Greedily pairs the best-scoring unused subgraphs. Pairs with zero shared
/// attributes are accepted once nothing better remains.
pub fn group_subgraphs(
    dataset: &Dataset,
    comparisons: &[Comparison],
) -> (Vec<SubgraphGroup>, Vec<usize>) {
    let subgraphs = &dataset.subgraphs;
    let mut used: HashSet<usize> = HashSet::new();
    let mut groups = Vec::new();
    let mut frequencies = Vec::with_capacity(subgraphs.len());

    for comparison in comparisons {
        let (a, b) = (comparison.index_a, comparison.index_b);
        if used.contains(&a) || used.contains(&b) {
            continue;
        }
        used.insert(a);
        used.insert(b);
        groups.push(SubgraphGroup { a, b: Some(b) });
        frequencies.push(a);
        frequencies.push(b);
    }

    if subgraphs.len() % 2 != 0 {
        for idx in 0..subgraphs.len() {
            if !used.contains(&idx) {
                groups.push(SubgraphGroup { a: idx, b: None });
                frequencies.push(idx);
            }
        }
    }

    (groups, frequencies)
}

/// Splits each grouped subgraph's attributes into its own single-linked list
/// and the global shared pool. Within a group the shared attributes are ordered
/// by ascending link count before they join the pool.
pub fn partition_attributes(
    dataset: &Dataset,
    groups: &[SubgraphGroup],
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut single_linked = Vec::new();
    let mut multi_linked = Vec::new();
    let mut in_pool: HashSet<usize> = HashSet::new();

    for group in groups {
        let mut group_multi: Vec<usize> = Vec::new();
        for subgraph in std::iter::once(group.a).chain(group.b) {
            let mut single = Vec::new();
            for &attr in &dataset.subgraphs[subgraph].attributes {
                if dataset.attributes[attr].number_of_links == 1 {
                    single.push(attr);
                } else if !group_multi.contains(&attr) {
                    group_multi.push(attr);
                }
            }
            single_linked.push(single);
        }

        group_multi.sort_by_key(|&attr| dataset.attributes[attr].number_of_links);
        for attr in group_multi {
            if in_pool.insert(attr) {
                multi_linked.push(attr);
            }
        }
    }

    (single_linked, multi_linked)
}
