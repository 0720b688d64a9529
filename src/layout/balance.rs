use std::cmp::Ordering;

use super::arena::{NodeArena, WorkNode};
use super::types::LayoutNode;

/// Reorders `items` so that the largest keys cluster in the middle.
///
/// Items are sorted ascending (stable), then the even positions are emitted
/// in order followed by the odd positions reversed.
pub fn center_by<T: Copy>(items: &[T], key: impl Fn(&T) -> f64) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));

    let mut even = Vec::with_capacity(sorted.len().div_ceil(2));
    let mut odd = Vec::with_capacity(sorted.len() / 2);
    for (idx, item) in sorted.into_iter().enumerate() {
        if idx % 2 == 0 {
            even.push(item);
        } else {
            odd.push(item);
        }
    }
    even.extend(odd.into_iter().rev());
    even
}

/// Middle element of a centered parent list, left of center on ties.
pub fn find_ref(above: &[usize]) -> Option<usize> {
    if above.is_empty() {
        return None;
    }
    above.get((above.len() - 1) / 2).copied()
}

/// Whether `node` is the reference parent of a sibling group. Siblings share
/// one parent list, so checking the first one is enough.
pub fn is_ref(nodes: &[LayoutNode], node: usize, group: &[usize]) -> bool {
    group
        .first()
        .is_some_and(|&first| find_ref(&nodes[first].above) == Some(node))
}

/// Width from the child groups this node owns, never less than the width
/// the node already has.
pub fn width_of(nodes: &[LayoutNode], idx: usize) -> f64 {
    let owned: f64 = nodes[idx]
        .below
        .iter()
        .filter(|group| is_ref(nodes, idx, group))
        .flat_map(|group| group.iter().map(|&child| nodes[child].width))
        .sum();
    nodes[idx].width.max(owned)
}

/// Offset of a node within its sibling group under the reference parent.
pub fn position_of(nodes: &[LayoutNode], idx: usize) -> f64 {
    let Some(reference) = find_ref(&nodes[idx].above) else {
        return 0.0;
    };
    let Some(group) = nodes[reference]
        .below
        .iter()
        .find(|group| group.contains(&idx))
    else {
        return 0.0;
    };
    let slot = group.iter().position(|&member| member == idx).unwrap_or(0);
    slot as f64 - (group.len() as f64 - 1.0) / 2.0
}

fn bucket_by_depth(arena: &NodeArena, node: &WorkNode) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &child in &node.below {
        let rel = arena.nodes[child]
            .depth
            .saturating_sub(node.depth)
            .saturating_sub(1);
        if groups.len() <= rel {
            groups.resize_with(rel + 1, Vec::new);
        }
        groups[rel].push(child);
    }
    groups
}

/// Finalizes the arena: centers parent lists and child groups, then computes
/// widths bottom-up and positions top-down.
pub fn balance_width_and_position(arena: &NodeArena) -> Vec<LayoutNode> {
    let importance = |idx: &usize| {
        let node = &arena.nodes[*idx];
        node.depth as f64 * node.weight
    };

    let mut nodes: Vec<LayoutNode> = arena
        .nodes
        .iter()
        .map(|work| LayoutNode {
            id: work.id,
            above: center_by(&work.above, importance),
            below: bucket_by_depth(arena, work)
                .iter()
                .map(|group| center_by(group, importance))
                .collect(),
            depth: work.depth,
            weight: work.weight,
            width: 1.0,
            position: 0.0,
        })
        .collect();

    for idx in (0..nodes.len()).rev() {
        nodes[idx].width = width_of(&nodes, idx);
    }
    for idx in 0..nodes.len() {
        nodes[idx].position = position_of(&nodes, idx);
    }
    nodes
}
