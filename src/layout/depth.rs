use tracing::trace;

use super::arena::NodeArena;

/// Which rule fixed a node's depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthRule {
    /// Same parent list as an already placed node: siblings share a level.
    Sibling,
    /// One below the deepest parent.
    BelowParents,
    /// One below everything placed so far, so an unrelated sibling group
    /// is never joined by accident.
    Fallback,
}

/// Assigns every node its hierarchy level, in arena order.
///
/// Nodes with no parents sit at depth 0. Later nodes reuse the depth of the
/// most recently placed node with an identical parent list; failing that,
/// they go one below their deepest parent unless one of those parents
/// already has a placed child, in which case they go one below the deepest
/// level used so far.
pub fn balance_depth(arena: &mut NodeArena) {
    let mut deepest: Option<usize> = None;
    for idx in 0..arena.len() {
        let (depth, rule) = depth_for(arena, idx, deepest);
        trace!(id = arena.nodes[idx].id, depth, ?rule, "depth assigned");
        arena.nodes[idx].depth = depth;
        deepest = Some(deepest.map_or(depth, |d| d.max(depth)));
    }
}

fn depth_for(arena: &NodeArena, idx: usize, deepest: Option<usize>) -> (usize, DepthRule) {
    let node = &arena.nodes[idx];

    if let Some(sibling) = (0..idx)
        .rev()
        .find(|&placed| arena.nodes[placed].above == node.above)
    {
        return (arena.nodes[sibling].depth, DepthRule::Sibling);
    }

    // Indices below `idx` are exactly the nodes placed so far.
    let parent_has_placed_child = node
        .above
        .iter()
        .any(|&parent| arena.nodes[parent].below.iter().any(|&child| child < idx));

    if !parent_has_placed_child {
        let depth = node
            .above
            .iter()
            .map(|&parent| arena.nodes[parent].depth + 1)
            .max()
            .unwrap_or(0);
        return (depth, DepthRule::BelowParents);
    }

    (deepest.map_or(0, |d| d + 1), DepthRule::Fallback)
}
