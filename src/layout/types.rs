use std::collections::HashMap;

use crate::ir::NodeId;

/// Finalized node of a balanced tree layout.
///
/// `above` holds the parents and `below` the children grouped by relative
/// depth (`below[0]` is the level directly underneath). Both are arena
/// indices into [`TreeLayout::nodes`], reordered so that the heaviest and
/// deepest nodes sit in the middle of each list.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub above: Vec<usize>,
    pub below: Vec<Vec<usize>>,
    /// Level counted from the top, roots are 0.
    pub depth: usize,
    /// Own weight 1 plus the shared weight of every child.
    pub weight: f64,
    /// Horizontal footprint of the branch, at least 1.
    pub width: f64,
    /// Offset among siblings under the reference parent; 0 is centered,
    /// negative is left.
    pub position: f64,
}

impl LayoutNode {
    pub fn is_root(&self) -> bool {
        self.above.is_empty()
    }
}

/// Result of the balanced tree layout, in dependency-first order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<LayoutNode>,
    pub(super) index: HashMap<NodeId, usize>,
}

impl TreeLayout {
    pub(super) fn new(nodes: Vec<LayoutNode>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();
        Self { nodes, index }
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter()
    }

    pub fn parents<'a>(&'a self, node: &'a LayoutNode) -> impl Iterator<Item = &'a LayoutNode> + 'a {
        node.above.iter().map(move |&idx| &self.nodes[idx])
    }

    /// Children grouped by relative depth, as nodes.
    pub fn child_groups<'a>(
        &'a self,
        node: &'a LayoutNode,
    ) -> impl Iterator<Item = Vec<&'a LayoutNode>> + 'a {
        node.below
            .iter()
            .map(move |group| group.iter().map(|&idx| &self.nodes[idx]).collect())
    }

    /// The parent that owns `node` for width and position accounting.
    pub fn reference_parent(&self, node: &LayoutNode) -> Option<&LayoutNode> {
        super::balance::find_ref(&node.above).map(|idx| &self.nodes[idx])
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }
}
