use std::collections::HashMap;

use crate::ir::NodeId;

use super::normalize::Normalized;

/// Working record of a node while the balancers run. Links are arena
/// indices; `above` and `below` mirror each other.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkNode {
    pub id: NodeId,
    pub above: Vec<usize>,
    pub below: Vec<usize>,
    pub depth: usize,
    pub weight: f64,
}

impl WorkNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            above: Vec::new(),
            below: Vec::new(),
            depth: 0,
            weight: 1.0,
        }
    }
}

/// Nodes stored in normalized order, so that index order is the
/// dependency-first traversal order and reverse index order is
/// children-before-parents.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    pub nodes: Vec<WorkNode>,
    index: HashMap<NodeId, usize>,
}

impl NodeArena {
    pub fn create(&mut self, id: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(WorkNode::new(id));
        self.index.insert(id, idx);
        idx
    }

    /// Records `below` as a dependent of `above`, on both sides.
    pub fn link(&mut self, above: usize, below: usize) {
        self.nodes[above].below.push(below);
        self.nodes[below].above.push(above);
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates every node first, then links each one to its dependencies
    /// in declaration order.
    pub fn from_normalized(normalized: &Normalized) -> Self {
        let mut arena = Self::default();
        for id in normalized.order() {
            arena.create(id);
        }
        for (id, deps) in &normalized.entries {
            let below = arena.index[id];
            for dep in deps {
                let above = arena.index[dep];
                arena.link(above, below);
            }
        }
        arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_has_unit_weight() {
        assert_eq!(
            WorkNode::new(1),
            WorkNode {
                id: 1,
                above: vec![],
                below: vec![],
                depth: 0,
                weight: 1.0,
            }
        );
    }

    #[test]
    fn link_is_symmetric() {
        let mut arena = NodeArena::default();
        let a = arena.create(1);
        let b = arena.create(2);
        arena.link(a, b);
        assert_eq!(arena.nodes[a].below, vec![b]);
        assert!(arena.nodes[a].above.is_empty());
        assert_eq!(arena.nodes[b].above, vec![a]);
        assert!(arena.nodes[b].below.is_empty());
    }

    #[test]
    fn create_is_idempotent_per_id() {
        let mut arena = NodeArena::default();
        let a = arena.create(7);
        assert_eq!(arena.create(7), a);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.index_of(7), Some(a));
    }
}
