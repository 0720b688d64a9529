//! Balanced tree-graph layout.
//!
//! The pipeline is `normalize -> arena -> depth -> weight -> width/position`.
//! Every phase walks an explicit index order: forward is dependencies before
//! dependents, reverse is children before parents.

pub mod arena;
pub mod balance;
pub mod depth;
mod error;
pub mod normalize;
pub mod rows;
mod types;
pub mod weight;

use tracing::debug;

use crate::ir::DependencyMap;

pub use error::LayoutError;
pub use rows::{PlacedNode, RowsLayout, build_rows};
pub use types::{LayoutNode, TreeLayout};

use arena::NodeArena;
use balance::balance_width_and_position;
use depth::balance_depth;
use normalize::normalize;
use weight::balance_weight;

/// Lays out the dependency graph as a balanced tree.
///
/// The input must be acyclic; a cycle or a dependency on an unknown id is
/// reported as an error.
pub fn compute_tree_layout(deps: &DependencyMap) -> Result<TreeLayout, LayoutError> {
    let normalized = normalize(deps)?;
    let mut arena = NodeArena::from_normalized(&normalized);
    balance_depth(&mut arena);
    balance_weight(&mut arena);
    let nodes = balance_width_and_position(&arena);
    debug!(
        nodes = nodes.len(),
        levels = nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0),
        "tree layout balanced"
    );
    Ok(TreeLayout::new(nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(layout: &TreeLayout, idxs: &[usize]) -> Vec<i64> {
        idxs.iter().map(|&idx| layout.nodes[idx].id).collect()
    }

    #[test]
    fn empty_map_gives_empty_layout() {
        let layout = compute_tree_layout(&DependencyMap::new()).unwrap();
        assert!(layout.is_empty());
    }

    #[test]
    fn chain_depths() {
        let deps = DependencyMap::from([(1, vec![]), (2, vec![1]), (3, vec![2])]);
        let layout = compute_tree_layout(&deps).unwrap();
        assert_eq!(layout.get(1).unwrap().depth, 0);
        assert_eq!(layout.get(2).unwrap().depth, 1);
        assert_eq!(layout.get(3).unwrap().depth, 2);
        for node in layout.iter() {
            assert_eq!(node.width, 1.0);
            assert_eq!(node.position, 0.0);
        }
    }

    #[test]
    fn fan_out_is_centered_under_root() {
        let deps = DependencyMap::from([
            (1, vec![]),
            (2, vec![1]),
            (3, vec![1]),
            (4, vec![1]),
            (5, vec![3]),
        ]);
        let layout = compute_tree_layout(&deps).unwrap();
        let root = layout.get(1).unwrap();

        // 3 carries the extra subtree, so it ends up in the middle.
        assert_eq!(root.below.len(), 1);
        assert_eq!(ids(&layout, &root.below[0]), vec![2, 3, 4]);
        assert_eq!(root.width, 3.0);
        assert_eq!(root.weight, 5.0);

        assert_eq!(layout.get(2).unwrap().position, -1.0);
        assert_eq!(layout.get(3).unwrap().position, 0.0);
        assert_eq!(layout.get(4).unwrap().position, 1.0);
        assert_eq!(layout.get(5).unwrap().position, 0.0);
    }

    #[test]
    fn diamond_child_belongs_to_one_parent() {
        let deps = DependencyMap::from([(1, vec![]), (2, vec![1]), (3, vec![1]), (4, vec![2, 3])]);
        let layout = compute_tree_layout(&deps).unwrap();
        let join = layout.get(4).unwrap();
        let reference = layout.reference_parent(join).unwrap();
        assert_eq!(reference.id, 2);
        assert_eq!(layout.get(2).unwrap().width, 1.0);
        assert_eq!(layout.get(3).unwrap().width, 1.0);
        assert_eq!(layout.get(1).unwrap().width, 2.0);
        assert_eq!(layout.parents(join).count(), 2);
    }

    #[test]
    fn children_are_bucketed_by_relative_depth() {
        // 4 is two levels below 1 because 2 -> 3 -> 4 is deeper.
        let deps = DependencyMap::from([(1, vec![]), (2, vec![1]), (3, vec![2]), (4, vec![1, 3])]);
        let layout = compute_tree_layout(&deps).unwrap();
        let root = layout.get(1).unwrap();
        assert_eq!(layout.get(4).unwrap().depth, 3);
        assert_eq!(root.below.len(), 3);
        assert_eq!(ids(&layout, &root.below[0]), vec![2]);
        assert!(root.below[1].is_empty());
        assert_eq!(ids(&layout, &root.below[2]), vec![4]);
        let groups: Vec<usize> = layout.child_groups(root).map(|g| g.len()).collect();
        assert_eq!(groups, vec![1, 0, 1]);
    }

    #[test]
    fn errors_surface_from_normalization() {
        let deps = DependencyMap::from([(1, vec![5])]);
        assert_eq!(
            compute_tree_layout(&deps),
            Err(LayoutError::UnknownDependency {
                id: 1,
                dependency: 5
            })
        );
    }
}
