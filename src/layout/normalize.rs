use std::collections::HashSet;

use crate::ir::{DependencyMap, NodeId};

use super::LayoutError;

/// Dependency map flattened into an explicit traversal order: every entry's
/// dependencies appear earlier in `entries`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub entries: Vec<(NodeId, Vec<NodeId>)>,
}

impl Normalized {
    pub fn order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn get(&self, id: NodeId) -> Option<&[NodeId]> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, deps)| deps.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Orders the map depth-first so that dependencies are declared before use.
/// Top-level ids are visited in ascending order.
pub fn normalize(deps: &DependencyMap) -> Result<Normalized, LayoutError> {
    let mut state = Normalizer {
        deps,
        placed: HashSet::new(),
        visiting: HashSet::new(),
        out: Normalized::default(),
    };
    for id in deps.ids() {
        state.insert(id)?;
    }
    Ok(state.out)
}

struct Normalizer<'a> {
    deps: &'a DependencyMap,
    placed: HashSet<NodeId>,
    visiting: HashSet<NodeId>,
    out: Normalized,
}

impl Normalizer<'_> {
    fn insert(&mut self, id: NodeId) -> Result<(), LayoutError> {
        if self.placed.contains(&id) {
            return Ok(());
        }
        if !self.visiting.insert(id) {
            return Err(LayoutError::CyclicDependency { id });
        }
        let map = self.deps;
        let deps = map.get(id).unwrap_or_default();
        for &dep in deps {
            if !map.contains(dep) {
                return Err(LayoutError::UnknownDependency {
                    id,
                    dependency: dep,
                });
            }
            self.insert(dep)?;
        }
        self.visiting.remove(&id);
        self.placed.insert(id);
        self.out.entries.push((id, deps.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_come_first() {
        let deps = DependencyMap::from([(1, vec![2, 3]), (2, vec![3]), (3, vec![]), (4, vec![])]);
        let normalized = normalize(&deps).unwrap();
        assert_eq!(normalized.order().collect::<Vec<_>>(), vec![3, 2, 1, 4]);
        assert_eq!(normalized.get(1), Some(&[2, 3][..]));
        assert_eq!(normalized.get(2), Some(&[3][..]));
        assert_eq!(normalized.get(3), Some(&[][..]));
        assert_eq!(normalized.get(4), Some(&[][..]));
    }

    #[test]
    fn empty_map_normalizes_to_nothing() {
        assert!(normalize(&DependencyMap::new()).unwrap().is_empty());
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let deps = DependencyMap::from([(1, vec![]), (2, vec![1, 9])]);
        assert_eq!(
            normalize(&deps),
            Err(LayoutError::UnknownDependency {
                id: 2,
                dependency: 9
            })
        );
    }

    #[test]
    fn cycle_is_reported_instead_of_recursing_forever() {
        let deps = DependencyMap::from([(1, vec![2]), (2, vec![1])]);
        assert!(matches!(
            normalize(&deps),
            Err(LayoutError::CyclicDependency { .. })
        ));
    }
}
