use super::arena::NodeArena;

/// Propagates importance upward: a node weighs 1 plus, for each child, the
/// child's weight split evenly among all of that child's parents.
///
/// Runs in reverse arena order so every child is final before its parents
/// read it.
pub fn balance_weight(arena: &mut NodeArena) {
    for idx in (0..arena.len()).rev() {
        let shared: f64 = arena.nodes[idx]
            .below
            .iter()
            .map(|&child| {
                let child = &arena.nodes[child];
                child.weight / child.above.len() as f64
            })
            .sum();
        arena.nodes[idx].weight += shared;
    }
}
