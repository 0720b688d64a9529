use std::collections::{BTreeMap, HashMap};

use crate::config::TreeConfig;
use crate::ir::NodeId;

use super::types::TreeLayout;

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: NodeId,
    pub depth: usize,
    pub column: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Sparse depth x column grid of a balanced tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowsLayout {
    pub columns: usize,
    /// `rows[depth]` maps a column to the node placed there.
    pub rows: Vec<BTreeMap<i64, NodeId>>,
    pub placed: Vec<PlacedNode>,
}

impl RowsLayout {
    pub fn placed(&self, id: NodeId) -> Option<&PlacedNode> {
        self.placed.iter().find(|node| node.id == id)
    }

    pub fn total_width(&self, config: &TreeConfig) -> f64 {
        let cols = self.columns as f64;
        (cols * config.box_width + (cols - 1.0) * config.h_margin).max(0.0)
    }

    pub fn total_height(&self, config: &TreeConfig) -> f64 {
        self.rows.len() as f64 * (config.box_height + config.v_margin)
    }
}

/// Projects the balanced tree onto columns, one row per depth.
///
/// Each node starts from the midpoint between its leftmost and rightmost
/// parent columns and shifts by `position * width * 2`; if that column or
/// a neighbour is taken on the same row it moves right until it is free.
pub fn build_rows(layout: &TreeLayout, config: &TreeConfig) -> RowsLayout {
    if layout.is_empty() {
        return RowsLayout::default();
    }

    let root_width = layout
        .iter()
        .filter(|node| node.is_root())
        .map(|node| node.width)
        .fold(0.0_f64, f64::max);
    let cols = (config.min_columns as f64).max(root_width) - 1.0;

    let mut rows: Vec<BTreeMap<i64, NodeId>> = Vec::new();
    let mut columns: HashMap<NodeId, i64> = HashMap::new();
    let mut placed = Vec::with_capacity(layout.len());

    for node in layout.iter() {
        if rows.len() <= node.depth {
            rows.resize_with(node.depth + 1, BTreeMap::new);
        }

        let mut ref_min = cols - 1.0;
        let mut ref_max = 0.0_f64;
        for parent in layout.parents(node) {
            let col = columns.get(&parent.id).copied().unwrap_or(-1) as f64;
            ref_min = ref_min.min(col);
            ref_max = ref_max.max(col);
        }
        let ref_col = ref_min + (ref_max - ref_min) / 2.0;
        let mut col = round_half_up(ref_col + node.position * node.width * 2.0);

        let row = &mut rows[node.depth];
        while row.contains_key(&col) || row.contains_key(&(col - 1)) || row.contains_key(&(col + 1))
        {
            col += 1;
        }
        row.insert(col, node.id);
        columns.insert(node.id, col);

        placed.push(PlacedNode {
            id: node.id,
            depth: node.depth,
            column: col,
            x: col as f64 * (config.box_width + config.h_margin),
            y: node.depth as f64 * (config.box_height + config.v_margin),
            width: config.box_width,
            height: config.box_height,
        });
    }

    RowsLayout {
        columns: cols.max(0.0) as usize,
        rows,
        placed,
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
