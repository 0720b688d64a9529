use crate::align::AlignOutcome;
use crate::config::TreeConfig;
use crate::ir::NodeId;
use crate::layout::{TreeLayout, build_rows};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct TreeLayoutDump {
    pub columns: usize,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: NodeId,
    pub depth: usize,
    pub weight: f64,
    pub width: f64,
    pub position: f64,
    pub above: Vec<NodeId>,
    pub below: Vec<Vec<NodeId>>,
    pub column: Option<i64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl TreeLayoutDump {
    pub fn from_layout(layout: &TreeLayout, config: &TreeConfig) -> Self {
        let rows = build_rows(layout, config);

        let nodes = layout
            .iter()
            .map(|node| {
                let placed = rows.placed(node.id);
                NodeDump {
                    id: node.id,
                    depth: node.depth,
                    weight: node.weight,
                    width: node.width,
                    position: node.position,
                    above: ids_of(layout, &node.above),
                    below: node.below.iter().map(|group| ids_of(layout, group)).collect(),
                    column: placed.map(|p| p.column),
                    x: placed.map(|p| p.x),
                    y: placed.map(|p| p.y),
                }
            })
            .collect();

        TreeLayoutDump {
            columns: rows.columns,
            width: rows.total_width(config),
            height: rows.total_height(config),
            nodes,
        }
    }
}

fn ids_of(layout: &TreeLayout, idxs: &[usize]) -> Vec<NodeId> {
    idxs.iter().map(|&idx| layout.nodes[idx].id).collect()
}

pub fn write_tree_dump(path: &Path, layout: &TreeLayout, config: &TreeConfig) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = TreeLayoutDump::from_layout(layout, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

pub fn write_align_dump(path: &Path, outcome: &AlignOutcome) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, outcome)?;
    Ok(())
}
