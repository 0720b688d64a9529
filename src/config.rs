use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry of the auto-align grid.
///
/// `column_width` and `row_height` are the content sizes; the margin is
/// added on top to get the pitch between neighbouring cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignConfig {
    pub margin: f64,
    pub column_width: f64,
    pub grid_width: f64,
    pub grid_height: f64,
    pub row_height: f64,
}

impl AlignConfig {
    pub fn column_pitch(&self) -> f64 {
        self.margin + self.column_width
    }

    pub fn row_pitch(&self) -> f64 {
        self.margin + self.row_height
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            margin: 50.0,
            column_width: 350.0,
            grid_width: 4000.0,
            grid_height: 4000.0,
            row_height: 150.0,
        }
    }
}

/// Box metrics used when projecting a balanced tree onto the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    pub box_width: f64,
    pub box_height: f64,
    pub h_margin: f64,
    pub v_margin: f64,
    pub min_columns: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let box_width = 250.0;
        let box_margin = 20.0;
        Self {
            box_width,
            box_height: box_width / 3.0,
            h_margin: box_margin / 3.0,
            v_margin: box_margin * 4.0,
            min_columns: 1,
        }
    }
}

/// Canvas bounds and steps for placing states by hand-off from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementConfig {
    /// Coordinates are clamped to `0..=diagram_size` on both axes.
    pub diagram_size: f64,
    pub state_width: f64,
    pub spacing: f64,
    /// Step down once a row has no room left to the right.
    pub row_step: f64,
}

impl PlacementConfig {
    pub fn column_step(&self) -> f64 {
        self.state_width + self.spacing
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            diagram_size: 4000.0,
            state_width: 180.0,
            spacing: 50.0,
            row_step: 450.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub tree: TreeConfig,
    pub align: AlignConfig,
    pub placement: PlacementConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlignConfigFile {
    margin: Option<f64>,
    column_width: Option<f64>,
    grid_width: Option<f64>,
    grid_height: Option<f64>,
    row_height: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeConfigFile {
    box_width: Option<f64>,
    box_height: Option<f64>,
    h_margin: Option<f64>,
    v_margin: Option<f64>,
    min_columns: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementConfigFile {
    diagram_size: Option<f64>,
    state_width: Option<f64>,
    spacing: Option<f64>,
    row_step: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    tree: Option<TreeConfigFile>,
    align: Option<AlignConfigFile>,
    placement: Option<PlacementConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document; every field is optional and falls back to its
/// default independently. Plain JSON is tried first, then JSON5.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(contents)?,
    };

    let mut config = Config::default();
    if let Some(align) = parsed.align {
        if let Some(v) = align.margin {
            config.align.margin = v;
        }
        if let Some(v) = align.column_width {
            config.align.column_width = v;
        }
        if let Some(v) = align.grid_width {
            config.align.grid_width = v;
        }
        if let Some(v) = align.grid_height {
            config.align.grid_height = v;
        }
        if let Some(v) = align.row_height {
            config.align.row_height = v;
        }
    }
    if let Some(tree) = parsed.tree {
        if let Some(v) = tree.box_width {
            config.tree.box_width = v;
        }
        if let Some(v) = tree.box_height {
            config.tree.box_height = v;
        }
        if let Some(v) = tree.h_margin {
            config.tree.h_margin = v;
        }
        if let Some(v) = tree.v_margin {
            config.tree.v_margin = v;
        }
        if let Some(v) = tree.min_columns {
            config.tree.min_columns = v;
        }
    }
    if let Some(placement) = parsed.placement {
        if let Some(v) = placement.diagram_size {
            config.placement.diagram_size = v;
        }
        if let Some(v) = placement.state_width {
            config.placement.state_width = v;
        }
        if let Some(v) = placement.spacing {
            config.placement.spacing = v;
        }
        if let Some(v) = placement.row_step {
            config.placement.row_step = v;
        }
    }
    Ok(config)
}
