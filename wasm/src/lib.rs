use fsm_layout::align::{GridCell, free_spot, reposition_group};
use fsm_layout::config::{Config, parse_config};
use fsm_layout::ir::{Position, states_from_json_str};
use fsm_layout::layout_dump::TreeLayoutDump;
use fsm_layout::{BoundingBox, DependencyMap, auto_align, check_overlap, compute_tree_layout};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    /// Same shape as the CLI config file (`tree`, `align`, `placement`).
    config: Option<Value>,
    /// Cells from a previous `auto_align` call.
    grid: Option<Vec<GridCell>>,
}

fn parse_options(options_json: Option<&str>) -> Result<LayoutOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(raw).map_err(|error| error.to_string()),
        None => Ok(LayoutOptions::default()),
    }
}

fn resolve_config(options: &LayoutOptions) -> Result<Config, String> {
    match &options.config {
        Some(value) => parse_config(&value.to_string()).map_err(|error| format!("{error:#}")),
        None => Ok(Config::default()),
    }
}

fn parse_boxes(boxes_json: &str) -> Result<IndexMap<String, BoundingBox>, String> {
    serde_json::from_str(boxes_json).map_err(|error| error.to_string())
}

fn tree_json(deps_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let config = resolve_config(&parse_options(options_json)?)?;
    let deps = DependencyMap::from_json_str(deps_json).map_err(|error| format!("{error:#}"))?;
    let layout = compute_tree_layout(&deps).map_err(|error| error.to_string())?;
    let dump = TreeLayoutDump::from_layout(&layout, &config.tree);
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

fn align_json(
    states_json: &str,
    boxes_json: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let config = resolve_config(&options)?;
    let states = states_from_json_str(states_json).map_err(|error| format!("{error:#}"))?;
    let boxes = parse_boxes(boxes_json)?;
    let outcome = auto_align(&states, &config.align, options.grid.as_deref(), &boxes);
    serde_json::to_string(&outcome).map_err(|error| error.to_string())
}

fn overlap(states_json: &str, boxes_json: &str) -> Result<bool, String> {
    let states = states_from_json_str(states_json).map_err(|error| format!("{error:#}"))?;
    let boxes = parse_boxes(boxes_json)?;
    Ok(check_overlap(&states, &boxes))
}

fn reposition_json(
    states_json: &str,
    x: f64,
    y: f64,
    options_json: Option<&str>,
) -> Result<String, String> {
    let config = resolve_config(&parse_options(options_json)?)?;
    let states = states_from_json_str(states_json).map_err(|error| format!("{error:#}"))?;
    let moved = reposition_group(&states, Position::new(x, y), &config.placement);
    serde_json::to_string(&moved).map_err(|error| error.to_string())
}

fn free_spot_json(
    states_json: &str,
    x: f64,
    y: f64,
    options_json: Option<&str>,
) -> Result<String, String> {
    let config = resolve_config(&parse_options(options_json)?)?;
    let states = states_from_json_str(states_json).map_err(|error| format!("{error:#}"))?;
    let spot = free_spot(&states, Position::new(x, y), &config.placement);
    serde_json::to_string(&spot).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_tree(deps_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    tree_json(deps_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn auto_align_states(
    states_json: &str,
    boxes_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    align_json(states_json, boxes_json, options_json.as_deref())
        .map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn states_overlap(states_json: &str, boxes_json: &str) -> Result<bool, JsValue> {
    overlap(states_json, boxes_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn reposition_states(
    states_json: &str,
    x: f64,
    y: f64,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    reposition_json(states_json, x, y, options_json.as_deref())
        .map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn position_in_free_spot(
    states_json: &str,
    x: f64,
    y: f64,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    free_spot_json(states_json, x, y, options_json.as_deref())
        .map_err(|error| JsValue::from_str(&error))
}
