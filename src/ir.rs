use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;

pub type NodeId = i64;

/// Node id as it appears in hand-written input: `3` or `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn to_node_id(&self) -> Result<NodeId, LayoutError> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(text) => parse_node_id(text),
        }
    }
}

pub fn parse_node_id(text: &str) -> Result<NodeId, LayoutError> {
    text.trim()
        .parse::<NodeId>()
        .map_err(|_| LayoutError::InvalidNodeId(text.to_string()))
}

/// Dependency relation between tree-layout nodes: every id maps to the ids
/// it depends on, i.e. the nodes drawn above it. Keys iterate in ascending
/// numeric order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyMap {
    deps: BTreeMap<NodeId, Vec<NodeId>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, depends_on: Vec<NodeId>) {
        self.deps.insert(id, depends_on);
    }

    pub fn get(&self, id: NodeId) -> Option<&[NodeId]> {
        self.deps.get(&id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.deps.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.deps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Builds a map from loosely typed input (string keys, numeric or
    /// string dependency ids).
    pub fn from_raw(raw: &BTreeMap<String, Vec<RawId>>) -> Result<Self, LayoutError> {
        let mut map = Self::new();
        for (key, deps) in raw {
            let id = parse_node_id(key)?;
            let deps = deps
                .iter()
                .map(RawId::to_node_id)
                .collect::<Result<Vec<_>, _>>()?;
            map.insert(id, deps);
        }
        Ok(map)
    }

    pub fn from_json_str(input: &str) -> anyhow::Result<Self> {
        let raw: BTreeMap<String, Vec<RawId>> = match serde_json::from_str(input) {
            Ok(raw) => raw,
            Err(_) => json5::from_str(input)?,
        };
        Ok(Self::from_raw(&raw)?)
    }
}

impl<const N: usize> From<[(NodeId, Vec<NodeId>); N]> for DependencyMap {
    fn from(entries: [(NodeId, Vec<NodeId>); N]) -> Self {
        Self {
            deps: entries.into_iter().collect(),
        }
    }
}

impl FromIterator<(NodeId, Vec<NodeId>)> for DependencyMap {
    fn from_iter<T: IntoIterator<Item = (NodeId, Vec<NodeId>)>>(iter: T) -> Self {
        Self {
            deps: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One state of the FSM editor. Only `position` matters to the layout code;
/// everything else the host stores on a state is carried through untouched.
///
/// A `position` without numeric `x` and `y` reads as no position; its
/// original value stays in `extra` so it is written back as it came in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawFsmState")]
pub struct FsmState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawFsmState {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    position: Option<serde_json::Value>,
    #[serde(default)]
    transitions: Option<serde_json::Value>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<RawFsmState> for FsmState {
    fn from(raw: RawFsmState) -> Self {
        let mut extra = raw.extra;
        let position = raw.position.and_then(|value| match Position::deserialize(&value) {
            Ok(position) => Some(position),
            Err(_) => {
                extra.insert("position".to_string(), value);
                None
            }
        });
        Self {
            key: raw.key,
            position,
            transitions: raw.transitions,
            extra,
        }
    }
}

impl FsmState {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Some(Position::new(x, y)),
            ..Default::default()
        }
    }
}

/// States keyed by id, in the host's insertion order.
pub type FsmStates = IndexMap<String, FsmState>;

pub fn states_from_json_str(input: &str) -> anyhow::Result<FsmStates> {
    match serde_json::from_str(input) {
        Ok(states) => Ok(states),
        Err(_) => Ok(json5::from_str(input)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_map_accepts_numbers_and_strings() {
        let map = DependencyMap::from_json_str(r#"{"1": [], "2": [1], "3": ["1", 2]}"#).unwrap();
        assert_eq!(map.get(3), Some(&[1, 2][..]));
        assert_eq!(map.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn dependency_map_rejects_non_numeric_ids() {
        let err = DependencyMap::from_json_str(r#"{"a": []}"#).unwrap_err();
        assert!(err.to_string().contains("\"a\""));
    }

    #[test]
    fn state_keeps_unknown_fields() {
        let input = r#"{"1": {"position": {"x": 10, "y": 20}, "name": "Start", "transitions": [{"state": "2"}]}}"#;
        let states = states_from_json_str(input).unwrap();
        let state = &states["1"];
        assert_eq!(state.position, Some(Position::new(10.0, 20.0)));
        assert_eq!(state.extra["name"], "Start");
        let back = serde_json::to_value(&states).unwrap();
        assert_eq!(back["1"]["name"], "Start");
        assert_eq!(back["1"]["transitions"][0]["state"], "2");
    }

    #[test]
    fn incomplete_position_reads_as_unpositioned() {
        let input = r#"{"1": {"position": {"x": 100, "y": 100}}, "2": {"position": {}}, "3": {"position": {"x": 5}}}"#;
        let states = states_from_json_str(input).unwrap();
        assert_eq!(states["1"].position, Some(Position::new(100.0, 100.0)));
        assert_eq!(states["2"].position, None);
        assert_eq!(states["3"].position, None);

        let back = serde_json::to_value(&states).unwrap();
        assert_eq!(back["2"]["position"], serde_json::json!({}));
        assert_eq!(back["3"]["position"], serde_json::json!({"x": 5}));
    }
}
