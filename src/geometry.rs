use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::{FsmStates, Position};

/// Rendered box of a state as reported by the host's rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl BoundingBox {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Zero width and height, which is what hosts report for a state with
    /// no rendered element.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Source of measured state boxes.
///
/// `None` means the state has no rendered element; callers treat it the
/// same as an all-zero box. Implementations are queried fresh on every corner
/// computation and must not assume any caching.
pub trait BoundingBoxProvider {
    fn bounding_box(&self, state_id: &str) -> Option<BoundingBox>;

    fn bounding_box_or_zero(&self, state_id: &str) -> BoundingBox {
        self.bounding_box(state_id).unwrap_or_default()
    }
}

/// Provider for hosts that have nothing rendered: every state is zero-size.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmeasured;

impl BoundingBoxProvider for Unmeasured {
    fn bounding_box(&self, _state_id: &str) -> Option<BoundingBox> {
        None
    }
}

impl BoundingBoxProvider for HashMap<String, BoundingBox> {
    fn bounding_box(&self, state_id: &str) -> Option<BoundingBox> {
        self.get(state_id).copied()
    }
}

impl BoundingBoxProvider for IndexMap<String, BoundingBox> {
    fn bounding_box(&self, state_id: &str) -> Option<BoundingBox> {
        self.get(state_id).copied()
    }
}

/// Adapts a measuring closure, e.g. one backed by a DOM lookup.
#[derive(Debug, Clone, Copy)]
pub struct MeasuredBy<F>(pub F);

impl<F> BoundingBoxProvider for MeasuredBy<F>
where
    F: Fn(&str) -> Option<BoundingBox>,
{
    fn bounding_box(&self, state_id: &str) -> Option<BoundingBox> {
        (self.0)(state_id)
    }
}

/// Axis-aligned rectangle placed at a state position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn at(position: Position, size: BoundingBox) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Returns true when the measured boxes of any two positioned states
/// intersect. States without a position are ignored.
pub fn check_overlap<P: BoundingBoxProvider + ?Sized>(states: &FsmStates, provider: &P) -> bool {
    let rects: Vec<Rect> = states
        .iter()
        .filter_map(|(key, state)| {
            state
                .position
                .map(|pos| Rect::at(pos, provider.bounding_box_or_zero(key)))
        })
        .collect();

    for (idx, a) in rects.iter().enumerate() {
        if rects[idx + 1..].iter().any(|b| a.overlaps(b)) {
            return true;
        }
    }
    false
}
