use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::ir::Position;

/// Corners of a state box pushed outward by the alignment margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCorners {
    pub top_left_corner: Position,
    pub top_right_corner: Position,
    pub bottom_left_corner: Position,
    pub bottom_right_corner: Position,
}

impl StateCorners {
    pub fn with_margin(position: Position, size: BoundingBox, margin: f64) -> Self {
        let left = position.x - margin;
        let right = position.x + size.width + margin;
        let top = position.y - margin;
        let bottom = position.y + size.height + margin;
        Self {
            top_left_corner: Position::new(left, top),
            top_right_corner: Position::new(right, top),
            bottom_left_corner: Position::new(left, bottom),
            bottom_right_corner: Position::new(right, bottom),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.bottom_left_corner.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_expand_by_margin() {
        let corners =
            StateCorners::with_margin(Position::new(100.0, 200.0), BoundingBox::sized(300.0, 40.0), 50.0);
        assert_eq!(corners.top_left_corner, Position::new(50.0, 150.0));
        assert_eq!(corners.top_right_corner, Position::new(450.0, 150.0));
        assert_eq!(corners.bottom_left_corner, Position::new(50.0, 290.0));
        assert_eq!(corners.bottom_right_corner, Position::new(450.0, 290.0));
        assert_eq!(corners.bottom(), 290.0);
    }

    #[test]
    fn unmeasured_state_only_gets_the_margin() {
        let corners =
            StateCorners::with_margin(Position::new(10.0, 10.0), BoundingBox::default(), 5.0);
        assert_eq!(corners.top_left_corner, Position::new(5.0, 5.0));
        assert_eq!(corners.bottom_right_corner, Position::new(15.0, 15.0));
    }
}
