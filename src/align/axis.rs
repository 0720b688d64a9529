use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBoxProvider;
use crate::ir::{FsmStates, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Line states up along x.
    Horizontal,
    /// Line states up along y.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Top or left edges.
    Start,
    Center,
    /// Bottom or right edges.
    End,
}

struct Extent {
    near: f64,
    size: f64,
}

impl Extent {
    fn far(&self) -> f64 {
        self.near + self.size
    }
}

fn near(position: Position, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => position.x,
        Axis::Vertical => position.y,
    }
}

/// Lines the given states up along one axis and returns the moved copies.
///
/// The reference states are the ones whose far edge is smallest and
/// largest. States without a position are returned unchanged.
pub fn align_states<P: BoundingBoxProvider + ?Sized>(
    axis: Axis,
    alignment: Alignment,
    states: &FsmStates,
    provider: &P,
) -> FsmStates {
    let extent_of = |key: &str, position: Position| {
        let size = provider.bounding_box_or_zero(key);
        Extent {
            near: near(position, axis),
            size: match axis {
                Axis::Horizontal => size.width,
                Axis::Vertical => size.height,
            },
        }
    };

    let mut extents: Vec<Extent> = states
        .iter()
        .filter_map(|(key, state)| state.position.map(|pos| extent_of(key, pos)))
        .collect();
    extents.sort_by(|a, b| a.far().total_cmp(&b.far()));
    let (Some(first), Some(last)) = (extents.first(), extents.last()) else {
        return states.clone();
    };

    let line = match alignment {
        Alignment::Start => first.near,
        Alignment::End => last.far(),
        Alignment::Center => (first.near + first.size + last.near) / 2.0,
    };

    states
        .iter()
        .map(|(key, state)| {
            let mut state = state.clone();
            if let Some(position) = state.position.as_mut() {
                let size = extent_of(key, *position).size;
                let target = match alignment {
                    Alignment::Start => line,
                    Alignment::Center => line - size / 2.0,
                    Alignment::End => line - size,
                };
                match axis {
                    Axis::Horizontal => position.x = target,
                    Axis::Vertical => position.y = target,
                }
            }
            (key.clone(), state)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, MeasuredBy};
    use crate::ir::FsmState;

    fn states() -> FsmStates {
        let mut states = FsmStates::new();
        states.insert("1".into(), FsmState::at(10.0, 100.0));
        states.insert("2".into(), FsmState::at(300.0, 40.0));
        states.insert("3".into(), FsmState::default());
        states
    }

    fn boxes() -> MeasuredBy<impl Fn(&str) -> Option<BoundingBox>> {
        MeasuredBy(|key: &str| match key {
            "1" => Some(BoundingBox::sized(100.0, 20.0)),
            "2" => Some(BoundingBox::sized(100.0, 60.0)),
            _ => None,
        })
    }

    #[test]
    fn aligns_top_edges() {
        let aligned = align_states(Axis::Vertical, Alignment::Start, &states(), &boxes());
        assert_eq!(aligned["1"].position, Some(Position::new(10.0, 40.0)));
        assert_eq!(aligned["2"].position, Some(Position::new(300.0, 40.0)));
        assert_eq!(aligned["3"].position, None);
    }

    #[test]
    fn aligns_bottom_edges() {
        let aligned = align_states(Axis::Vertical, Alignment::End, &states(), &boxes());
        assert_eq!(aligned["1"].position.unwrap().y, 100.0);
        assert_eq!(aligned["2"].position.unwrap().y, 60.0);
    }

    #[test]
    fn centers_between_extremes() {
        // far edges: "2" ends at 100, "1" at 120; line = (40 + 60 + 100) / 2.
        let aligned = align_states(Axis::Vertical, Alignment::Center, &states(), &boxes());
        assert_eq!(aligned["1"].position.unwrap().y, 90.0);
        assert_eq!(aligned["2"].position.unwrap().y, 70.0);
    }

    #[test]
    fn input_is_left_untouched() {
        let input = states();
        let before = input.clone();
        let _ = align_states(Axis::Horizontal, Alignment::Start, &input, &boxes());
        assert_eq!(input, before);
    }
}
