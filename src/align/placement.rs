use tracing::{trace, warn};

use crate::config::PlacementConfig;
use crate::ir::{FsmStates, Position};

/// True when some state sits exactly on `position`.
pub fn is_any_state_at(states: &FsmStates, position: Position) -> bool {
    states
        .values()
        .any(|state| state.position == Some(position))
}

/// First free spot starting at `start`: steps right by the state width plus
/// spacing while the row has room, otherwise steps down by `row_step`.
pub fn free_spot(states: &FsmStates, start: Position, config: &PlacementConfig) -> Position {
    let column_step = config.column_step();
    if column_step <= 0.0 || config.row_step <= 0.0 {
        warn!(column_step, row_step = config.row_step, "placement steps must be positive");
        return start;
    }

    let mut spot = start;
    while is_any_state_at(states, spot) {
        if spot.x + column_step > config.diagram_size {
            spot.y += config.row_step;
        } else {
            spot.x += column_step;
        }
    }
    trace!(x = spot.x, y = spot.y, "free spot");
    spot
}

/// Moves a group of states so that its anchor lands on `target`, keeping
/// the offsets between states and clamping every coordinate to the canvas.
///
/// The anchor is picked in key order: a state replaces the current pick when
/// it is left of it or above it. States without a position are copied as
/// they are.
pub fn reposition_group(
    states: &FsmStates,
    target: Position,
    config: &PlacementConfig,
) -> FsmStates {
    let anchor = states
        .iter()
        .filter_map(|(key, state)| state.position.map(|position| (key, position)))
        .fold(None, |pick: Option<(&String, Position)>, (key, position)| match pick {
            Some((_, current)) if position.x >= current.x && position.y >= current.y => pick,
            _ => Some((key, position)),
        });
    let Some((anchor_key, anchor)) = anchor else {
        return states.clone();
    };

    let dx = target.x - anchor.x;
    let dy = target.y - anchor.y;
    let clamp = |value: f64| value.clamp(0.0, config.diagram_size.max(0.0));

    states
        .iter()
        .map(|(key, state)| {
            let mut state = state.clone();
            if let Some(position) = state.position.as_mut() {
                let moved = if key == anchor_key {
                    target
                } else {
                    Position::new(position.x + dx, position.y + dy)
                };
                *position = Position::new(clamp(moved.x), clamp(moved.y));
            }
            (key.clone(), state)
        })
        .collect()
}
