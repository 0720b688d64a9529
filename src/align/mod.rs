//! Grid auto-alignment of measured FSM states.
//!
//! States are snapped onto an implicit grid so that no two share a cell,
//! keeping their relative order as far as possible. The caller's states and
//! grid are only read; all changes land on copies.

pub mod axis;
pub mod corners;
pub mod grid;
pub mod placement;
pub mod shift;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::AlignConfig;
use crate::geometry::BoundingBoxProvider;
use crate::ir::FsmStates;

pub use axis::{Alignment, Axis, align_states};
pub use corners::StateCorners;
pub use grid::{Grid, GridCell, create_grid};
pub use placement::{free_spot, is_any_state_at, reposition_group};
pub use shift::{RowMatch, Span};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignOutcome {
    pub aligned_states: FsmStates,
    pub grid: Grid,
}

/// Snaps every positioned state onto the grid.
///
/// When `prebuilt` holds cells, those are reused (copied) instead of
/// building a fresh grid, so a previous outcome can be re-aligned
/// incrementally. States are processed in their key order; states without a
/// position are passed through as they are.
pub fn auto_align<P: BoundingBoxProvider + ?Sized>(
    states: &FsmStates,
    config: &AlignConfig,
    prebuilt: Option<&[GridCell]>,
    provider: &P,
) -> AlignOutcome {
    let mut aligned = states.clone();
    let mut grid = match prebuilt {
        Some(cells) if !cells.is_empty() => Grid::from_cells(cells.to_vec()),
        _ => create_grid(&aligned, config),
    };

    let mut corners: HashMap<String, StateCorners> = HashMap::new();
    let mut spans: Vec<(String, Span)> = Vec::new();
    for (key, state) in aligned.iter_mut() {
        state.key = Some(key.clone());
        let Some(position) = state.position else {
            trace!(state = %key, "no position, skipped");
            continue;
        };
        let measured = provider.bounding_box(key).filter(|size| !size.is_empty());
        let state_corners = StateCorners::with_margin(
            position,
            measured.unwrap_or_default(),
            config.margin,
        );
        spans.push((
            key.clone(),
            Span::new(position.y, &state_corners, measured.is_some()),
        ));
        corners.insert(key.clone(), state_corners);
    }

    let row_pitch = config.row_pitch();
    let mut moved = 0usize;
    for (key, span) in &spans {
        match shift::shift_state(&mut grid, key, *span, row_pitch, &corners) {
            Some(cell) => {
                let target = grid.cells[cell].position;
                if let Some(state) = aligned.get_mut(key) {
                    if state.position != Some(target) {
                        moved += 1;
                    }
                    state.position = Some(target);
                }
            }
            None => release_mismatched(&mut grid, key, &aligned),
        }
    }

    debug!(
        states = aligned.len(),
        positioned = spans.len(),
        moved,
        cells = grid.len(),
        "states aligned"
    );
    AlignOutcome {
        aligned_states: aligned,
        grid,
    }
}

/// A state that could not be placed keeps its spot; it must not keep a cell
/// it is not actually sitting on.
fn release_mismatched(grid: &mut Grid, key: &str, states: &FsmStates) {
    let Some(idx) = grid.held_by(key) else {
        return;
    };
    let position = states.get(key).and_then(|state| state.position);
    if position != Some(grid.cells[idx].position) {
        grid.cells[idx].release();
    }
}
