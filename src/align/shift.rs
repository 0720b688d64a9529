use std::collections::HashMap;

use tracing::{trace, warn};

use super::corners::StateCorners;
use super::grid::Grid;

/// Vertical extent of a state as seen by the row locator: its top edge and
/// its margin-expanded bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
}

impl Span {
    pub fn new(top: f64, corners: &StateCorners, measured: bool) -> Self {
        // Without a rendered box the state cannot reach into the next row.
        let bottom = if measured { corners.bottom() } else { top };
        Self { top, bottom }
    }
}

/// Which overlap rule picked the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch {
    /// The span fits inside the row band.
    Within,
    /// The top is in the row but the bottom spills into the next one.
    SpillsDown,
    /// The top is above the row and the bottom ends inside it.
    ReachesUp,
}

/// Finds the row a state should snap to, scanning rows top to bottom.
///
/// `occupant_bottom` reports the bottom edge of the state already sitting at
/// the start of a row, if any.
pub fn locate_row(
    grid: &Grid,
    span: Span,
    row_pitch: f64,
    occupant_bottom: impl Fn(usize) -> Option<f64>,
) -> Option<(usize, RowMatch)> {
    let tops = grid.row_tops();
    let mut selected = None;

    for (slot, &(row, top)) in tops.iter().enumerate() {
        let next = tops.get(slot + 1);
        let bottom = next.map_or(top + row_pitch, |&(_, y)| y);

        if top <= span.top && bottom >= span.bottom {
            let start = grid.row_start(row)?;
            let mut target = row;
            // Do not stack on top of a shorter state already placed here.
            if grid.cells[start].occupied
                && occupant_bottom(start).is_some_and(|b| b < span.top)
            {
                if let Some(&(below, _)) = next {
                    target = below;
                }
            }
            return Some((target, RowMatch::Within));
        }

        if top <= span.top && bottom >= span.top && bottom <= span.bottom {
            return next.map(|&(below, _)| (below, RowMatch::SpillsDown));
        }

        if top >= span.top && top <= span.bottom && bottom > span.bottom {
            let above = slot.checked_sub(1).map_or(row, |prev| tops[prev].0);
            selected = Some((above, RowMatch::ReachesUp));
        }
    }

    selected
}

/// Snaps one state into the grid and returns the index of its cell.
///
/// The first cell of the located row is used when it is free (or already
/// holds this state); otherwise the next available cell in row-major order.
pub fn shift_state(
    grid: &mut Grid,
    key: &str,
    span: Span,
    row_pitch: f64,
    corners: &HashMap<String, StateCorners>,
) -> Option<usize> {
    let occupant_bottom = |idx: usize| {
        grid.cells[idx]
            .state
            .as_deref()
            .and_then(|occupant| corners.get(occupant))
            .map(StateCorners::bottom)
    };

    let Some((row, rule)) = locate_row(grid, span, row_pitch, occupant_bottom) else {
        trace!(state = %key, "no matching row");
        return None;
    };
    let start = grid.row_start(row)?;
    let Some(cell) = grid.next_available(start, key) else {
        warn!(state = %key, row, "grid is full, state left unaligned");
        return None;
    };

    trace!(state = %key, row, ?rule, cell = %grid.cells[cell].id, "state shifted");
    grid.assign(cell, key);
    Some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::grid::GridCell;
    use crate::ir::Position;

    fn grid(rows: usize, columns: usize, pitch_x: f64, pitch_y: f64) -> Grid {
        let mut cells = Vec::new();
        for row in 0..rows {
            for column in 0..columns {
                cells.push(GridCell::new(
                    row,
                    column,
                    Position::new(column as f64 * pitch_x, 100.0 + row as f64 * pitch_y),
                ));
            }
        }
        Grid::from_cells(cells)
    }

    fn span(top: f64, bottom: f64) -> Span {
        Span { top, bottom }
    }

    #[test]
    fn span_within_a_row_picks_it() {
        let grid = grid(3, 2, 400.0, 140.0);
        let found = locate_row(&grid, span(250.0, 330.0), 140.0, |_| None);
        assert_eq!(found, Some((1, RowMatch::Within)));
    }

    #[test]
    fn spill_goes_to_the_next_row() {
        let grid = grid(3, 2, 400.0, 140.0);
        let found = locate_row(&grid, span(200.0, 280.0), 140.0, |_| None);
        assert_eq!(found, Some((1, RowMatch::SpillsDown)));
    }

    #[test]
    fn spill_from_the_last_row_finds_nothing() {
        let grid = grid(2, 2, 400.0, 140.0);
        let found = locate_row(&grid, span(370.0, 450.0), 140.0, |_| None);
        assert_eq!(found, None);
    }

    #[test]
    fn span_above_the_grid_reaches_the_first_row() {
        let grid = grid(3, 2, 400.0, 140.0);
        let found = locate_row(&grid, span(60.0, 140.0), 140.0, |_| None);
        assert_eq!(found, Some((0, RowMatch::ReachesUp)));
    }

    #[test]
    fn taller_state_skips_row_with_shorter_occupant() {
        let mut grid = grid(3, 2, 400.0, 140.0);
        grid.assign(0, "short");
        let found = locate_row(&grid, span(200.0, 230.0), 140.0, |_| Some(150.0));
        assert_eq!(found, Some((1, RowMatch::Within)));
        let found = locate_row(&grid, span(120.0, 200.0), 140.0, |_| Some(150.0));
        assert_eq!(found, Some((0, RowMatch::Within)));
    }

    #[test]
    fn occupied_target_shifts_to_next_free_cell() {
        let mut grid = grid(2, 2, 400.0, 140.0);
        grid.assign(0, "a");
        let corners = HashMap::new();
        let cell = shift_state(&mut grid, "b", span(110.0, 190.0), 140.0, &corners);
        assert_eq!(cell, Some(1));
        assert!(grid.cells[1].is_held_by("b"));
        assert!(grid.cells[0].is_held_by("a"));
    }

    #[test]
    fn full_grid_leaves_state_alone() {
        let mut grid = grid(1, 1, 400.0, 140.0);
        grid.assign(0, "a");
        let cell = shift_state(&mut grid, "b", span(110.0, 190.0), 140.0, &HashMap::new());
        assert_eq!(cell, None);
        assert!(grid.cells[0].is_held_by("a"));
    }
}
