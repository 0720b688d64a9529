use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::AlignConfig;
use crate::ir::{FsmStates, Position};

/// One address of the alignment grid. `id` is the row index followed by
/// the column index, e.g. `"12"`; ordering always uses `row`/`column`.
///
/// Cells read from a host may omit `row` and `column`; [`Grid::from_cells`]
/// derives them from the positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub id: String,
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub column: usize,
    pub position: Position,
    #[serde(default)]
    pub occupied: bool,
    /// Key of the state placed in this cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl GridCell {
    pub fn new(row: usize, column: usize, position: Position) -> Self {
        Self {
            id: format!("{row}{column}"),
            row,
            column,
            position,
            occupied: false,
            state: None,
        }
    }

    pub fn occupy(&mut self, key: &str) {
        self.occupied = true;
        self.state = Some(key.to_string());
    }

    pub fn release(&mut self) {
        self.occupied = false;
        self.state = None;
    }

    pub fn is_held_by(&self, key: &str) -> bool {
        self.state.as_deref() == Some(key)
    }

    /// Free, or already taken by `key` itself.
    pub fn is_available_to(&self, key: &str) -> bool {
        !self.occupied || self.is_held_by(key)
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    pub cells: Vec<GridCell>,
}

impl Grid {
    /// Re-indexes the cells from their positions (row = rank of `y`, column
    /// = rank of `x` among the distinct values) and sorts them row-major.
    pub fn from_cells(mut cells: Vec<GridCell>) -> Self {
        let tops = distinct(cells.iter().map(|cell| cell.position.y));
        let lefts = distinct(cells.iter().map(|cell| cell.position.x));
        for cell in &mut cells {
            cell.row = tops.partition_point(|&y| y < cell.position.y);
            cell.column = lefts.partition_point(|&x| x < cell.position.x);
        }
        cells.sort_by_key(|cell| (cell.row, cell.column));
        Self { cells }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Lookup by label. Labels are not unique once a grid has ten or more
    /// columns (`"110"` is both row 1 column 10 and row 11 column 0); the
    /// first match in row-major order wins. Prefer [`Grid::cell_at`].
    pub fn cell(&self, id: &str) -> Option<&GridCell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.column == column)
    }

    pub fn row_count(&self) -> usize {
        self.cells.last().map_or(0, |cell| cell.row + 1)
    }

    /// Index of the first cell of `row`.
    pub fn row_start(&self, row: usize) -> Option<usize> {
        self.cells.iter().position(|cell| cell.row == row)
    }

    /// Top edge of every row, top to bottom.
    pub fn row_tops(&self) -> Vec<(usize, f64)> {
        let mut tops: Vec<(usize, f64)> = Vec::new();
        for cell in &self.cells {
            if tops.last().is_none_or(|(row, _)| *row != cell.row) {
                tops.push((cell.row, cell.position.y));
            }
        }
        tops
    }

    pub fn held_by(&self, key: &str) -> Option<usize> {
        self.cells.iter().position(|cell| cell.is_held_by(key))
    }

    /// First cell at or after `from`, in row-major order, that `key` may use.
    pub fn next_available(&self, from: usize, key: &str) -> Option<usize> {
        (from..self.cells.len()).find(|&idx| self.cells[idx].is_available_to(key))
    }

    /// Places `key` in cell `idx`, releasing any other cell it held.
    pub fn assign(&mut self, idx: usize, key: &str) {
        for (other, cell) in self.cells.iter_mut().enumerate() {
            if other != idx && cell.is_held_by(key) {
                cell.release();
            }
        }
        self.cells[idx].occupy(key);
    }
}

/// Builds the grid anchored at the smallest x and smallest y of the
/// positioned states, then marks the cells states already sit on exactly.
pub fn create_grid(states: &FsmStates, config: &AlignConfig) -> Grid {
    let mut positions = states.values().filter_map(|state| state.position);
    let Some(first) = positions.next() else {
        return Grid::default();
    };
    let origin = positions.fold(first, |acc, pos| Position::new(acc.x.min(pos.x), acc.y.min(pos.y)));

    let column_pitch = config.column_pitch();
    let row_pitch = config.row_pitch();
    let columns = count(config.grid_width - origin.x, column_pitch);
    let rows = count(config.grid_height, row_pitch);
    debug!(rows, columns, origin_x = origin.x, origin_y = origin.y, "grid created");

    let mut cells = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        for column in 0..columns {
            let position = Position::new(
                origin.x + column as f64 * column_pitch,
                origin.y + row as f64 * row_pitch,
            );
            cells.push(GridCell::new(row, column, position));
        }
    }

    let mut grid = Grid { cells };
    occupy_existing(&mut grid, states);
    grid
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

fn count(span: f64, pitch: f64) -> usize {
    if pitch <= 0.0 || !span.is_finite() {
        return 0;
    }
    (span / pitch).round().max(0.0) as usize
}

/// Marks cells whose position a state already has. A second state on the
/// same spot probes forward to the next free cell.
fn occupy_existing(grid: &mut Grid, states: &FsmStates) {
    for (key, state) in states {
        let Some(position) = state.position else {
            continue;
        };
        let Some(idx) = grid.cells.iter().position(|cell| cell.position == position) else {
            continue;
        };
        match grid.next_available(idx, key) {
            Some(free) => {
                trace!(state = %key, cell = %grid.cells[free].id, "pre-occupied");
                grid.assign(free, key);
            }
            None => trace!(state = %key, "no free cell to pre-occupy"),
        }
    }
}
