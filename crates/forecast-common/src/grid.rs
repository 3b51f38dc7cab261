//! Square grid traversal driven by a time budget.
//!
//! Coordinates are visited at a rate of one per second, so a budget of `n`
//! seconds covers a square of `sqrt(n)` cells per side. The walk goes east
//! along a row, then returns to the start longitude one step further south.

use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Immutable parameters of one grid run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParameters {
    /// Ground distance between neighbouring cells, in km.
    pub step_distance_km: f64,
    /// Time budget for the whole traversal, in seconds.
    pub duration_secs: f64,
    /// North-west corner of the grid.
    pub start: Coordinate,
}

impl GridParameters {
    pub fn new(step_distance_km: f64, duration_secs: f64, start: Coordinate) -> Self {
        Self {
            step_distance_km,
            duration_secs,
            start,
        }
    }

    /// Side length of the grid. Not rounded: the walker compares its counters
    /// against this value with a strict `>`.
    pub fn grid_side(&self) -> f64 {
        self.duration_secs.sqrt()
    }

    /// Number of coordinates a full traversal emits.
    ///
    /// Columns advance while `column <= side` and rows while `row < side`, so a
    /// row holds `floor(side)` cells (at least one) and there are `ceil(side)`
    /// rows. For perfect squares this is exactly `duration_secs`.
    pub fn cell_count(&self) -> u64 {
        let side = self.grid_side();
        let columns = (side.floor() as u64).max(1);
        let rows = (side.ceil() as u64).max(1);
        columns * rows
    }
}

/// Lazy, finite iterator over the grid's coordinates in row-major order.
///
/// A walker is single-use: once exhausted its position is back at the start
/// and it yields nothing further. Build a new one to walk again.
#[derive(Debug, Clone)]
pub struct GridWalker {
    params: GridParameters,
    current: Coordinate,
    column: u64,
    row: u64,
    max_column: f64,
    max_row: f64,
    finished: bool,
}

impl GridWalker {
    pub fn new(params: GridParameters) -> Self {
        let side = params.grid_side();
        Self {
            params,
            current: params.start,
            column: 1,
            row: 1,
            max_column: side,
            max_row: side,
            finished: false,
        }
    }

    /// The walker's position, i.e. the next coordinate to be emitted.
    pub fn current(&self) -> Coordinate {
        self.current
    }

    /// `(column, row)` of the next coordinate, both 1-based.
    pub fn cell(&self) -> (u64, u64) {
        (self.column, self.row)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn advance(&mut self) {
        let step = self.params.step_distance_km;

        self.column += 1;
        self.current.move_right(step);

        if self.column as f64 > self.max_column {
            self.column = 1;
            if (self.row as f64) < self.max_row {
                self.row += 1;
                self.current.move_down(step);
                self.current.lon = self.params.start.lon;
            } else {
                self.row = 1;
                self.current = self.params.start;
                self.finished = true;
            }
        }
    }
}

impl Iterator for GridWalker {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.finished {
            return None;
        }
        let emitted = self.current;
        self.advance();
        Some(emitted)
    }
}
