use alloc::collections::BTreeSet;
use alloc::collections::btree_set;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::*;

/// Shortest run that gets cleared.
pub const MIN_RUN: Coord = 3;

/// Unique coordinates of every tile taking part in some run of [`MIN_RUN`] or more.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet(BTreeSet<Coord2>);

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coordinates in row-major order.
    pub fn iter(&self) -> btree_set::Iter<'_, Coord2> {
        self.0.iter()
    }

    fn insert_run(&mut self, run: &Run, bounds: Coord2) {
        self.0.extend(run.cells(bounds));
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Coord2;
    type IntoIter = btree_set::Iter<'a, Coord2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Coord2> for MatchSet {
    fn from_iter<T: IntoIterator<Item = Coord2>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Maximal line of equal, non-empty tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub start: Coord2,
    pub direction: Direction,
    pub len: Coord,
    pub color: ColorId,
}

impl Run {
    pub fn cells(&self, bounds: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        self.direction
            .walk(self.start, bounds)
            .take(self.len.into())
    }
}

/// Every run of at least [`MIN_RUN`] tiles, in all four directions.
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    find_runs_in(grid, &Direction::ALL)
}

/// Tiles that would be cleared on `grid` right now.
///
/// Runs are found independently per direction and merged, so crossing runs share their
/// common tile. Empty iff the board is stable.
pub fn find_matches(grid: &Grid) -> MatchSet {
    collect_matches(grid, &Direction::ALL)
}

/// Like [`find_matches`], restricted to rows and columns.
pub fn find_line_matches(grid: &Grid) -> MatchSet {
    collect_matches(grid, &Direction::LINES)
}

fn collect_matches(grid: &Grid, directions: &[Direction]) -> MatchSet {
    let bounds = grid.size();
    let mut matches = MatchSet::new();
    for run in find_runs_in(grid, directions) {
        matches.insert_run(&run, bounds);
    }
    matches
}

fn find_runs_in(grid: &Grid, directions: &[Direction]) -> Vec<Run> {
    let bounds = grid.size();
    let mut runs = Vec::new();
    for &direction in directions {
        for start in direction.line_starts(bounds) {
            scan_line(grid, start, direction, &mut runs);
        }
    }
    runs
}

fn scan_line(grid: &Grid, start: Coord2, direction: Direction, runs: &mut Vec<Run>) {
    let mut current: Option<Run> = None;

    for coords in direction.walk(start, grid.size()) {
        match (current, grid.color_at(coords)) {
            (Some(mut run), Some(color)) if run.color == color => {
                run.len += 1;
                current = Some(run);
            }
            (previous, color) => {
                push_long_run(runs, previous);
                current = color.map(|color| Run {
                    start: coords,
                    direction,
                    len: 1,
                    color,
                });
            }
        }
    }

    push_long_run(runs, current);
}

fn push_long_run(runs: &mut Vec<Run>, run: Option<Run>) {
    if let Some(run) = run.filter(|run| run.len >= MIN_RUN) {
        log::trace!("run of {} at {:?} going {:?}", run.len, run.start, run.direction);
        runs.push(run);
    }
}
