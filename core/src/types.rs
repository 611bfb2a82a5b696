use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board height, width, and positions.
pub type Coord = u8;

/// Count type used for cleared-tile counts and total-cell counts.
pub type CellCount = u16;

/// Tile color, always in `[0, num_colors)`.
pub type ColorId = u8;

/// Two-dimensional coordinates `(row, col)`, row 0 is the top of the board.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `a` and `b` share an edge. Diagonal neighbours do not count.
pub const fn is_orthogonal_neighbor(a: Coord2, b: Coord2) -> bool {
    let dr = a.0.abs_diff(b.0);
    let dc = a.1.abs_diff(b.1);
    matches!((dr, dc), (0, 1) | (1, 0))
}

/// Scan direction of a line on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right along a row.
    Horizontal,
    /// Top to bottom along a column.
    Vertical,
    /// Down and to the right.
    Diagonal,
    /// Down and to the left.
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    /// Rows and columns only.
    pub const LINES: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
            Self::Diagonal => (1, 1),
            Self::AntiDiagonal => (1, -1),
        }
    }

    /// First cell of every line running in this direction on a board of `size`.
    ///
    /// Diagonal lines start on the top row or on the side column they lean away from, so every
    /// diagonal of the board is visited exactly once, not just the main one.
    pub fn line_starts(self, (rows, cols): Coord2) -> impl Iterator<Item = Coord2> {
        let top_cols = match self {
            Self::Horizontal => 0..0,
            _ => 0..cols,
        };
        let (side_rows, side_col) = match self {
            Self::Horizontal => (0..rows, 0),
            Self::Vertical => (0..0, 0),
            Self::Diagonal => (1..rows, 0),
            Self::AntiDiagonal => (1..rows, cols.saturating_sub(1)),
        };

        top_cols
            .map(|col| (0, col))
            .chain(side_rows.map(move |row| (row, side_col)))
    }

    /// Cells of the line that starts at `start`.
    pub fn walk(self, start: Coord2, bounds: Coord2) -> LineIter {
        LineIter::new(start, self.delta(), bounds)
    }
}

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Clone, Debug)]
pub struct LineIter {
    next: Option<Coord2>,
    delta: (isize, isize),
    bounds: Coord2,
}

impl LineIter {
    fn new(start: Coord2, delta: (isize, isize), bounds: Coord2) -> Self {
        let in_bounds = start.0 < bounds.0 && start.1 < bounds.1;
        Self {
            next: in_bounds.then_some(start),
            delta,
            bounds,
        }
    }
}

impl Iterator for LineIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = apply_delta(current, self.delta, self.bounds);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn orthogonal_neighbors_exclude_diagonals_and_distance_two() {
        assert!(is_orthogonal_neighbor((3, 3), (3, 4)));
        assert!(is_orthogonal_neighbor((3, 3), (2, 3)));
        assert!(!is_orthogonal_neighbor((3, 3), (4, 4)));
        assert!(!is_orthogonal_neighbor((3, 3), (3, 5)));
        assert!(!is_orthogonal_neighbor((3, 3), (3, 3)));
    }

    #[test]
    fn diagonal_line_starts_cover_top_row_and_side_column() {
        let starts: Vec<_> = Direction::Diagonal.line_starts((3, 4)).collect();
        assert_eq!(starts, [(0, 0), (0, 1), (0, 2), (0, 3), (1, 0), (2, 0)]);

        let starts: Vec<_> = Direction::AntiDiagonal.line_starts((3, 4)).collect();
        assert_eq!(starts, [(0, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn anti_diagonal_walk_stops_at_left_edge() {
        let cells: Vec<_> = Direction::AntiDiagonal.walk((0, 2), (5, 5)).collect();
        assert_eq!(cells, [(0, 2), (1, 1), (2, 0)]);
    }
}
