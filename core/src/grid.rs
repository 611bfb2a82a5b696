use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Vertical relocation of a single tile during collapse, always within one column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Coord2,
    pub to: Coord2,
}

/// Board of `rows × cols` cells, indexed by `(row, col)` with row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Grid of the given size with every cell empty.
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(GameError::EmptyBoard);
        }
        if rows > usize::from(Coord::MAX) || cols > usize::from(Coord::MAX) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self { cells })
    }

    pub fn size(&self) -> Coord2 {
        // dimensions never exceed `Coord::MAX`, checked on construction
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn color_at(&self, coords: Coord2) -> Option<ColorId> {
        self[coords].color()
    }

    /// All coordinates in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn empty_cells(&self) -> Vec<Coord2> {
        self.iter_coords()
            .filter(|&coords| self[coords].is_empty())
            .collect()
    }

    /// Checks that every cell holds a tile with a color below `num_colors`.
    pub fn validate_tiles(&self, num_colors: ColorId) -> Result<()> {
        let valid = self
            .cells
            .iter()
            .all(|cell| matches!(cell.color(), Some(color) if color < num_colors));
        if valid {
            Ok(())
        } else {
            Err(GameError::InvalidColor)
        }
    }

    pub fn swap(&mut self, a: Coord2, b: Coord2) -> Result<()> {
        let a = self.validate_coords(a)?;
        let b = self.validate_coords(b)?;
        self.cells.swap(a.to_nd_index(), b.to_nd_index());
        Ok(())
    }

    /// Empties every matched cell, returning how many tiles were removed.
    pub fn clear(&mut self, matches: &MatchSet) -> CellCount {
        let mut cleared: CellCount = 0;
        for &coords in matches {
            if !self.contains(coords) {
                continue;
            }
            let cell = &mut self[coords];
            if !cell.is_empty() {
                *cell = Cell::Empty;
                cleared += 1;
            }
        }
        cleared
    }

    /// Compacts the tiles of every column towards the bottom, keeping their top-to-bottom order.
    ///
    /// Moves are listed column by column, lowest tile first.
    pub fn collapse(&mut self) -> Vec<Move> {
        let (rows, cols) = self.size();
        let mut moves = Vec::new();

        for col in 0..cols {
            // next free slot is `write - 1`, never underflows since at most `rows` tiles are seen
            let mut write = rows;
            for row in (0..rows).rev() {
                let cell = self[(row, col)];
                if cell.is_empty() {
                    continue;
                }
                write -= 1;
                if row != write {
                    self[(write, col)] = cell;
                    self[(row, col)] = Cell::Empty;
                    moves.push(Move {
                        from: (row, col),
                        to: (write, col),
                    });
                }
            }
        }

        moves
    }

    /// Draws a fresh color for every empty cell in row-major order, returning the filled cells.
    ///
    /// Unlike generation, refilled tiles may complete runs; the next detection pass picks them up.
    pub fn refill<S: TileSource + ?Sized>(
        &mut self,
        source: &mut S,
        num_colors: ColorId,
    ) -> Vec<Coord2> {
        let filled = self.empty_cells();
        for &coords in &filled {
            self[coords] = Cell::Tile(source.draw(num_colors));
        }
        filled
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, (row, col): Coord2) -> &mut Self::Output {
        &mut self.cells[(row as usize, col as usize)]
    }
}

/// One line per row, a digit per tile and `.` for empty cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.rows().into_iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let mut cells = Vec::new();
        let mut rows = 0;
        let mut cols = None;

        for line in s.lines() {
            let row_start = cells.len();
            for ch in line.chars().filter(|ch| !ch.is_whitespace()) {
                let cell = match ch {
                    '.' => Cell::Empty,
                    _ => {
                        let digit = ch.to_digit(10).ok_or(GameError::InvalidColor)?;
                        Cell::Tile(digit as ColorId)
                    }
                };
                cells.push(cell);
            }

            let width = cells.len() - row_start;
            if width == 0 {
                continue;
            }
            if *cols.get_or_insert(width) != width {
                return Err(GameError::InvalidBoardShape);
            }
            rows += 1;
        }

        let cols = cols.ok_or(GameError::EmptyBoard)?;
        let cells = Array2::from_shape_vec((rows, cols), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_cells(cells)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn parse_and_display_agree() {
        let text = "012\n.3.\n210";
        let g = grid(text);

        assert_eq!(g.size(), (3, 3));
        assert_eq!((g.rows(), g.cols()), (3, 3));
        assert_eq!(g.cell_at((0, 1)), Cell::Tile(1));
        assert_eq!(g.cell_at((1, 0)), Cell::Empty);
        assert_eq!(g.to_string(), text);
    }

    #[test]
    fn parse_rejects_ragged_and_blank_input() {
        assert_eq!("012\n01".parse::<Grid>(), Err(GameError::InvalidBoardShape));
        assert_eq!("\n \n".parse::<Grid>(), Err(GameError::EmptyBoard));
        assert_eq!("01x".parse::<Grid>(), Err(GameError::InvalidColor));
    }

    #[test]
    fn collapse_keeps_column_order() {
        // column top to bottom: A, empty, B, empty, C
        let mut g = grid("1\n.\n2\n.\n3");

        let moves = g.collapse();

        assert_eq!(g, grid(".\n.\n1\n2\n3"));
        assert_eq!(
            moves,
            vec![
                Move {
                    from: (2, 0),
                    to: (3, 0)
                },
                Move {
                    from: (0, 0),
                    to: (2, 0)
                },
            ]
        );
    }

    #[test]
    fn collapse_is_column_local() {
        let mut g = grid("12\n.3\n4.");

        let moves = g.collapse();

        assert_eq!(g, grid("..\n12\n43"));
        assert!(moves.iter().all(|m| m.from.1 == m.to.1));
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn clear_counts_only_tiles() {
        let mut g = grid("111\n2.2");
        let matches: MatchSet = [(0, 0), (0, 1), (0, 2), (1, 1)].into_iter().collect();

        assert_eq!(g.clear(&matches), 3);
        assert_eq!(g, grid("...\n2.2"));
    }

    #[test]
    fn refill_fills_exactly_the_empty_cells() {
        let mut g = grid("1.\n.2\n33");
        let mut source = ScriptedTiles::new([0, 1]);

        let filled = g.refill(&mut source, 4);

        assert_eq!(filled, vec![(0, 1), (1, 0)]);
        assert_eq!(g, grid("10\n12\n33"));
        assert!(g.is_full());
    }

    #[test]
    fn swap_validates_coordinates() {
        let mut g = grid("01\n23");

        assert_eq!(g.swap((0, 0), (1, 1)), Ok(()));
        assert_eq!(g, grid("31\n20"));
        assert_eq!(g.swap((0, 0), (2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(g, grid("31\n20"));
    }

    #[test]
    fn validate_tiles_rejects_holes_and_out_of_range_colors() {
        assert_eq!(grid("012\n210").validate_tiles(3), Ok(()));
        assert_eq!(grid("013\n210").validate_tiles(3), Err(GameError::InvalidColor));
        assert_eq!(grid("01.\n210").validate_tiles(3), Err(GameError::InvalidColor));
    }
}
