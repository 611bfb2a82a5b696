use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Supplies tile colors for generation and refills.
pub trait TileSource {
    /// Next color, in `[0, num_colors)`.
    fn draw(&mut self, num_colors: ColorId) -> ColorId;
}

impl<T: TileSource + ?Sized> TileSource for &mut T {
    fn draw(&mut self, num_colors: ColorId) -> ColorId {
        (**self).draw(num_colors)
    }
}

/// Replays a fixed color sequence, wrapping around at the end.
///
/// Generation redraws until a color fits, so a sequence used for it must offer alternatives at
/// every cell or it never finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedTiles {
    colors: Vec<ColorId>,
    next: usize,
}

impl ScriptedTiles {
    pub fn new(colors: impl IntoIterator<Item = ColorId>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
            next: 0,
        }
    }
}

impl TileSource for ScriptedTiles {
    fn draw(&mut self, num_colors: ColorId) -> ColorId {
        let Some(&color) = self.colors.get(self.next) else {
            return 0;
        };
        self.next = (self.next + 1) % self.colors.len();
        color % num_colors.max(1)
    }
}

/// Fills a fresh board in row-major order, redrawing any color that would complete a run of
/// three with the two tiles to its left or the two above it.
///
/// Diagonals are not checked here, the first cascade clears whatever lines up on them.
pub fn generate<S: TileSource + ?Sized>(config: &GameConfig, source: &mut S) -> Grid {
    let mut grid = Grid::new(config.size);
    let mut redraws: u32 = 0;

    for coords in grid.iter_coords() {
        loop {
            let color = source.draw(config.num_colors);
            if !completes_line(&grid, coords, color) {
                grid[coords] = Cell::Tile(color);
                break;
            }
            redraws += 1;
        }
    }

    log::trace!(
        "generated {}x{} board, {} redraws",
        config.size.0,
        config.size.1,
        redraws
    );
    grid
}

/// Validates `config` and generates its starting board.
pub fn new_game<S: TileSource + ?Sized>(config: &GameConfig, source: &mut S) -> Result<Grid> {
    config.validate()?;
    Ok(generate(config, source))
}

fn completes_line(grid: &Grid, (row, col): Coord2, color: ColorId) -> bool {
    let same = |coords: Coord2| grid.color_at(coords) == Some(color);
    let left = col >= 2 && same((row, col - 1)) && same((row, col - 2));
    let above = row >= 2 && same((row - 1, col)) && same((row - 2, col));
    left || above
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_boards_have_no_line_matches() {
        let config = GameConfig::default();
        for seed in 0..200 {
            let grid = generate(&config, &mut RandomTiles::new(seed));

            assert_eq!(grid.size(), config.size);
            assert!(grid.is_full());
            assert_eq!(grid.validate_tiles(config.num_colors), Ok(()));
            assert!(find_line_matches(&grid).is_empty(), "seed {seed}:\n{grid}");
        }
    }

    #[test]
    fn generation_is_reproducible_per_seed() {
        let config = GameConfig::new((6, 9), 5).unwrap();

        let a = generate(&config, &mut RandomTiles::new(42));
        let b = generate(&config, &mut RandomTiles::new(42));

        assert_eq!(a, b);
    }

    #[test]
    fn generation_redraws_colors_that_complete_a_line() {
        // the third cell of the row would finish 0-0-0, the scripted source then offers 1
        let config = GameConfig::new((1, 3), 3).unwrap();
        let mut source = ScriptedTiles::new([0, 0, 0, 1]);

        let grid = generate(&config, &mut source);

        assert_eq!(grid, "001".parse::<Grid>().unwrap());
    }

    #[test]
    fn new_game_rejects_invalid_config_before_generating() {
        let config = GameConfig::new_unchecked((8, 8), 2);
        let mut source = ScriptedTiles::new([0]);

        assert_eq!(new_game(&config, &mut source), Err(GameError::TooFewColors));
    }

    #[test]
    fn scripted_tiles_wrap_and_stay_in_range() {
        let mut source = ScriptedTiles::new([1, 5]);

        assert_eq!(source.draw(4), 1);
        assert_eq!(source.draw(4), 1);
        assert_eq!(source.draw(4), 1);
        assert_eq!(ScriptedTiles::new([]).draw(4), 0);
    }
}
