use rand::rngs::SmallRng;

use super::*;

/// Uniformly random colors from a seeded generator, so games can be replayed from their seed.
#[derive(Clone, Debug)]
pub struct RandomTiles {
    rng: SmallRng,
}

impl RandomTiles {
    pub fn new(seed: u64) -> Self {
        use rand::prelude::*;

        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TileSource for RandomTiles {
    fn draw(&mut self, num_colors: ColorId) -> ColorId {
        use rand::prelude::*;

        if num_colors == 0 {
            return 0;
        }
        self.rng.random_range(0..num_colors)
    }
}
