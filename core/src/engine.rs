use serde::{Deserialize, Serialize};

use crate::*;

/// Result of exchanging two tiles, before any cascade has run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub cells: (Coord2, Coord2),
    /// Whether the swap produced a match and was kept.
    pub committed: bool,
    /// Tiles the committed swap is about to clear, empty when reverted.
    pub matches: MatchSet,
}

/// Result of a swap resolved to the end of its cascade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReport {
    pub committed: bool,
    pub cascade: CascadeReport,
}

impl SwapReport {
    pub fn score_delta(&self) -> u32 {
        self.cascade.total_score_delta
    }

    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.cascade.moves()
    }

    pub fn cleared_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cascade.cleared_cells()
    }
}

/// Outcome of clicking a cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Board is busy, the click was dropped
    Ignored,
    Selected(Coord2),
    Deselected,
    /// Second click on a neighbour of the selection
    Swapped(SwapOutcome),
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(&self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Selected(_) => true,
            Self::Deselected => true,
            Self::Swapped(_) => true,
        }
    }
}

/// A game session: the board, its score, and the cascade currently running on it.
///
/// While a cascade is in flight the engine is busy and rejects swaps. A driver either calls
/// [`MatchEngine::resolve_cascade`] or advances it with [`MatchEngine::step`], pausing between
/// steps for animations; both end in the same board and score.
#[derive(Clone, Debug)]
pub struct MatchEngine<S = RandomTiles> {
    config: GameConfig,
    grid: Grid,
    scores: ScoreTracker,
    source: S,
    cascade: Cascade,
    selection: Option<Coord2>,
}

impl MatchEngine<RandomTiles> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomTiles::new(seed))
    }
}

impl<S: TileSource> MatchEngine<S> {
    /// Starts a game on a freshly generated board.
    ///
    /// The board may hold diagonal runs, so the engine starts busy with a cascade that clears
    /// them (and scores them) before the first move.
    pub fn new(config: GameConfig, mut source: S) -> Result<Self> {
        let grid = new_game(&config, &mut source)?;
        log::debug!("new {}x{} game", config.size.0, config.size.1);

        Ok(Self {
            scores: ScoreTracker::from_config(&config),
            config,
            grid,
            source,
            cascade: Cascade::detecting(),
            selection: None,
        })
    }

    /// Continues on an existing board, which must be completely filled with valid colors.
    pub fn from_grid(config: GameConfig, grid: Grid, source: S) -> Result<Self> {
        config.validate()?;
        if grid.size() != config.size {
            return Err(GameError::InvalidBoardShape);
        }
        grid.validate_tiles(config.num_colors)?;

        Ok(Self {
            scores: ScoreTracker::from_config(&config),
            config,
            grid,
            source,
            cascade: Cascade::idle(),
            selection: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Owned copy of the board for a presentation layer.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn next_threshold(&self) -> u32 {
        self.scores.next_threshold()
    }

    pub fn phase(&self) -> &CascadePhase {
        self.cascade.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.cascade.is_busy()
    }

    pub fn selection(&self) -> Option<Coord2> {
        self.selection
    }

    /// Advances the running cascade by one transition, `None` when idle.
    pub fn step(&mut self) -> Option<CascadeEvent> {
        self.cascade.step(
            &mut self.grid,
            &mut self.scores,
            &mut self.source,
            self.config.num_colors,
        )
    }

    /// Runs the current cascade to the end, or re-checks the board when idle.
    pub fn resolve_cascade(&mut self) -> CascadeReport {
        self.cascade.trigger();
        self.cascade.run(
            &mut self.grid,
            &mut self.scores,
            &mut self.source,
            self.config.num_colors,
        )
    }

    /// Exchanges two orthogonally adjacent tiles and keeps the exchange only if it creates a
    /// match, in which case a cascade is armed and the engine is busy until it is resolved.
    pub fn begin_swap(&mut self, a: Coord2, b: Coord2) -> Result<SwapOutcome> {
        if self.is_busy() {
            return Err(GameError::Busy);
        }
        if !self.grid.contains(a) || !self.grid.contains(b) || !is_orthogonal_neighbor(a, b) {
            return Err(GameError::InvalidMove);
        }

        self.selection = None;
        self.grid.swap(a, b)?;

        let matches = find_matches(&self.grid);
        let committed = !matches.is_empty();
        if committed {
            log::debug!("swap {:?} <-> {:?} matched {} tiles", a, b, matches.len());
            self.cascade = Cascade::from_matches(matches.clone());
        } else {
            log::debug!("swap {:?} <-> {:?} made no match, reverting", a, b);
            self.grid.swap(a, b)?;
        }

        Ok(SwapOutcome {
            cells: (a, b),
            committed,
            matches,
        })
    }

    /// [`Self::begin_swap`] followed by the whole cascade.
    pub fn attempt_swap(&mut self, a: Coord2, b: Coord2) -> Result<SwapReport> {
        let outcome = self.begin_swap(a, b)?;
        let cascade = if outcome.committed {
            self.resolve_cascade()
        } else {
            CascadeReport::default()
        };

        Ok(SwapReport {
            committed: outcome.committed,
            cascade,
        })
    }

    /// Click on a cell: select it, deselect it, or swap it with the selected neighbour.
    ///
    /// A swap is only started here, a committed one still has to be resolved.
    pub fn select(&mut self, coords: Coord2) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        let coords = self.grid.validate_coords(coords)?;
        if self.is_busy() {
            self.selection = None;
            return Ok(Ignored);
        }

        Ok(match self.selection {
            Some(selected) if selected == coords => {
                self.selection = None;
                Deselected
            }
            Some(selected) if is_orthogonal_neighbor(selected, coords) => {
                Swapped(self.begin_swap(selected, coords)?)
            }
            _ => {
                self.selection = Some(coords);
                Selected(coords)
            }
        })
    }
}
