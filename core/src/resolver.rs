use alloc::vec::Vec;
use core::mem;

use serde::{Deserialize, Serialize};

use crate::*;

/// Cascades longer than this are logged, they are not cut short.
pub const LONG_CASCADE: u32 = 64;

/// Valid transitions:
/// - Idle -> Detecting
/// - Detecting -> Idle
/// - Detecting -> Clearing
/// - Clearing -> Collapsing
/// - Collapsing -> Refilling
/// - Refilling -> Detecting
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadePhase {
    /// Board is stable and accepts player input
    #[default]
    Idle,
    /// Next step looks for matches
    Detecting,
    /// Next step empties these cells and scores them
    Clearing(MatchSet),
    /// Next step applies gravity
    Collapsing,
    /// Next step fills the holes
    Refilling,
}

impl CascadePhase {
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What a single cascade step did, enough for a presentation layer to animate it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeEvent {
    /// No matches left, the cascade is over.
    Settled,
    /// Matches found, they get cleared next.
    Detected(MatchSet),
    Cleared { cells: MatchSet, score: ClearScore },
    Collapsed(Vec<Move>),
    Refilled(Vec<Coord2>),
}

/// One clear → collapse → refill iteration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub cleared: MatchSet,
    pub score: ClearScore,
    pub moves: Vec<Move>,
    pub refilled: Vec<Coord2>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub total_score_delta: u32,
    pub achievements: Vec<u32>,
    pub steps: Vec<StepRecord>,
}

impl CascadeReport {
    /// Folds one event into the report.
    pub fn record(&mut self, event: CascadeEvent) {
        use CascadeEvent::*;

        match event {
            Settled | Detected(_) => {}
            Cleared { cells, score } => {
                self.total_score_delta = self.total_score_delta.saturating_add(score.gained);
                self.achievements.extend_from_slice(&score.achievements);
                self.steps.push(StepRecord {
                    cleared: cells,
                    score,
                    ..Default::default()
                });
            }
            Collapsed(moves) => {
                if let Some(step) = self.steps.last_mut() {
                    step.moves = moves;
                }
            }
            Refilled(cells) => {
                if let Some(step) = self.steps.last_mut() {
                    step.refilled = cells;
                }
            }
        }
    }

    /// Whether the cascade changed nothing.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn cleared_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.steps.iter().flat_map(|step| step.cleared.iter().copied())
    }

    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.steps.iter().flat_map(|step| step.moves.iter())
    }
}

/// Clear → collapse → refill → detect loop, advanced one transition at a time.
///
/// Termination is probabilistic: refills are random and may keep producing matches, with four
/// colors on an 8×8 board this ends after a handful of iterations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    phase: CascadePhase,
    iterations: u32,
}

impl Cascade {
    pub const fn idle() -> Self {
        Self {
            phase: CascadePhase::Idle,
            iterations: 0,
        }
    }

    /// Cascade that starts by checking the board for matches.
    pub const fn detecting() -> Self {
        Self {
            phase: CascadePhase::Detecting,
            iterations: 0,
        }
    }

    /// Cascade that starts by clearing matches that are already known.
    pub fn from_matches(matches: MatchSet) -> Self {
        Self {
            phase: CascadePhase::Clearing(matches),
            iterations: 0,
        }
    }

    pub fn phase(&self) -> &CascadePhase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        !self.phase.is_idle()
    }

    /// Re-checks the board if idle, a cascade already in flight is left alone.
    pub fn trigger(&mut self) {
        if !self.is_busy() {
            *self = Self::detecting();
        }
    }

    /// Performs one transition, `None` once idle.
    pub fn step<S: TileSource + ?Sized>(
        &mut self,
        grid: &mut Grid,
        scores: &mut ScoreTracker,
        source: &mut S,
        num_colors: ColorId,
    ) -> Option<CascadeEvent> {
        use CascadePhase::*;

        let (next, event) = match mem::take(&mut self.phase) {
            Idle => return None,
            Detecting => {
                let matches = find_matches(grid);
                if matches.is_empty() {
                    log::debug!("cascade settled after {} iterations", self.iterations);
                    (Idle, CascadeEvent::Settled)
                } else {
                    log::trace!("detected {} matched tiles", matches.len());
                    (Clearing(matches.clone()), CascadeEvent::Detected(matches))
                }
            }
            Clearing(cells) => {
                let cleared = grid.clear(&cells);
                let score = scores.record_clear(cleared);
                self.iterations += 1;
                if self.iterations == LONG_CASCADE {
                    log::warn!("cascade still running after {} iterations", self.iterations);
                }
                (Collapsing, CascadeEvent::Cleared { cells, score })
            }
            Collapsing => (Refilling, CascadeEvent::Collapsed(grid.collapse())),
            Refilling => (
                Detecting,
                CascadeEvent::Refilled(grid.refill(source, num_colors)),
            ),
        };

        self.phase = next;
        Some(event)
    }

    /// Steps until idle, collecting every event into a report.
    pub fn run<S: TileSource + ?Sized>(
        &mut self,
        grid: &mut Grid,
        scores: &mut ScoreTracker,
        source: &mut S,
        num_colors: ColorId,
    ) -> CascadeReport {
        let mut report = CascadeReport::default();
        while let Some(event) = self.step(grid, scores, source, num_colors) {
            report.record(event);
        }
        report
    }
}

/// Resolves `grid` until it is stable.
pub fn resolve<S: TileSource + ?Sized>(
    grid: &mut Grid,
    scores: &mut ScoreTracker,
    source: &mut S,
    num_colors: ColorId,
) -> CascadeReport {
    Cascade::detecting().run(grid, scores, source, num_colors)
}
