use match3_core::{CascadeReport, Coord2, MatchEngine};
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::config::{BoardArgs, seed_or_clock};

#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Boards to play
    #[arg(short, long, default_value_t = 100)]
    pub games: u32,

    /// Random swaps attempted on each board
    #[arg(short, long, default_value_t = 50)]
    pub moves: u32,

    /// Seed for the whole run, random when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Default)]
struct Stats {
    games: u32,
    attempts: u64,
    committed: u64,
    cascades: u64,
    iterations: u64,
    longest: usize,
    achievements: u64,
    total_score: u64,
    best_score: u32,
}

impl Stats {
    fn add_cascade(&mut self, report: &CascadeReport) {
        if report.is_empty() {
            return;
        }
        self.cascades += 1;
        self.iterations += report.steps.len() as u64;
        self.longest = self.longest.max(report.steps.len());
        self.achievements += report.achievements.len() as u64;
    }

    fn add_game(&mut self, score: u32) {
        self.games += 1;
        self.total_score += u64::from(score);
        self.best_score = self.best_score.max(score);
    }

    fn print(&self) {
        let ratio = |a: u64, b: u64| if b == 0 { 0.0 } else { a as f64 / b as f64 };
        println!("games               {}", self.games);
        println!(
            "swaps               {} attempted, {} committed ({:.1}%)",
            self.attempts,
            self.committed,
            100.0 * ratio(self.committed, self.attempts)
        );
        println!(
            "cascades            {}, {:.2} iterations on average, longest {}",
            self.cascades,
            ratio(self.iterations, self.cascades),
            self.longest
        );
        println!(
            "score               {:.1} on average, best {}",
            ratio(self.total_score, u64::from(self.games)),
            self.best_score
        );
        println!("achievements        {}", self.achievements);
    }
}

/// A random cell and one of its orthogonal neighbours, `None` on a single-cell board.
fn random_swap(rng: &mut SmallRng, (rows, cols): Coord2) -> Option<(Coord2, Coord2)> {
    let (row, col) = (rng.random_range(0..rows), rng.random_range(0..cols));
    let neighbors: Vec<Coord2> = [
        row.checked_sub(1).map(|r| (r, col)),
        (row + 1 < rows).then(|| (row + 1, col)),
        col.checked_sub(1).map(|c| (row, c)),
        (col + 1 < cols).then(|| (row, col + 1)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if neighbors.is_empty() {
        return None;
    }
    let other = neighbors[rng.random_range(0..neighbors.len())];
    Some(((row, col), other))
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let file = args.board.file_config()?;
    let config = args.board.game_config(&file)?;
    let seed = seed_or_clock(args.seed);
    log::info!("simulating {} games with seed {}", args.games, seed);

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut stats = Stats::default();

    for game in 0..args.games {
        let mut engine = MatchEngine::with_seed(config, rng.random())?;
        stats.add_cascade(&engine.resolve_cascade());

        for _ in 0..args.moves {
            let Some((a, b)) = random_swap(&mut rng, config.size) else {
                break;
            };
            let report = engine.attempt_swap(a, b)?;
            stats.attempts += 1;
            if report.committed {
                stats.committed += 1;
                stats.add_cascade(&report.cascade);
            }
        }

        log::debug!("game {} scored {}", game, engine.score());
        stats.add_game(engine.score());
    }

    stats.print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use match3_core::{StepRecord, is_orthogonal_neighbor};

    use super::*;

    #[test]
    fn random_swaps_are_orthogonal_and_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..500 {
            let (a, b) = random_swap(&mut rng, (3, 5)).unwrap();
            assert!(is_orthogonal_neighbor(a, b));
            assert!(b.0 < 3 && b.1 < 5);
        }
    }

    #[test]
    fn single_cell_board_has_no_swaps() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(random_swap(&mut rng, (1, 1)), None);
    }

    #[test]
    fn stats_count_only_non_empty_cascades() {
        let mut stats = Stats::default();
        stats.add_cascade(&CascadeReport::default());
        assert_eq!(stats.cascades, 0);

        let report = CascadeReport {
            steps: vec![StepRecord::default(), StepRecord::default()],
            ..Default::default()
        };
        stats.add_cascade(&report);
        assert_eq!(stats.cascades, 1);
        assert_eq!(stats.longest, 2);
    }
}
