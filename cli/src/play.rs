use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use match3_core::{
    CascadeEvent, CascadeReport, Coord, Coord2, MatchEngine, SelectOutcome, SwapOutcome, TileSource,
};
use match3_protocol::DEFAULT_NAME;

use crate::config::{BoardArgs, seed_or_clock};
use crate::scores;

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Seed for the board and its refills, random when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Name recorded in the high score table
    #[arg(short, long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// High score file
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// Pause between cascade steps, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Input {
    Nothing,
    Help,
    Quit,
    Select(Coord2),
    Swap(Coord2, Coord2),
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    match line {
        "" => return Ok(Input::Nothing),
        "q" | "quit" | "exit" => return Ok(Input::Quit),
        "h" | "help" | "?" => return Ok(Input::Help),
        _ => {}
    }

    let numbers = line
        .split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<Coord>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("could not read {line:?}, type `help` for commands"))?;

    match numbers[..] {
        [row, col] => Ok(Input::Select((row, col))),
        [r1, c1, r2, c2] => Ok(Input::Swap((r1, c1), (r2, c2))),
        _ => Err("expected `row col` or `row col row col`".to_owned()),
    }
}

fn print_help() {
    println!("  row col           select a tile, select a neighbour to swap");
    println!("  row col row col   swap two neighbouring tiles");
    println!("  help              show this help");
    println!("  quit              end the game and record the score");
}

fn print_board<S: TileSource>(engine: &MatchEngine<S>) {
    let grid = engine.grid();

    let header: String = (0..grid.cols()).map(|col| format!("{col:>3}")).collect();
    println!("    {header}");
    for row in 0..grid.rows() {
        let line: String = (0..grid.cols())
            .map(|col| {
                let ch = grid.cell_at((row, col)).to_char();
                if engine.selection() == Some((row, col)) {
                    format!(" [{ch}")
                } else {
                    format!("  {ch}")
                }
            })
            .collect();
        println!("{row:>3} {line}");
    }
    println!(
        "score {}  next achievement at {}",
        engine.score(),
        engine.next_threshold()
    );
}

/// Runs the armed cascade to the end, pausing after each step when `pause` is non-zero.
fn drive<S: TileSource>(engine: &mut MatchEngine<S>, pause: Duration) -> CascadeReport {
    if pause.is_zero() {
        return engine.resolve_cascade();
    }

    let mut report = CascadeReport::default();
    while let Some(event) = engine.step() {
        log::trace!("{:?}", event);
        let redraw = matches!(event, CascadeEvent::Refilled(_));
        report.record(event);
        if redraw {
            print_board(engine);
        }
        thread::sleep(pause);
    }
    report
}

fn print_report(report: &CascadeReport) {
    for (i, step) in report.steps.iter().enumerate() {
        println!(
            "  cascade {}: cleared {} tiles, +{}",
            i + 1,
            step.score.cleared,
            step.score.gained
        );
    }
    for threshold in &report.achievements {
        println!("  *** achievement: {threshold} points! ***");
    }
}

fn play_swap<S: TileSource>(engine: &mut MatchEngine<S>, outcome: SwapOutcome, pause: Duration) {
    if outcome.committed {
        let report = drive(engine, pause);
        print_report(&report);
    } else {
        println!("no match, tiles swapped back");
    }
}

/// Plays out a click, returning whether the board needs to be redrawn.
fn apply_select<S: TileSource>(
    engine: &mut MatchEngine<S>,
    outcome: SelectOutcome,
    pause: Duration,
) -> bool {
    log::debug!("{:?}", outcome);
    let redraw = outcome.has_update();
    if let SelectOutcome::Swapped(swap) = outcome {
        play_swap(engine, swap, pause);
    }
    redraw
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let file = args.board.file_config()?;
    let config = args.board.game_config(&file)?;
    let seed = seed_or_clock(args.seed);
    let pause = Duration::from_millis(args.delay_ms);
    log::info!("starting game with seed {}", seed);

    let mut engine = MatchEngine::with_seed(config, seed)?;
    let opening = drive(&mut engine, pause);
    if !opening.is_empty() {
        println!("opening board settled");
        print_report(&opening);
    }
    print_board(&engine);
    print_help();

    for line in io::stdin().lines() {
        let line = line.context("could not read input")?;
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        let redraw = match input {
            Input::Nothing => false,
            Input::Help => {
                print_help();
                false
            }
            Input::Quit => break,
            Input::Select(coords) => match engine.select(coords) {
                Ok(outcome) => apply_select(&mut engine, outcome, pause),
                Err(err) => {
                    println!("{err}");
                    false
                }
            },
            Input::Swap(a, b) => match engine.begin_swap(a, b) {
                Ok(outcome) => {
                    play_swap(&mut engine, outcome, pause);
                    true
                }
                Err(err) => {
                    println!("{err}");
                    false
                }
            },
        };
        if redraw {
            print_board(&engine);
        }
        io::stdout().flush().context("could not write output")?;
    }

    let score = engine.score();
    println!("final score {score}");

    let path = scores::scores_path(args.scores.as_deref(), &file);
    let mut table = scores::load_or_empty(&path);
    if let Some(rank) = table.record(&args.name, score) {
        scores::save(&path, &table)?;
        println!("#{} in the high scores", rank + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use match3_core::{GameConfig, Grid, ScriptedTiles};

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("  "), Ok(Input::Nothing));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
        assert_eq!(parse_input("?"), Ok(Input::Help));
        assert_eq!(parse_input("3 4"), Ok(Input::Select((3, 4))));
        assert_eq!(parse_input("3,4 3,5"), Ok(Input::Swap((3, 4), (3, 5))));
    }

    #[test]
    fn only_clicks_that_change_something_redraw() {
        let grid: Grid = "0202\n1313\n2020\n3131".parse().unwrap();
        let config = GameConfig::new(grid.size(), 4).unwrap();
        let mut engine = MatchEngine::from_grid(config, grid, ScriptedTiles::new([0])).unwrap();

        let outcome = engine.select((1, 1)).unwrap();
        assert!(apply_select(&mut engine, outcome, Duration::ZERO));
        assert!(!apply_select(&mut engine, SelectOutcome::Ignored, Duration::ZERO));

        let outcome = engine.select((1, 2)).unwrap();
        assert!(matches!(outcome, SelectOutcome::Swapped(_)));
        assert!(apply_select(&mut engine, outcome, Duration::ZERO));
        assert!(!engine.is_busy());
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_input("3").is_err());
        assert!(parse_input("a b").is_err());
        assert!(parse_input("1 2 3").is_err());
        assert!(parse_input("-1 2").is_err());
    }
}
