use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod play;
mod scores;
mod simulate;

#[derive(Parser, Debug)]
#[command(version, about = "Match-three puzzle in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game on stdin/stdout
    Play(play::PlayArgs),
    /// Play random swaps on many boards and report cascade statistics
    Simulate(simulate::SimulateArgs),
    /// Show the high score table
    Scores(scores::ScoresArgs),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(args.verbose.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    log::debug!("{:?}", args.command);

    match args.command {
        Command::Play(args) => play::run(args),
        Command::Simulate(args) => simulate::run(args),
        Command::Scores(args) => scores::run(args),
    }
}
