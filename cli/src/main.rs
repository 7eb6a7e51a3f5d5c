use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod bench;
mod play;

/// Play Connect Four against the minimax engine, or measure its search.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal.
    Play {
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Let the human move first (the engine opens by default).
        #[arg(long)]
        human_first: bool,
    },
    /// Time the search and count expanded nodes with and without pruning.
    Bench(bench::Config),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn depth(self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            difficulty,
            human_first,
        } => {
            let stdin = io::stdin();
            play::run(stdin.lock(), io::stdout(), difficulty.depth(), human_first)?;
        }
        Command::Bench(config) => {
            let experiment = bench::run(&config)?;
            if config.csv {
                bench::write_csv(&experiment, io::stdout())?;
            } else {
                bench::write_table(&experiment, io::stdout())?;
            }
        }
    }
    Ok(())
}
