//! Grid Battle - Command-line tools
//!
//! # Usage
//!
//! ```bash
//! # Print a 300-point army as JSON
//! cargo run -p battle_tools -- generate --roster roster.ron --points 300
//!
//! # Run a battle, one JSON line per strike and a final report
//! cargo run -p battle_tools -- battle --roster roster.ron --seed 7
//!
//! # Route around two blocked cells
//! cargo run -p battle_tools -- path --from 0,0 --to 5,0 --block 1,0 --block 1,1
//! ```
//!
//! Output (stdout): JSON
//! Logs (stderr): tracing events

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use battle_core::board::Cell;
use battle_tools::commands::{self, BattleOptions, GenerateOptions};
use battle_tools::error::Result;

#[derive(Parser)]
#[command(name = "battle_tools")]
#[command(about = "Army generation, battles and path queries on the battle grid")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an army from a roster and print it
    Generate {
        /// RON file listing unit kinds
        #[arg(short, long)]
        roster: PathBuf,

        /// Point budget (defaults to the config's max_points)
        #[arg(short, long)]
        points: Option<u32>,

        /// Placement seed
        #[arg(long)]
        seed: Option<u64>,

        /// RON battle config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate two armies and fight a battle
    Battle {
        /// RON file listing unit kinds
        #[arg(short, long)]
        roster: PathBuf,

        /// Player point budget
        #[arg(long)]
        player_points: Option<u32>,

        /// Computer point budget
        #[arg(long)]
        computer_points: Option<u32>,

        /// Placement seed
        #[arg(long)]
        seed: Option<u64>,

        /// RON battle config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Find the shortest path between two cells
    Path {
        /// Start cell as x,y
        #[arg(long, value_parser = commands::parse_cell)]
        from: Cell,

        /// Goal cell as x,y
        #[arg(long, value_parser = commands::parse_cell)]
        to: Cell,

        /// Blocked cell as x,y (repeatable)
        #[arg(long = "block", value_parser = commands::parse_cell)]
        blocked: Vec<Cell>,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Generate {
            roster,
            points,
            seed,
            config,
        } => {
            let army = commands::generate(
                &GenerateOptions {
                    roster,
                    points,
                    seed,
                    config,
                },
                &mut out,
            )?;
            tracing::debug!(units = army.units.len(), points = army.points, "Army written");
        }
        Commands::Battle {
            roster,
            player_points,
            computer_points,
            seed,
            config,
        } => {
            let report = commands::battle(
                &BattleOptions {
                    roster,
                    player_points,
                    computer_points,
                    seed,
                    config,
                },
                &mut out,
            )?;
            tracing::info!(outcome = ?report.outcome, rounds = report.rounds, "Battle over");
        }
        Commands::Path { from, to, blocked } => {
            commands::path(from, to, &blocked, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
