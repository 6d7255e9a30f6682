//! Tool commands.
//!
//! Each command loads its inputs, runs the core operation and writes JSON to
//! the given writer. Logging goes through `tracing`, so stdout stays pure
//! JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::info;

use battle_core::army_generation::{deploy_facing, generate_army};
use battle_core::battle::{Battle, BattleLog, BattleReport, RecordingBattleLog, TracingBattleLog};
use battle_core::board::{Cell, ObstacleSet};
use battle_core::config::{load_roster, BattleConfig};
use battle_core::pathfinding::{find_path_between, path_length};
use battle_core::targeting::NearestReachable;
use battle_core::units::{Army, Unit};

use crate::error::{Result, ToolError};

/// Parse a cell argument of the form `x,y`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidCell`] for malformed input and
/// [`battle_core::error::GameError::OutOfBounds`] for cells off the board.
pub fn parse_cell(input: &str) -> Result<Cell> {
    let invalid = |reason: String| ToolError::InvalidCell {
        input: input.to_string(),
        reason,
    };

    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| invalid("expected x,y".into()))?;
    let x: i64 = x.trim().parse().map_err(|e| invalid(format!("x: {e}")))?;
    let y: i64 = y.trim().parse().map_err(|e| invalid(format!("y: {e}")))?;
    Ok(Cell::try_new(x, y)?)
}

/// Load the battle config, falling back to defaults, and apply a seed
/// override.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or is invalid.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<BattleConfig> {
    let mut config = match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            BattleConfig::load(path)?
        }
        None => BattleConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

/// Inputs for the `generate` command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// RON roster of unit kinds.
    pub roster: PathBuf,
    /// Point budget. Defaults to the config's `max_points`.
    pub points: Option<u32>,
    /// Placement seed override.
    pub seed: Option<u64>,
    /// Optional RON config file.
    pub config: Option<PathBuf>,
}

/// Generate one army and write it as pretty JSON.
///
/// # Errors
///
/// Returns an error if loading, generation or output fails.
pub fn generate(options: &GenerateOptions, out: &mut impl Write) -> Result<Army> {
    let config = load_config(options.config.as_deref(), options.seed)?;
    let roster = load_roster(&options.roster)?;
    let points = options.points.unwrap_or(config.max_points);

    let army = generate_army(&roster, points, &config.generation, config.seed)?;

    serde_json::to_writer_pretty(&mut *out, &army)?;
    writeln!(out)?;
    Ok(army)
}

/// Inputs for the `battle` command.
#[derive(Debug, Clone)]
pub struct BattleOptions {
    /// RON roster of unit kinds, shared by both armies.
    pub roster: PathBuf,
    /// Player budget. Defaults to the config's `max_points`.
    pub player_points: Option<u32>,
    /// Computer budget. Defaults to the config's `max_points`.
    pub computer_points: Option<u32>,
    /// Placement seed override.
    pub seed: Option<u64>,
    /// Optional RON config file.
    pub config: Option<PathBuf>,
}

/// Forwards strikes to `tracing` and keeps them for JSON output.
#[derive(Debug, Default)]
struct StrikeLog {
    trace: TracingBattleLog,
    recorded: RecordingBattleLog,
}

impl BattleLog for StrikeLog {
    fn record(&mut self, attacker: &Unit, target: &Unit) {
        self.trace.record(attacker, target);
        self.recorded.record(attacker, target);
    }
}

/// Run a battle and write one JSON line per strike, then the report.
///
/// # Errors
///
/// Returns an error if loading, generation, the battle or output fails.
pub fn battle(options: &BattleOptions, out: &mut impl Write) -> Result<BattleReport> {
    let config = load_config(options.config.as_deref(), options.seed)?;
    let roster = load_roster(&options.roster)?;

    let (player, computer) = deploy_facing(
        &roster,
        &config,
        options.player_points.unwrap_or(config.max_points),
        options.computer_points.unwrap_or(config.max_points),
    )?;

    let mut battle =
        Battle::new(player, computer, NearestReachable)?.with_max_rounds(config.max_rounds);
    let mut log = StrikeLog::default();
    let report = battle.run(&mut log)?;

    for entry in log.recorded.entries() {
        serde_json::to_writer(&mut *out, entry)?;
        writeln!(out)?;
    }
    serde_json::to_writer(&mut *out, &report)?;
    writeln!(out)?;
    Ok(report)
}

/// Find a path between two cells around blocked cells and write it as JSON.
///
/// The output holds `from`, `to`, `reachable`, `steps` and `path`. An
/// unreachable goal gives an empty path and `steps` of 0.
///
/// # Errors
///
/// Returns an error if the search or output fails.
pub fn path(from: Cell, to: Cell, blocked: &[Cell], out: &mut impl Write) -> Result<Vec<Cell>> {
    let obstacles: ObstacleSet = blocked.iter().copied().collect();
    let path = find_path_between(from, to, &obstacles)?;

    let summary = json!({
        "from": from,
        "to": to,
        "reachable": !path.is_empty(),
        "steps": path_length(&path),
        "path": &path,
    });
    serde_json::to_writer(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(path)
}
