//! # Battle Core
//!
//! Turn-based grid battle simulator.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No system randomness (placement uses a seeded RNG)
//! - No floating-point math (scoring uses fixed-point)
//!
//! The same seed, roster and config always produce the same armies,
//! the same routes and the same battle.
//!
//! ## Crate Structure
//!
//! - [`board`] - Board geometry, cells and obstacle sets
//! - [`pathfinding`] - Shortest routes between units
//! - [`units`] - Unit kinds, units and armies
//! - [`army_generation`] - Budgeted army generation with random placement
//! - [`targeting`] - Attack target selection
//! - [`battle`] - Round-based battle resolution
//! - [`config`] - RON configuration and roster loading
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod army_generation;
pub mod battle;
pub mod board;
pub mod config;
pub mod error;
pub mod math;
pub mod pathfinding;
pub mod targeting;
pub mod units;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::army_generation::{deploy_facing, generate_army};
    pub use crate::battle::{
        Battle, BattleLog, BattleLogEntry, BattleOutcome, BattleReport, RecordingBattleLog, Side,
        TracingBattleLog,
    };
    pub use crate::board::{Cell, ObstacleSet, HEIGHT, WIDTH};
    pub use crate::config::{BattleConfig, GenerationConfig};
    pub use crate::error::{GameError, Result};
    pub use crate::pathfinding::{find_path, find_path_between, BoardEntity};
    pub use crate::targeting::{AttackProgram, BattleView, NearestReachable, Strike};
    pub use crate::units::{Army, Unit, UnitId, UnitKind};
}
