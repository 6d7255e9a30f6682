//! Test fixtures and helpers.
//!
//! Pre-built rosters, units and armies for consistent testing.

use battle_core::army_generation::deploy_facing;
use battle_core::board::Cell;
use battle_core::config::BattleConfig;
use battle_core::units::{Army, Unit, UnitId, UnitKind};

/// A small, varied roster of unit kinds.
#[must_use]
pub fn standard_roster() -> Vec<UnitKind> {
    vec![
        UnitKind::new("Knight", 70, 25, 30).with_attack_type("Melee"),
        UnitKind::new("Archer", 50, 20, 25).with_attack_type("Ranged"),
        UnitKind::new("Swordsman", 60, 15, 15).with_attack_type("Melee"),
        UnitKind::new("Pikeman", 35, 20, 20).with_attack_type("Melee"),
    ]
}

/// Build a single unit at `(x, y)`.
///
/// # Panics
///
/// Panics if the coordinates are off the board.
#[must_use]
pub fn unit_at(id: u32, health: u32, attack: u32, x: u32, y: u32) -> Unit {
    let kind = UnitKind::new("Soldier", health, attack, 10);
    Unit::from_kind(&kind, UnitId::new(id), format!("Soldier {id}"), Cell::new(x, y))
}

/// Generate two armies from the same roster facing each other, each with
/// `config.max_points` to spend.
///
/// # Panics
///
/// Panics if generation fails (invalid config).
#[must_use]
pub fn facing_armies(roster: &[UnitKind], config: &BattleConfig) -> (Army, Army) {
    deploy_facing(roster, config, config.max_points, config.max_points).expect("facing armies")
}
