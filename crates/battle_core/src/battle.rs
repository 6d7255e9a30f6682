//! Round-based battle resolution between a player army and a computer army.
//!
//! Each round both armies are sorted by descending attack, then every unit
//! takes one turn: all player units first, then all computer units. A unit
//! killed earlier in the round loses its turn. Dead units are removed once
//! the round ends.
//!
//! The player army deploys on the right edge and the computer army on the
//! left, so player units always attack the left army.
//!
//! # Example
//!
//! ```
//! use battle_core::battle::{Battle, BattleOutcome, RecordingBattleLog};
//! use battle_core::board::Cell;
//! use battle_core::targeting::NearestReachable;
//! use battle_core::units::{Army, Unit, UnitId, UnitKind};
//!
//! let knight = UnitKind::new("Knight", 50, 30, 20);
//! let imp = UnitKind::new("Imp", 20, 5, 5);
//! let player = Army::from_units(vec![Unit::from_kind(&knight, UnitId::new(0), "Knight 0", Cell::new(26, 4))]);
//! let computer = Army::from_units(vec![Unit::from_kind(&imp, UnitId::new(1), "Imp 0", Cell::new(0, 4))]);
//!
//! let mut battle = Battle::new(player, computer, NearestReachable).unwrap();
//! let mut log = RecordingBattleLog::default();
//! let report = battle.run(&mut log).unwrap();
//!
//! assert_eq!(report.outcome, BattleOutcome::PlayerWins);
//! assert_eq!(log.entries().len(), 1);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::ObstacleSet;
use crate::error::{GameError, Result};
use crate::targeting::{AttackProgram, BattleView};
use crate::units::{Army, Unit, UnitId};

/// Default round cap.
pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

/// Which army a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Right-edge army.
    Player,
    /// Left-edge army.
    Computer,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Computer,
            Self::Computer => Self::Player,
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// Only player units survive.
    PlayerWins,
    /// Only computer units survive.
    ComputerWins,
    /// Both armies were wiped out.
    Draw,
    /// Both armies survive but no one can land a strike, or the round cap
    /// was reached.
    Stalemate,
}

/// Sink for strikes, called after every successful attack.
pub trait BattleLog {
    /// Record that `attacker` just hit `target`. `target` reflects the
    /// damage already applied.
    fn record(&mut self, attacker: &Unit, target: &Unit);
}

/// Emits every strike as an `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBattleLog;

impl BattleLog for TracingBattleLog {
    fn record(&mut self, attacker: &Unit, target: &Unit) {
        info!(
            attacker = %attacker.name,
            target = %target.name,
            damage = attacker.base_attack,
            target_health = target.health,
            killed = !target.alive,
            "Strike"
        );
    }
}

/// One recorded strike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleLogEntry {
    /// Attacking unit.
    pub attacker: UnitId,
    /// Attacker display name.
    pub attacker_name: String,
    /// Attacked unit.
    pub target: UnitId,
    /// Target display name.
    pub target_name: String,
    /// Damage dealt.
    pub damage: u32,
    /// Target health after the strike.
    pub target_health: i64,
    /// Whether the strike killed the target.
    pub killed: bool,
}

/// Collects strikes in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingBattleLog {
    entries: Vec<BattleLogEntry>,
}

impl RecordingBattleLog {
    /// Strikes recorded so far, in order.
    #[must_use]
    pub fn entries(&self) -> &[BattleLogEntry] {
        &self.entries
    }

    /// Consume the log, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<BattleLogEntry> {
        self.entries
    }
}

impl BattleLog for RecordingBattleLog {
    fn record(&mut self, attacker: &Unit, target: &Unit) {
        self.entries.push(BattleLogEntry {
            attacker: attacker.id,
            attacker_name: attacker.name.clone(),
            target: target.id,
            target_name: target.name.clone(),
            damage: attacker.base_attack,
            target_health: target.health,
            killed: !target.alive,
        });
    }
}

/// Summary of a finished battle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleReport {
    /// How the battle ended.
    pub outcome: BattleOutcome,
    /// Rounds played.
    pub rounds: u32,
    /// Strikes landed across all rounds.
    pub strikes: u32,
    /// Living player units at the end.
    pub player_survivors: usize,
    /// Living computer units at the end.
    pub computer_survivors: usize,
}

/// A battle in progress.
#[derive(Debug, Clone)]
pub struct Battle<P> {
    player: Army,
    computer: Army,
    program: P,
    max_rounds: u32,
    rounds: u32,
    strikes: u32,
}

impl<P: AttackProgram> Battle<P> {
    /// Set up a battle.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if two units share an ID, a unit
    /// stands off the board, or two living units share a cell.
    pub fn new(player: Army, computer: Army, program: P) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut occupied = ObstacleSet::new();
        for unit in player.units.iter().chain(&computer.units) {
            if !seen.insert(unit.id) {
                return Err(GameError::InvalidState(format!(
                    "Duplicate unit ID {}",
                    unit.id
                )));
            }
            if !unit.position.is_on_board() {
                return Err(GameError::InvalidState(format!(
                    "{} stands off the board at {}",
                    unit.name, unit.position
                )));
            }
            if unit.alive && !occupied.insert(unit.position) {
                return Err(GameError::InvalidState(format!(
                    "{} shares {} with another unit",
                    unit.name, unit.position
                )));
            }
        }

        Ok(Self {
            player,
            computer,
            program,
            max_rounds: DEFAULT_MAX_ROUNDS,
            rounds: 0,
            strikes: 0,
        })
    }

    /// Set the round cap.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// The player army.
    #[must_use]
    pub fn player(&self) -> &Army {
        &self.player
    }

    /// The computer army.
    #[must_use]
    pub fn computer(&self) -> &Army {
        &self.computer
    }

    /// Rounds played so far.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Fight until one side is wiped out or the battle stalls.
    pub fn run(&mut self, log: &mut impl BattleLog) -> Result<BattleReport> {
        info!(
            player_units = self.player.units.len(),
            computer_units = self.computer.units.len(),
            "Battle started"
        );

        while self.player.has_alive_units() && self.computer.has_alive_units() {
            if self.rounds >= self.max_rounds {
                warn!(rounds = self.rounds, "Round cap reached");
                break;
            }
            let strikes = self.run_round(log)?;
            if strikes == 0 {
                warn!(round = self.rounds, "No strikes landed, stopping");
                break;
            }
        }

        let report = self.report();
        info!(
            outcome = ?report.outcome,
            rounds = report.rounds,
            strikes = report.strikes,
            "Battle finished"
        );
        Ok(report)
    }

    /// Play one round. Returns the number of strikes landed.
    pub fn run_round(&mut self, log: &mut impl BattleLog) -> Result<u32> {
        sort_by_attack(&mut self.player);
        sort_by_attack(&mut self.computer);

        let turn_order: Vec<(Side, UnitId)> = self
            .player
            .units
            .iter()
            .map(|u| (Side::Player, u.id))
            .chain(self.computer.units.iter().map(|u| (Side::Computer, u.id)))
            .collect();

        let mut strikes = 0;
        for (side, attacker_id) in turn_order {
            if self.take_turn(side, attacker_id, log)? {
                strikes += 1;
            }
        }

        self.player.remove_dead();
        self.computer.remove_dead();
        self.rounds += 1;
        self.strikes += strikes;
        debug!(round = self.rounds, strikes, "Round finished");
        Ok(strikes)
    }

    /// Current outcome, judged from surviving units.
    #[must_use]
    pub fn outcome(&self) -> BattleOutcome {
        match (self.player.has_alive_units(), self.computer.has_alive_units()) {
            (true, true) => BattleOutcome::Stalemate,
            (true, false) => BattleOutcome::PlayerWins,
            (false, true) => BattleOutcome::ComputerWins,
            (false, false) => BattleOutcome::Draw,
        }
    }

    /// Summary of the battle so far.
    #[must_use]
    pub fn report(&self) -> BattleReport {
        BattleReport {
            outcome: self.outcome(),
            rounds: self.rounds,
            strikes: self.strikes,
            player_survivors: self.player.alive_units().count(),
            computer_survivors: self.computer.alive_units().count(),
        }
    }

    /// One unit's turn. Returns whether a strike landed.
    fn take_turn(
        &mut self,
        side: Side,
        attacker_id: UnitId,
        log: &mut impl BattleLog,
    ) -> Result<bool> {
        let (own, enemy) = match side {
            Side::Player => (&self.player, &mut self.computer),
            Side::Computer => (&self.computer, &mut self.player),
        };

        let Some(attacker) = own.get(attacker_id).filter(|u| u.alive) else {
            return Ok(false);
        };

        let view = BattleView {
            allies: &own.units,
            enemies: &enemy.units,
            enemies_on_left: side == Side::Player,
        };
        let Some(strike) = self.program.choose_target(attacker, &view)? else {
            return Ok(false);
        };

        let Some(target) = enemy.get_mut(strike.target) else {
            warn!(
                attacker = %attacker.id,
                target = %strike.target,
                "Program chose a unit outside the enemy army"
            );
            return Ok(false);
        };
        if !target.alive {
            return Ok(false);
        }

        target.take_damage(attacker.base_attack);
        log.record(attacker, target);
        Ok(true)
    }
}

/// Sort by descending base attack. Equal attacks keep their order.
fn sort_by_attack(army: &mut Army) {
    army.units.sort_by(|a, b| b.base_attack.cmp(&a.base_attack));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::targeting::{NearestReachable, Strike};

    fn unit(id: u32, name: &str, health: u32, attack: u32, x: u32, y: u32) -> Unit {
        let kind = crate::units::UnitKind::new(name, health, attack, 10);
        Unit::from_kind(&kind, UnitId::new(id), format!("{name} {id}"), Cell::new(x, y))
    }

    /// Never attacks.
    struct Pacifist;

    impl AttackProgram for Pacifist {
        fn choose_target(&self, _: &Unit, _: &BattleView<'_>) -> Result<Option<Strike>> {
            Ok(None)
        }
    }

    /// Always names a unit that does not exist.
    struct Confused;

    impl AttackProgram for Confused {
        fn choose_target(&self, _: &Unit, _: &BattleView<'_>) -> Result<Option<Strike>> {
            Ok(Some(Strike {
                target: UnitId::new(999),
                path: Vec::new(),
            }))
        }
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Computer);
        assert_eq!(Side::Computer.opponent(), Side::Player);
    }

    #[test]
    fn test_one_sided_battle() {
        let player = Army::from_units(vec![unit(0, "Knight", 50, 30, 26, 4)]);
        let computer = Army::from_units(vec![unit(1, "Imp", 20, 5, 0, 4)]);

        let mut battle = Battle::new(player, computer, NearestReachable).unwrap();
        let mut log = RecordingBattleLog::default();
        let report = battle.run(&mut log).unwrap();

        assert_eq!(report.outcome, BattleOutcome::PlayerWins);
        assert_eq!(report.rounds, 1);
        assert_eq!(report.strikes, 1);
        assert_eq!(report.player_survivors, 1);
        assert_eq!(report.computer_survivors, 0);

        let entry = &log.entries()[0];
        assert_eq!(entry.attacker_name, "Knight 0");
        assert_eq!(entry.target_name, "Imp 1");
        assert_eq!(entry.damage, 30);
        assert_eq!(entry.target_health, -10);
        assert!(entry.killed);
        assert!(battle.computer().units.is_empty());
    }

    #[test]
    fn test_player_moves_first() {
        // Both one-shot each other; the player strikes first and wins.
        let player = Army::from_units(vec![unit(0, "Archer", 10, 10, 26, 0)]);
        let computer = Army::from_units(vec![unit(1, "Archer", 10, 10, 0, 0)]);

        let mut battle = Battle::new(player, computer, NearestReachable).unwrap();
        let report = battle.run(&mut RecordingBattleLog::default()).unwrap();
        assert_eq!(report.outcome, BattleOutcome::PlayerWins);
        assert_eq!(report.strikes, 1);
    }

    #[test]
    fn test_strikes_in_descending_attack_order() {
        let player = Army::from_units(vec![
            unit(0, "Weak", 100, 1, 26, 0),
            unit(1, "Strong", 100, 9, 26, 1),
            unit(2, "Mid", 100, 5, 26, 2),
        ]);
        let computer = Army::from_units(vec![unit(3, "Wall", 1000, 1, 0, 10)]);

        let mut battle = Battle::new(player, computer, NearestReachable).unwrap();
        let mut log = RecordingBattleLog::default();
        battle.run_round(&mut log).unwrap();

        let attackers: Vec<u32> = log.entries().iter().map(|e| e.attacker.as_u32()).collect();
        assert_eq!(attackers, vec![1, 2, 0, 3]);
        assert_eq!(battle.computer().units[0].health, 1000 - 15);
    }

    #[test]
    fn test_dead_units_lose_their_turn() {
        // Player kills the only computer unit before it can act.
        let player = Army::from_units(vec![unit(0, "Knight", 10, 50, 26, 0)]);
        let computer = Army::from_units(vec![unit(1, "Ogre", 40, 100, 0, 0)]);

        let mut battle = Battle::new(player, computer, NearestReachable).unwrap();
        let mut log = RecordingBattleLog::default();
        let strikes = battle.run_round(&mut log).unwrap();

        assert_eq!(strikes, 1);
        assert!(battle.player().units[0].alive);
    }

    #[test]
    fn test_computer_wins_war_of_attrition() {
        let player = Army::from_units(vec![unit(0, "Glass", 5, 3, 26, 0)]);
        let computer = Army::from_units(vec![
            unit(1, "Tank", 3, 10, 0, 0),
            unit(2, "Sniper", 100, 1, 0, 5),
        ]);

        let mut battle = Battle::new(player, computer, NearestReachable).unwrap();
        let report = battle.run(&mut RecordingBattleLog::default()).unwrap();

        // Round 1: Glass hits Tank (3 -> 0, dead). Sniper hits Glass (5 -> 4).
        // Remaining rounds: Glass and Sniper trade blows until Glass dies.
        assert_eq!(report.outcome, BattleOutcome::ComputerWins);
    }

    #[test]
    fn test_empty_armies_draw() {
        let mut battle = Battle::new(Army::default(), Army::default(), NearestReachable).unwrap();
        assert_eq!(battle.outcome(), BattleOutcome::Draw);
        let report = battle.run(&mut RecordingBattleLog::default()).unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(report.outcome, BattleOutcome::Draw);
    }

    #[test]
    fn test_stalemate_without_strikes() {
        let player = Army::from_units(vec![unit(0, "Monk", 10, 1, 26, 0)]);
        let computer = Army::from_units(vec![unit(1, "Monk", 10, 1, 0, 0)]);

        let mut battle = Battle::new(player, computer, Pacifist).unwrap();
        let report = battle.run(&mut RecordingBattleLog::default()).unwrap();
        assert_eq!(report.outcome, BattleOutcome::Stalemate);
        assert_eq!(report.rounds, 1);
        assert_eq!(report.strikes, 0);
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let player = Army::from_units(vec![unit(0, "Monk", 10, 1, 26, 0)]);
        let computer = Army::from_units(vec![unit(1, "Monk", 10, 1, 0, 0)]);

        let mut battle = Battle::new(player, computer, Confused).unwrap();
        let report = battle.run(&mut RecordingBattleLog::default()).unwrap();
        assert_eq!(report.outcome, BattleOutcome::Stalemate);
    }

    #[test]
    fn test_round_cap() {
        let player = Army::from_units(vec![unit(0, "Monk", 1000, 1, 26, 0)]);
        let computer = Army::from_units(vec![unit(1, "Monk", 1000, 1, 0, 0)]);

        let mut battle = Battle::new(player, computer, NearestReachable)
            .unwrap()
            .with_max_rounds(5);
        let report = battle.run(&mut RecordingBattleLog::default()).unwrap();
        assert_eq!(report.rounds, 5);
        assert_eq!(report.strikes, 10);
        assert_eq!(report.outcome, BattleOutcome::Stalemate);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let player = Army::from_units(vec![unit(0, "Monk", 10, 1, 26, 0)]);
        let computer = Army::from_units(vec![unit(0, "Monk", 10, 1, 0, 0)]);
        let result = Battle::new(player, computer, NearestReachable);
        assert!(matches!(result, Err(GameError::InvalidState(_))));
    }

    #[test]
    fn test_off_board_unit_rejected() {
        let mut stray = unit(1, "Monk", 10, 1, 0, 0);
        stray.position = Cell { x: 40, y: 0 };
        let result = Battle::new(Army::default(), Army::from_units(vec![stray]), NearestReachable);
        assert!(result.is_err());
    }

    #[test]
    fn test_shared_cell_rejected() {
        let player = Army::from_units(vec![unit(0, "Monk", 10, 1, 13, 7)]);
        let computer = Army::from_units(vec![unit(1, "Monk", 10, 1, 13, 7)]);
        let result = Battle::new(player, computer, NearestReachable);
        assert!(matches!(result, Err(GameError::InvalidState(_))));
    }

    #[test]
    fn test_corpse_may_share_a_cell() {
        let mut corpse = unit(1, "Monk", 10, 1, 13, 7);
        corpse.alive = false;
        let player = Army::from_units(vec![unit(0, "Monk", 10, 1, 13, 7)]);
        let computer = Army::from_units(vec![corpse, unit(2, "Monk", 10, 1, 0, 0)]);
        assert!(Battle::new(player, computer, NearestReachable).is_ok());
    }
}
