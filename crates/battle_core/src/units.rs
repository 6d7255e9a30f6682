//! Unit templates, unit instances and armies.
//!
//! A [`UnitKind`] is the data-driven template loaded from a roster file.
//! Army generation stamps out [`Unit`] instances from kinds, each with its
//! own identity, position and health.
//!
//! # Example RON
//!
//! ```ron
//! [
//!     UnitKind(
//!         unit_type: "Knight",
//!         health: 70,
//!         base_attack: 25,
//!         cost: 30,
//!         attack_type: "Melee",
//!     ),
//! ]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Cell, WIDTH};
use crate::math::{ratio, Fixed};
use crate::pathfinding::BoardEntity;

/// Unique identifier for a unit on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Create a new unit ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Data-driven unit template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitKind {
    /// Type name, used as the prefix of generated unit names.
    pub unit_type: String,
    /// Starting health points.
    pub health: u32,
    /// Damage dealt per strike.
    pub base_attack: u32,
    /// Point cost when building an army.
    pub cost: u32,
    /// Free-form attack classification ("Melee", "Ranged", ...).
    #[serde(default)]
    pub attack_type: String,
}

impl UnitKind {
    /// Create a new unit kind.
    #[must_use]
    pub fn new(unit_type: impl Into<String>, health: u32, base_attack: u32, cost: u32) -> Self {
        Self {
            unit_type: unit_type.into(),
            health,
            base_attack,
            cost,
            attack_type: String::new(),
        }
    }

    /// Set the attack type.
    #[must_use]
    pub fn with_attack_type(mut self, attack_type: impl Into<String>) -> Self {
        self.attack_type = attack_type.into();
        self
    }

    /// Stats bought per point spent: `base_attack / cost + health / cost`.
    ///
    /// Zero for free units.
    #[must_use]
    pub fn efficiency(&self) -> Fixed {
        ratio(self.base_attack, self.cost).saturating_add(ratio(self.health, self.cost))
    }
}

/// A unit placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identity.
    pub id: UnitId,
    /// Display name, e.g. "Knight 3".
    pub name: String,
    /// Type name copied from the kind.
    pub unit_type: String,
    /// Remaining health. Negative after overkill.
    pub health: i64,
    /// Damage dealt per strike.
    pub base_attack: u32,
    /// Point cost.
    pub cost: u32,
    /// Attack classification copied from the kind.
    pub attack_type: String,
    /// Board position.
    pub position: Cell,
    /// False once health drops to zero or below.
    pub alive: bool,
}

impl Unit {
    /// Stamp out a unit from a kind.
    #[must_use]
    pub fn from_kind(kind: &UnitKind, id: UnitId, name: impl Into<String>, position: Cell) -> Self {
        Self {
            id,
            name: name.into(),
            unit_type: kind.unit_type.clone(),
            health: i64::from(kind.health),
            base_attack: kind.base_attack,
            cost: kind.cost,
            attack_type: kind.attack_type.clone(),
            position,
            alive: kind.health > 0,
        }
    }

    /// Apply damage, marking the unit dead at zero health or below.
    ///
    /// Returns `true` if this damage killed the unit.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= i64::from(damage);
        if self.health <= 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

impl BoardEntity for Unit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn cell(&self) -> Cell {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A set of units fighting on one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Army {
    /// Units in this army.
    pub units: Vec<Unit>,
    /// Total point cost of the army as built.
    pub points: u32,
}

impl Army {
    /// Create an army from units, summing their cost.
    #[must_use]
    pub fn from_units(units: Vec<Unit>) -> Self {
        let points = units.iter().map(|u| u.cost).sum();
        Self { units, points }
    }

    /// Check if any unit is still alive.
    #[must_use]
    pub fn has_alive_units(&self) -> bool {
        self.units.iter().any(|u| u.alive)
    }

    /// Iterate over living units.
    pub fn alive_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }

    /// Drop dead units from the roster.
    pub fn remove_dead(&mut self) {
        self.units.retain(|u| u.alive);
    }

    /// Look up a unit by ID.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Look up a unit by ID, mutably.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Mirror the army across the vertical axis (x -> WIDTH - 1 - x).
    ///
    /// Generated armies start on the left edge; mirroring moves one to the
    /// right edge so two generated armies face each other.
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        for unit in &mut self.units {
            unit.position.x = (WIDTH - 1).saturating_sub(unit.position.x);
        }
        self
    }

    /// Re-number unit IDs starting at `first`, so two armies never share IDs.
    #[must_use]
    pub fn with_id_offset(mut self, first: u32) -> Self {
        for (i, unit) in self.units.iter_mut().enumerate() {
            unit.id = UnitId::new(first.saturating_add(i as u32));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> UnitKind {
        UnitKind::new("Knight", 70, 25, 30).with_attack_type("Melee")
    }

    #[test]
    fn test_efficiency() {
        // 25/30 + 70/30 = 95/30
        let expected = ratio(25, 30) + ratio(70, 30);
        assert_eq!(knight().efficiency(), expected);
        assert!(knight().efficiency() > Fixed::from_num(3));
    }

    #[test]
    fn test_free_unit_has_zero_efficiency() {
        assert_eq!(UnitKind::new("Peasant", 10, 1, 0).efficiency(), Fixed::ZERO);
    }

    #[test]
    fn test_take_damage_kills_at_zero() {
        let mut unit = Unit::from_kind(&knight(), UnitId::new(1), "Knight 0", Cell::new(0, 0));
        assert!(!unit.take_damage(30));
        assert_eq!(unit.health, 40);
        assert!(unit.take_damage(40));
        assert!(!unit.alive);
        assert_eq!(unit.health, 0);
        // Dead units ignore further damage.
        assert!(!unit.take_damage(10));
        assert_eq!(unit.health, 0);
    }

    #[test]
    fn test_overkill_goes_negative() {
        let mut unit = Unit::from_kind(&knight(), UnitId::new(1), "Knight 0", Cell::new(0, 0));
        assert!(unit.take_damage(100));
        assert_eq!(unit.health, -30);
    }

    #[test]
    fn test_army_points_and_removal() {
        let kind = knight();
        let mut army = Army::from_units(vec![
            Unit::from_kind(&kind, UnitId::new(1), "Knight 0", Cell::new(0, 0)),
            Unit::from_kind(&kind, UnitId::new(2), "Knight 1", Cell::new(1, 0)),
        ]);
        assert_eq!(army.points, 60);

        army.get_mut(UnitId::new(1)).unwrap().take_damage(1000);
        assert_eq!(army.alive_units().count(), 1);
        army.remove_dead();
        assert_eq!(army.units.len(), 1);
        assert!(army.get(UnitId::new(1)).is_none());
        assert!(army.has_alive_units());
    }

    #[test]
    fn test_mirrored_and_id_offset() {
        let kind = knight();
        let army = Army::from_units(vec![
            Unit::from_kind(&kind, UnitId::new(0), "Knight 0", Cell::new(0, 4)),
            Unit::from_kind(&kind, UnitId::new(1), "Knight 1", Cell::new(2, 9)),
        ])
        .mirrored()
        .with_id_offset(100);

        assert_eq!(army.units[0].position, Cell::new(26, 4));
        assert_eq!(army.units[1].position, Cell::new(24, 9));
        assert_eq!(army.units[0].id, UnitId::new(100));
        assert_eq!(army.units[1].id, UnitId::new(101));
    }

    #[test]
    fn test_id_offset_saturates() {
        let kind = knight();
        let army = Army::from_units(vec![
            Unit::from_kind(&kind, UnitId::new(0), "Knight 0", Cell::new(0, 0)),
            Unit::from_kind(&kind, UnitId::new(1), "Knight 1", Cell::new(0, 1)),
        ])
        .with_id_offset(u32::MAX);

        assert_eq!(army.units[0].id, UnitId::new(u32::MAX));
        assert_eq!(army.units[1].id, UnitId::new(u32::MAX));
    }

    #[test]
    fn test_efficiency_saturates_on_huge_stats() {
        let brute = UnitKind::new("Brute", u32::MAX, u32::MAX, 1);
        assert_eq!(brute.efficiency(), Fixed::MAX);
    }

    #[test]
    fn test_kind_from_ron() {
        let kinds: Vec<UnitKind> = ron::from_str(
            r#"[UnitKind(unit_type: "Archer", health: 50, base_attack: 20, cost: 25)]"#,
        )
        .unwrap();
        assert_eq!(kinds[0].unit_type, "Archer");
        assert!(kinds[0].attack_type.is_empty());
    }
}
