//! Attack target selection.
//!
//! Enemies are grouped into rows (one per board column). From each row the
//! unit nearest the attacking side's flank is "suitable": the lowest `y`
//! when the left army is under attack, the highest `y` otherwise. An
//! [`AttackProgram`] then picks one suitable unit and the route to it.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Cell;
use crate::error::Result;
use crate::pathfinding::{find_path, path_length};
use crate::units::{Unit, UnitId};

/// Group living units into rows keyed by column, in ascending column order.
#[must_use]
pub fn units_by_row<'a>(units: impl IntoIterator<Item = &'a Unit>) -> Vec<Vec<&'a Unit>> {
    let mut rows: BTreeMap<u32, Vec<&'a Unit>> = BTreeMap::new();
    for unit in units.into_iter().filter(|u| u.alive) {
        rows.entry(unit.position.x).or_default().push(unit);
    }
    rows.into_values().collect()
}

/// Pick at most one living unit per row.
///
/// With `is_left_army_target` the unit with the smallest `y` is chosen,
/// otherwise the one with the largest. Ties keep the first unit in row
/// order. Rows without living units contribute nothing.
#[must_use]
pub fn suitable_units<'a>(rows: &[Vec<&'a Unit>], is_left_army_target: bool) -> Vec<&'a Unit> {
    rows.iter()
        .filter_map(|row| {
            let alive = row.iter().copied().filter(|u| u.alive);
            if is_left_army_target {
                alive.min_by_key(|u| u.position.y)
            } else {
                alive.min_by_key(|u| Reverse(u.position.y))
            }
        })
        .collect()
}

/// One attack decided by a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// Unit being attacked.
    pub target: UnitId,
    /// Route from attacker to target, both inclusive.
    pub path: Vec<Cell>,
}

/// What an attacking unit can see when choosing its target.
#[derive(Debug, Clone, Copy)]
pub struct BattleView<'a> {
    /// The attacker's own army, attacker included.
    pub allies: &'a [Unit],
    /// The opposing army.
    pub enemies: &'a [Unit],
    /// True when the enemies deploy on the left edge.
    pub enemies_on_left: bool,
}

impl<'a> BattleView<'a> {
    /// Every unit on the board.
    pub fn roster(&self) -> impl Iterator<Item = &'a Unit> {
        self.allies.iter().chain(self.enemies.iter())
    }
}

/// Decides whom a unit attacks on its turn.
pub trait AttackProgram {
    /// Choose a target for `attacker`, or `None` to pass the turn.
    fn choose_target(&self, attacker: &Unit, view: &BattleView<'_>) -> Result<Option<Strike>>;
}

/// Attack the suitable enemy with the shortest route.
///
/// Enemies that cannot be reached are ignored. Equal routes go to the
/// lower unit ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestReachable;

impl AttackProgram for NearestReachable {
    fn choose_target(&self, attacker: &Unit, view: &BattleView<'_>) -> Result<Option<Strike>> {
        let rows = units_by_row(view.enemies);
        let candidates = suitable_units(&rows, view.enemies_on_left);

        let mut best: Option<(usize, UnitId, Vec<Cell>)> = None;
        for candidate in candidates {
            let path = find_path(attacker, candidate, view.roster())?;
            if path.is_empty() {
                continue;
            }
            let key = (path_length(&path), candidate.id);
            if best.as_ref().map_or(true, |(len, id, _)| key < (*len, *id)) {
                best = Some((key.0, key.1, path));
            }
        }

        let strike = best.map(|(_, target, path)| Strike { target, path });
        match &strike {
            Some(s) => debug!(
                attacker = %attacker.id,
                target = %s.target,
                steps = path_length(&s.path),
                "Target chosen"
            ),
            None => debug!(attacker = %attacker.id, "No reachable target"),
        }
        Ok(strike)
    }
}
