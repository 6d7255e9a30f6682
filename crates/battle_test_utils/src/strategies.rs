//! Proptest strategies for board and roster inputs.

use proptest::prelude::*;

use battle_core::board::{Cell, ObstacleSet, HEIGHT, WIDTH};
use battle_core::units::UnitKind;

/// Any cell on the board.
pub fn arb_cell() -> impl Strategy<Value = Cell> {
    (0..WIDTH, 0..HEIGHT).prop_map(|(x, y)| Cell::new(x, y))
}

/// Up to `max_cells` blocked cells (duplicates collapse).
pub fn arb_obstacles(max_cells: usize) -> impl Strategy<Value = ObstacleSet> {
    proptest::collection::vec(arb_cell(), 0..max_cells)
        .prop_map(|cells| cells.into_iter().collect())
}

/// A unit kind with modest stats. Cost is always positive.
pub fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
    ("[A-Z][a-z]{2,8}", 1u32..200, 1u32..60, 1u32..50).prop_map(
        |(name, health, attack, cost)| UnitKind::new(name, health, attack, cost),
    )
}

/// A roster of 1 to `max_kinds` unit kinds.
pub fn arb_roster(max_kinds: usize) -> impl Strategy<Value = Vec<UnitKind>> {
    proptest::collection::vec(arb_unit_kind(), 1..=max_kinds)
}
