//! Computer army generation under a point budget.
//!
//! Unit kinds are bought in order of ascending efficiency, up to a
//! per-kind cap, until the budget runs out. Each unit lands on a unique
//! random cell inside the deployment zone on the left edge of the board.
//!
//! Placement uses a seeded RNG, so the same seed and roster always
//! produce the same army.

use tracing::{debug, info, warn};

use crate::board::{Cell, ObstacleSet, HEIGHT, WIDTH};
use crate::config::{BattleConfig, GenerationConfig};
use crate::error::{GameError, Result};
use crate::units::{Army, Unit, UnitId, UnitKind};

/// Widest deployment zone that keeps a mirrored army clear of the original.
pub const MAX_PLACEMENT_WIDTH: u32 = WIDTH / 2;

/// Simple deterministic RNG for unit placement.
#[derive(Debug, Clone)]
pub struct PlacementRng {
    state: u64,
}

impl PlacementRng {
    /// Create an RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15),
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(0x5DEE_CE66D).wrapping_add(11);
        // Low bits of an LCG cycle quickly; use the high half.
        self.state >> 32
    }

    /// Uniform-ish value in `0..bound`. Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        (self.next() % u64::from(bound)) as u32
    }
}

/// The left-edge deployment zone and the cells already taken in it.
#[derive(Debug, Clone)]
pub struct PlacementZone {
    width: u32,
    occupied: ObstacleSet,
}

impl PlacementZone {
    /// Create an empty zone `width` columns wide.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width,
            occupied: ObstacleSet::new(),
        }
    }

    /// Number of cells in the zone.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.width * HEIGHT
    }

    /// Number of cells already taken.
    #[must_use]
    pub const fn occupied(&self) -> usize {
        self.occupied.len()
    }

    /// Draw random cells until a free one turns up, and claim it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlacementExhausted`] if every cell is taken.
    pub fn claim_random(&mut self, rng: &mut PlacementRng) -> Result<Cell> {
        if self.occupied.len() >= self.capacity() as usize {
            return Err(GameError::PlacementExhausted {
                capacity: self.capacity(),
            });
        }
        loop {
            let cell = Cell::new(rng.next_below(self.width), rng.next_below(HEIGHT));
            if self.occupied.insert(cell) {
                return Ok(cell);
            }
        }
    }
}

/// Sort unit kinds by ascending efficiency. Ties keep roster order.
#[must_use]
pub fn sort_by_efficiency(kinds: &[UnitKind]) -> Vec<&UnitKind> {
    let mut sorted: Vec<&UnitKind> = kinds.iter().collect();
    sorted.sort_by_key(|kind| kind.efficiency());
    sorted
}

/// Build an army from `kinds` spending at most `max_points`.
///
/// Units are named `"<unit_type> <n>"` with `n` counting from 0 per kind,
/// and numbered with consecutive IDs from 0. Free (zero-cost) kinds are
/// skipped. Generation stops early if the deployment zone fills up.
///
/// # Errors
///
/// Returns [`GameError::InvalidConfig`] if the zone width is zero or above
/// [`MAX_PLACEMENT_WIDTH`].
pub fn generate_army(
    kinds: &[UnitKind],
    max_points: u32,
    config: &GenerationConfig,
    seed: u64,
) -> Result<Army> {
    let width = config.placement_width;
    if width == 0 || width > MAX_PLACEMENT_WIDTH {
        return Err(GameError::InvalidConfig(format!(
            "placement_width must be in 1..={MAX_PLACEMENT_WIDTH}, got {width}"
        )));
    }

    info!(kinds = kinds.len(), max_points, seed, "Generating army");

    let mut rng = PlacementRng::new(seed);
    let mut zone = PlacementZone::new(width);
    let mut units: Vec<Unit> = Vec::new();
    let mut points = 0u32;

    'kinds: for kind in sort_by_efficiency(kinds) {
        if kind.cost == 0 {
            warn!(unit_type = %kind.unit_type, "Skipping free unit kind");
            continue;
        }

        let mut count = 0u32;
        while count < config.max_units_per_kind
            && points
                .checked_add(kind.cost)
                .is_some_and(|total| total <= max_points)
        {
            let cell = match zone.claim_random(&mut rng) {
                Ok(cell) => cell,
                Err(e) => {
                    warn!("Stopping army generation: {e}");
                    break 'kinds;
                }
            };

            let id = UnitId::new(units.len() as u32);
            let name = format!("{} {}", kind.unit_type, count);
            debug!(%id, %name, %cell, "Placed unit");
            units.push(Unit::from_kind(kind, id, name, cell));

            points += kind.cost;
            count += 1;
        }
    }

    info!(units = units.len(), points, "Army generated");
    Ok(Army { units, points })
}

/// Build two armies facing each other across the board.
///
/// The computer army is generated with `config.seed` on the left edge. The
/// player army uses the next seed, is mirrored to the right edge and
/// numbered after the computer's units. Returns `(player, computer)`.
///
/// # Errors
///
/// Returns an error if either army fails to generate.
pub fn deploy_facing(
    kinds: &[UnitKind],
    config: &BattleConfig,
    player_points: u32,
    computer_points: u32,
) -> Result<(Army, Army)> {
    let computer = generate_army(kinds, computer_points, &config.generation, config.seed)?;
    let first_player_id = u32::try_from(computer.units.len()).unwrap_or(u32::MAX);
    let player = generate_army(
        kinds,
        player_points,
        &config.generation,
        config.seed.wrapping_add(1),
    )?
    .mirrored()
    .with_id_offset(first_player_id);

    debug!(
        player_units = player.units.len(),
        computer_units = computer.units.len(),
        "Armies deployed"
    );
    Ok((player, computer))
}
