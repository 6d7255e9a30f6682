//! Shortest-path search between two units on the battle board.
//!
//! Uniform-cost search (Dijkstra with unit edge weights) over the 4-connected
//! board. Cells held by other living units are obstacles; the two endpoint
//! units never block their own path.
//!
//! Results are fully deterministic: the frontier breaks distance ties by
//! insertion order, and neighbours are relaxed in
//! [`DIRECTIONS`](crate::board::DIRECTIONS) order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::board::{Cell, ObstacleSet, CELL_COUNT, HEIGHT, WIDTH};
use crate::error::{GameError, Result};
use crate::units::UnitId;

/// Anything that can occupy a board cell.
pub trait BoardEntity {
    /// Identity used to exclude the path's own endpoints from the obstacles.
    fn id(&self) -> UnitId;
    /// Current position.
    fn cell(&self) -> Cell;
    /// Dead entities never block.
    fn is_alive(&self) -> bool;
}

/// A node in the frontier priority queue.
///
/// Stale entries (pushed before a better distance was found) stay in the
/// heap and are skipped when popped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct FrontierNode {
    cell: Cell,
    distance: u32,
    /// Insertion sequence; earlier pushes win distance ties.
    sequence: u32,
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so reverse for min-heap behavior.
        match other.distance.cmp(&self.distance) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Collect the cells blocked for a path between `start_owner` and
/// `target_owner`.
///
/// A cell is blocked when a living entity other than the two endpoint
/// owners stands on it. Entities standing off the board are ignored.
pub fn obstacles_for<'a, E: BoardEntity + 'a>(
    roster: impl IntoIterator<Item = &'a E>,
    start_owner: UnitId,
    target_owner: UnitId,
) -> ObstacleSet {
    roster
        .into_iter()
        .filter(|e| e.is_alive() && e.id() != start_owner && e.id() != target_owner)
        .map(|e| e.cell())
        .filter(|cell| cell.is_on_board())
        .collect()
}

/// Find a path from `attacker` to `target` around every other living unit
/// in `roster`.
///
/// Returns the cells from the attacker's position to the target's position,
/// both inclusive. An empty path means the target cannot be reached.
///
/// # Errors
///
/// Returns [`GameError::OutOfBounds`] if either endpoint is off the board.
pub fn find_path<'a, E: BoardEntity + 'a>(
    attacker: &E,
    target: &E,
    roster: impl IntoIterator<Item = &'a E>,
) -> Result<Vec<Cell>> {
    let obstacles = obstacles_for(roster, attacker.id(), target.id());
    find_path_between(attacker.cell(), target.cell(), &obstacles)
}

/// Find a shortest 4-connected path from `start` to `goal` avoiding
/// `obstacles`.
///
/// The endpoints are traversable even if `obstacles` contains them.
/// Returns an empty vector when `goal` is unreachable and a single-cell
/// vector when `start == goal`.
///
/// # Errors
///
/// Returns [`GameError::OutOfBounds`] if `start` or `goal` is off the board.
pub fn find_path_between(start: Cell, goal: Cell, obstacles: &ObstacleSet) -> Result<Vec<Cell>> {
    ensure_on_board(start)?;
    ensure_on_board(goal)?;

    if start == goal {
        return Ok(vec![start]);
    }

    let mut distances: Vec<u32> = vec![u32::MAX; CELL_COUNT];
    let mut came_from: Vec<Option<Cell>> = vec![None; CELL_COUNT];
    let mut frontier: BinaryHeap<FrontierNode> = BinaryHeap::new();
    let mut sequence = 0u32;

    distances[start.index()] = 0;
    frontier.push(FrontierNode {
        cell: start,
        distance: 0,
        sequence,
    });

    let mut expanded = 0usize;
    while let Some(current) = frontier.pop() {
        // Stale entry
        if current.distance > distances[current.cell.index()] {
            continue;
        }

        if current.cell == goal {
            debug!(
                %start,
                %goal,
                length = current.distance,
                expanded,
                "Path found"
            );
            return Ok(reconstruct_path(&came_from, start, goal));
        }
        expanded += 1;

        for neighbor in current.cell.neighbors() {
            if neighbor != goal && obstacles.contains(neighbor) {
                continue;
            }

            let tentative = current.distance + 1;
            if tentative < distances[neighbor.index()] {
                distances[neighbor.index()] = tentative;
                came_from[neighbor.index()] = Some(current.cell);
                sequence += 1;
                frontier.push(FrontierNode {
                    cell: neighbor,
                    distance: tentative,
                    sequence,
                });
            }
        }
    }

    debug!(%start, %goal, expanded, "No path");
    Ok(Vec::new())
}

fn ensure_on_board(cell: Cell) -> Result<()> {
    if cell.is_on_board() {
        Ok(())
    } else {
        Err(GameError::OutOfBounds {
            x: i64::from(cell.x),
            y: i64::from(cell.y),
            width: WIDTH,
            height: HEIGHT,
        })
    }
}

/// Walk predecessor links back from `goal` and reverse.
fn reconstruct_path(came_from: &[Option<Cell>], start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        match came_from[current.index()] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }

    path.reverse();
    path
}

/// Number of steps in a path (cells minus one). Zero for empty paths.
#[must_use]
pub fn path_length(path: &[Cell]) -> usize {
    path.len().saturating_sub(1)
}
