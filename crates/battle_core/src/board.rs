//! Board geometry: cells, bounds, neighbourhoods and obstacle sets.
//!
//! The battlefield is a fixed 27x21 grid. Cells pack into a dense
//! row-major index so per-query lookups can use flat arrays instead of
//! hash maps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Board width in cells.
pub const WIDTH: u32 = 27;

/// Board height in cells.
pub const HEIGHT: u32 = 21;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (WIDTH as usize) * (HEIGHT as usize);

/// Orthogonal step offsets, in search order.
pub const DIRECTIONS: [(i32, i32); 4] = [
    (-1, 0), // West
    (1, 0),  // East
    (0, -1), // North
    (0, 1),  // South
];

/// A single addressable board position.
///
/// Construct through [`Cell::new`] or [`Cell::try_new`]; both
/// guarantee the cell lies on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    /// Column, `0..WIDTH`.
    pub x: u32,
    /// Row, `0..HEIGHT`.
    pub y: u32,
}

impl Cell {
    /// Create a cell from on-board coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are off the board.
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        assert!(
            in_bounds(i64::from(x), i64::from(y)),
            "Cell ({x}, {y}) is off the board"
        );
        Self { x, y }
    }

    /// Create a cell from arbitrary coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] if the coordinates are off the board.
    pub fn try_new(x: i64, y: i64) -> Result<Self> {
        if in_bounds(x, y) {
            Ok(Self {
                x: x as u32,
                y: y as u32,
            })
        } else {
            Err(GameError::OutOfBounds {
                x,
                y,
                width: WIDTH,
                height: HEIGHT,
            })
        }
    }

    /// Whether this cell lies on the board.
    ///
    /// Always true for cells built through the constructors, but cells
    /// deserialized from data files skip that check.
    #[must_use]
    pub fn is_on_board(self) -> bool {
        self.x < WIDTH && self.y < HEIGHT
    }

    /// Dense row-major index of this cell.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        (self.y as usize) * (WIDTH as usize) + (self.x as usize)
    }

    /// Inverse of [`Cell::index`].
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self {
            x: (index % WIDTH as usize) as u32,
            y: (index / WIDTH as usize) as u32,
        }
    }

    /// Manhattan distance to another cell.
    #[must_use]
    pub const fn manhattan_distance(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether `other` is exactly one orthogonal step away.
    #[must_use]
    pub const fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// On-board orthogonal neighbours in [`DIRECTIONS`] order.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        DIRECTIONS.into_iter().filter_map(move |(dx, dy)| {
            let nx = i64::from(self.x) + i64::from(dx);
            let ny = i64::from(self.y) + i64::from(dy);
            Cell::try_new(nx, ny).ok()
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Check if coordinates are within board bounds.
#[inline]
#[must_use]
pub fn in_bounds(x: i64, y: i64) -> bool {
    x >= 0 && y >= 0 && x < i64::from(WIDTH) && y < i64::from(HEIGHT)
}

/// Cells blocked for one path query.
///
/// A dense bitmap over the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleSet {
    blocked: Vec<bool>,
    count: usize,
}

impl Default for ObstacleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleSet {
    /// Create an empty obstacle set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocked: vec![false; CELL_COUNT],
            count: 0,
        }
    }

    /// Mark a cell as blocked. Returns `false` if it already was, or if the
    /// cell is off the board.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let Some(slot) = self.slot_mut(cell) else {
            return false;
        };
        if *slot {
            return false;
        }
        *slot = true;
        self.count += 1;
        true
    }

    /// Unblock a cell. Returns `false` if it was not blocked.
    pub fn remove(&mut self, cell: Cell) -> bool {
        let Some(slot) = self.slot_mut(cell) else {
            return false;
        };
        if !*slot {
            return false;
        }
        *slot = false;
        self.count -= 1;
        true
    }

    /// Check if a cell is blocked. Off-board cells never are.
    #[inline]
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.is_on_board() && self.blocked[cell.index()]
    }

    fn slot_mut(&mut self, cell: Cell) -> Option<&mut bool> {
        if cell.is_on_board() {
            self.blocked.get_mut(cell.index())
        } else {
            None
        }
    }

    /// Number of blocked cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// True when nothing is blocked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over blocked cells in index order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, blocked)| **blocked)
            .map(|(index, _)| Cell::from_index(index))
    }
}

impl FromIterator<Cell> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = Self::new();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_dimensions() {
        assert_eq!(CELL_COUNT, 567);
    }

    #[test]
    fn test_try_new_bounds() {
        assert!(Cell::try_new(0, 0).is_ok());
        assert!(Cell::try_new(26, 20).is_ok());
        assert!(matches!(
            Cell::try_new(27, 0),
            Err(GameError::OutOfBounds { x: 27, y: 0, .. })
        ));
        assert!(Cell::try_new(0, 21).is_err());
        assert!(Cell::try_new(-1, 5).is_err());
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_new_panics_off_board() {
        let _ = Cell::new(WIDTH, 0);
    }

    #[test]
    fn test_index_roundtrip_corners() {
        for cell in [Cell::new(0, 0), Cell::new(26, 0), Cell::new(0, 20), Cell::new(26, 20)] {
            assert_eq!(Cell::from_index(cell.index()), cell);
        }
        assert_eq!(Cell::new(26, 20).index(), CELL_COUNT - 1);
    }

    #[test]
    fn test_neighbors_order_and_clipping() {
        let inner: Vec<Cell> = Cell::new(5, 5).neighbors().collect();
        assert_eq!(
            inner,
            vec![Cell::new(4, 5), Cell::new(6, 5), Cell::new(5, 4), Cell::new(5, 6)]
        );

        let corner: Vec<Cell> = Cell::new(0, 0).neighbors().collect();
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_manhattan_and_adjacency() {
        let a = Cell::new(1, 1);
        assert_eq!(a.manhattan_distance(Cell::new(4, 5)), 7);
        assert!(a.is_adjacent(Cell::new(1, 2)));
        assert!(!a.is_adjacent(Cell::new(2, 2)));
        assert!(!a.is_adjacent(a));
    }

    #[test]
    fn test_obstacle_set_insert_remove() {
        let mut set = ObstacleSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Cell::new(3, 4)));
        assert!(!set.insert(Cell::new(3, 4)));
        assert!(set.contains(Cell::new(3, 4)));
        assert_eq!(set.len(), 1);
        assert!(set.remove(Cell::new(3, 4)));
        assert!(!set.remove(Cell::new(3, 4)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_obstacle_set_ignores_off_board_cells() {
        let mut set = ObstacleSet::new();
        let wide = Cell { x: 30, y: 0 };
        let deep = Cell { x: 0, y: 4000 };

        assert!(!set.insert(wide));
        assert!(!set.insert(deep));
        assert!(set.is_empty());
        assert!(!set.contains(Cell::new(3, 1)));
        assert!(!set.contains(wide));
        assert!(!set.contains(deep));
        assert!(!set.remove(wide));

        let collected: ObstacleSet = [wide, Cell::new(3, 1)].into_iter().collect();
        assert_eq!(collected.iter().collect::<Vec<_>>(), vec![Cell::new(3, 1)]);
    }

    #[test]
    fn test_obstacle_set_from_iter() {
        let set: ObstacleSet = [Cell::new(2, 0), Cell::new(1, 0), Cell::new(2, 0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Cell::new(1, 0), Cell::new(2, 0)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::new(3, 7).to_string(), "(3, 7)");
    }
}
