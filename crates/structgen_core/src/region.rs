//! Map cells and the rectangular footprint a layout occupies.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Absolute map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cell {
    /// X coordinate (column direction).
    pub x: i32,
    /// Y coordinate (row direction).
    pub y: i32,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add<(i32, i32)> for Cell {
    type Output = Self;

    fn add(self, (dx, dy): (i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Cell at grid column 0, row 0.
    pub origin: Cell,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Region {
    /// Create a region from its origin and size.
    #[must_use]
    pub const fn new(origin: Cell, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Center a `width` x `height` rectangle on `anchor`.
    ///
    /// For even sizes the anchor lands on the cell just past the middle,
    /// so a 2x2 region on (50, 50) starts at (49, 49).
    #[must_use]
    pub fn centered_on(anchor: Cell, width: u32, height: u32) -> Self {
        let origin = Cell::new(anchor.x - half(width), anchor.y - half(height));
        Self::new(origin, width, height)
    }

    /// Absolute cell for a grid-local column and row.
    ///
    /// Row 0 is `origin.y`; later rows have larger y.
    #[must_use]
    pub fn cell_at(&self, column: u32, row: u32) -> Cell {
        self.origin + (to_i32(column), to_i32(row))
    }

    /// Whether an absolute cell lies inside the region.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        let dx = i64::from(cell.x) - i64::from(self.origin.x);
        let dy = i64::from(cell.y) - i64::from(self.origin.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

fn half(extent: u32) -> i32 {
    to_i32(extent / 2)
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
