use error_chain::bail;
use serde_derive::{Deserialize, Serialize};

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::units::{Depth, Width};

/// A point in world space. `y` is up.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    /// The maze centre, also returned when there is nowhere to spawn.
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Position {
        Position { x, y, z }
    }

    pub fn distance_to(&self, other: Position) -> f32 {
        self.distance_squared_to(other).sqrt()
    }

    #[inline]
    pub fn distance_squared_to(&self, other: Position) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }
}

/// How grid cells map into world space: square cells of `cell_size` sitting at `floor_height`,
/// with the whole maze centred on the origin.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorLayout {
    pub cell_size: f32,
    pub floor_height: f32,
}

impl FloorLayout {
    pub fn new(cell_size: f32, floor_height: f32) -> FloorLayout {
        FloorLayout {
            cell_size,
            floor_height,
        }
    }

    /// The layout itself if every cell gets its own floor position, `InvalidLayout` otherwise.
    ///
    /// A zero, negative or non-finite cell size would put several cells on the same spot.
    pub fn validated(self) -> Result<FloorLayout> {
        let cell_size_ok = self.cell_size.is_finite() && self.cell_size > 0.0;
        if !cell_size_ok || !self.floor_height.is_finite() {
            bail!(ErrorKind::InvalidLayout(self.cell_size, self.floor_height));
        }
        Ok(self)
    }

    /// World-space centre of a cell's floor in a `width * depth` maze.
    ///
    /// Cell `x` spans `[x * cell_size, (x + 1) * cell_size)` before the maze is shifted back by half
    /// its extent, so the floor centre sits half a cell in from the cell's corner.
    pub fn floor_position(&self, width: Width, depth: Depth, coord: GridCoordinate) -> Position {
        let half_cell = self.cell_size / 2.0;
        let half_width = width.0 as f32 * self.cell_size / 2.0;
        let half_depth = depth.0 as f32 * self.cell_size / 2.0;

        Position {
            x: coord.x as f32 * self.cell_size + half_cell - half_width,
            y: self.floor_height,
            z: coord.z as f32 * self.cell_size + half_cell - half_depth,
        }
    }
}

impl Default for FloorLayout {
    fn default() -> FloorLayout {
        FloorLayout::new(4.0, 0.0)
    }
}
