use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::*;
use crate::positions::FloorLayout;
use crate::units::{Depth, Width};

/// Maze dimensions and world-space layout.
///
/// Every field has a default so a JSON file only needs to name what it changes:
///
/// ```json
/// { "width": 25, "depth": 25, "cell_size": 3.0, "seed": 1234 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub width: usize,
    pub depth: usize,
    pub cell_size: f32,
    pub floor_height: f32,
    /// None draws a fresh seed for every maze.
    pub seed: Option<u64>,
    /// Carve steps between yields to the host loop. 0 generates in one go.
    pub steps_per_slice: usize,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        let layout = FloorLayout::default();
        MazeConfig {
            width: 10,
            depth: 10,
            cell_size: layout.cell_size,
            floor_height: layout.floor_height,
            seed: None,
            steps_per_slice: 0,
        }
    }
}

impl MazeConfig {
    /// Parse a config, rejecting a layout that cannot place one floor position per cell.
    pub fn from_json_str(json: &str) -> Result<MazeConfig> {
        let config: MazeConfig = serde_json::from_str(json)?;
        config.layout().validated()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MazeConfig> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .chain_err(|| format!("Failed to read maze config {}", path.display()))?;
        MazeConfig::from_json_str(&json)
            .chain_err(|| format!("Failed to parse maze config {}", path.display()))
    }

    #[inline]
    pub fn dimensions(&self) -> (Width, Depth) {
        (Width(self.width), Depth(self.depth))
    }

    #[inline]
    pub fn layout(&self) -> FloorLayout {
        FloorLayout::new(self.cell_size, self.floor_height)
    }
}
