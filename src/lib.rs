//! **mazebuilder** carves perfect mazes on a rectangular grid and derives world-space spawn points
//! from them.
//!
//! ```
//! use mazebuilder::builder::MazeBuilder;
//! use mazebuilder::units::{Depth, Width};
//!
//! let mut builder = MazeBuilder::default();
//! let grid = builder.generate(Width(8), Depth(8), Some(42)).unwrap();
//! assert!(grid.is_perfect());
//! let spawn = builder.random_floor_position().unwrap();
//! assert!(builder.all_floor_positions().unwrap().contains(&spawn));
//! ```

pub mod builder;
pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod positions;
pub mod spawn;
pub mod units;
pub mod utils;
