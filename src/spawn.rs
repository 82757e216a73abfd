//! Spawn point derivation and selection.
//!
//! Spawners for players, enemies and collectibles pick from the floor positions of a finished maze.
//! The selection functions never fail: an empty list yields `Position::ORIGIN`, and a distance
//! constraint nobody can satisfy is relaxed to an unconstrained pick.

use log::{debug, warn};
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::grid::Grid;
use crate::positions::{FloorLayout, Position};

/// One floor position per cell, in row-major order.
pub fn build_spawn_point_list(grid: &Grid, layout: &FloorLayout) -> Vec<Position> {
    let (width, depth) = (grid.width(), grid.depth());
    grid.iter()
        .map(|coord| layout.floor_position(width, depth, coord))
        .collect()
}

/// A uniformly random spawn point, or `Position::ORIGIN` if there are none.
pub fn random_floor_position<R: Rng + ?Sized>(spawn_points: &[Position], rng: &mut R) -> Position {
    match spawn_points.choose(rng) {
        Some(point) => *point,
        None => {
            warn!("no spawn points to choose from, using the maze centre");
            Position::ORIGIN
        }
    }
}

/// A uniformly random spawn point at least `min_distance` from `reference`.
///
/// This is a relaxation rather than a guarantee: when no point is far enough away, which happens on
/// mazes too small for the distance asked, the pick falls back to any spawn point.
pub fn spawn_point_away_from<R: Rng + ?Sized>(spawn_points: &[Position],
                                              reference: Position,
                                              min_distance: f32,
                                              rng: &mut R)
                                              -> Position {
    let min_distance_squared = min_distance * min_distance;
    let far_enough = spawn_points
        .iter()
        .filter(|point| min_distance <= 0.0 || point.distance_squared_to(reference) >= min_distance_squared)
        .choose(rng);

    match far_enough {
        Some(point) => *point,
        None => {
            debug!("no spawn point is {} from {:?}, relaxing the distance constraint",
                   min_distance, reference);
            random_floor_position(spawn_points, rng)
        }
    }
}

/// The spawn points of one generated maze.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnPointSet {
    points: Vec<Position>,
}

impl SpawnPointSet {
    pub fn from_grid(grid: &Grid, layout: &FloorLayout) -> SpawnPointSet {
        SpawnPointSet { points: build_spawn_point_list(grid, layout) }
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        random_floor_position(&self.points, rng)
    }

    pub fn away_from<R: Rng + ?Sized>(&self, reference: Position, min_distance: f32, rng: &mut R) -> Position {
        spawn_point_away_from(&self.points, reference, min_distance, rng)
    }
}
