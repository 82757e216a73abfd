//! `MazeBuilder`: generate a maze, then answer spawn position queries about it.
//!
//! A builder is either `NotStarted` or `Complete`. Generation, sliced or not, only installs its
//! result once the carve has finished, so callers never see a half carved maze. Position queries
//! made before any maze exists fail fast with `ErrorKind::NotGenerated`.

use error_chain::bail;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::GridCoordinate;
use crate::config::MazeConfig;
use crate::errors::*;
use crate::generators::Carver;
use crate::grid::Grid;
use crate::positions::{FloorLayout, Position};
use crate::spawn::SpawnPointSet;
use crate::units::{Depth, Width};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GenerationState {
    NotStarted,
    Complete,
}

#[derive(Debug)]
struct GeneratedMaze {
    grid: Grid,
    spawn_points: SpawnPointSet,
    seed: u64,
}

#[derive(Debug)]
pub struct MazeBuilder {
    layout: FloorLayout,
    generated: Option<GeneratedMaze>,
    // Continues the generation random stream so a seed also fixes later spawn picks.
    rng: XorShiftRng,
}

impl MazeBuilder {
    /// Fails with `InvalidLayout` for a cell size that is not finite and positive.
    pub fn new(layout: FloorLayout) -> Result<MazeBuilder> {
        Ok(MazeBuilder {
            layout: layout.validated()?,
            generated: None,
            rng: XorShiftRng::seed_from_u64(0),
        })
    }

    pub fn from_config(config: &MazeConfig) -> Result<MazeBuilder> {
        MazeBuilder::new(config.layout())
    }

    pub fn layout(&self) -> &FloorLayout {
        &self.layout
    }

    pub fn state(&self) -> GenerationState {
        if self.generated.is_some() {
            GenerationState::Complete
        } else {
            GenerationState::NotStarted
        }
    }

    /// Generate a new maze, discarding any previous one.
    ///
    /// Without a seed a fresh one is drawn and logged; `seed()` reports it afterwards. Invalid
    /// dimensions fail before anything changes, leaving a previously generated maze in place.
    pub fn generate(&mut self, width: Width, depth: Depth, seed: Option<u64>) -> Result<&Grid> {
        self.generate_sliced(width, depth, seed, 0, |_| {})
    }

    /// Generate a new maze in slices of `steps_per_slice` carve steps, calling `on_yield` with the
    /// progress so far (0.0 to 1.0) between slices. This lets a host frame loop stay responsive while
    /// a large maze is carved. A `steps_per_slice` of 0 carves everything in one slice.
    ///
    /// The maze produced is identical to `generate` with the same seed.
    pub fn generate_sliced<F>(&mut self,
                              width: Width,
                              depth: Depth,
                              seed: Option<u64>,
                              steps_per_slice: usize,
                              on_yield: F)
                              -> Result<&Grid>
        where F: FnMut(f32)
    {
        let layout = self.layout;
        self.carve(width, depth, seed, layout, steps_per_slice, on_yield)
    }

    /// Generate with the config's dimensions, seed and slicing. The config's layout replaces the
    /// builder's only once the new maze is complete.
    pub fn generate_from_config(&mut self, config: &MazeConfig) -> Result<&Grid> {
        let layout = config.layout().validated()?;
        let (width, depth) = config.dimensions();
        self.carve(width, depth, config.seed, layout, config.steps_per_slice, |_| {})
    }

    // Nothing on self changes until the carve is done.
    fn carve<F>(&mut self,
                width: Width,
                depth: Depth,
                seed: Option<u64>,
                layout: FloorLayout,
                steps_per_slice: usize,
                mut on_yield: F)
                -> Result<&Grid>
        where F: FnMut(f32)
    {
        let grid = Grid::new(width, depth)?;
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("generating {}x{} maze with seed {}", width.0, depth.0, seed);

        let mut carver = Carver::new(grid, XorShiftRng::seed_from_u64(seed));
        if steps_per_slice > 0 {
            while !carver.run(steps_per_slice) {
                debug!("maze generation {:.0}% complete", carver.progress() * 100.0);
                on_yield(carver.progress());
            }
        }
        let (grid, rng) = carver.into_parts();

        let spawn_points = SpawnPointSet::from_grid(&grid, &layout);
        info!("generated {}x{} maze: {} passages, {} spawn points",
              width.0, depth.0, grid.links_count(), spawn_points.len());

        self.layout = layout;
        self.rng = rng;
        self.generated = Some(GeneratedMaze {
            grid,
            spawn_points,
            seed,
        });
        self.grid()
    }

    /// Drop the current maze, back to `NotStarted`.
    pub fn discard(&mut self) {
        self.generated = None;
    }

    pub fn grid(&self) -> Result<&Grid> {
        Ok(&self.generated()?.grid)
    }

    /// The seed the current maze was generated from.
    pub fn seed(&self) -> Result<u64> {
        Ok(self.generated()?.seed)
    }

    /// World-space floor centre of a cell of the current maze.
    pub fn floor_position(&self, coord: GridCoordinate) -> Result<Position> {
        let grid = &self.generated()?.grid;
        if !grid.is_valid_coordinate(coord) {
            bail!(ErrorKind::InvalidCoordinate(coord.x, coord.z));
        }
        Ok(self.layout.floor_position(grid.width(), grid.depth(), coord))
    }

    /// Every floor position, one per cell in row-major order.
    pub fn all_floor_positions(&self) -> Result<&[Position]> {
        Ok(self.generated()?.spawn_points.as_slice())
    }

    pub fn random_floor_position(&mut self) -> Result<Position> {
        let generated = self.generated.as_ref().ok_or(ErrorKind::NotGenerated)?;
        Ok(generated.spawn_points.random(&mut self.rng))
    }

    /// A random floor position at least `min_distance` from `reference`, relaxed to any floor
    /// position when the maze has none that far away.
    pub fn spawn_point_away_from(&mut self, reference: Position, min_distance: f32) -> Result<Position> {
        let generated = self.generated.as_ref().ok_or(ErrorKind::NotGenerated)?;
        Ok(generated.spawn_points.away_from(reference, min_distance, &mut self.rng))
    }

    fn generated(&self) -> Result<&GeneratedMaze> {
        self.generated.as_ref().ok_or_else(|| ErrorKind::NotGenerated.into())
    }
}

impl Default for MazeBuilder {
    fn default() -> MazeBuilder {
        MazeBuilder {
            layout: FloorLayout::default(),
            generated: None,
            rng: XorShiftRng::seed_from_u64(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_not_generated<T: ::std::fmt::Debug>(result: Result<T>) -> bool {
        match result {
            Err(Error(ErrorKind::NotGenerated, _)) => true,
            _ => false,
        }
    }

    #[test]
    fn queries_before_generation_fail_fast() {
        let mut builder = MazeBuilder::default();
        assert_eq!(builder.state(), GenerationState::NotStarted);
        assert!(is_not_generated(builder.grid()));
        assert!(is_not_generated(builder.seed()));
        assert!(is_not_generated(builder.all_floor_positions()));
        assert!(is_not_generated(builder.random_floor_position()));
        assert!(is_not_generated(builder.spawn_point_away_from(Position::ORIGIN, 1.0)));
        assert!(is_not_generated(builder.floor_position(GridCoordinate::new(0, 0))));
    }

    #[test]
    fn three_by_three_scenario() {
        let mut builder = MazeBuilder::default();
        {
            let grid = builder.generate(Width(3), Depth(3), Some(17)).unwrap();
            assert_eq!(grid.size(), 9);
            assert_eq!(grid.links_count(), 8);
            assert!(grid.is_perfect());
        }
        assert_eq!(builder.state(), GenerationState::Complete);
        assert_eq!(builder.seed().unwrap(), 17);
        assert_eq!(builder.all_floor_positions().unwrap().len(), 9);

        let p = builder.random_floor_position().unwrap();
        assert!(builder.all_floor_positions().unwrap().contains(&p));
    }

    #[test]
    fn one_by_one_scenario() {
        let mut builder = MazeBuilder::new(FloorLayout::new(2.0, 0.0)).unwrap();
        assert_eq!(builder.generate(Width(1), Depth(1), Some(1)).unwrap().links_count(), 0);
        let only = builder.all_floor_positions().unwrap()[0];
        assert_eq!(only, Position::ORIGIN);
        assert_eq!(builder.spawn_point_away_from(only, 5.0).unwrap(), only);
    }

    #[test]
    fn invalid_dimensions_fail_without_touching_state() {
        let mut builder = MazeBuilder::default();
        match builder.generate(Width(0), Depth(4), None) {
            Err(Error(ErrorKind::InvalidDimensions(0, 4), _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(builder.state(), GenerationState::NotStarted);

        builder.generate(Width(4), Depth(4), Some(3)).unwrap();
        assert!(builder.generate(Width(4), Depth(0), None).is_err());
        assert_eq!(builder.state(), GenerationState::Complete);
        assert_eq!(builder.seed().unwrap(), 3);
    }

    #[test]
    fn regeneration_replaces_the_maze() {
        let mut builder = MazeBuilder::default();
        builder.generate(Width(3), Depth(3), Some(1)).unwrap();
        builder.generate(Width(5), Depth(2), Some(2)).unwrap();
        assert_eq!(builder.grid().unwrap().size(), 10);
        assert_eq!(builder.all_floor_positions().unwrap().len(), 10);
        assert_eq!(builder.seed().unwrap(), 2);

        builder.discard();
        assert_eq!(builder.state(), GenerationState::NotStarted);
    }

    #[test]
    fn unseeded_generation_records_its_seed() {
        let mut builder = MazeBuilder::default();
        let first = builder.generate(Width(6), Depth(6), None).unwrap().clone();
        let seed = builder.seed().unwrap();

        let mut replay = MazeBuilder::default();
        assert_eq!(*replay.generate(Width(6), Depth(6), Some(seed)).unwrap(), first);
    }

    #[test]
    fn same_seed_same_maze_and_spawns() {
        let mut a = MazeBuilder::default();
        let mut b = MazeBuilder::default();
        let grid_a = a.generate(Width(8), Depth(5), Some(99)).unwrap().clone();
        let grid_b = b.generate(Width(8), Depth(5), Some(99)).unwrap().clone();
        assert_eq!(grid_a, grid_b);
        for _ in 0..10 {
            assert_eq!(a.random_floor_position().unwrap(), b.random_floor_position().unwrap());
        }
    }

    #[test]
    fn sliced_generation_yields_and_matches_one_shot() {
        let mut one_shot = MazeBuilder::default();
        let expected = one_shot.generate(Width(20), Depth(20), Some(5)).unwrap().clone();

        let mut sliced = MazeBuilder::default();
        let mut progress_reports = vec![];
        let grid = sliced.generate_sliced(Width(20), Depth(20), Some(5), 10, |p| progress_reports.push(p))
            .unwrap()
            .clone();

        assert_eq!(grid, expected);
        assert!(progress_reports.len() > 1);
        assert!(progress_reports.windows(2).all(|w| w[0] <= w[1]));
        assert!(progress_reports.iter().all(|p| *p > 0.0 && *p < 1.0));
    }

    #[test]
    fn floor_positions_are_bounds_checked() {
        let mut builder = MazeBuilder::new(FloorLayout::new(2.0, 0.0)).unwrap();
        builder.generate(Width(3), Depth(1), Some(4)).unwrap();
        let p = builder.floor_position(GridCoordinate::new(2, 0)).unwrap();
        assert_eq!(p, Position::new(2.0, 0.0, 0.0));
        match builder.floor_position(GridCoordinate::new(3, 0)) {
            Err(Error(ErrorKind::InvalidCoordinate(3, 0), _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn spawn_away_from_respects_distance_when_possible() {
        let mut builder = MazeBuilder::new(FloorLayout::new(1.0, 0.0)).unwrap();
        builder.generate(Width(10), Depth(10), Some(12)).unwrap();
        let reference = builder.floor_position(GridCoordinate::new(0, 0)).unwrap();
        for _ in 0..50 {
            let p = builder.spawn_point_away_from(reference, 6.0).unwrap();
            assert!(p.distance_to(reference) >= 6.0);
        }
    }

    #[test]
    fn config_drives_layout_and_dimensions() {
        let config = MazeConfig {
            width: 4,
            depth: 3,
            cell_size: 1.0,
            floor_height: 2.0,
            seed: Some(8),
            steps_per_slice: 5,
        };
        let mut builder = MazeBuilder::default();
        builder.generate_from_config(&config).unwrap();
        assert_eq!(builder.grid().unwrap().size(), 12);
        assert_eq!(builder.layout(), &config.layout());
        assert!(builder.all_floor_positions().unwrap().iter().all(|p| p.y == 2.0));
    }

    #[test]
    fn failed_config_regeneration_keeps_layout_and_maze_together() {
        let first = MazeConfig {
            width: 3,
            depth: 1,
            cell_size: 1.0,
            seed: Some(2),
            ..MazeConfig::default()
        };
        let mut builder = MazeBuilder::from_config(&first).unwrap();
        builder.generate_from_config(&first).unwrap();
        let corner = GridCoordinate::new(2, 0);
        let before = builder.floor_position(corner).unwrap();

        let bad_dimensions = MazeConfig { width: 0, cell_size: 10.0, ..first.clone() };
        assert!(builder.generate_from_config(&bad_dimensions).is_err());

        let after = builder.floor_position(corner).unwrap();
        assert_eq!(after, before);
        assert_eq!(after, builder.all_floor_positions().unwrap()[2]);
        assert_eq!(builder.layout(), &first.layout());
    }

    #[test]
    fn degenerate_cell_sizes_are_rejected() {
        let is_invalid_layout = |result: Result<()>| match result {
            Err(Error(ErrorKind::InvalidLayout(..), _)) => true,
            _ => false,
        };
        assert!(is_invalid_layout(MazeBuilder::new(FloorLayout::new(0.0, 0.0)).map(|_| ())));
        assert!(is_invalid_layout(MazeBuilder::new(FloorLayout::new(::std::f32::NAN, 0.0)).map(|_| ())));

        let zero = MazeConfig {
            width: 3,
            depth: 3,
            cell_size: 0.0,
            seed: Some(1),
            ..MazeConfig::default()
        };
        assert!(is_invalid_layout(MazeBuilder::from_config(&zero).map(|_| ())));

        let mut builder = MazeBuilder::default();
        assert!(is_invalid_layout(builder.generate_from_config(&zero).map(|_| ())));
        assert_eq!(builder.state(), GenerationState::NotStarted);
        assert_eq!(builder.layout(), &FloorLayout::default());
    }
}
