use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;

/// Apply the recursive backtracker maze generation algorithm to a grid, running it to completion.
///
/// Any existing passages on the grid are discarded first. The result is a perfect maze: every cell
/// reachable from every other cell by exactly one path.
pub fn recursive_backtracker<R: Rng>(grid: Grid, rng: R) -> Grid {
    Carver::new(grid, rng).finish()
}

/// Step-wise recursive backtracker (randomised depth-first carve).
///
/// Starting at the cell (0, 0) we repeatedly carve a passage into a random unvisited neighbour,
/// remembering where we came from on an explicit stack. When a cell has no unvisited neighbours we
/// backtrack by popping the stack. Generation ends once every cell has been visited.
///
/// The explicit stack, rather than recursion, keeps large grids from overflowing the call stack.
/// Each call to `step` does a bounded amount of work so a host frame loop can spread generation of
/// a big maze over several frames with `run`.
#[derive(Debug)]
pub struct Carver<R: Rng> {
    grid: Grid,
    rng: R,
    stack: Vec<GridCoordinate>,
    current: GridCoordinate,
    visited_count: usize,
    done: bool,
}

impl<R: Rng> Carver<R> {
    pub fn new(mut grid: Grid, rng: R) -> Carver<R> {
        grid.reset();

        let start = GridCoordinate::new(0, 0);
        grid.set_visited(start, true);
        let done = grid.size() <= 1;

        Carver {
            grid,
            rng,
            stack: Vec::new(),
            current: start,
            visited_count: 1,
            done,
        }
    }

    /// Carve into one new cell or backtrack one cell.
    /// Returns true while there is more work to do.
    pub fn step(&mut self) -> bool {
        if self.done {
            return false;
        }

        let unvisited = self.unvisited_neighbours(self.current);

        if !unvisited.is_empty() {
            let next = unvisited[self.rng.gen_range(0..unvisited.len())];
            let linked = self.grid.link(self.current, next);
            debug_assert!(linked.is_ok(), "unvisited neighbours are adjacent cells inside the grid");
            self.stack.push(self.current);
            self.grid.set_visited(next, true);
            self.visited_count += 1;
            self.current = next;
        } else if let Some(previous) = self.stack.pop() {
            self.current = previous;
        } else {
            // Nothing left to backtrack to, so every reachable cell has been visited.
            self.done = true;
        }

        if self.visited_count >= self.grid.size() {
            self.done = true;
        }
        !self.done
    }

    /// Run at most `max_steps` steps. Returns true once the maze is complete.
    pub fn run(&mut self, max_steps: usize) -> bool {
        for _ in 0..max_steps {
            if !self.step() {
                break;
            }
        }
        self.done
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.done
    }

    /// Generation progress as a ratio of visited cells (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        self.visited_count as f32 / self.grid.size() as f32
    }

    /// The grid as carved so far.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Run to completion and hand back the maze.
    pub fn finish(self) -> Grid {
        self.into_parts().0
    }

    /// Run to completion and hand back the maze together with the random source, so that later
    /// random choices continue the same stream.
    pub fn into_parts(mut self) -> (Grid, R) {
        while self.step() {}
        (self.grid, self.rng)
    }

    fn unvisited_neighbours(&self, coord: GridCoordinate) -> SmallVec<[GridCoordinate; 4]> {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.grid.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| !self.grid.is_visited(*neighbour))
            .collect()
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::pathing::Distances;
    use crate::units::{Depth, Width};

    fn carve(w: usize, d: usize, seed: u64) -> Grid {
        let grid = Grid::new(Width(w), Depth(d)).expect("valid grid dimensions");
        recursive_backtracker(grid, XorShiftRng::seed_from_u64(seed))
    }

    // Keep arbitrary grids small enough to be quick.
    fn dims(w: u8, d: u8) -> (usize, usize) {
        (w as usize % 16 + 1, d as usize % 16 + 1)
    }

    #[test]
    fn three_by_three_maze() {
        let g = carve(3, 3, 7);
        assert_eq!(g.size(), 9);
        assert_eq!(g.links_count(), 8);
        let distances = Distances::new(&g, GridCoordinate::new(0, 0)).unwrap();
        assert_eq!(distances.reachable_count(), 9);
        assert!(g.is_perfect());
    }

    #[test]
    fn single_cell_maze() {
        let g = carve(1, 1, 99);
        assert_eq!(g.size(), 1);
        assert_eq!(g.links_count(), 0);
        assert!(g.is_perfect());
        assert!(g.cells()[0].visited);
    }

    #[test]
    fn single_row_and_column_mazes_are_corridors() {
        let row = carve(9, 1, 3);
        let column = carve(1, 9, 3);
        assert_eq!(row.links_count(), 8);
        assert_eq!(column.links_count(), 8);
        assert!(row.is_perfect());
        assert!(column.is_perfect());
    }

    #[test]
    fn every_cell_is_visited() {
        let g = carve(12, 7, 1234);
        assert!(g.cells().iter().all(|cell| cell.visited));
    }

    #[test]
    fn carving_resets_existing_passages() {
        let mut g = Grid::new(Width(4), Depth(4)).unwrap();
        for x in 0..3 {
            for z in 0..4 {
                g.link(GridCoordinate::new(x, z), GridCoordinate::new(x + 1, z)).unwrap();
            }
        }
        let g = recursive_backtracker(g, XorShiftRng::seed_from_u64(5));
        assert!(g.is_perfect());
    }

    #[test]
    fn stepping_reports_progress() {
        let grid = Grid::new(Width(5), Depth(5)).unwrap();
        let mut carver = Carver::new(grid, XorShiftRng::seed_from_u64(11));
        assert!(!carver.is_complete());
        assert!((carver.progress() - 1.0 / 25.0).abs() < 1e-6);

        let mut last_progress = carver.progress();
        while !carver.run(3) {
            assert!(carver.progress() >= last_progress);
            last_progress = carver.progress();
        }
        assert!(carver.is_complete());
        assert!((carver.progress() - 1.0).abs() < 1e-6);
        assert!(!carver.step());
        assert!(carver.grid().is_perfect());
    }

    #[test]
    fn stepped_and_one_shot_carves_agree() {
        let one_shot = carve(10, 6, 42);

        let grid = Grid::new(Width(10), Depth(6)).unwrap();
        let mut carver = Carver::new(grid, XorShiftRng::seed_from_u64(42));
        while !carver.run(1) {}
        assert_eq!(carver.finish(), one_shot);
    }

    #[test]
    fn different_seeds_give_different_mazes() {
        // Not guaranteed for every pair of seeds, but overwhelmingly likely on a 20x20 grid.
        assert_ne!(carve(20, 20, 1), carve(20, 20, 2));
    }

    #[test]
    fn large_maze_does_not_overflow_the_stack() {
        let g = carve(300, 300, 8);
        assert_eq!(g.links_count(), 300 * 300 - 1);
    }

    #[test]
    fn quickcheck_spanning_tree() {
        fn p(w: u8, d: u8, seed: u64) -> bool {
            let (w, d) = dims(w, d);
            let g = carve(w, d, seed);
            let distances = Distances::new(&g, GridCoordinate::new(0, 0)).unwrap();
            g.links_count() == w * d - 1 && distances.reachable_count() == w * d && g.is_perfect()
        }
        quickcheck(p as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn quickcheck_flood_fill_from_any_cell() {
        fn p(w: u8, d: u8, seed: u64, start: usize) -> bool {
            let (w, d) = dims(w, d);
            let g = carve(w, d, seed);
            let start = GridCoordinate::from_row_major_index(start % (w * d), Width(w));
            let distances = Distances::new(&g, start).unwrap();
            distances.reachable_count() == w * d
        }
        quickcheck(p as fn(u8, u8, u64, usize) -> bool);
    }

    #[test]
    fn quickcheck_wall_symmetry() {
        fn p(w: u8, d: u8, seed: u64) -> bool {
            let (w, d) = dims(w, d);
            carve(w, d, seed).asymmetric_walls_count() == 0
        }
        quickcheck(p as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn quickcheck_outer_boundary_stays_closed() {
        fn p(w: u8, d: u8, seed: u64) -> bool {
            let (w, d) = dims(w, d);
            let g = carve(w, d, seed);
            g.cells().iter().all(|cell| {
                CompassPrimary::ALL.iter().all(|dir| {
                    g.neighbour_at_direction(cell.coordinate(), *dir).is_some() ||
                    cell.walls.is_closed(*dir)
                })
            })
        }
        quickcheck(p as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn quickcheck_deterministic_given_seed() {
        fn p(w: u8, d: u8, seed: u64) -> TestResult {
            let (w, d) = dims(w, d);
            TestResult::from_bool(carve(w, d, seed) == carve(w, d, seed))
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult);
    }
}
