use smallvec::SmallVec;

use crate::units::Width;

/// Position of a cell in maze space. `x` runs along the width of the maze, `z` along its depth.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: u32,
    pub z: u32,
}

impl GridCoordinate {
    pub fn new(x: u32, z: u32) -> GridCoordinate {
        GridCoordinate { x, z }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> GridCoordinate {
        let Width(row_length) = width;
        let x = index % row_length;
        let z = index / row_length;

        GridCoordinate::new(x as u32, z as u32)
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<GridCoordinate>; 4]>;

/// The four axis aligned directions out of a cell.
///
/// North is towards `-z`, South towards `+z`, East towards `+x` and West towards `-x`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Every direction, in the fixed order neighbours are considered during generation.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Creates a new coordinate offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable. The upper grid bounds are not checked.
    pub fn offset(self, coord: GridCoordinate) -> Option<GridCoordinate> {
        let (x, z) = (coord.x, coord.z);
        match self {
            CompassPrimary::North => z.checked_sub(1).map(|z| GridCoordinate::new(x, z)),
            CompassPrimary::South => z.checked_add(1).map(|z| GridCoordinate::new(x, z)),
            CompassPrimary::East => x.checked_add(1).map(|x| GridCoordinate::new(x, z)),
            CompassPrimary::West => x.checked_sub(1).map(|x| GridCoordinate::new(x, z)),
        }
    }

    /// The direction leading from `from` to the orthogonally adjacent `to`, if they are adjacent.
    pub fn between(from: GridCoordinate, to: GridCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| dir.offset(from) == Some(to))
    }
}

/// The four walls of a cell. `true` means the wall is standing.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Walls {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Walls {
    pub fn all_closed() -> Walls {
        Walls {
            north: true,
            south: true,
            east: true,
            west: true,
        }
    }

    #[inline]
    pub fn is_closed(&self, dir: CompassPrimary) -> bool {
        match dir {
            CompassPrimary::North => self.north,
            CompassPrimary::South => self.south,
            CompassPrimary::East => self.east,
            CompassPrimary::West => self.west,
        }
    }

    #[inline]
    pub fn is_open(&self, dir: CompassPrimary) -> bool {
        !self.is_closed(dir)
    }

    pub fn set(&mut self, dir: CompassPrimary, closed: bool) {
        match dir {
            CompassPrimary::North => self.north = closed,
            CompassPrimary::South => self.south = closed,
            CompassPrimary::East => self.east = closed,
            CompassPrimary::West => self.west = closed,
        }
    }

    pub fn open_count(&self) -> usize {
        CompassPrimary::ALL.iter().filter(|dir| self.is_open(**dir)).count()
    }
}

impl Default for Walls {
    fn default() -> Walls {
        Walls::all_closed()
    }
}

/// One cell of the maze grid.
///
/// The coordinate never changes after creation. Walls and the visited flag are only mutated while a
/// maze is being carved.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    coordinate: GridCoordinate,
    pub walls: Walls,
    pub visited: bool,
}

impl Cell {
    pub fn new(coordinate: GridCoordinate) -> Cell {
        Cell {
            coordinate,
            walls: Walls::all_closed(),
            visited: false,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    pub fn reset(&mut self) {
        self.walls = Walls::all_closed();
        self.visited = false;
    }
}
