use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use crate::utils::FnvHashSet;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("   ")
    }
}

/// Cell bodies left empty.
#[derive(Debug, Copy, Clone)]
pub struct EmptyDisplay;
impl GridDisplay for EmptyDisplay {}

/// Marks each cell on a path with a dot.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

impl Grid {
    /// Render the maze as ASCII text, row `z = 0` at the top.
    ///
    /// ```text
    /// +---+---+
    /// |       |
    /// +---+   +
    /// |       |
    /// +---+---+
    /// ```
    pub fn render(&self, display: Option<&dyn GridDisplay>) -> String {
        const CORNER: &str = "+";
        const WALL_LR_3: &str = "---";
        const WALL_UD: &str = "|";
        const OPEN_3: &str = "   ";
        const OPEN: &str = " ";

        let display = display.unwrap_or(&EmptyDisplay);
        let columns_count = self.width().0;

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(CORNER);
        for _ in 0..columns_count {
            output.push_str(WALL_LR_3);
            output.push_str(CORNER);
        }
        output.push('\n');

        let mut row_middle_section_render = String::new();
        let mut row_bottom_section_render = String::new();
        for coord in self.iter() {

            // Starts off by special case rendering the west most boundary of the row.
            // The top section of the cell is done by the previous row.
            if coord.x == 0 {
                row_middle_section_render.push_str(WALL_UD);
                row_bottom_section_render.push_str(CORNER);
            }

            let body: String = display.render_cell_body(coord).chars().take(3).collect();
            row_middle_section_render.push_str(&format!("{:3}", body));

            let is_east_open = self.is_neighbour_linked(coord, CompassPrimary::East);
            row_middle_section_render.push_str(if is_east_open { OPEN } else { WALL_UD });

            let is_south_open = self.is_neighbour_linked(coord, CompassPrimary::South);
            row_bottom_section_render.push_str(if is_south_open { OPEN_3 } else { WALL_LR_3 });
            row_bottom_section_render.push_str(CORNER);

            if coord.x as usize == columns_count - 1 {
                output.push_str(&row_middle_section_render);
                output.push('\n');
                output.push_str(&row_bottom_section_render);
                output.push('\n');
                row_middle_section_render.clear();
                row_bottom_section_render.clear();
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(None))
    }
}
