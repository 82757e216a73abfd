use docopt::Docopt;
use log::info;
use serde_derive::Deserialize;
use mazebuilder::{
    builder::MazeBuilder,
    config::MazeConfig,
    grid::Grid,
    grid_displays::{GridDisplay, PathDisplay},
    pathing,
    positions::Position,
};
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Maze builder

Usage:
    mazebuilder_driver -h | --help
    mazebuilder_driver [--width=<w> --depth=<d> --seed=<n> --cell-size=<s>] [--config=<path>] [--spawn-count=<n> --min-distance=<m>] [--show-path] [--quiet] [--save-edges=<path>] [--spawn-points-out=<path>]

Options:
    -h --help                  Show this screen.
    --width=<w>                Number of cells along x [default: 10].
    --depth=<d>                Number of cells along z [default: 10].
    --seed=<n>                 Random seed. A fresh seed is drawn and logged if not given.
    --cell-size=<s>            World-space side length of one cell [default: 4.0].
    --config=<path>            JSON maze config file. Replaces the dimension, seed and cell size options.
    --spawn-count=<n>          Number of spawn points to pick [default: 1].
    --min-distance=<m>         Each spawn point after the first is at least this far from the previous one, where the maze allows [default: 0].
    --show-path                Mark the longest path through the maze in the text rendering.
    --quiet                    Do not print the maze.
    --save-edges=<path>        Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --spawn-points-out=<path>  Write every floor position as a JSON array.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_depth: usize,
    flag_seed: Option<u64>,
    flag_cell_size: f32,
    flag_config: String,
    flag_spawn_count: usize,
    flag_min_distance: f32,
    flag_show_path: bool,
    flag_quiet: bool,
    flag_save_edges: String,
    flag_spawn_points_out: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazebuilder::errors::Error, ::mazebuilder::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let config = maze_config_from_args(&args)?;

    let mut builder = MazeBuilder::from_config(&config)?;
    builder.generate_from_config(&config)?;

    {
        let grid = builder.grid()?;
        if !args.flag_quiet {
            println!("{}", render_maze(grid, args.flag_show_path));
        }
        if !args.flag_save_edges.is_empty() {
            save_maze_graph(grid, &args.flag_save_edges)?;
        }
    }
    println!("seed: {}", builder.seed()?);

    for (i, spawn) in pick_spawn_points(&mut builder, args.flag_spawn_count, args.flag_min_distance)?
        .iter()
        .enumerate() {
        println!("spawn {}: ({:.2}, {:.2}, {:.2})", i, spawn.x, spawn.y, spawn.z);
    }

    if !args.flag_spawn_points_out.is_empty() {
        let json = serde_json::to_string_pretty(builder.all_floor_positions()?)?;
        write_text_to_file(&json, &args.flag_spawn_points_out)
            .chain_err(|| format!("Failed to write spawn points to {}", args.flag_spawn_points_out))?;
    }

    Ok(())
}

fn maze_config_from_args(args: &MazeArgs) -> Result<MazeConfig> {
    if !args.flag_config.is_empty() {
        info!("loading maze config from {}", args.flag_config);
        return Ok(MazeConfig::from_file(&args.flag_config)?);
    }

    Ok(MazeConfig {
        width: args.flag_width,
        depth: args.flag_depth,
        cell_size: args.flag_cell_size,
        seed: args.flag_seed,
        ..MazeConfig::default()
    })
}

fn render_maze(grid: &Grid, show_path: bool) -> String {
    if show_path {
        if let Some(path) = pathing::longest_path(grid) {
            let path_display = PathDisplay::new(&path);
            return grid.render(Some(&path_display as &dyn GridDisplay));
        }
    }
    grid.render(None)
}

/// The first spawn point is uniformly random, each later one is kept away from its predecessor.
fn pick_spawn_points(builder: &mut MazeBuilder, count: usize, min_distance: f32) -> Result<Vec<Position>> {
    let mut spawns = Vec::with_capacity(count);
    for _ in 0..count {
        let spawn = match spawns.last() {
            Some(previous) => builder.spawn_point_away_from(*previous, min_distance)?,
            None => builder.random_floor_position()?,
        };
        spawns.push(spawn);
    }
    Ok(spawns)
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let mut graph_data = format!("{} {}\n", maze_grid.size(), maze_grid.links_count());

    for (src, dst) in maze_grid.iter_links() {
        let indices = maze_grid
            .grid_coordinate_to_index(src)
            .and_then(|a| maze_grid.grid_coordinate_to_index(dst).map(|b| (a, b)));
        let (index_a, index_b) = indices.ok_or("Passage between cells outside the maze")?;

        graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
