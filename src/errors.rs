//! Error types for the crate.
//!
//! Other modules `use crate::errors::*;` to get the `Error`, `ErrorKind`, `ResultExt` and `Result`
//! types that `error_chain!` creates. `Result` is a typedef of std `Result` with our own `Error`,
//! and the foreign links give the `From` conversions that let `?` work on io and json failures.

#![allow(deprecated)] // error_chain's generated `description` impls

use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Json(::serde_json::Error);
    }

    errors {
        InvalidDimensions(width: usize, depth: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: width and depth must both be at least 1", width, depth)
        }
        NotGenerated {
            description("maze not generated")
            display("no maze has been generated yet")
        }
        InvalidLayout(cell_size: f32, floor_height: f32) {
            description("invalid floor layout")
            display("invalid floor layout: cell size {} must be finite and positive, floor height {} must be finite",
                    cell_size, floor_height)
        }
        InvalidCoordinate(x: u32, z: u32) {
            description("grid coordinate out of bounds")
            display("grid coordinate ({}, {}) is outside the maze", x, z)
        }
    }
}
