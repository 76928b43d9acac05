pub mod cell;
pub mod grid;

pub use cell::{Cell, Direction, Tint, Walls};
pub use grid::{EndpointKind, Grid, GridEvent};

use thiserror::Error;

/// Structural errors of the grid model. Empty neighbor lists and empty walk
/// stacks are expected control-flow states of the algorithm, not errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    /// Fatal at construction: a maze needs at least one cell per axis.
    #[error("maze dimensions must be at least 1x1, got {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    /// A coordinate outside the grid was accessed. Surfaced to the caller,
    /// never silently clamped.
    #[error("cell ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },

    /// A wall removal was requested between cells that do not share a wall.
    #[error("cells ({}, {}) and ({}, {}) are not axis-adjacent", a.0, a.1, b.0, b.1)]
    NotAdjacent { a: (u16, u16), b: (u16, u16) },
}
