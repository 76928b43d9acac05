use crate::maze::{EndpointKind, Grid};

/// Boundary endpoints selected after generation, if any qualified.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub start: Option<(u16, u16)>,
    pub finish: Option<(u16, u16)>,
}

fn distance_from_origin(coord: (u16, u16)) -> f64 {
    let (x, y) = (coord.0 as f64, coord.1 as f64);
    (x * x + y * y).sqrt()
}

/// A cell qualifies as an endpoint when a walk reached it and it was actually
/// connected into the passage structure. The sole cell of a 1x1 maze never
/// connects to anything, so it gets no endpoints.
fn eligible(grid: &Grid, coord: (u16, u16)) -> bool {
    let cell = grid[coord];
    cell.visited && !cell.walls.fully_walled()
}

/// Picks the start on the y = 0 edge (minimum Euclidean distance from the
/// origin corner) and the finish on the y = height - 1 edge (maximum
/// distance), opening the outward-facing wall of each. A boundary without a
/// qualifying cell is reported and left without an endpoint; the maze remains
/// usable.
pub fn select(grid: &mut Grid) -> Endpoints {
    let bottom = grid.height() - 1;

    let start = (0..grid.width())
        .map(|x| (x, 0))
        .filter(|&coord| eligible(grid, coord))
        .min_by(|&a, &b| distance_from_origin(a).total_cmp(&distance_from_origin(b)));
    let finish = (0..grid.width())
        .map(|x| (x, bottom))
        .filter(|&coord| eligible(grid, coord))
        .max_by(|&a, &b| distance_from_origin(a).total_cmp(&distance_from_origin(b)));

    match start {
        Some(coord) => grid.mark_endpoint(coord, EndpointKind::Start),
        None => tracing::warn!("no qualifying cell on the top boundary, start not assigned"),
    }
    match finish {
        Some(coord) => grid.mark_endpoint(coord, EndpointKind::Finish),
        None => tracing::warn!("no qualifying cell on the bottom boundary, finish not assigned"),
    }

    Endpoints { start, finish }
}
