use rand::Rng;

use crate::maze::Grid;

use super::random_tint;

/// Completeness sweep: connects every still fully-walled cell to one
/// uniformly random in-bounds neighbor, ignoring visited state.
///
/// A cell can end up fully walled when it was the start of a restarted walk
/// and all of its neighbors had already been visited. Patching it introduces
/// one cycle into the otherwise tree-shaped passage graph; that is the
/// intended trade against fully enclosed 1x1 pockets. Returns the number of
/// cells repaired.
pub fn repair_isolated<R: Rng>(grid: &mut Grid, rng: &mut R) -> u64 {
    let mut repairs = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !grid[(x, y)].walls.fully_walled() {
                continue;
            }
            let neighbors: Vec<_> = grid.neighbors((x, y), true).collect();
            if neighbors.is_empty() {
                // A 1x1 maze has no neighbors to patch with; leave it be.
                continue;
            }
            let pick = neighbors[rng.random_range(0..neighbors.len())];
            let tint = random_tint(rng);
            // Enumerated neighbors are in bounds and axis-adjacent.
            grid.connect((x, y), pick, tint)
                .expect("neighbor of a grid cell is axis-adjacent");
            tracing::debug!(x, y, to = ?pick, "repaired isolated cell");
            repairs += 1;
        }
    }
    repairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_repairs_every_isolated_cell() {
        let mut grid = Grid::new(3, 3, None).unwrap();
        let tint = (80, 80, 80);
        // Carve a ring around the border, leaving the center isolated.
        grid.connect((0, 0), (1, 0), tint).unwrap();
        grid.connect((1, 0), (2, 0), tint).unwrap();
        grid.connect((2, 0), (2, 1), tint).unwrap();
        grid.connect((2, 1), (2, 2), tint).unwrap();
        grid.connect((2, 2), (1, 2), tint).unwrap();
        grid.connect((1, 2), (0, 2), tint).unwrap();
        grid.connect((0, 2), (0, 1), tint).unwrap();
        grid.connect((0, 1), (0, 0), tint).unwrap();
        assert!(grid[(1, 1)].walls.fully_walled());

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(repair_isolated(&mut grid, &mut rng), 1);
        assert!(!grid[(1, 1)].walls.fully_walled());
        assert_eq!(grid[(1, 1)].walls.open_count(), 1);
    }

    #[test]
    fn test_single_cell_grid_is_left_alone() {
        let mut grid = Grid::new(1, 1, None).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(repair_isolated(&mut grid, &mut rng), 0);
        assert!(grid[(0, 0)].walls.fully_walled());
    }

    #[test]
    fn test_connected_grid_needs_no_repairs() {
        let mut grid = Grid::new(2, 1, None).unwrap();
        grid.connect((0, 0), (1, 0), (1, 1, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(repair_isolated(&mut grid, &mut rng), 0);
    }
}
