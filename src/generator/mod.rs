mod endpoints;
mod stats;
mod sweep;

pub use stats::GenStats;

use std::sync::mpsc::SyncSender;
use std::time::Instant;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::maze::{Grid, GridEvent, MazeError, Tint, Walls};

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// One random display tint per walk, bright enough to read against the floor.
pub(crate) fn random_tint<R: Rng>(rng: &mut R) -> Tint {
    (
        rng.random_range(50..=255),
        rng.random_range(50..=255),
        rng.random_range(50..=255),
    )
}

/// Phase of the carving state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Carving forward: pick a random unvisited neighbor and open the wall.
    Walking,
    /// Returning along the walk stack to the nearest cell with an unexplored
    /// neighbor.
    Backtracking,
    /// Every cell visited, endpoints selected, sweep finished.
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Walking => write!(f, "walking"),
            Phase::Backtracking => write!(f, "backtracking"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// Randomized depth-first-search maze generator.
///
/// Owns the grid and mutates it one transition at a time: a `step` performs
/// exactly one carve or one backtrack pop, so an interactive caller can
/// interleave generation with rendering and abort between steps, leaving the
/// grid in a legal partially-carved state. `generate_full` runs the same
/// machine to exhaustion.
///
/// Coverage strategy: whenever the walk stack empties, the next walk restarts
/// from the first unvisited cell in row-major order, until none remain. The
/// final transition selects the boundary endpoints and repairs isolated
/// cells.
pub struct Carver<R: Rng = StdRng> {
    grid: Grid,
    /// LIFO walk stack; the top is the current cell while generating.
    stack: Vec<(u16, u16)>,
    rng: R,
    phase: Phase,
    stats: GenStats,
    /// Monotonic visit-order counter for path-group ids.
    next_path_id: u32,
    /// Tint of the walk in progress.
    tint: Tint,
    endpoints: endpoints::Endpoints,
}

impl Carver {
    /// Creates a carver over a fresh all-walled grid.
    ///
    /// `seed` fixes the random stream for reproducible mazes. `origin` is the
    /// cell the first walk starts from; a random cell when absent. Fails with
    /// `InvalidDimensions` or, for an out-of-grid origin, `OutOfBounds`.
    pub fn new(
        width: u16,
        height: u16,
        seed: Option<u64>,
        origin: Option<(u16, u16)>,
    ) -> Result<Self, MazeError> {
        Carver::with_events(width, height, seed, origin, None)
    }

    /// Like [`Carver::new`], but grid mutations are also reported on the
    /// given channel so a rendering collaborator can animate them.
    pub fn with_events(
        width: u16,
        height: u16,
        seed: Option<u64>,
        origin: Option<(u16, u16)>,
        sender: Option<SyncSender<GridEvent>>,
    ) -> Result<Self, MazeError> {
        Carver::with_rng(width, height, origin, sender, get_rng(seed))
    }

    /// Checks construction parameters without allocating a grid, so callers
    /// can validate a configuration before touching terminal state.
    pub fn validate(
        width: u16,
        height: u16,
        origin: Option<(u16, u16)>,
    ) -> Result<(), MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        if let Some((x, y)) = origin {
            if x >= width || y >= height {
                return Err(MazeError::OutOfBounds {
                    x,
                    y,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}

impl<R: Rng> Carver<R> {
    /// Like [`Carver::with_events`], but with a caller-provided random source
    /// instead of a seeded [`StdRng`].
    pub fn with_rng(
        width: u16,
        height: u16,
        origin: Option<(u16, u16)>,
        sender: Option<SyncSender<GridEvent>>,
        mut rng: R,
    ) -> Result<Self, MazeError> {
        Carver::validate(width, height, origin)?;
        let grid = Grid::new(width, height, sender)?;
        let origin = origin.unwrap_or_else(|| {
            (
                rng.random_range(0..width),
                rng.random_range(0..height),
            )
        });
        let mut carver = Carver {
            grid,
            stack: Vec::new(),
            rng,
            phase: Phase::Walking,
            stats: GenStats::default(),
            next_path_id: 0,
            tint: (0, 0, 0),
            endpoints: endpoints::Endpoints::default(),
        };
        carver.begin_walk(origin);
        Ok(carver)
    }

    /// Starts a new walk at an unvisited cell.
    fn begin_walk(&mut self, coord: (u16, u16)) {
        self.tint = random_tint(&mut self.rng);
        self.grid.mark_visited(coord, self.next_path_id);
        self.next_path_id += 1;
        self.stats.cells_visited += 1;
        self.stack.push(coord);
        self.phase = Phase::Walking;
    }

    /// Advances the state machine by exactly one transition: one carve while
    /// walking, or one stack pop while backtracking. Idempotent once done.
    pub fn step(&mut self) -> Phase {
        match self.phase {
            Phase::Walking => self.step_walk(),
            Phase::Backtracking => self.step_backtrack(),
            Phase::Done => Phase::Done,
        }
    }

    fn step_walk(&mut self) -> Phase {
        let Some(&current) = self.stack.last() else {
            // Walking always has a current cell; recover by finalizing.
            self.finish();
            return self.phase;
        };
        let neighbors: Vec<_> = self.grid.neighbors(current, false).collect();
        match neighbors.len() {
            0 => {
                // Dead end. Re-connecting to the cell we came from is a no-op
                // on the wall flags but stamps the walk tint onto the final
                // cell, closing the rendering group.
                if self.stack.len() >= 2 {
                    let previous = self.stack[self.stack.len() - 2];
                    self.grid
                        .connect(current, previous, self.tint)
                        .expect("consecutive stack cells are axis-adjacent");
                }
                self.stats.paths_created += 1;
                self.stats.backtrack_events += 1;
                self.phase = Phase::Backtracking;
            }
            n => {
                let next = neighbors[self.rng.random_range(0..n)];
                self.grid
                    .connect(current, next, self.tint)
                    .expect("enumerated neighbors are axis-adjacent");
                self.grid.mark_visited(next, self.next_path_id);
                self.next_path_id += 1;
                self.stats.cells_visited += 1;
                self.stack.push(next);
            }
        }
        self.phase
    }

    fn step_backtrack(&mut self) -> Phase {
        if self.stack.pop().is_some() {
            self.stats.cells_backtracked += 1;
        }
        match self.stack.last() {
            Some(&top) if self.grid.has_unvisited_neighbor(top) => {
                // Resume carving from here; a resumed excursion is a new path.
                self.tint = random_tint(&mut self.rng);
                self.phase = Phase::Walking;
            }
            Some(_) => {
                // Keep popping on the next step.
            }
            None => match self.grid.first_unvisited() {
                Some(coord) => self.begin_walk(coord),
                None => self.finish(),
            },
        }
        self.phase
    }

    /// Final transition: endpoint selection, then the isolated-cell repair.
    fn finish(&mut self) {
        self.endpoints = endpoints::select(&mut self.grid);
        self.stats.isolated_repairs = sweep::repair_isolated(&mut self.grid, &mut self.rng);
        self.phase = Phase::Done;
        tracing::debug!(stats = ?self.stats, "generation finished");
    }

    /// Runs the state machine to completion. Equivalent to calling
    /// [`Carver::step`] until the maze is complete.
    pub fn generate_full(&mut self) {
        let started = Instant::now();
        while self.phase != Phase::Done {
            self.step();
        }
        tracing::info!(
            width = self.grid.width(),
            height = self.grid.height(),
            elapsed = ?started.elapsed(),
            paths = self.stats.paths_created,
            "full maze generated"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.grid.width(), self.grid.height())
    }

    /// The four wall flags of a cell; `OutOfBounds` outside the grid.
    pub fn walls_of(&self, coord: (u16, u16)) -> Result<Walls, MazeError> {
        self.grid.walls_of(coord)
    }

    /// The designated entry cell on the y = 0 boundary, if one qualified.
    pub fn boundary_start(&self) -> Option<(u16, u16)> {
        self.endpoints.start
    }

    /// The designated exit cell on the y = height - 1 boundary, if one
    /// qualified.
    pub fn boundary_finish(&self) -> Option<(u16, u16)> {
        self.endpoints.finish
    }

    /// Read-only view of the wall-state grid for rendering collaborators.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Snapshot of the generation counters.
    pub fn stats(&self) -> GenStats {
        self.stats
    }
}
