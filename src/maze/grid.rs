use std::sync::mpsc::SyncSender;

use super::MazeError;
use super::cell::{Cell, Direction, Tint, Walls};

/// Change notifications emitted by the grid while the carver mutates it.
///
/// A rendering collaborator can subscribe with a channel sender and replay
/// these events to animate the carving without touching the grid itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// Emitted once at construction, before any wall is opened.
    Initial { width: u16, height: u16 },
    /// The wall between two adjacent cells was opened.
    Carved {
        a: (u16, u16),
        b: (u16, u16),
        tint: Tint,
    },
    /// A boundary cell was designated as the maze start or finish.
    Endpoint { coord: (u16, u16), kind: EndpointKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Start,
    Finish,
}

impl EndpointKind {
    /// The outward-facing wall that gets opened on the selected cell:
    /// the start sits on the y = 0 edge, the finish on the y = height - 1 edge.
    pub fn outward(self) -> Direction {
        match self {
            EndpointKind::Start => Direction::North,
            EndpointKind::Finish => Direction::South,
        }
    }
}

/// A fixed-size 2D grid of cells, stored row-major.
///
/// Coordinates are `(x, y)` with `0 <= x < width` and `0 <= y < height`.
/// Out-of-bounds access through the checked accessors is an explicit error,
/// never a silent clamp.
pub struct Grid {
    data: Box<[Cell]>,
    width: u16,
    height: u16,
    sender: Option<SyncSender<GridEvent>>,
}

impl Grid {
    /// Creates a grid with every cell fully walled and unvisited.
    ///
    /// The sender is a bounded channel so a slow rendering consumer
    /// backpressures the carve loop instead of piling up events.
    pub fn new(
        width: u16,
        height: u16,
        sender: Option<SyncSender<GridEvent>>,
    ) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let data = vec![Cell::SEALED; width as usize * height as usize].into_boxed_slice();
        if let Some(s) = &sender {
            let _ = s.send(GridEvent::Initial { width, height });
        }
        Ok(Grid {
            data,
            width,
            height,
            sender,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn contains(&self, coord: (u16, u16)) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        y as usize * self.width as usize + x as usize
    }

    /// Checked cell access; the error path for out-of-bounds coordinates.
    pub fn cell(&self, coord: (u16, u16)) -> Result<Cell, MazeError> {
        if !self.contains(coord) {
            return Err(MazeError::OutOfBounds {
                x: coord.0,
                y: coord.1,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.data[self.ravel_index(coord.0, coord.1)])
    }

    /// The four wall flags of a cell.
    pub fn walls_of(&self, coord: (u16, u16)) -> Result<Walls, MazeError> {
        Ok(self.cell(coord)?.walls)
    }

    /// In-bounds neighbors of a cell in the fixed order west, east, north,
    /// south. When `include_visited` is false, neighbors already reached by a
    /// walk are excluded. The enumeration is deterministic; randomness enters
    /// only when a caller picks among the results.
    pub fn neighbors(
        &self,
        coord: (u16, u16),
        include_visited: bool,
    ) -> impl Iterator<Item = (u16, u16)> {
        let (x, y) = coord;
        let candidates: Vec<(u16, u16)> = if self.contains(coord) {
            vec![
                // NOTE: This way of handling underflow/overflow is overflow-safe.
                // When x < 1 or y < 1, wrap x - 1 or y - 1 to u16::MAX to avoid underflow,
                // and automatically filter it out in the bounds comparison.
                // When x + 1 or y + 1 exceeds u16::MAX, saturate to u16::MAX, which is
                // likewise filtered out (the largest index numerically possible is
                // u16::MAX - 1, while the largest dimension is u16::MAX).
                (x.wrapping_sub(1), y),
                (x.saturating_add(1), y),
                (x, y.wrapping_sub(1)),
                (x, y.saturating_add(1)),
            ]
        } else {
            // No neighbors if the coordinate is out of bounds
            vec![]
        };

        candidates.into_iter().filter(move |&c| {
            self.contains(c) && (include_visited || !self.data[self.ravel_index(c.0, c.1)].visited)
        })
    }

    /// Whether the cell still has at least one unvisited in-bounds neighbor.
    /// Decides between continuing a walk and backtracking.
    pub fn has_unvisited_neighbor(&self, coord: (u16, u16)) -> bool {
        self.neighbors(coord, false).next().is_some()
    }

    /// The direction from `a` to `b` when they are axis-adjacent.
    pub fn direction_between(
        &self,
        a: (u16, u16),
        b: (u16, u16),
    ) -> Result<Direction, MazeError> {
        // Bounds first, so a misuse reports the more specific error.
        self.cell(a)?;
        self.cell(b)?;
        let dx = b.0 as i32 - a.0 as i32;
        let dy = b.1 as i32 - a.1 as i32;
        match (dx, dy) {
            (-1, 0) => Ok(Direction::West),
            (1, 0) => Ok(Direction::East),
            (0, -1) => Ok(Direction::North),
            (0, 1) => Ok(Direction::South),
            _ => Err(MazeError::NotAdjacent { a, b }),
        }
    }

    /// Opens the wall between two adjacent cells, from both sides, and marks
    /// both cells visited. The walk tint is recorded on both cells for
    /// rendering. Idempotent on the wall flags.
    pub fn connect(&mut self, a: (u16, u16), b: (u16, u16), tint: Tint) -> Result<(), MazeError> {
        let direction = self.direction_between(a, b)?;

        let ai = self.ravel_index(a.0, a.1);
        self.data[ai].walls.open(direction);
        self.data[ai].visited = true;
        self.data[ai].tint = Some(tint);

        let bi = self.ravel_index(b.0, b.1);
        self.data[bi].walls.open(direction.opposite());
        self.data[bi].visited = true;
        self.data[bi].tint = Some(tint);

        if let Some(s) = &self.sender {
            let _ = s.send(GridEvent::Carved { a, b, tint });
        }
        Ok(())
    }

    /// Marks a cell visited and assigns its visit-order id, if it does not
    /// have one yet.
    pub(crate) fn mark_visited(&mut self, coord: (u16, u16), path_id: u32) {
        let idx = self.ravel_index(coord.0, coord.1);
        self.data[idx].visited = true;
        if self.data[idx].path_id.is_none() {
            self.data[idx].path_id = Some(path_id);
        }
    }

    /// Opens the outward-facing wall of a boundary cell selected as the maze
    /// start or finish.
    pub(crate) fn mark_endpoint(&mut self, coord: (u16, u16), kind: EndpointKind) {
        let idx = self.ravel_index(coord.0, coord.1);
        self.data[idx].walls.open(kind.outward());
        if let Some(s) = &self.sender {
            let _ = s.send(GridEvent::Endpoint { coord, kind });
        }
    }

    /// First unvisited cell in row-major order, if any. Drives the
    /// restart-until-covered top-level loop of the carver.
    pub fn first_unvisited(&self) -> Option<(u16, u16)> {
        self.data
            .iter()
            .position(|cell| !cell.visited)
            .map(|idx| ((idx % self.width as usize) as u16, (idx / self.width as usize) as u16))
    }
}

impl std::ops::Index<(u16, u16)> for Grid {
    type Output = Cell;

    /// Unchecked access for internal hot paths and tests. Panics when out of
    /// bounds; external callers go through [`Grid::cell`].
    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}
