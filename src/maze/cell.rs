use std::fmt;

/// RGB tint assigned to the cells of one walk, used by display layers only.
pub type Tint = (u8, u8, u8);

/// Cardinal directions in the fixed enumeration order west, east, north, south.
///
/// Every piece of neighbor math in the crate relies on this order being stable:
/// neighbor enumeration is deterministic and only the random choice between
/// neighbors introduces randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    /// All directions, in enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::West,
        Direction::East,
        Direction::North,
        Direction::South,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }

    fn mask(self) -> u8 {
        match self {
            Direction::West => 0b0001,
            Direction::East => 0b0010,
            Direction::North => 0b0100,
            Direction::South => 0b1000,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::West => write!(f, "west"),
            Direction::East => write!(f, "east"),
            Direction::North => write!(f, "north"),
            Direction::South => write!(f, "south"),
        }
    }
}

/// The four wall flags of a cell, stored as a 4-bit flag set.
///
/// A set bit means the wall is present; an open wall is a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls(u8);

impl Walls {
    /// All four walls present.
    pub const SEALED: Walls = Walls(0b1111);

    pub fn is_present(self, direction: Direction) -> bool {
        self.0 & direction.mask() != 0
    }

    pub fn is_open(self, direction: Direction) -> bool {
        !self.is_present(direction)
    }

    /// Removes the wall in the given direction. Idempotent.
    pub fn open(&mut self, direction: Direction) {
        self.0 &= !direction.mask();
    }

    /// True when no wall has been opened yet, i.e. the cell is still isolated.
    pub fn fully_walled(self) -> bool {
        self.0 == Walls::SEALED.0
    }

    pub fn open_count(self) -> u32 {
        4 - self.0.count_ones()
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::SEALED
    }
}

/// One grid unit: four wall flags plus the generation bookkeeping the
/// carving algorithm maintains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub walls: Walls,
    /// Set once the cell has been reached by a walk.
    pub visited: bool,
    /// Monotonic visit-order id, assigned when the cell is first reached.
    pub path_id: Option<u32>,
    /// Display tint of the walk that reached this cell. Not structurally
    /// significant; consumed by rendering layers only.
    pub tint: Option<Tint>,
}

impl Cell {
    /// A freshly constructed cell: all walls present, unvisited.
    pub const SEALED: Cell = Cell {
        walls: Walls::SEALED,
        visited: false,
        path_id: None,
        tint: None,
    };
}
