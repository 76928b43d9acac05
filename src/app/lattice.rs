use std::fmt;
use std::io::Write;

use crossterm::style::{Color, Stylize};

use crate::maze::{Direction, EndpointKind, Grid, GridEvent, Tint};

/// One display unit of the doubled lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Glyph {
    /// A wall segment or an uncarved junction.
    Wall,
    /// An untinted opening.
    Open,
    /// Carved floor, tinted with the color of the walk that carved it.
    Floor(Tint),
    /// The opened entry on the top boundary.
    Start,
    /// The opened exit on the bottom boundary.
    Finish,
}

impl Glyph {
    /// The width of each glyph when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match *self {
            Glyph::Wall => "██".with(Color::DarkGrey),
            Glyph::Open => "  ".with(Color::Reset),
            Glyph::Floor((r, g, b)) => "  ".on(Color::Rgb { r, g, b }),
            Glyph::Start => "██".with(Color::Green),
            Glyph::Finish => "██".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Glyph::CELL_WIDTH as usize,
                "Each glyph must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Doubled wall lattice of a maze for display: cell (x, y) sits at lattice
/// position (2x + 1, 2y + 1), and the wall shared by two adjacent cells at
/// their midpoint. Wall lines occupy the even rows and columns.
pub struct Lattice {
    glyphs: Box<[Glyph]>,
    width: u32,
    height: u32,
}

impl Lattice {
    /// An all-walled lattice for a maze of the given cell dimensions.
    pub fn new(maze_width: u16, maze_height: u16) -> Self {
        // n cells in each dimension -> n + 1 wall lines -> 2n + 1 total
        let width = maze_width as u32 * 2 + 1;
        let height = maze_height as u32 * 2 + 1;
        let mut glyphs = vec![Glyph::Wall; width as usize * height as usize].into_boxed_slice();
        // Cell interiors start open; everything between them is wall.
        for y in 0..maze_height as u32 {
            for x in 0..maze_width as u32 {
                glyphs[((y * 2 + 1) * width + x * 2 + 1) as usize] = Glyph::Open;
            }
        }
        Lattice {
            glyphs,
            width,
            height,
        }
    }

    /// Snapshot of a finished (or partially carved) grid, with the endpoint
    /// glyphs placed when designated. Used by the batch path, where no event
    /// stream is replayed.
    pub fn from_grid(
        grid: &Grid,
        start: Option<(u16, u16)>,
        finish: Option<(u16, u16)>,
    ) -> Self {
        let mut lattice = Lattice::new(grid.width(), grid.height());
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = grid[(x, y)];
                let floor = match cell.tint {
                    Some(tint) => Glyph::Floor(tint),
                    None => Glyph::Open,
                };
                let (gx, gy) = (x as u32 * 2 + 1, y as u32 * 2 + 1);
                lattice.set(gx, gy, floor);
                // Opening the east/south midpoints covers every interior wall
                // once; the outward-facing openings are the endpoints below.
                if cell.walls.is_open(Direction::East) && x + 1 < grid.width() {
                    lattice.set(gx + 1, gy, floor);
                }
                if cell.walls.is_open(Direction::South) && y + 1 < grid.height() {
                    lattice.set(gx, gy + 1, floor);
                }
            }
        }
        if let Some(coord) = start {
            let (gx, gy) = Lattice::endpoint_position(coord, EndpointKind::Start);
            lattice.set(gx, gy, Glyph::Start);
        }
        if let Some(coord) = finish {
            let (gx, gy) = Lattice::endpoint_position(coord, EndpointKind::Finish);
            lattice.set(gx, gy, Glyph::Finish);
        }
        lattice
    }

    /// Lattice columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Lattice rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Glyph {
        self.glyphs[(y * self.width + x) as usize]
    }

    fn set(&mut self, x: u32, y: u32, glyph: Glyph) {
        self.glyphs[(y * self.width + x) as usize] = glyph;
    }

    /// Lattice position of the outward wall opened for an endpoint.
    fn endpoint_position(coord: (u16, u16), kind: EndpointKind) -> (u32, u32) {
        let (gx, gy) = (coord.0 as u32 * 2 + 1, coord.1 as u32 * 2 + 1);
        match kind {
            EndpointKind::Start => (gx, gy - 1),
            EndpointKind::Finish => (gx, gy + 1),
        }
    }

    /// Applies a carving event and returns the lattice positions it touched,
    /// so a renderer can redraw just those. `Initial` events are handled by
    /// constructing a fresh lattice instead.
    pub fn apply(&mut self, event: &GridEvent) -> Vec<(u32, u32)> {
        match *event {
            GridEvent::Initial { .. } => Vec::new(),
            GridEvent::Carved { a, b, tint } => {
                let floor = Glyph::Floor(tint);
                let a_pos = (a.0 as u32 * 2 + 1, a.1 as u32 * 2 + 1);
                let b_pos = (b.0 as u32 * 2 + 1, b.1 as u32 * 2 + 1);
                // The shared wall sits at the midpoint of the two cells.
                let wall = (
                    (a.0 as u32 + b.0 as u32 + 1),
                    (a.1 as u32 + b.1 as u32 + 1),
                );
                self.set(a_pos.0, a_pos.1, floor);
                self.set(b_pos.0, b_pos.1, floor);
                self.set(wall.0, wall.1, floor);
                vec![a_pos, b_pos, wall]
            }
            GridEvent::Endpoint { coord, kind } => {
                let (gx, gy) = Lattice::endpoint_position(coord, kind);
                let glyph = match kind {
                    EndpointKind::Start => Glyph::Start,
                    EndpointKind::Finish => Glyph::Finish,
                };
                self.set(gx, gy, glyph);
                vec![(gx, gy)]
            }
        }
    }

    /// Writes the whole lattice sequentially, one line per lattice row.
    pub fn print(&self, out: &mut impl Write) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(out, "{}", self.get(x, y))?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lattice_is_walls_and_open_cells() {
        let lattice = Lattice::new(2, 1);
        assert_eq!(lattice.width(), 5);
        assert_eq!(lattice.height(), 3);
        assert_eq!(lattice.get(1, 1), Glyph::Open);
        assert_eq!(lattice.get(3, 1), Glyph::Open);
        // Wall line between the two cells, and the full border
        assert_eq!(lattice.get(2, 1), Glyph::Wall);
        assert_eq!(lattice.get(0, 0), Glyph::Wall);
        assert_eq!(lattice.get(4, 2), Glyph::Wall);
    }

    #[test]
    fn test_carved_event_opens_the_midpoint() {
        let mut lattice = Lattice::new(2, 1);
        let touched = lattice.apply(&GridEvent::Carved {
            a: (0, 0),
            b: (1, 0),
            tint: (9, 9, 9),
        });
        assert_eq!(touched, vec![(1, 1), (3, 1), (2, 1)]);
        assert_eq!(lattice.get(2, 1), Glyph::Floor((9, 9, 9)));
    }

    #[test]
    fn test_endpoint_events_place_markers() {
        let mut lattice = Lattice::new(3, 3);
        let touched = lattice.apply(&GridEvent::Endpoint {
            coord: (1, 0),
            kind: EndpointKind::Start,
        });
        assert_eq!(touched, vec![(3, 0)]);
        assert_eq!(lattice.get(3, 0), Glyph::Start);

        lattice.apply(&GridEvent::Endpoint {
            coord: (2, 2),
            kind: EndpointKind::Finish,
        });
        assert_eq!(lattice.get(5, 6), Glyph::Finish);
    }

    #[test]
    fn test_from_grid_matches_wall_state() {
        let mut grid = Grid::new(2, 2, None).unwrap();
        grid.connect((0, 0), (1, 0), (5, 5, 5)).unwrap();
        grid.connect((1, 0), (1, 1), (5, 5, 5)).unwrap();
        let lattice = Lattice::from_grid(&grid, Some((0, 0)), None);
        assert_eq!(lattice.get(2, 1), Glyph::Floor((5, 5, 5)));
        assert_eq!(lattice.get(3, 2), Glyph::Floor((5, 5, 5)));
        // The untouched wall between the bottom two cells stays closed
        assert_eq!(lattice.get(2, 3), Glyph::Wall);
        assert_eq!(lattice.get(1, 0), Glyph::Start);
    }
}
