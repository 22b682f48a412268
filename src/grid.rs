use rand::Rng;
use Direction::*;

/// A grid-aligned point on the board, measured in the same units as the cell size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Unit vector of the direction, y growing downwards.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Toroidal board geometry. Width and height are always whole multiples of the cell size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: i32,
    rows: i32,
    cell_size: i32,
}

impl Grid {
    pub fn new(columns: u16, rows: u16, cell_size: u16) -> Self {
        debug_assert!(columns > 0 && rows > 0 && cell_size > 0);
        Grid { columns: columns.into(), rows: rows.into(), cell_size: cell_size.into() }
    }

    pub fn width(&self) -> i32 {
        self.columns * self.cell_size
    }

    pub fn height(&self) -> i32 {
        self.rows * self.cell_size
    }

    pub fn columns(&self) -> u16 {
        self.columns as u16
    }

    pub fn rows(&self) -> u16 {
        self.rows as u16
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn wrap(&self, pos: Position, dx: i32, dy: i32) -> Position {
        Position {
            x: (pos.x + dx).rem_euclid(self.width()),
            y: (pos.y + dy).rem_euclid(self.height()),
        }
    }

    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        let (ux, uy) = direction.unit();
        self.wrap(pos, ux * self.cell_size, uy * self.cell_size)
    }

    pub fn center(&self) -> Position {
        Position::new((self.columns / 2) * self.cell_size, (self.rows / 2) * self.cell_size)
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position {
            x: rng.gen_range(0..self.columns) * self.cell_size,
            y: rng.gen_range(0..self.rows) * self.cell_size,
        }
    }

    /// Every grid-aligned position, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |col| Position::new(col * self.cell_size, row * self.cell_size))
        })
    }

    /// Column and row index of a position.
    pub fn cell_of(&self, pos: Position) -> (u16, u16) {
        ((pos.x / self.cell_size) as u16, (pos.y / self.cell_size) as u16)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width()).contains(&pos.x)
            && (0..self.height()).contains(&pos.y)
            && pos.x % self.cell_size == 0
            && pos.y % self.cell_size == 0
    }
}
