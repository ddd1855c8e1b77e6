use crate::consts::GRID_SIZE;
use enum_map::Enum;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction, or `None` if
    /// that would leave the grid.
    pub(crate) fn step(self, pos: Position) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::Up => y = y.checked_sub(1)?,
            Direction::Down => y = y.checked_add(1).filter(|&yy| yy < GRID_SIZE)?,
            Direction::Left => x = x.checked_sub(1)?,
            Direction::Right => x = x.checked_add(1).filter(|&xx| xx < GRID_SIZE)?,
        }
        Some(Position { x, y })
    }

    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Arrow glyph for the on-screen controls
    pub(crate) fn arrow(self) -> char {
        match self {
            Direction::Up => '▲',
            Direction::Down => '▼',
            Direction::Left => '◀',
            Direction::Right => '▶',
        }
    }
}
