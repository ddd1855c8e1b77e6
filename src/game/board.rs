use super::snake::Snake;
use super::RunState;
use ratatui::layout::Position;

/// What occupies a single grid cell, for display purposes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CellKind {
    Empty,
    Head,
    Body,
    Food,
}

/// A read-only view of a game, taken once per frame for rendering
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Snapshot<'a> {
    pub(crate) grid_size: u16,
    pub(crate) snake: &'a Snake,
    pub(crate) food: Position,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    pub(crate) run_state: RunState,
}

impl Snapshot<'_> {
    /// Classify the cell at `pos`.  The head wins over the body, and the
    /// body wins over food.
    pub(crate) fn cell_kind(&self, pos: Position) -> CellKind {
        if pos.x >= self.grid_size || pos.y >= self.grid_size {
            CellKind::Empty
        } else if self.snake.head() == pos {
            CellKind::Head
        } else if self.snake.body().any(|p| p == pos) {
            CellKind::Body
        } else if self.food == pos {
            CellKind::Food
        } else {
            CellKind::Empty
        }
    }

    /// Classify every cell of the grid, row by row
    pub(crate) fn cells(&self) -> Vec<Vec<CellKind>> {
        (0..self.grid_size)
            .map(|y| {
                (0..self.grid_size)
                    .map(|x| self.cell_kind(Position::new(x, y)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(snake: &Snake, food: Position) -> Snapshot<'_> {
        Snapshot {
            grid_size: 4,
            snake,
            food,
            score: 0,
            high_score: 0,
            run_state: RunState::Running,
        }
    }

    #[test]
    fn classify_cells() {
        use CellKind::{Body as B, Empty as E, Food as F, Head as H};
        let snake = Snake::from_iter([
            Position::new(1, 1),
            Position::new(0, 1),
            Position::new(0, 2),
        ]);
        let snap = snapshot(&snake, Position::new(3, 0));
        pretty_assertions::assert_eq!(
            snap.cells(),
            vec![
                vec![E, E, E, F],
                vec![B, H, E, E],
                vec![B, E, E, E],
                vec![E, E, E, E],
            ]
        );
        assert_eq!(snap.cell_kind(Position::new(1, 1)), H);
        assert_eq!(snap.cell_kind(Position::new(0, 2)), B);
        assert_eq!(snap.cell_kind(Position::new(3, 0)), F);
        assert_eq!(snap.cell_kind(Position::new(2, 2)), E);
        assert_eq!(snap.cell_kind(Position::new(9, 9)), E);
    }

    #[test]
    fn head_beats_food() {
        let snake = Snake::new(Position::new(2, 2));
        let snap = snapshot(&snake, Position::new(2, 2));
        assert_eq!(snap.cell_kind(Position::new(2, 2)), CellKind::Head);
        assert_eq!(snap.cells()[2][2], CellKind::Head);
    }

    #[test]
    fn body_beats_food() {
        let snake = Snake::from_iter([
            Position::new(2, 3),
            Position::new(2, 2),
            Position::new(3, 2),
        ]);
        let snap = snapshot(&snake, Position::new(3, 2));
        assert_eq!(snap.cell_kind(Position::new(3, 2)), CellKind::Body);
        let food_cells = snap
            .cells()
            .into_iter()
            .flatten()
            .filter(|&k| k == CellKind::Food)
            .count();
        assert_eq!(food_cells, 0);
    }
}
