use super::snake::Snake;
use crate::consts::GRID_SIZE;
use rand::Rng;
use ratatui::layout::Position;

/// Pick a cell uniformly at random from the grid, trying again until the
/// cell is not occupied by `snake`.
///
/// This never returns if the snake fills the whole grid.
pub(crate) fn place_food<R: Rng>(rng: &mut R, snake: &Snake) -> Position {
    loop {
        let pos = Position::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        if !snake.contains(pos) {
            log::trace!("Placed food at ({}, {})", pos.x, pos.y);
            return pos;
        }
    }
}
