//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::{Position, Size},
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Width and height of the (square) playing field, in cells
pub(crate) const GRID_SIZE: u16 = 20;

/// Time between movements of the snake at the start of a game
pub(crate) const INITIAL_SPEED: Duration = Duration::from_millis(150);

/// How much the time between movements shrinks each time food is eaten
pub(crate) const SPEED_INCREMENT: Duration = Duration::from_millis(2);

/// The time between movements never drops below this
pub(crate) const MIN_SPEED: Duration = Duration::from_millis(50);

/// Where the snake's head starts
pub(crate) const START_POSITION: Position = Position { x: 10, y: 10 };

/// Where the food sits at the very start of a session, before any reset
pub(crate) const START_FOOD: Position = Position { x: 15, y: 15 };

/// Key under which the high score is persisted
pub(crate) const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Number of terminal columns used to draw a single grid cell
pub(crate) const CELL_WIDTH: u16 = 2;

/// Glyphs for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "██";

/// Glyphs for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "▓▓";

/// Glyphs for the food
pub(crate) const FOOD_SYMBOL: &str = "()";

/// Glyphs for the snake's head when it's run into a wall or itself
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the snake's head
pub(crate) const SNAKE_HEAD_STYLE: Style = Style::new()
    .fg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

/// Style for the snake's body
pub(crate) const SNAKE_BODY_STYLE: Style = Style::new().fg(Color::Green);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::BOLD);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the on-screen direction buttons
pub(crate) const DPAD_STYLE: Style = Style::new()
    .fg(Color::Cyan)
    .add_modifier(Modifier::REVERSED);
