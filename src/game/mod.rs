mod board;
mod clock;
mod controls;
mod direction;
mod food;
mod paused;
mod snake;
use self::board::{CellKind, Snapshot};
use self::clock::Clock;
use self::controls::DPad;
use self::direction::Direction;
use self::food::place_food;
use self::paused::{PauseOpt, Paused};
use self::snake::Snake;
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::storage::{HighScore, KeyValueStore, Storage};
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event, MouseButton, MouseEvent, MouseEventKind};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Widget},
    Frame,
};
use std::io;
use std::time::{Duration, Instant};

/// Width of the bordered board, in terminal columns
const BOARD_WIDTH: u16 = consts::GRID_SIZE * consts::CELL_WIDTH + 2;

/// Height of the bordered board, in terminal rows
const BOARD_HEIGHT: u16 = consts::GRID_SIZE + 2;

static INSTRUCTIONS: &[&str] = &[
    "Steer:  ← ↓ ↑ →",
    "   or:  h j k l",
    "   or:  a s w d",
    "Eat the food, but don't",
    "hit the walls or yourself!",
    "",
    "Or click the arrows:",
];

/// A single game session: the snake, its food, the score, and everything
/// else that changes from tick to tick.
///
/// All state changes happen in [`Game::tick()`] and [`Game::reset()`].
/// Input only records the requested direction or toggles the pause.
#[derive(Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng, S = Storage> {
    rng: R,
    snake: Snake,
    food: Position,
    /// The direction the snake moved in on the most recent tick
    direction: Direction,
    /// The direction the snake will move in on the next tick
    intent: Direction,
    score: u32,
    state: RunState,
    high_score: u32,
    record: HighScore<S>,
    clock: Clock,
    /// The terminal area the game was last drawn in, needed to map mouse
    /// clicks onto the on-screen controls
    area: Rect,
}

impl<S: KeyValueStore> Game<rand::rngs::ThreadRng, S> {
    pub(crate) fn new(store: S) -> Self {
        Game::new_with_rng(store, rand::rng())
    }
}

impl<R: Rng, S: KeyValueStore> Game<R, S> {
    pub(crate) fn new_with_rng(store: S, rng: R) -> Game<R, S> {
        let record = HighScore::new(store);
        let high_score = record.get_high_score();
        log::debug!("Loaded high score: {high_score}");
        Game {
            rng,
            snake: Snake::new(consts::START_POSITION),
            food: consts::START_FOOD,
            direction: Direction::Right,
            intent: Direction::Right,
            score: 0,
            state: RunState::Running,
            high_score,
            record,
            clock: Clock::new(consts::INITIAL_SPEED),
            area: Rect::from((Position::ORIGIN, consts::DISPLAY_SIZE)),
        }
    }

    pub(crate) fn process_input(&mut self) -> io::Result<Option<Screen<R, S>>> {
        if self.running() {
            let wait = self.clock.remaining(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                if self.clock.fire(Instant::now()) {
                    self.tick();
                }
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Advance the game by one step: move the snake in the requested
    /// direction, then either end the game, eat the food, or drop the tail.
    ///
    /// Does nothing unless the game is running.
    pub(crate) fn tick(&mut self) {
        if !self.running() {
            return;
        }
        self.direction = self.intent;
        // Collision is checked against the whole body, including the tail
        // segment that would otherwise move out of the way this tick.
        let Some(head) = self
            .direction
            .step(self.snake.head())
            .filter(|&p| !self.snake.contains(p))
        else {
            self.game_over();
            return;
        };
        self.snake.push_head(head);
        if head == self.food {
            self.score = self.score.saturating_add(1);
            let speed = self
                .speed()
                .saturating_sub(consts::SPEED_INCREMENT)
                .max(consts::MIN_SPEED);
            self.clock.set_period(speed);
            self.food = place_food(&mut self.rng, &self.snake);
        } else {
            self.snake.slither();
        }
    }

    /// Start a new game, keeping only the high score
    pub(crate) fn reset(&mut self) {
        log::info!("Starting new game");
        self.snake = Snake::new(consts::START_POSITION);
        self.direction = Direction::Right;
        self.intent = Direction::Right;
        self.score = 0;
        self.clock = Clock::new(consts::INITIAL_SPEED);
        self.state = RunState::Running;
        self.food = place_food(&mut self.rng, &self.snake);
    }

    fn game_over(&mut self) {
        self.state = RunState::Over;
        self.clock.stop();
        log::info!("Game over with a score of {}", self.score);
        // Another session may have stored a better score since this one
        // started.
        let best = self.high_score.max(self.record.get_high_score());
        if self.score > best {
            log::info!("New high score: {} (previously {best})", self.score);
            self.high_score = self.score;
            self.record.set_high_score(self.score);
        } else {
            self.high_score = best;
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen<R, S>> {
        match event {
            Event::FocusLost => self.pause(),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                let dpad = GameLayout::new(self.area).dpad;
                if let Some(d) = DPad::hit(dpad, Position::new(column, row)) {
                    self.request_direction_change(d);
                }
            }
            _ => return self.handle_command(Command::from_key_event(event.as_key_press_event()?)?),
        }
        None
    }

    fn handle_command(&mut self, cmd: Command) -> Option<Screen<R, S>> {
        if let Some(d) = command_direction(cmd) {
            self.request_direction_change(d);
            return None;
        }
        match self.state {
            RunState::Running => match cmd {
                Command::Space => self.toggle_pause(),
                Command::Esc => self.pause(),
                Command::Q | Command::Quit => return Some(Screen::Quit),
                _ => (),
            },
            RunState::Paused => match Paused::handle_command(cmd)? {
                PauseOpt::Resume => self.resume(),
                PauseOpt::Restart => self.reset(),
                PauseOpt::Quit => return Some(Screen::Quit),
            },
            RunState::Over => match cmd {
                Command::R | Command::Enter => self.reset(),
                Command::Q | Command::Quit => return Some(Screen::Quit),
                _ => (),
            },
        }
        None
    }
}

impl<R, S> Game<R, S> {
    pub(crate) fn draw(&mut self, frame: &mut Frame<'_>) {
        self.area = frame.area();
        frame.render_widget(&*self, frame.area());
    }

    /// Ask for the snake to turn to `direction` on the next tick.  Turning
    /// straight back into the snake's own neck is refused.
    ///
    /// The check is against the direction the snake actually moved on the
    /// last tick, so two quick turns between ticks can't reverse it either.
    pub(crate) fn request_direction_change(&mut self, direction: Direction) {
        if self.state == RunState::Over {
            return;
        }
        if direction == self.direction.opposite() {
            log::trace!("Refusing to reverse from {:?} to {direction:?}", self.direction);
            return;
        }
        self.intent = direction;
    }

    pub(crate) fn toggle_pause(&mut self) {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::Over => (),
        }
    }

    fn pause(&mut self) {
        if self.running() {
            self.state = RunState::Paused;
            self.clock.stop();
        }
    }

    fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
        }
    }

    /// Time between ticks
    pub(crate) fn speed(&self) -> Duration {
        self.clock.period()
    }

    fn running(&self) -> bool {
        self.state == RunState::Running
    }

    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid_size: consts::GRID_SIZE,
            snake: &self.snake,
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            run_state: self.state,
        }
    }
}

fn command_direction(cmd: Command) -> Option<Direction> {
    match cmd {
        Command::Up => Some(Direction::Up),
        Command::Down => Some(Direction::Down),
        Command::Left => Some(Direction::Left),
        Command::Right => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RunState {
    Running,
    Paused,
    Over,
}

/// Where each part of the game screen goes within a given terminal area
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct GameLayout {
    score: Rect,
    board: Rect,
    instructions: Rect,
    dpad: Rect,
    message: Rect,
}

impl GameLayout {
    fn new(area: Rect) -> GameLayout {
        let display = get_display_area(area);
        let [score, middle, message] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(BOARD_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(display);
        let [_, board, _, panel] = Layout::horizontal([
            Constraint::Length(1),
            Constraint::Length(BOARD_WIDTH),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(middle);
        let instructions_height = u16::try_from(INSTRUCTIONS.len()).unwrap_or(u16::MAX);
        let [_, instructions, _, dpad_row, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(instructions_height),
            Constraint::Length(1),
            Constraint::Length(DPad::HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(panel);
        let dpad = center_rect(dpad_row, Size::new(DPad::WIDTH, DPad::HEIGHT));
        GameLayout {
            score,
            board,
            instructions,
            dpad,
            message,
        }
    }
}

impl<R, S> Widget for &Game<R, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = GameLayout::new(area);
        let snapshot = self.snapshot();
        Line::styled(
            format!(
                " Score: {}    High Score: {}",
                snapshot.score, snapshot.high_score
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(layout.score, buf);

        let block = Block::bordered();
        let level_area = block.inner(layout.board);
        block.render(layout.board, buf);
        let mut level = Canvas {
            area: level_area,
            buf,
        };
        for (y, row) in (0..).zip(snapshot.cells()) {
            for (x, kind) in (0..).zip(row) {
                let pos = Position::new(x, y);
                match kind {
                    CellKind::Empty => (),
                    CellKind::Body => {
                        level.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_BODY_STYLE);
                    }
                    CellKind::Food => {
                        level.draw_cell(pos, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
                    }
                    CellKind::Head if snapshot.run_state == RunState::Over => {
                        level.draw_cell(pos, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
                    }
                    CellKind::Head => {
                        level.draw_cell(pos, consts::SNAKE_HEAD_SYMBOL, consts::SNAKE_HEAD_STYLE);
                    }
                }
            }
        }

        Text::from_iter(INSTRUCTIONS.iter().copied()).render(layout.instructions, buf);
        DPad.render(layout.dpad, buf);

        match snapshot.run_state {
            RunState::Running => {
                Line::from_iter([
                    Span::raw(" Pause ("),
                    Span::styled("Space", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(layout.message, buf);
            }
            RunState::Paused => {
                let pause_area = center_rect(
                    layout.board,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                Paused.render(pause_area, buf);
            }
            RunState::Over => {
                let popup = center_rect(layout.board, Size::new(20, 3));
                Clear.render(popup, buf);
                Text::from_iter([
                    Line::from("— GAME OVER —"),
                    Line::from(format!("Score: {}", snapshot.score)),
                ])
                .centered()
                .style(Style::reset())
                .render(popup, buf);
                Line::from_iter([
                    Span::raw(" Choose One: Restart ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(layout.message, buf);
            }
        }
    }
}

/// A view of the board's interior in which each grid cell is
/// [`CELL_WIDTH`][consts::CELL_WIDTH] columns wide
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos
            .x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| x.checked_add(self.area.x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        for (dx, ch) in (0..consts::CELL_WIDTH).zip(symbol.chars()) {
            let Some(xx) = x.checked_add(dx) else {
                return;
            };
            if !self.area.contains(Position::new(xx, y)) {
                return;
            }
            if let Some(cell) = self.buf.cell_mut((xx, y)) {
                cell.set_char(ch);
                cell.set_style(Style::reset().patch(style));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GRID_SIZE, HIGH_SCORE_KEY, INITIAL_SPEED, MIN_SPEED, SPEED_INCREMENT};
    use crate::storage::{FileStore, MemoryStore};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    type TestGame = Game<ChaCha12Rng, MemoryStore>;

    fn new_game() -> TestGame {
        Game::new_with_rng(MemoryStore::default(), ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn with_high_score(score: u32) -> TestGame {
        let mut store = MemoryStore::default();
        store.set(HIGH_SCORE_KEY, &score.to_string()).unwrap();
        Game::new_with_rng(store, ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn segments(game: &TestGame) -> Vec<Position> {
        game.snake.segments().iter().copied().collect()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    #[test]
    fn initial_state() {
        let game = new_game();
        assert_eq!(segments(&game), [Position::new(10, 10)]);
        assert_eq!(game.food, Position::new(15, 15));
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.intent, Direction::Right);
        assert_eq!(game.score, 0);
        assert_eq!(game.speed(), INITIAL_SPEED);
        assert_eq!(game.state, RunState::Running);
        assert_eq!(game.snapshot().high_score, 0);
    }

    #[test]
    fn five_ticks_right() {
        let mut game = new_game();
        for _ in 0..5 {
            game.tick();
        }
        assert_eq!(segments(&game), [Position::new(15, 10)]);
        assert_eq!(game.score, 0);
        assert_eq!(game.food, Position::new(15, 15));
        assert_eq!(game.state, RunState::Running);
    }

    #[test]
    fn translation_keeps_length() {
        let mut game = new_game();
        game.snake = Snake::from_iter([
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(3, 5),
        ]);
        game.tick();
        assert_eq!(
            segments(&game),
            [Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );
    }

    #[test]
    fn eating_grows_and_speeds_up() {
        let mut game = new_game();
        game.food = Position::new(11, 10);
        game.tick();
        assert_eq!(segments(&game), [Position::new(11, 10), Position::new(10, 10)]);
        assert_eq!(game.score, 1);
        assert_eq!(game.speed(), INITIAL_SPEED - SPEED_INCREMENT);
        assert!(!game.snake.contains(game.food), "new food is on the snake");
        assert!(
            game.food.x < GRID_SIZE && game.food.y < GRID_SIZE,
            "new food is off the grid"
        );
    }

    #[test]
    fn speed_is_floored() {
        let mut game = new_game();
        for i in 1..=60 {
            game.snake = Snake::new(Position::new(0, 0));
            game.food = Position::new(1, 0);
            game.tick();
            assert_eq!(game.score, i);
            assert!(game.speed() >= MIN_SPEED, "speed dropped below the floor");
        }
        assert_eq!(game.speed(), MIN_SPEED);
    }

    #[rstest]
    #[case(Position::new(19, 4), Direction::Right)]
    #[case(Position::new(0, 4), Direction::Left)]
    #[case(Position::new(4, 0), Direction::Up)]
    #[case(Position::new(4, 19), Direction::Down)]
    fn wall_collision(#[case] head: Position, #[case] dir: Direction) {
        let mut game = with_high_score(0);
        game.snake = Snake::new(head);
        game.direction = dir;
        game.intent = dir;
        game.score = 4;
        let food = game.food;
        game.tick();
        assert_eq!(game.state, RunState::Over);
        assert_eq!(segments(&game), [head]);
        assert_eq!(game.food, food);
        assert_eq!(game.score, 4);
        assert_eq!(game.high_score, 4);
        assert_eq!(
            game.record.store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("4")
        );
    }

    #[test]
    fn self_collision() {
        let mut game = new_game();
        // A loop with the head about to turn down into its own body
        game.snake = Snake::from_iter([
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
            Position::new(4, 6),
        ]);
        game.direction = Direction::Left;
        game.intent = Direction::Down;
        let before = segments(&game);
        game.tick();
        assert_eq!(game.state, RunState::Over);
        assert_eq!(segments(&game), before);
    }

    #[test]
    fn moving_into_tail_is_collision() {
        let mut game = new_game();
        game.snake = Snake::from_iter([
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ]);
        game.direction = Direction::Left;
        game.intent = Direction::Down;
        game.tick();
        assert_eq!(game.state, RunState::Over);
        assert_eq!(game.snake.segments().len(), 4);
    }

    #[test]
    fn no_ticks_after_game_over() {
        let mut game = new_game();
        game.snake = Snake::new(Position::new(19, 0));
        game.tick();
        assert_eq!(game.state, RunState::Over);
        game.tick();
        game.tick();
        assert_eq!(segments(&game), [Position::new(19, 0)]);
        assert!(!game.clock.armed(), "clock still armed after game over");
    }

    #[rstest]
    #[case(Direction::Up)]
    #[case(Direction::Down)]
    #[case(Direction::Left)]
    #[case(Direction::Right)]
    fn anti_reversal(#[case] committed: Direction) {
        for requested in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let mut game = new_game();
            game.direction = committed;
            game.intent = committed;
            game.request_direction_change(requested);
            if requested == committed.opposite() {
                assert_eq!(game.intent, committed);
            } else {
                assert_eq!(game.intent, requested);
            }
        }
    }

    #[test]
    fn rapid_requests_compare_against_last_tick() {
        let mut game = new_game();
        // Heading right: Up is accepted, but Left is still the reverse of
        // the committed direction and must be refused
        game.request_direction_change(Direction::Up);
        game.request_direction_change(Direction::Left);
        assert_eq!(game.intent, Direction::Up);
        game.request_direction_change(Direction::Down);
        assert_eq!(game.intent, Direction::Down);
        game.tick();
        assert_eq!(game.direction, Direction::Down);
        assert_eq!(segments(&game), [Position::new(10, 11)]);
        game.request_direction_change(Direction::Up);
        assert_eq!(game.intent, Direction::Down);
    }

    #[test]
    fn keyboard_and_mouse_share_rules() {
        let mut game = new_game();
        let dpad = GameLayout::new(game.area).dpad;
        let left = DPad::buttons(dpad)[Direction::Left];
        let click = |x: u16, y: u16| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row: y,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert!(game.handle_event(click(left.x, left.y)).is_none());
        assert_eq!(game.intent, Direction::Right);
        assert!(game.handle_event(key(KeyCode::Left)).is_none());
        assert_eq!(game.intent, Direction::Right);
        let up = DPad::buttons(dpad)[Direction::Up];
        assert!(game.handle_event(click(up.x, up.y)).is_none());
        assert_eq!(game.intent, Direction::Up);
        assert!(game.handle_event(key(KeyCode::Down)).is_none());
        assert_eq!(game.intent, Direction::Down);
        // Clicks outside the pad do nothing
        assert!(game.handle_event(click(0, 0)).is_none());
        assert_eq!(game.intent, Direction::Down);
    }

    #[test]
    fn pause_freezes_state() {
        let mut game = new_game();
        game.tick();
        assert!(game.handle_event(key(KeyCode::Char(' '))).is_none());
        assert_eq!(game.state, RunState::Paused);
        assert!(!game.clock.armed(), "clock still armed while paused");
        let before = segments(&game);
        for _ in 0..3 {
            game.tick();
        }
        assert_eq!(segments(&game), before);
        assert_eq!(game.score, 0);
        assert_eq!(game.food, Position::new(15, 15));
        assert!(game.handle_event(key(KeyCode::Char(' '))).is_none());
        assert_eq!(game.state, RunState::Running);
        game.tick();
        assert_eq!(segments(&game), [Position::new(12, 10)]);
    }

    #[test]
    fn direction_change_while_paused() {
        let mut game = new_game();
        game.toggle_pause();
        game.request_direction_change(Direction::Up);
        game.toggle_pause();
        game.tick();
        assert_eq!(segments(&game), [Position::new(10, 9)]);
    }

    #[test]
    fn escape_pauses_and_resumes() {
        let mut game = new_game();
        assert!(game.handle_event(key(KeyCode::Esc)).is_none());
        assert_eq!(game.state, RunState::Paused);
        assert!(game.handle_event(key(KeyCode::Esc)).is_none());
        assert_eq!(game.state, RunState::Running);
        game.handle_event(Event::FocusLost);
        assert_eq!(game.state, RunState::Paused);
    }

    #[test]
    fn restart_from_pause() {
        let mut game = new_game();
        game.tick();
        game.toggle_pause();
        assert!(game.handle_event(key(KeyCode::Char('r'))).is_none());
        assert_eq!(game.state, RunState::Running);
        assert_eq!(segments(&game), [Position::new(10, 10)]);
    }

    #[test]
    fn quit() {
        let mut game = new_game();
        assert!(matches!(
            game.handle_event(key(KeyCode::Char('q'))),
            Some(Screen::Quit)
        ));
        game.toggle_pause();
        assert!(matches!(
            game.handle_event(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(Screen::Quit)
        ));
    }

    #[test]
    fn reset_after_game_over() {
        let mut game = new_game();
        game.food = Position::new(11, 10);
        game.tick();
        game.intent = Direction::Up;
        game.snake = Snake::new(Position::new(3, 0));
        game.tick();
        assert_eq!(game.state, RunState::Over);
        assert!(game.handle_event(key(KeyCode::Char(' '))).is_none());
        assert_eq!(game.state, RunState::Over);
        game.request_direction_change(Direction::Left);
        assert_eq!(game.intent, Direction::Up);
        assert!(game.handle_event(key(KeyCode::Char('r'))).is_none());
        assert_eq!(segments(&game), [Position::new(10, 10)]);
        assert_eq!(game.score, 0);
        assert_eq!(game.speed(), INITIAL_SPEED);
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.intent, Direction::Right);
        assert_eq!(game.state, RunState::Running);
        assert_ne!(game.food, Position::new(10, 10));
        assert_eq!(game.high_score, 1);
    }

    #[test]
    fn high_score_only_rises() {
        let mut game = with_high_score(5);
        assert_eq!(game.high_score, 5);
        game.score = 3;
        game.snake = Snake::new(Position::new(19, 0));
        game.tick();
        assert_eq!(game.high_score, 5);
        assert_eq!(
            game.record.store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("5")
        );
        game.reset();
        game.score = 8;
        game.snake = Snake::new(Position::new(19, 0));
        game.tick();
        assert_eq!(game.high_score, 8);
        game.reset();
        game.score = 8;
        game.snake = Snake::new(Position::new(19, 0));
        game.tick();
        assert_eq!(game.high_score, 8);
        assert_eq!(
            game.record.store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("8")
        );
    }

    #[test]
    fn high_score_survives_new_session() {
        let mut game = new_game();
        game.score = 12;
        game.snake = Snake::new(Position::new(19, 0));
        game.tick();
        let store = game.record.store().clone();
        let next = Game::new_with_rng(store, ChaCha12Rng::seed_from_u64(RNG_SEED));
        assert_eq!(next.snapshot().high_score, 12);
    }

    #[test]
    fn render_new_game() {
        let game = with_high_score(7);
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        let layout = GameLayout::new(area);
        assert_eq!(layout.board, Rect::new(1, 1, BOARD_WIDTH, BOARD_HEIGHT));
        let row = |y: u16| -> String {
            (0..80)
                .map(|x| buffer[(x, y)].symbol().to_owned())
                .collect()
        };
        assert!(
            row(0).starts_with(" Score: 0    High Score: 7"),
            "score bar: {:?}",
            row(0)
        );
        // Head at (10, 10), food at (15, 15), board interior starts at (2, 2)
        let head_row = row(12).chars().take(27).collect::<String>();
        assert_eq!(head_row, format!(" │{}██   ", " ".repeat(20)));
        assert_eq!(buffer[(22, 12)].style().fg, consts::SNAKE_HEAD_STYLE.fg);
        assert_eq!(buffer[(32, 17)].symbol(), "(");
        assert_eq!(buffer[(33, 17)].symbol(), ")");
        assert_eq!(buffer[(32, 17)].style().fg, consts::FOOD_STYLE.fg);
        assert!(row(23).starts_with(" Pause (Space) — Quit (q)"), "{:?}", row(23));
        let up = DPad::buttons(layout.dpad)[Direction::Up];
        assert_eq!(buffer[(up.x + 2, up.y)].symbol(), "▲");
    }

    #[test]
    fn render_game_over() {
        let mut game = new_game();
        game.snake = Snake::from_iter([Position::new(19, 3), Position::new(18, 3)]);
        game.score = 3;
        game.tick();
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        // (19, 3) → column 2 + 38, row 2 + 3
        assert_eq!(buffer[(40, 5)].symbol(), "×");
        assert_eq!(buffer[(41, 5)].symbol(), "×");
        assert_eq!(buffer[(40, 5)].style().fg, consts::COLLISION_STYLE.fg);
        assert_eq!(buffer[(38, 5)].symbol(), "▓");
        let text: String = (0..80).map(|x| buffer[(x, 23)].symbol().to_owned()).collect();
        assert!(
            text.starts_with(" Choose One: Restart (r) — Quit (q)"),
            "{text:?}"
        );
        let board = (0..24)
            .map(|y| (0..80).map(|x| buffer[(x, y)].symbol().to_owned()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(board.contains("— GAME OVER —"), "{board}");
        assert!(board.contains("Score: 3"), "{board}");
    }

    #[test]
    fn render_paused() {
        let mut game = new_game();
        game.toggle_pause();
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        let screen = (0..24)
            .map(|y| (0..80).map(|x| buffer[(x, y)].symbol().to_owned()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains(" PAUSED "), "{screen}");
        assert!(screen.contains("Resume (Space)"), "{screen}");
    }

    #[test]
    fn high_score_never_lowered_by_other_session() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("storage.json");
        let open = || {
            Game::new_with_rng(
                FileStore::new(path.clone()),
                ChaCha12Rng::seed_from_u64(RNG_SEED),
            )
        };
        let mut first = open();
        let mut second = open();
        second.score = 10;
        second.snake = Snake::new(Position::new(19, 0));
        second.tick();
        assert_eq!(second.high_score, 10);
        first.score = 5;
        first.snake = Snake::new(Position::new(19, 0));
        first.tick();
        assert_eq!(first.state, RunState::Over);
        assert_eq!(first.high_score, 10);
        assert_eq!(
            FileStore::new(path.clone())
                .get(HIGH_SCORE_KEY)
                .unwrap()
                .as_deref(),
            Some("10")
        );
        assert_eq!(open().snapshot().high_score, 10);
    }

    #[test]
    fn canvas_clips_to_its_area() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 10, 4));
        let mut canvas = Canvas {
            area: Rect::new(1, 1, 4, 2),
            buf: &mut buffer,
        };
        canvas.draw_cell(Position::new(1, 1), "ab", Style::new());
        canvas.draw_cell(Position::new(3, 0), "cd", Style::new());
        canvas.draw_cell(Position::new(0, 2), "ef", Style::new());
        pretty_assertions::assert_eq!(
            buffer,
            Buffer::with_lines(["          ", "          ", "   ab     ", "          "])
        );
    }
}
