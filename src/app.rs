use crate::command::Command;
use crate::game::Game;
use crate::storage::{KeyValueStore, Storage};
use crate::util::get_display_area;
use crate::warning::{Warning, WarningOutcome};
use crossterm::event::read;
use rand::Rng;
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng, S = Storage> {
    screen: Screen<R, S>,
}

impl<R: Rng, S: KeyValueStore> App<R, S> {
    /// Create an app that plays `game`, first showing `warning` if there is
    /// one
    pub(crate) fn new(game: Game<R, S>, warning: Option<Warning>) -> App<R, S> {
        let screen = match warning {
            Some(w) => Screen::Warning(w, game),
            None => Screen::Game(game),
        };
        App { screen }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Warning(ref warning, ref mut game) => {
                terminal.draw(|frame| {
                    game.draw(frame);
                    frame.render_widget(warning, get_display_area(frame.area()));
                })?;
            }
            Screen::Game(ref mut game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        match self.screen {
            Screen::Warning(ref mut warning, _) => {
                let Some(outcome) = read()?
                    .as_key_press_event()
                    .and_then(Command::from_key_event)
                    .and_then(|cmd| warning.handle_command(cmd))
                else {
                    return Ok(());
                };
                match outcome {
                    WarningOutcome::Dismissed => {
                        if let Screen::Warning(_, game) =
                            std::mem::replace(&mut self.screen, Screen::Quit)
                        {
                            self.screen = Screen::Game(game);
                        }
                    }
                    WarningOutcome::Quit => self.screen = Screen::Quit,
                }
            }
            Screen::Game(ref mut game) => {
                if let Some(screen) = game.process_input()? {
                    self.screen = screen;
                }
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

#[derive(Debug)]
pub(crate) enum Screen<R = rand::rngs::ThreadRng, S = Storage> {
    /// A warning pop-up shown over a game that hasn't started yet
    Warning(Warning, Game<R, S>),
    Game(Game<R, S>),
    Quit,
}
