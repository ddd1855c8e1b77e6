use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// A widget for displaying the pause pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused;

impl Paused {
    /// The height that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const HEIGHT: u16 = 5;

    /// The width that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const WIDTH: u16 = 20;

    /// Interpret a command given while paused.  Returns `Some` if the
    /// command picks one of the pop-up's options.
    pub(super) fn handle_command(cmd: Command) -> Option<PauseOpt> {
        match cmd {
            Command::Space | Command::Esc | Command::Enter => Some(PauseOpt::Resume),
            Command::R => Some(PauseOpt::Restart),
            Command::Q | Command::Quit => Some(PauseOpt::Quit),
            _ => None,
        }
    }
}

/// The choices in the pause pop-up
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    /// Unpause/resume the game
    Resume,

    /// Start the game over
    Restart,

    /// Quit the application
    Quit,
}

impl PauseOpt {
    fn key(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Space",
            PauseOpt::Restart => "r",
            PauseOpt::Quit => "q",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Resume",
            PauseOpt::Restart => "Restart",
            PauseOpt::Quit => "Quit",
        }
    }

    /// Render the option as a `Line` for display in the pause pop-up
    fn to_line(self) -> Line<'static> {
        Line::from_iter([
            Span::raw(self.label()),
            Span::raw(" ("),
            Span::styled(self.key(), consts::KEY_STYLE),
            Span::raw(")"),
        ])
    }
}

impl Widget for Paused {
    /*
     * ┌───── PAUSED ─────┐
     * │ Resume (Space)   │
     * │ Restart (r)      │
     * │ Quit (q)         │
     * └──────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line().render(row, buf);
        }
    }
}
