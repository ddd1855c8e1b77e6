use crate::command::Command;
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;

/// A pop-up describing a non-fatal error (and its causes) that the user must
/// acknowledge before play begins
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Warning {
    lines: Vec<String>,
    scroll_offset: usize,
    max_scroll: usize,
}

impl Warning {
    const MAX_LINES: u16 = 16;
    const TEXT_WIDTH: u16 = 48;
    const WIDTH: u16 = Self::TEXT_WIDTH + 4;

    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<WarningOutcome> {
        match cmd {
            Command::Enter | Command::Esc | Command::Space => Some(WarningOutcome::Dismissed),
            Command::Quit | Command::Q => Some(WarningOutcome::Quit),
            Command::Up if self.scrolling() => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            Command::Down if self.scrolling() => {
                if self.scroll_offset < self.max_scroll.saturating_sub(1) {
                    self.scroll_offset += 1;
                }
                None
            }
            _ => None,
        }
    }

    fn scrolling(&self) -> bool {
        self.lines.len() > usize::from(Self::MAX_LINES)
    }

    /// Lay out an error message followed by the messages of its causes, if
    /// any, word-wrapped to fit the pop-up
    fn from_error_messages(msgs: Vec<String>) -> Self {
        let width = usize::from(Warning::TEXT_WIDTH);
        let wrap = |text: &str, first: &str, rest: &str| {
            let opts = textwrap::Options::new(width)
                .break_words(true)
                .initial_indent(first)
                .subsequent_indent(rest);
            textwrap::wrap(text, opts)
                .into_iter()
                .map(Cow::into_owned)
                .collect::<Vec<_>>()
        };
        let mut msgs = msgs.into_iter();
        let mut lines = match msgs.next() {
            Some(m) => wrap(&m, "", ""),
            None => vec![String::from("Something went wrong.")],
        };
        let causes = msgs.collect::<Vec<_>>();
        match causes.as_slice() {
            [] => (),
            [cause] => {
                lines.push(String::new());
                lines.push(String::from("Caused by:"));
                lines.extend(wrap(cause, "    ", "    "));
            }
            causes => {
                lines.push(String::new());
                lines.push(String::from("Caused by:"));
                for (i, cause) in causes.iter().enumerate() {
                    lines.extend(wrap(cause, &format!("{i:>5}: "), "       "));
                }
            }
        }
        let max_scroll = lines
            .len()
            .saturating_sub(usize::from(Warning::MAX_LINES) - 1);
        Warning {
            lines,
            scroll_offset: 0,
            max_scroll,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WarningOutcome {
    Dismissed,
    Quit,
}

impl<E: std::error::Error> From<E> for Warning {
    fn from(e: E) -> Warning {
        let mut msgs = vec![e.to_string()];
        let mut source = e.source();
        while let Some(src) = source {
            msgs.push(src.to_string());
            source = src.source();
        }
        Warning::from_error_messages(msgs)
    }
}

impl Widget for &Warning {
    // `area` is here the area of the entire display in which the program is
    // drawing, not the area for just the widget proper.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .min(Warning::MAX_LINES)
            .saturating_add(4);
        let block_area = center_rect(
            area,
            Size {
                width: Warning::WIDTH.saturating_add(u16::from(self.scrolling()) * 2),
                height,
            },
        );
        let block = Block::bordered()
            .title(" WARNING ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, ok_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
            .flex(Flex::Start)
            .spacing(1)
            .areas(block.inner(block_area));
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        if self.scrolling() {
            let [text_area, scrollbar_area] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)])
                    .flex(Flex::Start)
                    .spacing(1)
                    .areas(text_area);
            Text::from_iter(
                self.lines
                    .iter()
                    .skip(self.scroll_offset)
                    .take(usize::from(Warning::MAX_LINES))
                    .map(String::as_str),
            )
            .render(text_area, buf);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(ratatui::symbols::shade::MEDIUM));
            let mut scroll_state =
                ScrollbarState::new(self.max_scroll).position(self.scroll_offset);
            scrollbar.render(scrollbar_area, buf, &mut scroll_state);
        } else {
            Text::from_iter(self.lines.iter().map(String::as_str)).render(text_area, buf);
        }

        Line::from("[OK]").centered().render(ok_area, buf);
    }
}
