use super::direction::Direction;
use crate::consts;
use crate::util::EnumExt;
use enum_map::EnumMap;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::Line,
    widgets::Widget,
};

/// On-screen directional pad that can be clicked with the mouse
///
/// ```text
///      ▲
/// ◀         ▶
///      ▼
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct DPad;

impl DPad {
    const BUTTON_WIDTH: u16 = 5;
    pub(super) const WIDTH: u16 = Self::BUTTON_WIDTH * 3;
    pub(super) const HEIGHT: u16 = 3;

    /// Return the area covered by each button when the pad is drawn in
    /// `area`.  Buttons that don't fit are clipped to `area`.
    pub(super) fn buttons(area: Rect) -> EnumMap<Direction, Rect> {
        let w = Self::BUTTON_WIDTH;
        let button = |col: u16, row: u16| {
            Rect {
                x: area.x.saturating_add(col * w),
                y: area.y.saturating_add(row),
                width: w,
                height: 1,
            }
            .intersection(area)
        };
        EnumMap::from_fn(|d| match d {
            Direction::Up => button(1, 0),
            Direction::Left => button(0, 1),
            Direction::Right => button(2, 1),
            Direction::Down => button(1, 2),
        })
    }

    /// Return the direction whose button covers `pos`, if any
    pub(super) fn hit(area: Rect, pos: Position) -> Option<Direction> {
        let buttons = Self::buttons(area);
        Direction::iter().find(|&d| buttons[d].contains(pos))
    }
}

impl Widget for DPad {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (d, rect) in Self::buttons(area) {
            if !rect.is_empty() {
                Line::from(d.arrow().to_string())
                    .centered()
                    .style(consts::DPAD_STYLE)
                    .render(rect, buf);
            }
        }
    }
}
