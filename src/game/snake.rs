use ratatui::layout::Position;
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// Segments are stored head-first.  The snake is never empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    segments: VecDeque<Position>,
}

impl Snake {
    /// Create a one-segment snake at `head`
    pub(crate) fn new(head: Position) -> Snake {
        Snake {
            segments: VecDeque::from([head]),
        }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        // Only `slither()` removes segments, and it never removes the last one
        self.segments.front().copied().unwrap_or(Position::ORIGIN)
    }

    /// Return all segments, head first
    #[cfg(test)]
    pub(crate) fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    /// Return the segments after the head
    pub(crate) fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().skip(1).copied()
    }

    /// Does any segment (head and tail included) occupy `pos`?
    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Add a new head at `pos`, growing the snake by one
    pub(crate) fn push_head(&mut self, pos: Position) {
        self.segments.push_front(pos);
    }

    /// Drop the tail segment, as long as more than one segment remains
    pub(crate) fn slither(&mut self) {
        if self.segments.len() > 1 {
            let _ = self.segments.pop_back();
        }
    }
}

impl FromIterator<Position> for Snake {
    /// Build a snake from head-first segments.  An empty iterator yields a
    /// snake at the origin.
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Snake {
        let segments = VecDeque::from_iter(iter);
        if segments.is_empty() {
            Snake::new(Position::ORIGIN)
        } else {
            Snake { segments }
        }
    }
}
