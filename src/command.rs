use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Space,
    R,
    Q,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (m, _) if !normal_modifiers.contains(m) => None,
            (_, KeyCode::Char('w' | 'k') | KeyCode::Up) => Some(Command::Up),
            (_, KeyCode::Char('s' | 'j') | KeyCode::Down) => Some(Command::Down),
            (_, KeyCode::Char('a' | 'h') | KeyCode::Left) => Some(Command::Left),
            (_, KeyCode::Char('d' | 'l') | KeyCode::Right) => Some(Command::Right),
            (_, KeyCode::Enter) => Some(Command::Enter),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (_, KeyCode::Char(' ')) => Some(Command::Space),
            (_, KeyCode::Char('r' | 'R')) => Some(Command::R),
            (_, KeyCode::Char('q' | 'Q')) => Some(Command::Q),
            _ => None,
        }
    }
}
