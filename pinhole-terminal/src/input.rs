/// Maps crossterm events onto camera commands
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use pinhole_core::CamEvent;

/// What the app should do in response to an input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Translate(CamEvent),
    /// Mouse motion in screen pixels
    Look { dx: f64, dy: f64 },
    Resize { cols: u16, rows: u16 },
    /// Key releases may be missed while unfocused
    ReleaseAll,
}

/// Direction bound to a key, if any
pub fn key_binding(code: KeyCode) -> Option<CamEvent> {
    match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(CamEvent::ForwardShift),
            's' => Some(CamEvent::BackwardShift),
            'a' => Some(CamEvent::LeftShift),
            'd' => Some(CamEvent::RightShift),
            ' ' => Some(CamEvent::UpShift),
            'c' => Some(CamEvent::DownShift),
            'q' => Some(CamEvent::RollLeftShift),
            'e' => Some(CamEvent::RollRightShift),
            _ => None,
        },
        KeyCode::Up => Some(CamEvent::ForwardShift),
        KeyCode::Down => Some(CamEvent::BackwardShift),
        KeyCode::Left => Some(CamEvent::LeftShift),
        KeyCode::Right => Some(CamEvent::RightShift),
        _ => None,
    }
}

/// Stateful mapper; turns absolute mouse positions into per-event deltas
#[derive(Debug, Clone)]
pub struct InputMapper {
    last_mouse: Option<(u16, u16)>,
    pixels_per_cell: (f64, f64),
}

impl InputMapper {
    pub fn new(pixels_per_cell: (f64, f64)) -> Self {
        Self {
            last_mouse: None,
            pixels_per_cell,
        }
    }

    pub fn set_pixels_per_cell(&mut self, pixels_per_cell: (f64, f64)) {
        self.pixels_per_cell = pixels_per_cell;
    }

    pub fn map_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            Event::Resize(cols, rows) => {
                self.last_mouse = None;
                Some(Command::Resize {
                    cols: *cols,
                    rows: *rows,
                })
            }
            Event::FocusLost => {
                self.last_mouse = None;
                Some(Command::ReleaseAll)
            }
            _ => None,
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent) -> Option<Command> {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return None;
        }

        let position = (mouse.column, mouse.row);
        let (last_col, last_row) = self.last_mouse.replace(position)?;
        let dx = (mouse.column as f64 - last_col as f64) * self.pixels_per_cell.0;
        let dy = (mouse.row as f64 - last_row as f64) * self.pixels_per_cell.1;
        (dx != 0.0 || dy != 0.0).then_some(Command::Look { dx, dy })
    }
}

/// Key-down emits the bound direction, key-up emits its opposite
fn map_key(key: &KeyEvent) -> Option<Command> {
    let quit = key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));

    match key.kind {
        KeyEventKind::Press if quit => Some(Command::Quit),
        KeyEventKind::Press => key_binding(key.code).map(Command::Translate),
        KeyEventKind::Release if quit => None,
        KeyEventKind::Release => key_binding(key.code).map(|e| Command::Translate(e.opposite())),
        KeyEventKind::Repeat => None,
    }
}
