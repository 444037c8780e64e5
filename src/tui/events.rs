//! Input events forwarded from the terminal to the TUI loop.

use crossterm::event::KeyEvent;

#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input.
    Key(KeyEvent),
    /// Bracketed paste content.
    Paste(String),
    /// Terminal resized; redraw on the next tick.
    Resize,
}
