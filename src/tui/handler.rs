//! Event loop and key handling for the interactive session.

use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;

use crate::config::Config;

use super::app::{App, Focus, PopupState};
use super::events::TuiEvent;
use super::ui::render_ui;

/// Run the interactive session, optionally loading a dataset first.
pub fn run(data: Option<&Path>, cfg: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cfg);
    if let Some(path) = data {
        app.load_dataset(&path.display().to_string());
    }

    // Input runs on its own thread so the render loop never blocks on the
    // terminal.
    let (event_tx, event_rx) = mpsc::channel::<TuiEvent>();
    thread::spawn(move || loop {
        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) => event_tx.send(TuiEvent::Key(key)),
                Ok(Event::Paste(text)) => event_tx.send(TuiEvent::Paste(text)),
                Ok(Event::Resize(_, _)) => event_tx.send(TuiEvent::Resize),
                _ => Ok(()),
            };
            if forwarded.is_err() {
                break; // Channel closed
            }
        }
    });

    let result = run_app(&mut terminal, &mut app, event_rx);

    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: mpsc::Receiver<TuiEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render_ui(frame, app))?;
        if app.should_quit {
            return Ok(());
        }
        match event_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(TuiEvent::Key(key)) => handle_key(app, key),
            Ok(TuiEvent::Paste(text)) => handle_paste(app, &text),
            Ok(TuiEvent::Resize) => {}
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Quit works from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.should_quit = true;
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char(_)) {
            app.show_help = false;
        }
        return;
    }

    if let PopupState::LoadData { input } = &mut app.popup {
        match key.code {
            KeyCode::Esc => app.popup = PopupState::None,
            KeyCode::Enter => {
                let path = input.clone();
                app.popup = PopupState::None;
                app.load_dataset(&path);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('h') => app.show_help = true,
            KeyCode::Char('o') => app.popup = PopupState::LoadData { input: String::new() },
            KeyCode::Char('r') => app.run_snippet(),
            KeyCode::Char('d') => app.mark_complete(),
            KeyCode::Char('l') => app.editor.clear(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::F(1) => {
            app.show_help = true;
            return;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Editor,
                Focus::Editor => Focus::Sidebar,
            };
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => match key.code {
            KeyCode::Up => app.select_prev_lesson(),
            KeyCode::Down => app.select_next_lesson(),
            KeyCode::Enter => app.focus = Focus::Editor,
            _ => {}
        },
        Focus::Editor => match key.code {
            KeyCode::Enter => app.editor.newline(),
            KeyCode::Backspace => app.editor.backspace(),
            KeyCode::Left => app.editor.move_left(),
            KeyCode::Right => app.editor.move_right(),
            KeyCode::Up => app.editor.move_up(),
            KeyCode::Down => app.editor.move_down(),
            KeyCode::Home => app.editor.move_home(),
            KeyCode::End => app.editor.move_end(),
            KeyCode::Char(c) => app.editor.insert_char(c),
            _ => {}
        },
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if let PopupState::LoadData { input } = &mut app.popup {
        input.push_str(text.trim());
        return;
    }
    if app.focus == Focus::Editor {
        app.editor.insert_str(text);
    }
}
