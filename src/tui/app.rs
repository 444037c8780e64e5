//! TUI application state management.

use std::path::Path;

use crate::config::Config;
use crate::lessons::{self, Lesson};
use crate::runner::{RunOutcome, Runner, NO_OUTPUT_HINT};
use crate::session::Session;

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Editor,
}

/// Popup display state.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    None,
    /// Path prompt for loading a dataset.
    LoadData { input: String },
}

/// A small multi-line code editor buffer. Columns are char offsets, not
/// byte offsets.
#[derive(Debug)]
pub struct Editor {
    pub lines: Vec<String>,
    pub row: usize,
    pub col: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self { lines: vec![String::new()], row: 0, col: 0 }
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl Editor {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.row = self.lines.len() - 1;
        self.col = self.lines[self.row].chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.newline();
            } else if c != '\r' {
                self.insert_char(c);
            }
        }
    }

    pub fn newline(&mut self) {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].chars().count();
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].chars().count();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.lines[self.row].chars().count() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.lines[self.row].chars().count());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.lines[self.row].chars().count());
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.lines[self.row].chars().count();
    }
}

/// Application state for the TUI.
pub struct App {
    pub session: Session,
    pub runner: Runner,
    pub lesson_idx: usize,
    pub focus: Focus,
    pub editor: Editor,
    pub outcome: Option<RunOutcome>,
    pub status: String,
    pub show_help: bool,
    pub popup: PopupState,
    pub should_quit: bool,
}

impl App {
    pub fn new(cfg: &Config) -> Self {
        Self {
            session: Session::new(),
            runner: Runner::from_config(cfg),
            lesson_idx: 0,
            focus: Focus::Sidebar,
            editor: Editor::default(),
            outcome: None,
            status: "Load a CSV to begin (ctrl+o) | ctrl+h help".to_string(),
            show_help: false,
            popup: PopupState::None,
            should_quit: false,
        }
    }

    pub fn current_lesson(&self) -> &'static Lesson {
        // Selection keeps the index in range.
        lessons::all()
            .get(self.lesson_idx)
            .unwrap_or(&lessons::all()[0])
    }

    pub fn select_prev_lesson(&mut self) {
        if self.lesson_idx > 0 {
            self.lesson_idx -= 1;
            self.on_lesson_change();
        }
    }

    pub fn select_next_lesson(&mut self) {
        if self.lesson_idx + 1 < lessons::all().len() {
            self.lesson_idx += 1;
            self.on_lesson_change();
        }
    }

    fn on_lesson_change(&mut self) {
        self.outcome = None;
        self.status = format!("Stage: {}", self.current_lesson().name);
    }

    /// Run the editor contents against the dataset.
    pub fn run_snippet(&mut self) {
        let Some(frame) = self.session.dataset() else {
            self.status = "Please load a CSV file to proceed (ctrl+o).".to_string();
            return;
        };
        if self.editor.is_empty() {
            self.status = "Please enter code to run!".to_string();
            return;
        }
        let task = self.current_lesson().task;
        let outcome = self
            .runner
            .run(&self.editor.text(), frame, Some(task));
        self.status = if let Some(failure) = &outcome.error {
            format!("Error: {}", failure.message)
        } else if outcome.is_empty() {
            NO_OUTPUT_HINT.to_string()
        } else {
            "Code ran successfully!".to_string()
        };
        self.outcome = Some(outcome);
    }

    /// Mark the current lesson complete (a no-op when already done).
    pub fn mark_complete(&mut self) {
        let name = self.current_lesson().name;
        if self.session.mark_complete(name) {
            self.status = format!("{name} completed!");
        } else {
            self.status = format!("{name} was already completed.");
        }
    }

    /// Load (or replace) the dataset from a path string typed by the user.
    pub fn load_dataset(&mut self, input: &str) {
        let path = input.trim();
        if path.is_empty() {
            self.status = "Please enter a file path.".to_string();
            return;
        }
        match self.session.load_dataset(Path::new(path)) {
            Ok(frame) => {
                self.status = format!(
                    "File loaded successfully! {} rows x {} columns.",
                    frame.n_rows(),
                    frame.n_cols()
                );
                self.outcome = None;
            }
            Err(err) => {
                self.status = format!("Error loading CSV: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_edits_round_trip() {
        let mut ed = Editor::default();
        ed.insert_str("print(df.head())");
        ed.newline();
        ed.insert_str("x = 1");
        assert_eq!(ed.text(), "print(df.head())\nx = 1");
        ed.backspace();
        assert_eq!(ed.text(), "print(df.head())\nx = ");
    }

    #[test]
    fn editor_backspace_joins_lines() {
        let mut ed = Editor::default();
        ed.insert_str("ab\ncd");
        ed.move_home();
        ed.backspace();
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.row, 0);
        assert_eq!(ed.col, 2);
    }

    #[test]
    fn editor_handles_multibyte_chars() {
        let mut ed = Editor::default();
        ed.insert_str("héllo");
        ed.backspace();
        ed.backspace();
        assert_eq!(ed.text(), "hél");
    }

    #[test]
    fn lesson_selection_clamps_at_ends() {
        let cfg = Config::load();
        let mut app = App::new(&cfg);
        app.select_prev_lesson();
        assert_eq!(app.lesson_idx, 0);
        for _ in 0..100 {
            app.select_next_lesson();
        }
        assert_eq!(app.lesson_idx, lessons::all().len() - 1);
    }

    #[test]
    fn run_without_dataset_warns() {
        let cfg = Config::load();
        let mut app = App::new(&cfg);
        app.editor.insert_str("print(df.head())");
        app.run_snippet();
        assert!(app.outcome.is_none());
        assert!(app.status.contains("load a CSV"));
    }

    #[test]
    fn run_with_empty_editor_warns() {
        let cfg = Config::load();
        let mut app = App::new(&cfg);
        app.load_dataset_from_text_for_tests();
        app.run_snippet();
        assert_eq!(app.status, "Please enter code to run!");
    }

    impl App {
        fn load_dataset_from_text_for_tests(&mut self) {
            use std::io::Write;
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("t.csv");
            std::fs::File::create(&path)
                .and_then(|mut f| f.write_all(b"a\n1\n"))
                .unwrap();
            self.load_dataset(&path.display().to_string());
        }
    }
}
