//! Printers: colored text, markdown (termimad), and run-outcome rendering
//! for the one-shot CLI mode.

use owo_colors::OwoColorize;
use termimad::MadSkin;
use unicode_width::UnicodeWidthStr;

use crate::chart::{FigureKind, FigureSpec};
use crate::dataset::TableData;
use crate::lessons::Lesson;
use crate::runner::{RunOutcome, NO_OUTPUT_HINT};

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        if let Some(c) = self.color {
            match c {
                "green" => println!("{}", text.green()),
                "cyan" => println!("{}", text.cyan()),
                "magenta" => println!("{}", text.magenta()),
                "yellow" => println!("{}", text.yellow()),
                "red" => println!("{}", text.red()),
                _ => println!("{}", text),
            }
        } else {
            println!("{}", text);
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
    pub width: usize,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default(), width: 100 }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

/// Lesson text as markdown, for `--show-lesson`.
pub fn lesson_markdown(lesson: &Lesson) -> String {
    format!(
        "# {}\n\n{}\n\n## Example\n\n```\n{}\n```\n\n## Your Task\n\n{}\n",
        lesson.name, lesson.description, lesson.example, lesson.task
    )
}

/// Print a full run outcome to the terminal.
pub fn print_outcome(outcome: &RunOutcome) {
    if let Some(failure) = &outcome.error {
        TextPrinter { color: Some("red") }.print(&format!("Error: {}", failure.message));
        println!("{}", failure.trace);
        return;
    }

    if let Some(table) = &outcome.table {
        println!("{}", table_text(table));
    } else if let Some(text) = &outcome.text {
        print!("{}", text);
        if !text.ends_with('\n') {
            println!();
        }
    }

    if let Some(fig) = &outcome.chart {
        TextPrinter { color: Some("cyan") }.print(&figure_summary(fig));
    }

    if outcome.is_empty() {
        TextPrinter { color: Some("yellow") }.print(NO_OUTPUT_HINT);
    } else {
        TextPrinter { color: Some("green") }.print("Code ran successfully!");
    }

    if let Some(explanation) = &outcome.explanation {
        println!();
        println!("What this code does:");
        println!("{}", explanation);
    }
}

/// Fixed-width rendering of a structured table.
pub fn table_text(table: &TableData) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.width()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    let render_row = |cells: &[String]| {
        let mut line = String::new();
        for (i, (cell, w)) in cells.iter().zip(&widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            for _ in 0..w.saturating_sub(cell.width()) {
                line.push(' ');
            }
            line.push_str(cell);
        }
        line
    };
    let mut lines = vec![render_row(&table.headers)];
    lines.extend(table.rows.iter().map(|r| render_row(r)));
    if table.total_rows > table.rows.len() {
        lines.push(format!(
            "[{} rows x {} columns]",
            table.total_rows,
            table.headers.len().saturating_sub(1)
        ));
    }
    lines.join("\n")
}

/// One-line description of a collected figure; the TUI draws the real
/// thing, the one-shot printer only summarizes it.
pub fn figure_summary(fig: &FigureSpec) -> String {
    let title = fig.title.clone().unwrap_or_else(|| fig.label());
    let detail = match &fig.kind {
        FigureKind::Line { points, .. } => format!("{} points", points.len()),
        FigureKind::Scatter { points, .. } => format!("{} points", points.len()),
        FigureKind::Bar { bars, .. } => format!("{} bars", bars.len()),
        FigureKind::Histogram { bins, .. } => format!("{} bins", bins.len()),
    };
    format!("[chart] {title} ({detail}, {}x{})", fig.width, fig.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_text_aligns_and_annotates_truncation() {
        let table = TableData {
            headers: vec!["".into(), "a".into()],
            rows: vec![vec!["0".into(), "1".into()], vec!["1".into(), "22".into()]],
            total_rows: 5,
        };
        let text = table_text(&table);
        assert_eq!(
            text,
            "    a\n0   1\n1  22\n[5 rows x 1 columns]"
        );
    }

    #[test]
    fn figure_summary_prefers_title() {
        let fig = FigureSpec {
            kind: FigureKind::Bar { name: "count".into(), bars: vec![("x".into(), 1.0)] },
            title: Some("Bar Chart".into()),
            width: 60,
            height: 16,
        };
        assert!(figure_summary(&fig).contains("Bar Chart"));
        assert!(figure_summary(&fig).contains("1 bars"));
    }
}
