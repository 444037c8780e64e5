//! UI layout and rendering logic for the interactive session.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, BarChart, Block, Borders, Chart, Clear, Dataset as Series, GraphType, Paragraph,
        Row, Table, Wrap,
    },
    Frame,
};

use crate::chart::{FigureKind, FigureSpec};
use crate::dataset::TableData;
use crate::lessons;
use crate::runner::{RunOutcome, NO_OUTPUT_HINT};

use super::app::{App, Focus, PopupState};

/// Render the whole session screen.
pub fn render_ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(frame.area());

    render_sidebar(frame, app, main_layout[0]);
    render_main(frame, app, main_layout[1]);

    if app.show_help {
        render_help_overlay(frame);
    }
    if let PopupState::LoadData { input } = &app.popup {
        render_load_popup(frame, input);
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    // Dataset summary
    let dataset_lines = match app.session.dataset() {
        Some(data) => vec![
            Line::from(app.session.source().unwrap_or("<memory>").to_string()),
            Line::from(format!("{} rows x {} columns", data.n_rows(), data.n_cols())),
            Line::from(Span::styled(
                data.column_names().join(", "),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![
            Line::from(Span::styled(
                "No dataset loaded",
                Style::default().fg(Color::Yellow),
            )),
            Line::from("Press ctrl+o to load a CSV"),
        ],
    };
    let dataset = Paragraph::new(Text::from(dataset_lines))
        .block(Block::default().borders(Borders::ALL).title("Dataset"))
        .wrap(Wrap { trim: true });
    frame.render_widget(dataset, chunks[0]);

    // Stage list with progress ticks
    let mut lesson_lines = Vec::new();
    for (i, lesson) in lessons::all().iter().enumerate() {
        let tick = if app.session.is_complete(lesson.name) { "✓" } else { " " };
        let mut style = Style::default();
        if app.session.is_complete(lesson.name) {
            style = style.fg(Color::Green);
        }
        if i == app.lesson_idx {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lesson_lines.push(Line::from(Span::styled(
            format!("{tick} {}", lesson.name),
            style,
        )));
    }
    let done = lessons::all()
        .iter()
        .filter(|l| app.session.is_complete(l.name))
        .count();
    let title = format!("Stages ({done}/{})", lessons::all().len());
    let border_style = if app.focus == Focus::Sidebar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let stages = Paragraph::new(Text::from(lesson_lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(stages, chunks[1]);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect) {
    let lesson = app.current_lesson();
    let example_height = (lesson.example.lines().count() as u16 + 2).min(7);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(example_height),
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

    // Lesson header
    let info = Text::from(vec![
        Line::from(Span::styled(
            lesson.name,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(lesson.description),
        Line::from(""),
        Line::from(Span::styled(
            format!("Task: {}", lesson.task),
            Style::default().fg(Color::Magenta),
        )),
    ]);
    let header = Paragraph::new(info)
        .block(Block::default().borders(Borders::ALL).title("Lesson"))
        .wrap(Wrap { trim: true });
    frame.render_widget(header, chunks[0]);

    // Example snippet
    let example = Paragraph::new(lesson.example)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Example Code"));
    frame.render_widget(example, chunks[1]);

    render_editor(frame, app, chunks[2]);
    render_output(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let mut lines = Vec::new();
    for (i, line) in app.editor.lines.iter().enumerate() {
        if focused && i == app.editor.row {
            // Split at the cursor so it renders as a reversed cell.
            let chars: Vec<char> = line.chars().collect();
            let col = app.editor.col.min(chars.len());
            let before: String = chars[..col].iter().collect();
            let (cursor, after): (String, String) = if col < chars.len() {
                (chars[col].to_string(), chars[col + 1..].iter().collect())
            } else {
                (" ".to_string(), String::new())
            };
            lines.push(Line::from(vec![
                Span::raw(before),
                Span::styled(cursor, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw(after),
            ]));
        } else {
            lines.push(Line::from(line.clone()));
        }
    }
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let editor = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Your Code (ctrl+r to run, ctrl+d to mark complete)"),
    );
    frame.render_widget(editor, area);
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let Some(outcome) = &app.outcome else {
        let hint = Paragraph::new("Run your code to see its output here.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Output"));
        frame.render_widget(hint, area);
        return;
    };

    if let Some(failure) = &outcome.error {
        let mut lines = vec![Line::from(Span::styled(
            format!("Error: {}", failure.message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(
            failure
                .trace
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Red)))),
        );
        let error = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title("Output"))
            .wrap(Wrap { trim: false });
        frame.render_widget(error, area);
        return;
    }

    let explanation_height = outcome
        .explanation
        .as_ref()
        .map(|e| (e.lines().count() as u16 + 2).min(8))
        .unwrap_or(0);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(explanation_height),
        ])
        .split(area);

    let banner = if outcome.is_empty() {
        Span::styled(NO_OUTPUT_HINT, Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Code ran successfully!", Style::default().fg(Color::Green))
    };
    frame.render_widget(Paragraph::new(Line::from(banner)), chunks[0]);

    render_outcome_content(frame, outcome, chunks[1]);

    if let Some(explanation) = &outcome.explanation {
        let text = Paragraph::new(explanation.as_str())
            .block(Block::default().borders(Borders::ALL).title("What This Code Does"))
            .wrap(Wrap { trim: true });
        frame.render_widget(text, chunks[2]);
    }
}

fn render_outcome_content(frame: &mut Frame, outcome: &RunOutcome, area: Rect) {
    let has_block = outcome.table.is_some() || outcome.text.is_some();
    let (block_area, chart_area) = match (&outcome.chart, has_block) {
        (Some(_), true) => {
            let halves = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            (Some(halves[0]), Some(halves[1]))
        }
        (Some(_), false) => (None, Some(area)),
        (None, _) => (Some(area), None),
    };

    if let Some(block_area) = block_area {
        if let Some(table) = &outcome.table {
            render_table(frame, table, block_area);
        } else if let Some(text) = &outcome.text {
            let out = Paragraph::new(text.as_str())
                .block(Block::default().borders(Borders::ALL).title("Text Output"))
                .wrap(Wrap { trim: false });
            frame.render_widget(out, block_area);
        }
    }
    if let (Some(chart_area), Some(fig)) = (chart_area, &outcome.chart) {
        render_figure(frame, fig, chart_area);
    }
}

fn render_table(frame: &mut Frame, table: &TableData, area: Rect) {
    let ncols = table.headers.len();
    let mut widths = vec![0usize; ncols];
    for (w, h) in widths.iter_mut().zip(&table.headers) {
        *w = h.chars().count();
    }
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let constraints: Vec<Constraint> = widths
        .iter()
        .map(|w| Constraint::Length((*w as u16).saturating_add(1)))
        .collect();

    let header = Row::new(table.headers.clone())
        .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));
    let rows = table.rows.iter().map(|r| Row::new(r.clone()));
    let widget = Table::new(rows, constraints).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Table ({} rows)", table.total_rows)),
    );
    frame.render_widget(widget, area);
}

fn render_figure(frame: &mut Frame, fig: &FigureSpec, area: Rect) {
    // Figures draw at their fixed display size, clamped to the pane.
    let area = Rect {
        x: area.x,
        y: area.y,
        width: area.width.min(fig.width.saturating_add(2)),
        height: area.height.min(fig.height.saturating_add(2)),
    };
    let title = fig.title.clone().unwrap_or_else(|| fig.label());

    match &fig.kind {
        FigureKind::Line { name, points } => {
            render_xy(frame, area, &title, name, points, GraphType::Line, symbols::Marker::Braille);
        }
        FigureKind::Scatter { x_name, y_name, points } => {
            let series = format!("{x_name} vs {y_name}");
            render_xy(frame, area, &title, &series, points, GraphType::Scatter, symbols::Marker::Dot);
        }
        FigureKind::Bar { bars, .. } => {
            let data: Vec<(String, u64)> = bars
                .iter()
                .map(|(label, value)| (label.clone(), value.round().max(0.0) as u64))
                .collect();
            let refs: Vec<(&str, u64)> = data.iter().map(|(l, v)| (l.as_str(), *v)).collect();
            let widget = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title(title))
                .data(&refs)
                .bar_width(7)
                .bar_gap(1)
                .bar_style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
            frame.render_widget(widget, area);
        }
        FigureKind::Histogram { bins, .. } => {
            let data: Vec<(String, u64)> = bins
                .iter()
                .map(|bin| (format!("{:.1}", bin.start), bin.count))
                .collect();
            let refs: Vec<(&str, u64)> = data.iter().map(|(l, v)| (l.as_str(), *v)).collect();
            let widget = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title(title))
                .data(&refs)
                .bar_width(6)
                .bar_gap(0)
                .bar_style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
            frame.render_widget(widget, area);
        }
    }
}

fn render_xy(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series_name: &str,
    points: &[(f64, f64)],
    graph_type: GraphType,
    marker: symbols::Marker,
) {
    if points.is_empty() {
        let empty = Paragraph::new("no numeric points to draw")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        frame.render_widget(empty, area);
        return;
    }
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    if x_min == x_max {
        x_min -= 0.5;
        x_max += 0.5;
    }
    if y_min == y_max {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let series = vec![Series::default()
        .name(series_name.to_string())
        .marker(marker)
        .graph_type(graph_type)
        .style(Style::default().fg(Color::Cyan))
        .data(points)];
    let chart = Chart::new(series)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.1}")),
                    Span::raw(format!("{x_max:.1}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{y_min:.1}")),
                    Span::raw(format!("{y_max:.1}")),
                ]),
        );
    frame.render_widget(chart, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("How to use"),
        Line::from(""),
        Line::from("  ctrl+o     - Load (or replace) the CSV dataset"),
        Line::from("  tab        - Switch between stages and the editor"),
        Line::from("  up/down    - Pick a stage (sidebar focus)"),
        Line::from("  ctrl+r     - Run the code in the editor"),
        Line::from("  ctrl+d     - Mark the current stage complete"),
        Line::from("  ctrl+l     - Clear the editor"),
        Line::from("  ctrl+c     - Quit"),
        Line::from(""),
        Line::from("Use print(...) for text output and plt.line/scatter/"),
        Line::from("bar/hist(...) for charts. The dataset is bound as df."),
    ];
    let help = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(help, popup_area);
}

fn render_load_popup(frame: &mut Frame, input: &str) {
    let popup_area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, popup_area);

    let text = Text::from(vec![
        Line::from("Path to a CSV file (first row is the header):"),
        Line::from(Span::styled(
            format!("{input}_"),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "enter: load    esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    let popup = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Load Dataset"))
        .wrap(Wrap { trim: true });
    frame.render_widget(popup, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
