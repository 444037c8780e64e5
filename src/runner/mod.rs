//! The snippet runner: one evaluation against the dataset, producing a
//! rendering-ready outcome.
//!
//! Each run gets a fresh environment over a clone of the base frame, its
//! own output sink, and a reset figure registry, so nothing a snippet does
//! can leak into the next run. Failures are uniform: whatever went wrong
//! during evaluation comes back as one `ExecFailure` with a positioned
//! trace, and any output buffered before the failure point is discarded.

use serde::Serialize;
use tracing::debug;

use crate::chart::{FigureRegistry, FigureSpec};
use crate::config::Config;
use crate::dataset::{Frame, RenderOptions, TableData};
use crate::explain;
use crate::interp::{self, Env, Evaluator, ScriptError, Value};

/// Shown by UIs when a run succeeds but produced neither text nor chart.
pub const NO_OUTPUT_HINT: &str = "No text output. Use print(...) to display results.";

/// A failed evaluation: the message plus a trace pointing into the snippet.
#[derive(Debug, Clone, Serialize)]
pub struct ExecFailure {
    pub message: String,
    pub trace: String,
}

/// What one run produced. At most one of `table`/`text` is set; `error`
/// being set means everything else is empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOutcome {
    pub text: Option<String>,
    pub table: Option<TableData>,
    pub chart: Option<FigureSpec>,
    pub explanation: Option<String>,
    pub error: Option<ExecFailure>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// A successful run with nothing to show.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.text.is_none() && self.table.is_none() && self.chart.is_none()
    }

    fn failed(err: &ScriptError, source: &str) -> Self {
        Self {
            error: Some(ExecFailure {
                message: err.message.clone(),
                trace: render_trace(err, source),
            }),
            ..Self::default()
        }
    }
}

/// Executes snippets. Owns the figure registry, so figure lifecycle is
/// scoped to this runner; everything else is per-run state.
pub struct Runner {
    figures: FigureRegistry,
    render: RenderOptions,
    chart_size: (u16, u16),
}

impl Runner {
    pub fn new(render: RenderOptions, chart_size: (u16, u16)) -> Self {
        Self { figures: FigureRegistry::new(), render, chart_size }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.render_options(), cfg.chart_size())
    }

    /// Run one snippet against the base frame. `task` is the current
    /// lesson's task prompt, woven into the explanation when present.
    pub fn run(&mut self, code: &str, base: &Frame, task: Option<&str>) -> RunOutcome {
        self.figures.reset();

        let stmts = match interp::parse(code) {
            Ok(stmts) => stmts,
            Err(err) => {
                debug!(error = %err, "snippet failed to parse");
                return RunOutcome::failed(&err, code);
            }
        };

        let mut env = Env::with_capabilities(base.clone());
        let mut sink = String::new();
        let result = Evaluator::new(&mut sink, &mut self.figures, self.render.clone())
            .run(&stmts, &mut env);

        if let Err(err) = result {
            debug!(error = %err, "snippet failed to evaluate");
            self.figures.reset();
            return RunOutcome::failed(&err, code);
        }

        let mut outcome = RunOutcome::default();
        if !sink.is_empty() {
            match detect_table(&sink, &env) {
                Some(frame) => outcome.table = Some(frame.to_table(&self.render)),
                None => outcome.text = Some(sink),
            }
        }

        if let Some(mut fig) = self.figures.take_current() {
            fig.width = self.chart_size.0;
            fig.height = self.chart_size.1;
            outcome.chart = Some(fig);
        }

        outcome.explanation = explain::compose(code, task);
        debug!(
            has_text = outcome.text.is_some(),
            has_table = outcome.table.is_some(),
            has_chart = outcome.chart.is_some(),
            "snippet ran"
        );
        outcome
    }
}

/// Table sniffing: when the last printed line looks tabular (at least one
/// space and one digit), prefer rendering the first frame- or column-valued
/// binding the snippet left behind over the raw text block.
fn detect_table(sink: &str, env: &Env) -> Option<Frame> {
    let last = sink.trim_end().lines().last()?;
    if !last.contains(' ') || !last.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    env.user_bindings().find_map(|(_, v)| match v {
        Value::Frame(frame) => Some(frame.clone()),
        Value::Column(col) => Some(col.to_frame()),
        _ => None,
    })
}

fn render_trace(err: &ScriptError, source: &str) -> String {
    let Some(span) = err.span else {
        return err.message.clone();
    };
    let mut out = format!("line {}, column {}: {}", span.line, span.col, err.message);
    if let Some(line) = source.lines().nth(span.line.saturating_sub(1) as usize) {
        out.push_str(&format!("\n  {line}\n  "));
        for _ in 1..span.col {
            out.push(' ');
        }
        out.push('^');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_csv;

    fn base() -> Frame {
        read_csv("a,b\n1,2\n3,4\n".as_bytes()).unwrap()
    }

    fn runner() -> Runner {
        Runner::new(RenderOptions::default(), (60, 16))
    }

    #[test]
    fn print_only_snippet_yields_text() {
        let outcome = runner().run("print(df.shape())", &base(), None);
        assert!(outcome.succeeded());
        assert_eq!(outcome.text.as_deref(), Some("(2, 2)\n"));
        assert!(outcome.table.is_none());
        assert!(outcome.chart.is_none());
    }

    #[test]
    fn tabular_binding_wins_over_text() {
        let outcome = runner().run("stats = df.describe()\nprint(stats)", &base(), None);
        assert!(outcome.succeeded());
        let table = outcome.table.expect("table detected");
        assert!(outcome.text.is_none());
        assert_eq!(table.headers[1], "stat");
    }

    #[test]
    fn plain_words_stay_text_even_with_bindings() {
        let outcome = runner().run("x = df.head()\nprint(\"all done\")", &base(), None);
        assert_eq!(outcome.text.as_deref(), Some("all done\n"));
        assert!(outcome.table.is_none());
    }

    #[test]
    fn failure_discards_buffered_output() {
        let outcome = runner().run("print(\"before\")\nprint(missing)", &base(), None);
        let failure = outcome.error.expect("failure");
        assert!(failure.message.contains("'missing' is not defined"));
        assert!(failure.trace.contains("line 2"));
        assert!(outcome.text.is_none());
        assert!(outcome.table.is_none());
        assert!(outcome.chart.is_none());
    }

    #[test]
    fn sink_is_isolated_between_runs() {
        let mut runner = runner();
        let failed = runner.run("print(\"lost\")\nboom(", &base(), None);
        assert!(!failed.succeeded());
        let ok = runner.run("print(\"found\")", &base(), None);
        assert_eq!(ok.text.as_deref(), Some("found\n"));
    }

    #[test]
    fn figures_do_not_leak_across_runs() {
        let mut runner = runner();
        let with_chart = runner.run("plt.line(df[\"a\"])", &base(), None);
        assert!(with_chart.chart.is_some());
        let without = runner.run("print(df.shape())", &base(), None);
        assert!(without.chart.is_none());
    }

    #[test]
    fn empty_run_is_reported_empty() {
        let outcome = runner().run("x = 1", &base(), None);
        assert!(outcome.succeeded());
        assert!(outcome.is_empty());
    }

    #[test]
    fn idempotent_snippets_render_identically() {
        let mut runner = runner();
        let first = runner.run("print(df.describe())", &base(), None);
        let second = runner.run("print(df.describe())", &base(), None);
        assert_eq!(first.table, second.table);
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn dataset_mutation_does_not_persist() {
        let mut runner = runner();
        let base = base();
        runner.run("df[\"c\"] = 1\nprint(df.shape())", &base, None);
        let after = runner.run("print(df.shape())", &base, None);
        assert_eq!(after.text.as_deref(), Some("(2, 2)\n"));
    }

    #[test]
    fn explanation_includes_task_and_rule() {
        let outcome = runner().run(
            "print(df.describe())",
            &base(),
            Some("Show descriptive statistics."),
        );
        let explanation = outcome.explanation.expect("explanation");
        assert!(explanation.contains("Show descriptive statistics."));
        assert!(explanation.contains("Descriptive statistics"));
    }
}
