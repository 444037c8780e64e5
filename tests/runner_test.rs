use anyhow::Result;

use datatutor::chart::FigureKind;
use datatutor::dataset::{read_csv, Frame, RenderOptions};
use datatutor::runner::Runner;

fn frame_2x2() -> Result<Frame> {
    Ok(read_csv("a,b\n1,2\n3,4\n".as_bytes())?)
}

fn runner() -> Runner {
    Runner::new(RenderOptions::default(), (60, 16))
}

#[test]
fn shape_snippet_captures_exact_text() -> Result<()> {
    let mut runner = runner();
    let outcome = runner.run("print(df.shape())", &frame_2x2()?, None);
    assert!(outcome.succeeded());
    assert_eq!(outcome.text.as_deref().map(str::trim), Some("(2, 2)"));
    assert!(outcome.table.is_none());
    assert!(outcome.chart.is_none());
    Ok(())
}

#[test]
fn describe_snippet_renders_a_table() -> Result<()> {
    let mut runner = runner();
    let outcome = runner.run("stats = df.describe()\nprint(stats)", &frame_2x2()?, None);
    assert!(outcome.succeeded());
    let table = outcome.table.expect("describe output should render as a table");
    assert!(table.headers.contains(&"a".to_string()));
    assert_eq!(table.rows.len(), 8);
    assert!(outcome.text.is_none());
    Ok(())
}

#[test]
fn line_plot_renders_one_chart_and_registry_empties() -> Result<()> {
    let mut runner = runner();
    let base = frame_2x2()?;

    let first = runner.run("plt.line(df[\"a\"])\nplt.title(\"Line Plot\")", &base, None);
    assert!(first.succeeded());
    let fig = first.chart.expect("one chart per run");
    assert_eq!(fig.title.as_deref(), Some("Line Plot"));
    assert_eq!((fig.width, fig.height), (60, 16));
    assert!(matches!(fig.kind, FigureKind::Line { .. }));

    // Nothing may leak into the next run.
    let second = runner.run("print(df.shape())", &base, None);
    assert!(second.chart.is_none());
    Ok(())
}

#[test]
fn failing_snippet_produces_only_an_error() -> Result<()> {
    let mut runner = runner();
    let base = frame_2x2()?;
    let outcome = runner.run("print(\"partial\")\nprint(df[\"missing\"])", &base, None);
    let failure = outcome.error.expect("execution failure");
    assert!(failure.message.contains("unknown column"));
    assert!(failure.trace.contains("line 2"));
    assert!(outcome.text.is_none());
    assert!(outcome.table.is_none());
    assert!(outcome.chart.is_none());

    // The sink is per-run: a subsequent unrelated print is observable.
    let after = runner.run("print(\"hello again\")", &base, None);
    assert_eq!(after.text.as_deref(), Some("hello again\n"));
    Ok(())
}

#[test]
fn side_effect_free_snippets_are_idempotent() -> Result<()> {
    let mut runner = runner();
    let base = frame_2x2()?;
    let code = "print(df[df[\"a\"] > 1])";
    let first = runner.run(code, &base, None);
    let second = runner.run(code, &base, None);
    assert!(first.succeeded() && second.succeeded());
    assert_eq!(first.text, second.text);
    assert_eq!(first.table, second.table);
    Ok(())
}

#[test]
fn silent_snippet_reports_no_output() -> Result<()> {
    let mut runner = runner();
    let outcome = runner.run("x = df.dropna()", &frame_2x2()?, None);
    assert!(outcome.succeeded());
    assert!(outcome.is_empty());
    assert!(outcome.error.is_none());
    Ok(())
}

#[test]
fn runs_do_not_share_bindings() -> Result<()> {
    let mut runner = runner();
    let base = frame_2x2()?;
    let ok = runner.run("leftover = 42", &base, None);
    assert!(ok.succeeded());
    let next = runner.run("print(leftover)", &base, None);
    let failure = next.error.expect("bindings must not leak between runs");
    assert!(failure.message.contains("'leftover' is not defined"));
    Ok(())
}

#[test]
fn every_snippet_starts_from_the_base_dataset() -> Result<()> {
    let mut runner = runner();
    let base = frame_2x2()?;

    // The rebound frame is a snippet binding, so the tabular path wins.
    let grown = runner.run("df[\"c\"] = df[\"a\"] + df[\"b\"]\nprint(df.shape())", &base, None);
    let table = grown.table.expect("rebound frame renders as a table");
    assert_eq!(table.headers, vec!["", "a", "b", "c"]);

    // The next run starts from the unchanged base frame again.
    let fresh = runner.run("print(df.shape())", &base, None);
    assert_eq!(fresh.text.as_deref().map(str::trim), Some("(2, 2)"));
    Ok(())
}

#[test]
fn explanation_follows_the_first_matching_rule() -> Result<()> {
    let mut runner = runner();
    let outcome = runner.run(
        "df_cleaned = df.dropna()\nprint(df_cleaned.head())",
        &frame_2x2()?,
        Some("Drop rows with missing values."),
    );
    let explanation = outcome.explanation.expect("explanation for a curriculum snippet");
    assert!(explanation.contains("Drop rows with missing values."));
    assert!(explanation.contains("Dropping missing values"));
    Ok(())
}

#[test]
fn json_outcome_is_serializable() -> Result<()> {
    let mut runner = runner();
    let outcome = runner.run("plt.hist(df[\"a\"], 2)", &frame_2x2()?, None);
    let json = serde_json::to_value(&outcome)?;
    assert_eq!(json["chart"]["kind"], "histogram");
    assert!(json["error"].is_null());
    Ok(())
}
