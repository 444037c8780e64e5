use std::io::Write;

use anyhow::Result;
use tempfile::tempdir;

use datatutor::dataset::{Cell, RenderOptions};
use datatutor::runner::Runner;
use datatutor::session::Session;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(content)?;
    Ok(path)
}

#[test]
fn upload_retry_after_input_error() -> Result<()> {
    let dir = tempdir()?;
    let bad = write_file(&dir, "bad.csv", b"a,b\n1\n")?;
    let good = write_file(&dir, "good.csv", b"name,score\nada,90\ngrace,95\n")?;

    let mut session = Session::new();
    assert!(session.load_dataset(&bad).is_err());
    assert!(session.dataset().is_none(), "a failed load leaves no dataset behind");

    session.load_dataset(&good)?;
    let frame = session.dataset().expect("dataset present after a good load");
    assert_eq!(frame.n_rows(), 2);
    assert_eq!(frame.column("score")?.cells[1], Cell::Int(95));
    Ok(())
}

#[test]
fn uploaded_dataset_flows_into_the_runner() -> Result<()> {
    let dir = tempdir()?;
    let csv = write_file(
        &dir,
        "cities.csv",
        b"city,temp\noslo,10\nbergen,4\noslo,16\n",
    )?;

    let mut session = Session::new();
    session.load_dataset(&csv)?;

    let mut runner = Runner::new(RenderOptions::default(), (60, 16));
    let outcome = runner.run(
        "means = df.groupby(\"city\").mean(\"temp\")\nprint(means)",
        session.dataset().expect("dataset"),
        None,
    );
    assert!(outcome.succeeded());
    let table = outcome.table.expect("aggregation renders as a table");
    assert!(table.rows.iter().any(|row| row.contains(&"oslo".to_string())));
    assert!(table.rows.iter().any(|row| row.contains(&"13.0".to_string())));
    Ok(())
}

#[test]
fn replacement_is_wholesale() -> Result<()> {
    let dir = tempdir()?;
    let first = write_file(&dir, "first.csv", b"a\n1\n2\n3\n")?;
    let second = write_file(&dir, "second.csv", b"x,y\n9,9\n")?;

    let mut session = Session::new();
    session.load_dataset(&first)?;
    assert_eq!(session.dataset().expect("first").n_rows(), 3);

    session.load_dataset(&second)?;
    let frame = session.dataset().expect("second");
    assert_eq!(frame.n_rows(), 1);
    assert!(frame.column("a").is_err(), "old columns are gone after replacement");
    Ok(())
}
