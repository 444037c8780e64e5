use anyhow::{anyhow, bail, Result};
use is_terminal::IsTerminal;
use std::io;
use tracing_subscriber::EnvFilter;

use datatutor::cli::Cli;
use datatutor::config::Config;
use datatutor::printer::{lesson_markdown, print_outcome, MarkdownPrinter, TextPrinter};
use datatutor::runner::Runner;
use datatutor::session::Session;
use datatutor::{lessons, tui};

fn main() -> Result<()> {
    let args = Cli::parse();

    // Diagnostics stay quiet unless DATATUTOR_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DATATUTOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cfg = Config::load();
    let markdown = if args.no_md { false } else { cfg.get_bool("PRETTIFY_MARKDOWN") };

    // Lesson shortcuts
    if args.list_lessons {
        for (i, lesson) in lessons::all().iter().enumerate() {
            println!("{:2}  {}", i, lesson.name);
        }
        return Ok(());
    }
    if let Some(selector) = &args.show_lesson {
        let lesson = lessons::resolve(selector)?;
        let text = lesson_markdown(lesson);
        if markdown {
            MarkdownPrinter::default().print(&text);
        } else {
            println!("{}", text);
        }
        return Ok(());
    }

    // One-shot evaluation
    let snippet = match (&args.eval, &args.eval_file) {
        (Some(code), _) => Some(code.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .map_err(|e| anyhow!("failed to read snippet file '{}': {e}", path.display()))?,
        ),
        (None, None) => None,
    };
    if let Some(code) = snippet {
        let Some(data) = &args.data else {
            bail!("--eval needs a CSV dataset argument");
        };
        let task = args
            .lesson
            .as_deref()
            .map(lessons::resolve)
            .transpose()?
            .map(|lesson| lesson.task);

        let mut session = Session::new();
        let frame = match session.load_dataset(data) {
            Ok(frame) => frame,
            Err(err) => {
                TextPrinter { color: Some("red") }.print(&format!("Error loading CSV: {err}"));
                std::process::exit(1);
            }
        };

        let mut runner = Runner::from_config(&cfg);
        let outcome = runner.run(&code, frame, task);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print_outcome(&outcome);
        }
        if !outcome.succeeded() {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Interactive session
    if !io::stdout().is_terminal() {
        bail!("the interactive session requires a terminal; use --eval for scripted runs");
    }
    tui::run(args.data.as_deref(), &cfg)
}
