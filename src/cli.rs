use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "datatutor", about = "Interactive terminal tutor for tabular data analysis", version)]
#[command(group(ArgGroup::new("snippet").args(["eval", "eval_file"]).multiple(false)))]
#[command(group(ArgGroup::new("shortcut").args(["list_lessons", "show_lesson"]).multiple(false)))]
pub struct Cli {
    /// CSV dataset to load on startup.
    #[arg(value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Evaluate one snippet against the dataset and exit.
    #[arg(short = 'e', long = "eval", value_name = "SNIPPET")]
    pub eval: Option<String>,

    /// Read the snippet to evaluate from a file.
    #[arg(long = "eval-file", value_name = "FILE")]
    pub eval_file: Option<PathBuf>,

    /// Lesson giving the task context for --eval (index or exact name).
    #[arg(long, value_name = "LESSON")]
    pub lesson: Option<String>,

    /// Print the run outcome as JSON instead of formatted text.
    #[arg(long)]
    pub json: bool,

    /// List all lessons with their positions.
    #[arg(short = 'l', long = "list-lessons", visible_alias = "ll")]
    pub list_lessons: bool,

    /// Show one lesson (index or exact name).
    #[arg(long = "show-lesson", value_name = "LESSON")]
    pub show_lesson: Option<String>,

    /// Disable markdown prettifying of lesson text.
    #[arg(long = "no-md")]
    pub no_md: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
