//! The interactive session: lesson sidebar, code editor, and output pane.

pub mod app;
pub mod events;
pub mod handler;
pub mod ui;

pub use handler::run;
