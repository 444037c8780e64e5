//! Per-session page state: the loaded dataset and lesson progress.

use std::path::Path;

use tracing::{info, warn};

use crate::dataset::{load_csv, Frame, InputError};

/// Interactive-session state. The dataset is absent until a load succeeds,
/// replaced wholesale on each successful load, and cleared again when a
/// load fails. Progress is an append-only set of completed lesson names.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Frame>,
    source: Option<String>,
    progress: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CSV, replacing the current dataset. On failure the dataset
    /// is cleared, so a bad upload never leaves stale data behind.
    pub fn load_dataset(&mut self, path: &Path) -> Result<&Frame, InputError> {
        match load_csv(path) {
            Ok(frame) => {
                info!(path = %path.display(), rows = frame.n_rows(), "dataset replaced");
                self.source = Some(path.display().to_string());
                Ok(self.dataset.insert(frame))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "dataset load failed");
                self.dataset = None;
                self.source = None;
                Err(err)
            }
        }
    }

    pub fn dataset(&self) -> Option<&Frame> {
        self.dataset.as_ref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Mark a lesson complete. Re-marking is a no-op; returns whether the
    /// name was newly added.
    pub fn mark_complete(&mut self, name: &str) -> bool {
        if self.is_complete(name) {
            false
        } else {
            self.progress.push(name.to_string());
            true
        }
    }

    pub fn is_complete(&self, name: &str) -> bool {
        self.progress.iter().any(|n| n == name)
    }

    pub fn completed(&self) -> &[String] {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_replaces_and_failure_clears() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::File::create(&good)
            .and_then(|mut f| f.write_all(b"a,b\n1,2\n"))
            .unwrap();
        let bad = dir.path().join("bad.csv");
        std::fs::File::create(&bad)
            .and_then(|mut f| f.write_all(b"a,b\n1,2,3\n"))
            .unwrap();

        let mut session = Session::new();
        assert!(session.dataset().is_none());

        session.load_dataset(&good).unwrap();
        assert_eq!(session.dataset().unwrap().n_rows(), 1);
        assert!(session.source().unwrap().ends_with("good.csv"));

        assert!(session.load_dataset(&bad).is_err());
        assert!(session.dataset().is_none());
        assert!(session.source().is_none());

        // The session stays usable for a retry.
        session.load_dataset(&good).unwrap();
        assert!(session.dataset().is_some());
    }

    #[test]
    fn progress_is_append_only_union() {
        let mut session = Session::new();
        assert!(session.mark_complete("Value Counts"));
        assert!(!session.mark_complete("Value Counts"));
        assert!(session.mark_complete("Histograms"));
        assert_eq!(session.completed(), ["Value Counts", "Histograms"]);
        assert!(session.is_complete("Histograms"));
        assert!(!session.is_complete("Sorting Frames"));
    }
}
