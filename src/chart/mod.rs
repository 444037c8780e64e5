//! Figure specifications and the per-runner pending-figure registry.

use serde::Serialize;

/// Default display size of a collected figure, in terminal cells.
pub const DEFAULT_SIZE: (u16, u16) = (60, 16);

/// One histogram bucket over `[start, end)` (the last bucket is closed).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureKind {
    Line {
        name: String,
        points: Vec<(f64, f64)>,
    },
    Scatter {
        x_name: String,
        y_name: String,
        points: Vec<(f64, f64)>,
    },
    Bar {
        name: String,
        bars: Vec<(String, f64)>,
    },
    Histogram {
        name: String,
        bins: Vec<HistBin>,
    },
}

/// A rendering-ready chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSpec {
    #[serde(flatten)]
    pub kind: FigureKind,
    pub title: Option<String>,
    pub width: u16,
    pub height: u16,
}

impl FigureSpec {
    fn new(kind: FigureKind) -> Self {
        Self { kind, title: None, width: DEFAULT_SIZE.0, height: DEFAULT_SIZE.1 }
    }

    /// Axis-style label for the figure when it has no explicit title.
    pub fn label(&self) -> String {
        match &self.kind {
            FigureKind::Line { name, .. } => format!("line: {name}"),
            FigureKind::Scatter { x_name, y_name, .. } => format!("scatter: {x_name} vs {y_name}"),
            FigureKind::Bar { name, .. } => format!("bar: {name}"),
            FigureKind::Histogram { name, .. } => format!("histogram: {name}"),
        }
    }
}

/// Figures produced but not yet collected. A run starts by discarding
/// whatever a previous run left behind, and collecting at the end of a run
/// empties the registry, so figures never leak across runs.
#[derive(Debug, Default)]
pub struct FigureRegistry {
    figures: Vec<FigureSpec>,
    pending_title: Option<String>,
    pending_size: Option<(u16, u16)>,
}

impl FigureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all pending figures and stored decorations.
    pub fn reset(&mut self) {
        self.figures.clear();
        self.pending_title = None;
        self.pending_size = None;
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Open a new figure. A title or size set before any figure existed
    /// applies to this one.
    pub fn add(&mut self, kind: FigureKind) {
        let mut spec = FigureSpec::new(kind);
        spec.title = self.pending_title.take();
        if let Some((w, h)) = self.pending_size.take() {
            spec.width = w;
            spec.height = h;
        }
        self.figures.push(spec);
    }

    /// Title the current figure, or the next one if none is open yet.
    pub fn set_title(&mut self, title: String) {
        match self.figures.last_mut() {
            Some(fig) => fig.title = Some(title),
            None => self.pending_title = Some(title),
        }
    }

    /// Size the current figure, or the next one if none is open yet.
    pub fn set_size(&mut self, width: u16, height: u16) {
        match self.figures.last_mut() {
            Some(fig) => {
                fig.width = width;
                fig.height = height;
            }
            None => self.pending_size = Some((width, height)),
        }
    }

    /// Collect the current (most recent) figure and discard the rest.
    pub fn take_current(&mut self) -> Option<FigureSpec> {
        let current = self.figures.pop();
        self.reset();
        current
    }
}

/// Equal-width histogram over the finite values. The last bin is
/// right-inclusive so the maximum lands in it.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![HistBin { start: min, end: max, count: finite.len() as u64 }];
    }
    let width = (max - min) / bins as f64;
    let mut out: Vec<HistBin> = (0..bins)
        .map(|i| HistBin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_applies_pending_title_to_next_figure() {
        let mut reg = FigureRegistry::new();
        reg.set_title("Line Plot".to_string());
        reg.add(FigureKind::Line { name: "a".into(), points: vec![(0.0, 1.0)] });
        let fig = reg.take_current().unwrap();
        assert_eq!(fig.title.as_deref(), Some("Line Plot"));
        assert!(reg.is_empty());
    }

    #[test]
    fn take_current_keeps_last_and_empties() {
        let mut reg = FigureRegistry::new();
        reg.add(FigureKind::Line { name: "a".into(), points: vec![] });
        reg.add(FigureKind::Line { name: "b".into(), points: vec![] });
        let fig = reg.take_current().unwrap();
        assert!(matches!(fig.kind, FigureKind::Line { ref name, .. } if name == "b"));
        assert!(reg.take_current().is_none());
    }

    #[test]
    fn histogram_counts_include_both_edges() {
        let bins = histogram(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 4);
        assert_eq!(bins[2].count, 2);
    }

    #[test]
    fn histogram_of_constant_values_is_one_bin() {
        let bins = histogram(&[5.0, 5.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }
}
