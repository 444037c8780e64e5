//! Canned explanations derived from the snippet text.
//!
//! No semantic analysis happens here: each rule is a substring predicate
//! over the source, tested in a fixed priority order, first match wins.
//! The result is display-only decoration for the output pane.

pub struct Rule {
    pub pred: fn(&str) -> bool,
    pub text: &'static str,
}

/// Ordered by the curriculum's taxonomy of operations. Chart rules come
/// before the value-counts rule so that `plt.bar(df["c"].value_counts())`
/// reads as a bar chart, not as a counting step.
pub const RULES: &[Rule] = &[
    Rule {
        pred: |code| code.contains(".describe()"),
        text: "- Descriptive statistics: `describe()` computed summary statistics for the \
               numeric columns: count (non-null entries), mean, std (spread), min, the 25%/50%/75% \
               quantiles, and max.",
    },
    Rule {
        pred: |code| code.contains(".dropna()"),
        text: "- Dropping missing values: `dropna()` removed every row containing a missing \
               value, leaving a frame with only complete rows.",
    },
    Rule {
        pred: |code| code.contains("[[") || code.contains(".select("),
        text: "- Column selection: indexing with a list of names extracted just those columns \
               into a new, narrower frame.",
    },
    Rule {
        pred: |code| code.contains("df[df["),
        text: "- Row filtering: indexing the frame with a boolean mask kept only the rows where \
               the condition holds.",
    },
    Rule {
        pred: |code| code.contains("plt.line("),
        text: "- Line plot: `plt.line()` connected the column's values in row order, showing \
               the trend across the data.",
    },
    Rule {
        pred: |code| code.contains("plt.scatter("),
        text: "- Scatter plot: `plt.scatter()` drew one point per row for the two columns, \
               showing their relationship without connecting them.",
    },
    Rule {
        pred: |code| code.contains("plt.bar("),
        text: "- Bar chart: `plt.bar()` drew one bar per category, with bar length showing the \
               count or value of that category.",
    },
    Rule {
        pred: |code| code.contains("plt.hist("),
        text: "- Histogram: `plt.hist()` grouped the column's values into equal-width bins and \
               drew the frequency of each bin.",
    },
    Rule {
        pred: |code| code.contains(".value_counts()"),
        text: "- Value counts: `value_counts()` counted how often each distinct value occurs in \
               the column, most frequent first.",
    },
    Rule {
        pred: |code| code.contains(".groupby("),
        text: "- Grouping and aggregation: `groupby()` split the rows by the key column and the \
               aggregation summarized a numeric column per group.",
    },
    Rule {
        pred: |code| code.contains(".sort("),
        text: "- Sorting: `sort()` reordered the rows by the given column, keeping equal keys \
               in their original order.",
    },
    Rule {
        pred: |code| code.contains("\"] =") && !code.contains("\"] =="),
        text: "- Derived column: assigning to a bracket index added (or replaced) a column \
               computed from the existing data.",
    },
    Rule {
        pred: |code| code.contains(".rename("),
        text: "- Renaming: `rename()` gave a column a new name without touching its values.",
    },
];

const CHART_SUFFIX: &str =
    "- Chart display: the figure was rendered to the output pane and cleared, so the next run \
     starts from a clean slate.";

/// First matching rule text, if any.
pub fn first_match(code: &str) -> Option<&'static str> {
    RULES.iter().find(|rule| (rule.pred)(code)).map(|rule| rule.text)
}

/// Compose the full explanation block for a successful run. Returns None
/// when there is nothing to say.
pub fn compose(code: &str, task: Option<&str>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(task) = task {
        parts.push(format!("This code worked on the task: \"{task}\"\n\nWhat it did:"));
    }
    if let Some(text) = first_match(code) {
        parts.push(text.to_string());
    }
    if code.contains("plt.") {
        parts.push(CHART_SUFFIX.to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_in_priority_order() {
        // dropna appears before sort in the rule order.
        let code = "x = df.dropna().sort(\"a\")";
        assert!(first_match(code).unwrap().contains("Dropping missing values"));
    }

    #[test]
    fn bar_of_value_counts_reads_as_bar_chart() {
        let code = "plt.bar(df[\"city\"].value_counts())";
        assert!(first_match(code).unwrap().contains("Bar chart"));
    }

    #[test]
    fn derived_column_does_not_match_equality() {
        assert!(first_match("print(df[df[\"a\"] > 1])").unwrap().contains("Row filtering"));
        let eq_only = "mask = df[\"a\"] == 1";
        assert!(first_match(eq_only).is_none());
        let derived = "df[\"b\"] = df[\"a\"] * 2";
        assert!(first_match(derived).unwrap().contains("Derived column"));
    }

    #[test]
    fn chart_suffix_is_appended() {
        let text = compose("plt.line(df[\"a\"])", Some("Plot a column.")).unwrap();
        assert!(text.contains("Line plot"));
        assert!(text.contains("Chart display"));
        assert!(text.starts_with("This code worked on the task"));
    }

    #[test]
    fn silent_snippet_with_no_task_yields_nothing() {
        assert!(compose("x = 1", None).is_none());
    }
}
