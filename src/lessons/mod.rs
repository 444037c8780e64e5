//! The lesson catalog: a fixed, ordered curriculum compiled into the
//! binary. Pure data; lessons are never created or mutated at runtime.

use thiserror::Error;

/// One curriculum stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lesson {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
    pub task: &'static str,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no lesson named '{0}'")]
    UnknownName(String),
    #[error("lesson index {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
}

pub const LESSONS: &[Lesson] = &[
    Lesson {
        name: "Introduction to Frames",
        description: "Learn to inspect a freshly loaded dataset.",
        example: "# Show the first 5 rows\nprint(df.head())",
        task: "Display the first 5 rows of the dataset using `print(df.head())`.",
    },
    Lesson {
        name: "Data Cleaning - Missing Values",
        description: "Check for missing values in your dataset.",
        example: "# Count missing values per column\nprint(df.null_counts())",
        task: "Show the count of missing values per column with `print(df.null_counts())`.",
    },
    Lesson {
        name: "Data Cleaning - Drop Missing Values",
        description: "Remove rows with missing values.",
        example: "# Drop rows with missing values\ndf_cleaned = df.dropna()\nprint(df_cleaned.head())",
        task: "Drop rows with missing values, assign to `df_cleaned`, and show the first 5 rows \
               with `print(df_cleaned.head())`.",
    },
    Lesson {
        name: "Data Selection - Columns",
        description: "Select specific columns from the frame.",
        example: "# Select columns\nprint(df[[\"column1\", \"column2\"]])",
        task: "Select and display two columns of your choice with `print(df[[\"col1\", \"col2\"]])`.",
    },
    Lesson {
        name: "Data Selection - Rows (Filtering)",
        description: "Filter rows based on a condition.",
        example: "# Filter rows\nprint(df[df[\"column\"] > 10])",
        task: "Filter rows where a numeric column exceeds a value, e.g. `print(df[df[\"col\"] > 10])`.",
    },
    Lesson {
        name: "Descriptive Statistics",
        description: "Calculate summary statistics for numeric columns.",
        example: "# Summary stats\nprint(df.describe())",
        task: "Show descriptive statistics with `print(df.describe())`.",
    },
    Lesson {
        name: "Value Counts",
        description: "Count occurrences in a categorical column.",
        example: "# Value counts\nprint(df[\"column\"].value_counts())",
        task: "Display value counts for a categorical column with `print(df[\"col\"].value_counts())`.",
    },
    Lesson {
        name: "Basic Line Plot",
        description: "Create a line plot of a numeric column.",
        example: "plt.line(df[\"numeric_col\"])\nplt.title(\"Line Plot\")",
        task: "Plot a numeric column with `plt.line(df[\"col\"])` and add a title with `plt.title(...)`.",
    },
    Lesson {
        name: "Scatter Plot",
        description: "Create a scatter plot of two numeric columns.",
        example: "plt.scatter(df[\"col1\"], df[\"col2\"])\nplt.title(\"Scatter Plot\")",
        task: "Make a scatter plot with `plt.scatter(df[\"col1\"], df[\"col2\"])` and add a title.",
    },
    Lesson {
        name: "Bar Chart",
        description: "Create a bar chart from categorical data.",
        example: "plt.bar(df[\"col\"].value_counts())\nplt.title(\"Bar Chart\")",
        task: "Plot a bar chart of value counts with `plt.bar(df[\"col\"].value_counts())` and \
               add a title.",
    },
    Lesson {
        name: "Histograms",
        description: "Visualize a numeric column's distribution.",
        example: "plt.hist(df[\"numeric_col\"], 10)\nplt.title(\"Histogram\")",
        task: "Create a histogram with `plt.hist(df[\"col\"], 10)` and add a title.",
    },
    Lesson {
        name: "Groupby and Aggregation",
        description: "Group data and compute aggregates.",
        example: "# Group and aggregate\nprint(df.groupby(\"cat_col\").mean(\"num_col\"))",
        task: "Group by a categorical column and show the mean of a numeric column with \
               `print(df.groupby(\"cat_col\").mean(\"num_col\"))`.",
    },
    Lesson {
        name: "Sorting Frames",
        description: "Sort the frame by a column.",
        example: "# Sort the frame\ndf_sorted = df.sort(\"column\")\nprint(df_sorted.head())",
        task: "Sort by a column, assign to `df_sorted`, and show the head with \
               `print(df_sorted.head())`.",
    },
    Lesson {
        name: "Adding New Columns",
        description: "Add a derived column to the frame.",
        example: "# Add a column\ndf[\"new_col\"] = df[\"col1\"] + df[\"col2\"]\nprint(df.head())",
        task: "Add a new column (e.g. `df[\"new_col\"] = df[\"col\"] * 2`) and show the head \
               with `print(df.head())`.",
    },
    Lesson {
        name: "Renaming Columns",
        description: "Rename a column in the frame.",
        example: "# Rename a column\ndf = df.rename(\"old\", \"new\")\nprint(df.head())",
        task: "Rename a column (e.g. `df = df.rename(\"old\", \"new\")`) and show the head with \
               `print(df.head())`.",
    },
];

/// All lessons, in curriculum order.
pub fn all() -> &'static [Lesson] {
    LESSONS
}

pub fn get(index: usize) -> Result<&'static Lesson, CatalogError> {
    LESSONS
        .get(index)
        .ok_or(CatalogError::IndexOutOfRange { index, len: LESSONS.len() })
}

pub fn get_by_name(name: &str) -> Result<&'static Lesson, CatalogError> {
    LESSONS
        .iter()
        .find(|lesson| lesson.name == name)
        .ok_or_else(|| CatalogError::UnknownName(name.to_string()))
}

/// Resolve a lesson from a user-facing selector: a zero-based index or an
/// exact name.
pub fn resolve(selector: &str) -> Result<&'static Lesson, CatalogError> {
    match selector.parse::<usize>() {
        Ok(index) => get(index),
        Err(_) => get_by_name(selector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_and_named_uniquely() {
        assert_eq!(all().len(), 15);
        for (i, lesson) in all().iter().enumerate() {
            assert!(!lesson.name.is_empty());
            assert!(all()[..i].iter().all(|other| other.name != lesson.name));
        }
        assert_eq!(all()[0].name, "Introduction to Frames");
    }

    #[test]
    fn get_contract() {
        assert_eq!(get(1).unwrap().name, "Data Cleaning - Missing Values");
        assert!(matches!(get(99), Err(CatalogError::IndexOutOfRange { .. })));
        assert_eq!(get_by_name("Value Counts").unwrap().name, "Value Counts");
        assert!(matches!(get_by_name("Nope"), Err(CatalogError::UnknownName(_))));
    }

    #[test]
    fn resolve_accepts_index_or_name() {
        assert_eq!(resolve("0").unwrap().name, all()[0].name);
        assert_eq!(resolve("Histograms").unwrap().name, "Histograms");
        assert!(resolve("99").is_err());
    }
}
