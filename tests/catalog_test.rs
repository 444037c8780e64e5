use datatutor::interp;
use datatutor::lessons;

#[test]
fn catalog_is_fixed_and_ordered() {
    let all = lessons::all();
    assert_eq!(all.len(), 15);
    assert_eq!(all[0].name, "Introduction to Frames");
    assert_eq!(all[all.len() - 1].name, "Renaming Columns");

    for (i, lesson) in all.iter().enumerate() {
        assert_eq!(lessons::get(i).unwrap().name, lesson.name);
        assert_eq!(lessons::get_by_name(lesson.name).unwrap().name, lesson.name);
    }
}

#[test]
fn out_of_range_lookups_fail() {
    assert!(lessons::get(lessons::all().len()).is_err());
    assert!(lessons::get_by_name("No Such Stage").is_err());
    assert!(lessons::resolve("9999").is_err());
}

#[test]
fn every_lesson_has_content() {
    for lesson in lessons::all() {
        assert!(!lesson.description.is_empty(), "{} has no description", lesson.name);
        assert!(!lesson.example.is_empty(), "{} has no example", lesson.name);
        assert!(!lesson.task.is_empty(), "{} has no task", lesson.name);
    }
}

/// The examples form a compatibility contract with the capability names
/// bound by the runner, so each one must at least be a valid snippet.
#[test]
fn every_example_snippet_parses() {
    for lesson in lessons::all() {
        assert!(
            interp::parse(lesson.example).is_ok(),
            "example for '{}' does not parse: {}",
            lesson.name,
            lesson.example
        );
    }
}

/// Examples only reference the bound capability names, never leftovers
/// from some other environment.
#[test]
fn examples_reference_only_bound_capabilities() {
    for lesson in lessons::all() {
        assert!(
            !lesson.example.contains("import "),
            "example for '{}' references an import",
            lesson.name
        );
    }
}
