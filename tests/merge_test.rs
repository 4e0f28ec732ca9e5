//! Tests for the merge registry and the CSS strategy

use std::sync::Arc;

use snipsplicer::domain::{MergeError, MergeRegistry, MergeStrategy};

#[test]
fn given_duplicate_selector_when_merging_then_last_write_wins_at_its_own_position() {
    // Arrange
    let registry = MergeRegistry::with_defaults();
    let current = ".a {\n  x: 1;\n}\n\n.b {\n  y: 1;\n}";

    // Act
    let merged = registry.merge("css", current, ".a { x: 2; }").unwrap();

    // Assert - the re-emitted selector moves to the end, .b keeps its spot
    assert_eq!(merged, ".b {\n  y: 1;\n}\n\n.a {\n  x: 2;\n}");
}

#[test]
fn given_new_selector_when_merging_then_it_is_appended() {
    // Arrange
    let registry = MergeRegistry::with_defaults();

    // Act
    let merged = registry
        .merge("css", ".a { x: 1; }", ".b { y: 2; }")
        .unwrap();

    // Assert
    assert_eq!(merged, ".a {\n  x: 1;\n}\n\n.b {\n  y: 2;\n}");
}

#[test]
fn given_empty_body_when_merging_then_selector_is_emptied_not_deleted() {
    // Arrange
    let registry = MergeRegistry::with_defaults();

    // Act
    let merged = registry
        .merge("css", ".card { color: red; }", ".card { }")
        .unwrap();

    // Assert - the block survives with no declarations
    assert_eq!(merged, ".card {\n\n}");
}

#[test]
fn given_merged_text_when_merging_empty_snippet_then_output_is_stable() {
    // Arrange
    let registry = MergeRegistry::with_defaults();
    let first = registry
        .merge("css", ".a { x: 1; }\n.b { y: 1; }", ".a { x: 2; }")
        .unwrap();

    // Act
    let second = registry.merge("css", &first, "").unwrap();

    // Assert - a no-op merge neither reorders nor rewrites
    assert_eq!(second, first);
}

#[test]
fn given_at_rule_when_merging_then_it_is_one_opaque_block() {
    // Arrange
    let registry = MergeRegistry::with_defaults();
    let current = ".x { a: 1; }\n\n@media (max-width: 600px) { .y { b: 2; } }";

    // Act - re-emitting the at-rule replaces it wholesale
    let merged = registry
        .merge(
            "css",
            current,
            "@media (max-width: 600px) { .y { b: 3; } }",
        )
        .unwrap();

    // Assert
    assert_eq!(merged.matches("@media (max-width: 600px)").count(), 1);
    assert!(merged.contains("b: 3"));
    assert!(!merged.contains("b: 2"));
    assert!(merged.contains(".x"));
}

#[test]
fn given_truncated_snippet_when_merging_then_complete_blocks_still_land() {
    // Arrange
    let registry = MergeRegistry::with_defaults();

    // Act - the second block never closes its brace
    let merged = registry
        .merge("css", ".a { x: 1; }", ".b { y: 2; } .c { z: 3;")
        .unwrap();

    // Assert - .b merged, the broken .c tail is dropped silently
    assert_eq!(merged, ".a {\n  x: 1;\n}\n\n.b {\n  y: 2;\n}");
}

#[test]
fn given_empty_current_text_when_merging_then_snippet_becomes_the_document() {
    // Arrange
    let registry = MergeRegistry::with_defaults();

    // Act
    let merged = registry.merge("css", "", ".a { x: 1; }").unwrap();

    // Assert
    assert_eq!(merged, ".a {\n  x: 1;\n}");
}

#[test]
fn given_complex_selectors_when_merging_then_the_full_head_is_the_key() {
    // Arrange - combinators and selector lists are opaque key text
    let registry = MergeRegistry::with_defaults();
    let current = "div > .button { color: red; }\n.container, .box { margin: 10px; }";

    // Act
    let merged = registry
        .merge("css", current, "div > .button { background: blue; }")
        .unwrap();

    // Assert - the grouped rule is untouched, the combinator rule is replaced
    assert_eq!(
        merged,
        ".container, .box {\n  margin: 10px;\n}\n\ndiv > .button {\n  background: blue;\n}"
    );
}

#[test]
fn given_scss_and_less_tags_when_resolving_then_css_strategy_answers() {
    // Arrange
    let registry = MergeRegistry::with_defaults();

    // Act / Assert
    assert_eq!(registry.strategy("scss").unwrap().language(), "css");
    assert_eq!(registry.strategy("less").unwrap().language(), "css");
    assert_eq!(registry.strategy("CSS").unwrap().language(), "css");
    assert!(registry.strategy("toml").is_none());
}

#[test]
fn given_unknown_language_when_merging_then_error_names_the_tag() {
    // Arrange
    let registry = MergeRegistry::with_defaults();

    // Act
    let err = registry.merge("toml", "", "x = 1").unwrap_err();

    // Assert
    assert_eq!(err, MergeError::UnknownLanguage("toml".to_string()));
}

struct AppendMerge;

impl MergeStrategy for AppendMerge {
    fn language(&self) -> &str {
        "log"
    }

    fn merge(&self, current: &str, incoming: &str) -> Result<String, MergeError> {
        Ok(format!("{current}{incoming}"))
    }

    fn prompt_instructions(&self) -> &str {
        "Emit plain lines; they are appended verbatim."
    }
}

#[test]
fn given_custom_strategy_when_registered_then_it_dispatches_alongside_builtins() {
    // Arrange
    let mut registry = MergeRegistry::with_defaults();
    registry.register(Arc::new(AppendMerge));

    // Act
    let merged = registry.merge("log", "one\n", "two\n").unwrap();

    // Assert
    assert_eq!(merged, "one\ntwo\n");
    assert_eq!(registry.languages(), vec!["css", "log"]);
}

struct RejectingMerge;

impl MergeStrategy for RejectingMerge {
    fn language(&self) -> &str {
        "html"
    }

    fn merge(&self, _current: &str, _incoming: &str) -> Result<String, MergeError> {
        Err(MergeError::Strategy {
            language: "html".to_string(),
            message: "fragment has no insertion point".to_string(),
        })
    }

    fn prompt_instructions(&self) -> &str {
        "Emit complete elements only."
    }
}

#[test]
fn given_strategy_failure_when_merging_then_error_reaches_the_caller() {
    // Arrange
    let mut registry = MergeRegistry::with_defaults();
    registry.register(Arc::new(RejectingMerge));

    // Act
    let err = registry
        .merge("html", "<ul></ul>", "<li>x</li>")
        .unwrap_err();

    // Assert - dispatch adds nothing on top of the strategy's own error
    assert_eq!(
        err,
        MergeError::Strategy {
            language: "html".to_string(),
            message: "fragment has no insertion point".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "merge strategy for 'html' failed: fragment has no insertion point"
    );
}

#[test]
fn given_default_registry_when_building_instructions_then_each_language_has_a_section() {
    // Arrange
    let mut registry = MergeRegistry::with_defaults();
    registry.register(Arc::new(AppendMerge));

    // Act
    let doc = registry.prompt_instructions();

    // Assert - shared preamble first, then every strategy's rules
    assert!(doc.starts_with("Reply with fenced code snippets"));
    assert!(doc.contains("selector { property: value; }"));
    assert!(doc.contains("appended verbatim"));
}
