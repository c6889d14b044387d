//! Rendering tests against a test backend

use serde_json::json;

use super::app_render::item_label;
use super::app_state::App;
use super::test_support::*;
use crate::config::SearchConfig;
use crate::lookup::{Lookup, LookupError};
use crate::ResultSet;

#[test]
fn test_initial_render_shows_input_and_help() {
    let mut app = test_app();
    let output = render_to_string(&mut app, 50, 10);

    assert!(output.contains("Search"));
    assert!(output.contains("Type to search..."));
    assert!(output.contains("Enter select"));
    assert!(!output.contains("Results"));
}

#[test]
fn test_render_uses_configured_placeholder() {
    let config = SearchConfig {
        placeholder: Some("Find a pet".to_string()),
        ..test_config()
    };
    let mut app = App::new(config, catalog_lookup()).unwrap();
    let output = render_to_string(&mut app, 50, 10);

    assert!(output.contains("Find a pet"));
}

#[test]
fn test_render_lists_results() {
    let mut app = test_app();
    type_str(&mut app, "cat");
    settle(&mut app);
    let output = render_to_string(&mut app, 50, 12);

    assert!(output.contains("Results (3)"));
    assert!(output.contains("> Catalog"));
    assert!(output.contains("Category"));
    assert!(output.contains("Caterpillar"));
}

#[test]
fn test_render_hides_dismissed_results() {
    let mut app = test_app();
    type_str(&mut app, "cat");
    settle(&mut app);
    render_to_string(&mut app, 50, 12);

    click(&mut app, 5, 10);
    let output = render_to_string(&mut app, 50, 12);

    assert!(!output.contains("Results"));
    assert!(!output.contains("Catalog"));
}

#[test]
fn test_render_shows_loading_title() {
    let lookup = Lookup::custom(|_q: String| std::future::pending::<Result<ResultSet, LookupError>>());
    let mut app = App::new(test_config(), lookup).unwrap();
    type_str(&mut app, "cat");

    let output = render_to_string(&mut app, 50, 10);
    assert!(output.contains("Searching…"));
}

#[test]
fn test_render_shows_status_line() {
    let mut app = test_app();
    type_str(&mut app, "error");
    settle(&mut app);
    let output = render_to_string(&mut app, 50, 10);

    assert!(output.contains("catalog offline"));
    assert!(!output.contains("Enter select"));
}

#[test]
fn test_render_labels_objects_by_result_key() {
    let lookup = Lookup::custom(|_q: String| async move {
        Ok::<_, LookupError>(vec![
            json!({"name": "Catalog", "id": 7}),
            json!({"name": "Category", "id": 8}),
        ])
    });
    let config = SearchConfig {
        result_key: Some("name".to_string()),
        ..test_config()
    };
    let mut app = App::new(config, lookup).unwrap();
    type_str(&mut app, "cat");
    settle(&mut app);
    let output = render_to_string(&mut app, 50, 12);

    assert!(output.contains("Catalog"));
    assert!(!output.contains("\"id\""));
}

#[test]
fn test_render_records_widget_bounds() {
    let mut app = test_app();
    type_str(&mut app, "cat");
    settle(&mut app);
    render_to_string(&mut app, 50, 12);

    let bounds = app.widget.bounds();
    assert_eq!((bounds.x, bounds.y, bounds.width), (0, 0, 50));
    // Three-row input plus three items inside borders
    assert_eq!(bounds.height, 8);
}

#[test]
fn test_item_label_strings_and_keys() {
    assert_eq!(item_label(&json!("Catalog"), None), "Catalog");
    assert_eq!(item_label(&json!(42), None), "42");
    assert_eq!(
        item_label(&json!({"name": "Catalog"}), Some("name")),
        "Catalog"
    );
    assert_eq!(item_label(&json!({"name": 3}), Some("name")), "3");
}

#[test]
fn test_item_label_falls_back_to_whole_item() {
    assert_eq!(
        item_label(&json!({"title": "Catalog"}), Some("name")),
        r#"{"title":"Catalog"}"#
    );
    assert_eq!(item_label(&json!("Catalog"), Some("name")), "Catalog");
}
