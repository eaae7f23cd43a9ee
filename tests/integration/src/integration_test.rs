//! End-to-end test for the full resolution flow
//!
//! Exercises legacy migration, testing type overlay, environment overrides and
//! project id lookup against one project directory.

use pretty_assertions::assert_eq;
use serde_json::json;
use settings_core::{ConfigResolver, ResolutionOptions, TestingType};
use settings_test_utils::TestProject;

/// Set up a project still on the legacy settings layout
fn setup_legacy_project() -> TestProject {
    let project = TestProject::new();
    project.write_json(
        "cypress.json",
        &json!({
            "cypress": {
                "projectId": "abc123",
                "baseUrl": "http://localhost:3000",
                "visitTimeout": 60000,
                "supportFolder": "cypress/support"
            }
        }),
    );
    project.write_json("cypress.env.json", &json!({"apiUser": "ci"}));
    project
}

#[tokio::test]
async fn test_legacy_project_is_migrated_once() {
    let project = setup_legacy_project();
    let resolver = ConfigResolver::new();
    let root = project.normalized_root();

    let settings = resolver.resolve(&root, &ResolutionOptions::new()).await.unwrap();

    let expected = json!({
        "projectId": "abc123",
        "baseUrl": "http://localhost:3000",
        "pageLoadTimeout": 60000,
        "supportFile": "cypress/support"
    });
    assert_eq!(serde_json::Value::from(settings), expected);
    assert_eq!(project.read_json("cypress.json"), expected);

    let before = project.snapshot("cypress.json");
    resolver.resolve(&root, &ResolutionOptions::new()).await.unwrap();
    project.assert_unchanged("cypress.json", &before);
}

#[tokio::test]
async fn test_environment_overrides_are_read_alongside() {
    let project = setup_legacy_project();
    let resolver = ConfigResolver::new();

    let env = resolver
        .read_environment_overrides(&project.normalized_root())
        .await
        .unwrap();

    assert_eq!(env.get("apiUser"), Some(&json!("ci")));
}

#[tokio::test]
async fn test_project_id_survives_migration() {
    let project = setup_legacy_project();
    let resolver = ConfigResolver::new();

    let id = resolver
        .resolve_project_id(&project.normalized_root(), &ResolutionOptions::new())
        .await;

    assert_eq!(id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_component_overlay_after_migration() {
    let project = TestProject::new();
    project.write_json(
        "cypress.json",
        &json!({
            "commandTimeout": 4000,
            "viewportWidth": 1280,
            "component": {"viewportWidth": 500}
        }),
    );
    let options = ResolutionOptions::new().with_testing_type(TestingType::Component);

    let settings = ConfigResolver::new()
        .resolve(&project.normalized_root(), &options)
        .await
        .unwrap();

    assert_eq!(settings.get("viewportWidth"), Some(&json!(500)));
    assert_eq!(settings.get("defaultCommandTimeout"), Some(&json!(4000)));
    assert!(settings.get("commandTimeout").is_none());
}
