//! Environment overrides and project id lookup

use pretty_assertions::assert_eq;
use serde_json::json;
use settings_core::{ConfigResolver, ErrorCode, ResolutionOptions, ResolverSettings};
use settings_test_utils::TestProject;

mod environment_overrides {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let project = TestProject::new();

        let env = ConfigResolver::new()
            .read_environment_overrides(&project.normalized_root())
            .await
            .unwrap();

        assert!(env.is_empty());
        project.assert_file_not_exists("cypress.env.json");
    }

    #[tokio::test]
    async fn malformed_file_is_error_reading_file() {
        let project = TestProject::new();
        project.write_text("cypress.env.json", "{ broken");

        let err = ConfigResolver::new()
            .read_environment_overrides(&project.normalized_root())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ErrorReadingFile);
    }

    #[tokio::test]
    async fn file_name_comes_from_settings() {
        let project = TestProject::new();
        project.write_json("env/local.json", &json!({"token": "t"}));

        let resolver = ConfigResolver::with_settings(
            ResolverSettings::default().with_env_file("env/local.json"),
        );
        let env = resolver
            .read_environment_overrides(&project.normalized_root())
            .await
            .unwrap();

        assert_eq!(env.get("token"), Some(&json!("t")));
    }
}

mod project_id {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn string_id_is_returned() {
        let project = TestProject::new();
        project.write_json("cypress.json", &json!({"projectId": "xyz"}));

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &ResolutionOptions::new())
            .await;

        assert_eq!(id.as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn numeric_id_is_rendered() {
        let project = TestProject::new();
        project.write_json("cypress.json", &json!({"projectId": 42}));

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &ResolutionOptions::new())
            .await;

        assert_eq!(id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn absent_id_is_none() {
        let project = TestProject::new();
        project.write_json("cypress.json", &json!({"baseUrl": "http://x"}));

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &ResolutionOptions::new())
            .await;

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn missing_file_in_non_interactive_run_is_none() {
        let project = TestProject::new();
        let options = ResolutionOptions::new().with_run_project(project.root());

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &options)
            .await;

        assert_eq!(id, None);
        project.assert_file_not_exists("cypress.json");
    }

    #[tokio::test]
    async fn malformed_file_is_none() {
        let project = TestProject::new();
        project.write_text("cypress.json", "not json at all");

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &ResolutionOptions::new())
            .await;

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn loader_failure_is_none() {
        let project = TestProject::new();
        project.write_text("cypress.config.toml", "= nope");
        let options = ResolutionOptions::new().with_config_file("cypress.config.toml");

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &options)
            .await;

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn disabled_file_is_none() {
        let project = TestProject::new();
        let options = ResolutionOptions::new().without_config_file();

        let id = ConfigResolver::new()
            .resolve_project_id(&project.normalized_root(), &options)
            .await;

        assert_eq!(id, None);
    }
}
