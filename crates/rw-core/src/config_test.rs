use super::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: test_project").unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.migrations_path, "migrations");
    assert_eq!(config.seeders_path, "seeders");
    assert!(config.database.is_memory());
    assert!(config.environments.is_empty());

    let root = PathBuf::from("/tmp/app");
    assert_eq!(
        config.scripts_path(ScriptKind::Migration, &root),
        root.join("migrations")
    );
    assert_eq!(config.scripts_path(ScriptKind::Seed, &root), root.join("seeders"));
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: my_app
migrations_path: db/migrate
seeders_path: db/seed
database:
  path: dev.duckdb
environments:
  test:
    database:
      path: ":memory:"
  staging: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.migrations_path, "db/migrate");
    assert_eq!(config.available_environments(), vec!["staging", "test"]);

    let base = config.database_for(None).unwrap();
    assert_eq!(base.path, "dev.duckdb");

    let test = config.database_for(Some("test")).unwrap();
    assert!(test.is_memory());

    // Environment without its own database falls back to the base one
    let staging = config.database_for(Some("staging")).unwrap();
    assert_eq!(staging, base);
}

#[test]
fn test_unknown_environment_is_error() {
    let config: Config = serde_yaml::from_str("name: app").unwrap();
    let err = config.database_for(Some("production")).unwrap_err();
    match err {
        CoreError::EnvironmentNotFound { name, available } => {
            assert_eq!(name, "production");
            assert_eq!(available, "(none)");
        }
        other => panic!("expected EnvironmentNotFound, got {other:?}"),
    }
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: app\nmodels: []");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir_missing() {
    let temp = tempdir().unwrap();
    let err = Config::load_from_dir(temp.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("rewind.yaml"), "name: alt").unwrap();
    let config = Config::load_from_dir(temp.path()).unwrap();
    assert_eq!(config.name, "alt");
}

#[test]
fn test_load_rejects_empty_name() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("rewind.yml");
    fs::write(&path, "name: \"  \"").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_rejects_shared_script_dirs() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("rewind.yml");
    fs::write(&path, "name: app\nmigrations_path: db\nseeders_path: db").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_load_reports_parse_errors_with_path() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("rewind.yml");
    fs::write(&path, "name: [unterminated").unwrap();
    let err = Config::load(&path).unwrap_err();
    match err {
        CoreError::ConfigParseError { path: p, .. } => assert!(p.ends_with("rewind.yml")),
        other => panic!("expected ConfigParseError, got {other:?}"),
    }
}

#[test]
fn test_resolved_path() {
    let root = Path::new("/srv/app");
    let relative = DatabaseConfig {
        path: "data/dev.duckdb".to_string(),
    };
    assert_eq!(
        relative.resolved_path(root),
        root.join("data/dev.duckdb").display().to_string()
    );
    assert_eq!(DatabaseConfig::default().resolved_path(root), ":memory:");
}

#[test]
#[serial]
fn test_resolve_environment_precedence() {
    std::env::set_var(ENV_VAR, "staging");
    assert_eq!(
        Config::resolve_environment(Some("test")),
        Some("test".to_string())
    );
    assert_eq!(
        Config::resolve_environment(None),
        Some("staging".to_string())
    );

    std::env::remove_var(ENV_VAR);
    assert_eq!(Config::resolve_environment(None), None);
}
