use crate::config::{
    AppEnvironment, CREDENTIALS_ENDPOINT, ConsolePaths, EnvName, EnvironmentsConfig, PathSource,
    SIMULATED_LATENCY,
};
use crate::error::ConfigError;

use std::path::Path;

/// **VALUE**: Verifies profile names resolve case-insensitively and anything
/// unknown falls back to development.
///
/// **BUG THIS CATCHES**: Would catch a typo in `APP_ENV` silently selecting
/// production.
#[test]
fn given_env_values_when_resolved_then_known_profiles_or_development() {
    assert_eq!(EnvName::resolve(None), EnvName::Development);
    assert_eq!(EnvName::resolve(Some("qa")), EnvName::Qa);
    assert_eq!(EnvName::resolve(Some(" Production ")), EnvName::Production);
    assert_eq!(EnvName::resolve(Some("prod")), EnvName::Development);
    assert_eq!(EnvName::resolve(Some("")), EnvName::Development);
}

#[test]
fn given_builtin_profiles_when_inspected_then_only_production_uses_real_endpoint() {
    let dev = AppEnvironment::development();
    let qa = AppEnvironment::qa();
    let prod = AppEnvironment::production();

    assert!(dev.mock_auth && qa.mock_auth && !prod.mock_auth);
    assert!(prod.production);
    assert_eq!(prod.app_name, "HotSOS Mobile");
    assert_eq!(AppEnvironment::builtin(EnvName::Qa), qa);
}

/// **VALUE**: Verifies the simulated latency is applied outside production only.
///
/// **WHY THIS MATTERS**: Production logins must not pay an artificial delay.
#[test]
fn given_profiles_when_simulated_latency_then_none_in_production() {
    assert_eq!(
        AppEnvironment::development().simulated_latency(),
        Some(SIMULATED_LATENCY)
    );
    assert_eq!(AppEnvironment::qa().simulated_latency(), Some(SIMULATED_LATENCY));
    assert_eq!(AppEnvironment::production().simulated_latency(), None);
}

/// **VALUE**: Verifies the credential endpoint is appended to the base URL,
/// with or without a trailing slash or a path prefix.
///
/// **BUG THIS CATCHES**: Would catch `Url::join` replacing the last path
/// segment of a base like `https://host/v2`.
#[test]
fn given_base_urls_when_credentials_url_then_api_auth_pin_appended() {
    let mut env = AppEnvironment::production();
    assert_eq!(
        env.credentials_url().unwrap().as_str(),
        "https://api.hotsos.example.com/api/auth/pin"
    );

    env.api_base_url = "https://gateway.example.com/v2".to_string();
    assert_eq!(
        env.credentials_url().unwrap().as_str(),
        "https://gateway.example.com/v2/api/auth/pin"
    );

    env.api_base_url = "https://gateway.example.com/v2/".to_string();
    assert_eq!(
        env.credentials_url().unwrap().as_str(),
        format!("https://gateway.example.com/v2/{CREDENTIALS_ENDPOINT}")
    );
}

#[test]
fn given_invalid_profiles_when_validated_then_validation_error() {
    let mut env = AppEnvironment::development();
    env.app_name = "  ".to_string();
    assert!(matches!(
        env.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    let mut env = AppEnvironment::development();
    env.api_base_url = "ftp://files.example.com".to_string();
    let err = env.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid URL format"));
}

/// **VALUE**: Verifies a missing overrides file means built-in profiles.
#[test]
fn given_missing_environments_file_when_loaded_then_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = EnvironmentsConfig::load(dir.path()).unwrap();

    assert!(config.overrides.is_empty());
    assert_eq!(
        config.resolve(EnvName::Production).unwrap(),
        AppEnvironment::production()
    );
}

/// **VALUE**: Verifies overrides replace only the fields they set, for the
/// profile they name.
///
/// **WHY THIS MATTERS**: Installations point QA at their own gateway without
/// restating every field.
#[test]
fn given_partial_override_when_resolved_then_merged_into_builtin() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("environments.toml"),
        r#"
[qa]
api_base_url = "https://qa.internal.example.com"
mock_auth = false
"#,
    )
    .unwrap();

    let config = EnvironmentsConfig::load(dir.path()).unwrap();
    let qa = config.resolve(EnvName::Qa).unwrap();
    let dev = config.resolve(EnvName::Development).unwrap();

    assert_eq!(qa.api_base_url, "https://qa.internal.example.com");
    assert!(!qa.mock_auth);
    assert_eq!(qa.app_name, "HotSOS Mobile (QA)");
    assert_eq!(dev, AppEnvironment::development());
}

#[test]
fn given_malformed_environments_file_when_loaded_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("environments.toml"), "[qa\nmock_auth = ").unwrap();

    let result = EnvironmentsConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_override_with_bad_url_when_resolved_then_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("environments.toml"),
        "[production]\napi_base_url = \"api.example.com\"\n",
    )
    .unwrap();

    let config = EnvironmentsConfig::load(dir.path()).unwrap();

    assert!(config.resolve(EnvName::Production).is_err());
}

#[test]
fn given_root_when_paths_from_root_then_laid_out_under_it() {
    let paths = ConsolePaths::from_root(Path::new("/srv/console"));

    assert_eq!(paths.source, PathSource::Explicit);
    assert_eq!(
        paths.preferences_file(),
        Path::new("/srv/console/data/preferences.json")
    );
    assert_eq!(
        paths.mock_credentials_file(),
        Path::new("/srv/console/assets/mock/auth.json")
    );
    assert_eq!(paths.log_dir, Path::new("/srv/console/logs"));
}
