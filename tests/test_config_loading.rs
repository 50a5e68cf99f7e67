//! Configuration loading and validation tests
//!
//! Tests focus on behaviour of loading from disk, validation and error
//! handling, not on TOML parsing details.

use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};
use urban_assistant::config::{AssistantConfig, ConfigError};
use urban_assistant::routing::{IntentRouter, Role, RoutingContext};

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 8081
max_body_bytes = 4096

[defaults]
role = "developer"
scope = "city42"

[intents]
food_keywords = ["restaurant", "food", "brunch"]

[[destinations]]
keyword = "dashboard"
path = "dashboard"

[[destinations]]
keyword = "networks"
path = "/networks"
"#,
    );

    let config = AssistantConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.server.max_body_bytes, 4096);
    assert_eq!(config.defaults.role, Role::Developer);
    assert_eq!(config.defaults.scope, "city42");
    assert_eq!(config.intents.food_keywords, vec!["restaurant", "food", "brunch"]);
    assert_eq!(config.destinations.len(), 2);
}

#[test]
fn test_empty_file_yields_defaults() {
    let temp_file = write_config("");
    let config = AssistantConfig::load_from_file(temp_file.path()).unwrap();
    assert_eq!(config, AssistantConfig::default());
}

#[test]
fn test_configured_keywords_drive_routing() {
    let temp_file = write_config(
        r#"
[intents]
food_keywords = ["brunch"]
"#,
    );
    let config = AssistantConfig::load_from_file(temp_file.path()).unwrap();
    let router = IntentRouter::from_config(&config);
    let ctx = RoutingContext::new(Role::User, "c");

    assert_eq!(router.route(Some("Sunday brunch"), &ctx).target(), Some("/urban/c/food"));
    assert!(router.route(Some("restaurants"), &ctx).is_info());
}

#[test]
fn test_missing_file_is_file_read_error() {
    let result = AssistantConfig::load_from_file(Path::new("/definitely/not/here.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let temp_file = write_config("[server\nport = ");
    let result = AssistantConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_wrong_type_is_parse_error() {
    let temp_file = write_config("[server]\nport = \"eighty\"\n");
    let result = AssistantConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_invalid_default_scope_rejected() {
    for scope in ["", "city 42", "city/42"] {
        let content = format!("[defaults]\nscope = \"{scope}\"\n");
        let temp_file = write_config(&content);
        let result = AssistantConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::InvalidScope(_))), "{scope:?}");
    }
}

#[test]
fn test_empty_keyword_list_rejected() {
    let temp_file = write_config("[intents]\ntraffic_keywords = []\n");
    let result = AssistantConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_duplicate_destination_rejected() {
    let temp_file = write_config(
        r#"
[[destinations]]
keyword = "health"
path = "health"

[[destinations]]
keyword = "Health"
path = "/clinic"
"#,
    );
    let result = AssistantConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_invalid_host_rejected() {
    let temp_file = write_config("[server]\nhost = \"not an ip\"\n");
    let result = AssistantConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_discover_prefers_explicit_path() {
    let temp_file = write_config("[server]\nport = 9999\n");
    let (config, source) = AssistantConfig::discover(Some(temp_file.path())).unwrap();

    assert_eq!(config.server.port, 9999);
    assert_eq!(source.as_deref(), Some(temp_file.path()));
}

#[test]
fn test_discover_explicit_missing_file_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("assistant.toml");
    assert!(AssistantConfig::discover(Some(&missing)).is_err());
}

#[test]
fn test_shipped_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/assistant.toml");
    let config = AssistantConfig::load_from_file(&path).unwrap();
    assert_eq!(config.destinations.len(), 10);
}
