//! Unit tests for config module

use chatlens::analyzer::{BackendRole, ProviderKind};
use chatlens::config::{BackendConfig, Config};

use crate::helpers::temp_config;

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert_eq!(config.limits.truncate_chars, 100_000);
    assert_eq!(config.limits.split_threshold_chars, 200_000);
    assert_eq!(config.limits.split_half_chars, 100_000);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.backends.primary.provider, Some(ProviderKind::OpenAi));
    assert_eq!(config.backends.secondary.provider, Some(ProviderKind::Anthropic));
    assert!(config.image.enabled);
    assert_eq!(config.image.api_token_env, "REPLICATE_API_TOKEN");
}

#[test]
fn load_from_reads_partial_file() {
    let (_dir, path) = temp_config(
        r#"
[retry]
max_attempts = 2
base_delay_ms = 10

[backends.primary]
provider = "anthropic"
api_key_env = "MY_CLAUDE_KEY"

[image]
enabled = false
"#,
    );
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.retry.max_delay_ms, 30_000);
    assert!(!config.image.enabled);

    let primary = config.backends.primary.resolve(BackendRole::Primary);
    assert_eq!(primary.provider, ProviderKind::Anthropic);
    assert_eq!(primary.model, "claude-3-5-sonnet-20241022");
    assert_eq!(primary.api_key_env, "MY_CLAUDE_KEY");
    assert_eq!(primary.max_output_tokens, 5000);
}

#[test]
fn load_from_rejects_unknown_provider() {
    let (_dir, path) = temp_config("[backends.primary]\nprovider = \"gemini\"\n");
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn load_from_rejects_out_of_range_values() {
    let (_dir, path) = temp_config("[backends.secondary]\ntimeout_secs = 99999\n");
    let err = Config::load_from(&path).unwrap_err().to_string();
    assert!(err.contains("Invalid config"));
}

#[test]
fn save_to_then_load_from() {
    let (dir, _) = temp_config("");
    let path = dir.path().join("saved.toml");
    let mut config = Config::default();
    config.limits.truncate_chars = 42;
    config.backends.secondary = BackendConfig {
        model: Some("claude-3-haiku".to_string()),
        ..BackendConfig::default()
    };
    config.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn config_path_is_under_chatlens_dir() {
    if let Ok(path) = Config::config_path() {
        assert!(path.ends_with(".config/chatlens/config.toml"));
    }
}
