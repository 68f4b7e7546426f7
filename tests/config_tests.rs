//! Unit tests for configuration loading and validation

use marketplace_client::MarketplaceConfig;

/// What is tested: a minimal TOML parses with timing defaults applied
/// Why: only the ledger URL is mandatory; everything else has defaults
#[test]
fn test_minimal_config_defaults() {
    let config: MarketplaceConfig = toml::from_str(
        r#"
        [api]
        base_url = "http://127.0.0.1:8000"
        "#,
    )
    .unwrap();

    config.validate().unwrap();
    assert_eq!(config.api.timeout_ms, 30_000);
    assert_eq!(config.settle_delay_ms, 2_000);
    assert!(config.session.public_key.is_none());
}

/// What is tested: a full configuration round-trips its values
/// Why: every documented field must be honored, not silently dropped
#[test]
fn test_full_config() {
    let config: MarketplaceConfig = toml::from_str(
        r#"
        settle_delay_ms = 500

        [api]
        base_url = "https://ledger.example.com"
        timeout_ms = 10000

        [session]
        public_key = "02aa"
        "#,
    )
    .unwrap();

    config.validate().unwrap();
    assert_eq!(config.api.timeout_ms, 10_000);
    assert_eq!(config.settle_delay_ms, 500);
    assert_eq!(config.session.public_key.as_deref(), Some("02aa"));
    assert_eq!(config.settle_delay(), std::time::Duration::from_millis(500));
}

/// What is tested: validation rejects non-http(s) and unparseable URLs
/// Why: a bad gateway URL should fail at startup, not on the first request
#[test]
fn test_validate_rejects_bad_url() {
    let config: MarketplaceConfig = toml::from_str(
        r#"
        [api]
        base_url = "ftp://ledger.example.com"
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());

    let config: MarketplaceConfig = toml::from_str(
        r#"
        [api]
        base_url = "not a url"
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());
}

/// What is tested: validation rejects a zero request timeout
/// Why: a zero timeout would fail every request in a confusing way
#[test]
fn test_validate_rejects_zero_timeout() {
    let config: MarketplaceConfig = toml::from_str(
        r#"
        [api]
        base_url = "http://127.0.0.1:8000"
        timeout_ms = 0
        "#,
    )
    .unwrap();
    assert!(config.validate().is_err());
}

/// What is tested: a missing config file names the template to copy
/// Why: the error message is the setup documentation
#[test]
fn test_missing_file_mentions_template() {
    let err = MarketplaceConfig::load_from_path("/nonexistent/marketplace.toml").unwrap_err();
    assert!(err.to_string().contains("marketplace.template.toml"));
}

/// What is tested: loading from a file parses and validates
/// Why: the file path entry point is what the binary uses
#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("marketplace-config-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
        [api]
        base_url = "http://127.0.0.1:8000"
        "#,
    )
    .unwrap();

    let config = MarketplaceConfig::load_from_path(path.to_str().unwrap()).unwrap();
    assert_eq!(config.api.base_url, "http://127.0.0.1:8000");

    std::fs::remove_file(&path).unwrap();
}
