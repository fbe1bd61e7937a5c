//! Configuration loading tests for the binary host.

use slack_relay::config::Config;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A helper function to run a test with a temporary config file.
fn with_config_file<F>(toml_content: &str, test_fn: F)
where
    F: FnOnce(PathBuf),
{
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let path = file.path().to_path_buf();
    test_fn(path);
}

#[test]
fn test_load_full_valid_config() {
    let toml_content = r##"
        log_level = "debug"
        base_url = "https://sentry.internal.example.com"

        [slack]
        webhook = "https://hooks.slack.com/services/T/B/X"
        username = "relay-bot"
        channel = "#alerts"
        include_tags = true
        included_tag_keys = "environment, release"
        include_rules = true
        sort_on_tag = true
        send_to_root_too = true
        sort_on_tag_key = "service"
        group_1_tag_values = "auth,identity"
        group_1_channel = "#auth"
        group_2_tag_values = "billing"
        group_2_channel = "#billing"
        group_3_tag_values = "search"
        group_3_channel = "#search"
    "##;

    with_config_file(toml_content, |path| {
        let config = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.base_url, "https://sentry.internal.example.com");
        assert!(config.slack.is_configured());
        assert_eq!(config.slack.username(), "relay-bot");
        assert_eq!(config.slack.channel().as_deref(), Some("#alerts"));
        assert!(config.slack.include_tags);
        assert!(config.slack.sort_on_tag);
        assert_eq!(config.slack.sort_on_tag_key(), "service");

        let groups = config.slack.routing_groups().unwrap();
        assert_eq!(groups[1].channel, "#billing");
    });
}

#[test]
fn test_load_minimal_config_uses_defaults() {
    let toml_content = r##"
        [slack]
        webhook = "https://hooks.slack.com/services/T/B/X"
    "##;

    with_config_file(toml_content, |path| {
        let config = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(config.log_level, "info");
        assert!(config.slack.is_configured());
        assert_eq!(config.slack.username(), "Sentry");
        assert_eq!(config.slack.sort_on_tag_key(), "application_name");
        assert!(!config.slack.sort_on_tag);
        assert_eq!(config.slack.channel(), None);
    });
}

#[test]
fn test_missing_file_yields_defaults_and_unconfigured_relay() {
    let config = Config::load("/nonexistent/slack-relay.toml").unwrap();
    assert!(!config.slack.is_configured());
}
