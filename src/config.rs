//! Configuration for slack-relay.
//!
//! Two layers live here. `SlackOptions` is the flat per-project option
//! record the host platform stores and validates; the relay only reads
//! it. `Config` wraps the options for the standalone binary host and is
//! loaded with `figment` from a TOML file merged with environment
//! variables.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised when the stored option record is internally
/// inconsistent. The relay performs no recovery; the host owns
/// reporting.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// `sort_on_tag` is enabled but a routing group has no value list.
    #[error("routing group {0} has no tag values configured")]
    MissingGroupValues(usize),
}

/// One configured routing group: a set of tag values mapped to an
/// override delivery channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingGroup {
    /// Raw comma-split tag values. Deliberately not trimmed or
    /// lowercased; routing compares display values byte-for-byte.
    pub tag_values: Vec<String>,
    /// The `#channel` or `@user` override for this group.
    pub channel: String,
}

/// The flat per-project option record for the Slack relay.
///
/// Field names match the option keys the host stores. Everything is
/// optional except the booleans, which default to off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SlackOptions {
    /// The Slack incoming webhook URL. Required for activation.
    #[serde(default)]
    pub webhook: Option<String>,
    /// Bot display name. Defaults to "Sentry".
    #[serde(default)]
    pub username: Option<String>,
    /// URL of the bot icon (32px png).
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Default `#channel` or `@user` destination.
    #[serde(default)]
    pub channel: Option<String>,
    /// Include tags with notifications.
    #[serde(default)]
    pub include_tags: bool,
    /// Only include these tags (comma separated). Empty includes all.
    #[serde(default)]
    pub included_tag_keys: Option<String>,
    /// Exclude these tags (comma separated).
    #[serde(default)]
    pub excluded_tag_keys: Option<String>,
    /// Include triggering rules with notifications.
    #[serde(default)]
    pub include_rules: bool,
    /// Sort events into different channels or users by tag value.
    #[serde(default)]
    pub sort_on_tag: bool,
    /// Always send the event to the main channel as well.
    #[serde(default)]
    pub send_to_root_too: bool,
    /// Key name of the tag to sort on. Defaults to "application_name".
    #[serde(default)]
    pub sort_on_tag_key: Option<String>,
    #[serde(default)]
    pub group_1_tag_values: Option<String>,
    #[serde(default)]
    pub group_1_channel: Option<String>,
    #[serde(default)]
    pub group_2_tag_values: Option<String>,
    #[serde(default)]
    pub group_2_channel: Option<String>,
    #[serde(default)]
    pub group_3_tag_values: Option<String>,
    #[serde(default)]
    pub group_3_channel: Option<String>,
}

impl SlackOptions {
    /// True iff a webhook URL is set. Gate for `notify`; unconfigured
    /// projects are silently skipped.
    pub fn is_configured(&self) -> bool {
        self.webhook
            .as_deref()
            .is_some_and(|w| !w.trim().is_empty())
    }

    /// The webhook URL trimmed of surrounding spaces. Legacy stored
    /// data sometimes carries padding.
    pub fn webhook(&self) -> Option<String> {
        self.webhook.as_deref().map(|w| w.trim().to_string())
    }

    /// The bot display name, trimmed, defaulting to "Sentry".
    pub fn username(&self) -> String {
        self.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or("Sentry")
            .trim()
            .to_string()
    }

    /// The bot icon URL; `None` when unset or empty.
    pub fn icon_url(&self) -> Option<String> {
        self.icon_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(str::to_string)
    }

    /// The default channel, trimmed; `None` when unset or blank.
    pub fn channel(&self) -> Option<String> {
        self.channel
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    /// The routing tag key, trimmed, defaulting to "application_name".
    pub fn sort_on_tag_key(&self) -> String {
        self.sort_on_tag_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .unwrap_or("application_name")
            .trim()
            .to_string()
    }

    /// Tag keys kept by the include filter; `None` disables it.
    pub fn included_tag_keys(&self) -> Option<HashSet<String>> {
        parse_tag_list(self.included_tag_keys.as_deref())
    }

    /// Tag keys dropped by the exclude filter; `None` disables it.
    pub fn excluded_tag_keys(&self) -> Option<HashSet<String>> {
        parse_tag_list(self.excluded_tag_keys.as_deref())
    }

    /// Assembles the three routing groups.
    ///
    /// # Errors
    /// `OptionsError::MissingGroupValues` when a group's value list is
    /// unset while routing is enabled, mirroring the stored-options
    /// contract: the host should never enable `sort_on_tag` without
    /// filling in all three groups.
    pub fn routing_groups(&self) -> Result<Vec<RoutingGroup>, OptionsError> {
        let raw = [
            (&self.group_1_tag_values, &self.group_1_channel),
            (&self.group_2_tag_values, &self.group_2_channel),
            (&self.group_3_tag_values, &self.group_3_channel),
        ];

        raw.into_iter()
            .enumerate()
            .map(|(i, (values, channel))| {
                let values = values
                    .as_deref()
                    .ok_or(OptionsError::MissingGroupValues(i + 1))?;
                Ok(RoutingGroup {
                    tag_values: values.split(',').map(str::to_string).collect(),
                    channel: channel.as_deref().unwrap_or("").trim().to_string(),
                })
            })
            .collect()
    }
}

/// Parses a comma-separated option into a set of lower-cased, trimmed
/// tag names. `None` when the option is unset or blank.
pub fn parse_tag_list(option: Option<&str>) -> Option<HashSet<String>> {
    let option = option?;
    if option.trim().is_empty() {
        return None;
    }
    Some(
        option
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .collect(),
    )
}

// =============================================================================
// Option schema
// =============================================================================

/// Describes one option for a host's configuration form.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct OptionField {
    pub name: &'static str,
    pub label: &'static str,
    pub help: &'static str,
    pub required: bool,
    pub default: Option<&'static str>,
}

/// The configuration surface presented to operators, as plain data.
/// Hosts render and validate it; the relay only documents it.
pub const OPTION_SCHEMA: &[OptionField] = &[
    OptionField {
        name: "webhook",
        label: "Webhook URL",
        help: "Your custom Slack webhook URL",
        required: true,
        default: None,
    },
    OptionField {
        name: "username",
        label: "Bot Name",
        help: "The name that will be displayed by your bot messages.",
        required: false,
        default: Some("Sentry"),
    },
    OptionField {
        name: "icon_url",
        label: "Icon URL",
        help: "The url of the icon to appear beside your bot (32px png), leave empty for none.",
        required: false,
        default: None,
    },
    OptionField {
        name: "channel",
        label: "Channel",
        help: "Optional #channel name or @user",
        required: false,
        default: None,
    },
    OptionField {
        name: "include_tags",
        label: "Include Tags",
        help: "Include tags with notifications",
        required: false,
        default: None,
    },
    OptionField {
        name: "included_tag_keys",
        label: "Included Tag Keys",
        help: "Only include these tags (comma separated list), leave empty to include all",
        required: false,
        default: None,
    },
    OptionField {
        name: "excluded_tag_keys",
        label: "Excluded Tag Keys",
        help: "Exclude these tags (comma separated list)",
        required: false,
        default: None,
    },
    OptionField {
        name: "include_rules",
        label: "Include Rules",
        help: "Include triggering rules with notifications",
        required: false,
        default: None,
    },
    OptionField {
        name: "sort_on_tag",
        label: "Sort On Tag",
        help: "Sort events into different channels or users",
        required: false,
        default: None,
    },
    OptionField {
        name: "send_to_root_too",
        label: "Send To Root Too",
        help: "Always send the event to the main channel as well",
        required: false,
        default: None,
    },
    OptionField {
        name: "sort_on_tag_key",
        label: "Sort On Tag Key",
        help: "Key name of the tag to sort on",
        required: false,
        default: Some("application_name"),
    },
    OptionField {
        name: "group_1_tag_values",
        label: "Group 1 Tag Values",
        help: "First group tag values (comma separated list)",
        required: false,
        default: None,
    },
    OptionField {
        name: "group_1_channel",
        label: "Group 1 Channel",
        help: "First group #channel name or @user",
        required: false,
        default: None,
    },
    OptionField {
        name: "group_2_tag_values",
        label: "Group 2 Tag Values",
        help: "Second group tag values (comma separated list)",
        required: false,
        default: None,
    },
    OptionField {
        name: "group_2_channel",
        label: "Group 2 Channel",
        help: "Second group #channel name or @user",
        required: false,
        default: None,
    },
    OptionField {
        name: "group_3_tag_values",
        label: "Group 3 Tag Values",
        help: "Third group tag values (comma separated list)",
        required: false,
        default: None,
    },
    OptionField {
        name: "group_3_channel",
        label: "Group 3 Channel",
        help: "Third group #channel name or @user",
        required: false,
        default: None,
    },
];

// =============================================================================
// Binary host configuration
// =============================================================================

/// Configuration for the standalone relay binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The logging filter for the application.
    pub log_level: String,
    /// Base URL of the monitoring platform, used to build rule links.
    pub base_url: String,
    /// The per-project Slack options.
    pub slack: SlackOptions,
}

impl Config {
    /// Loads the configuration by layering defaults, the TOML file and
    /// `SLACK_RELAY_`-prefixed environment variables.
    pub fn load(config_path: &str) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g. SLACK_RELAY_LOG_LEVEL=debug
            .merge(Env::prefixed("SLACK_RELAY_"))
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            base_url: "https://sentry.example.com".to_string(),
            slack: SlackOptions::default(),
        }
    }
}
