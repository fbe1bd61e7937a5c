//! Core domain types and service traits for slack-relay.
//!
//! This module defines the data structures a host platform hands to the
//! relay and the trait contracts through which the relay talks back to
//! the host (tag label lookup, URL reversal) and outward (notification
//! sending).

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The team owning a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Team {
    /// Human-readable team name, e.g. "Backend".
    pub name: String,
}

/// A project within the monitoring platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Project {
    /// Human-readable project name, e.g. "API Server".
    pub name: String,
    /// URL slug for the project.
    pub slug: String,
    /// URL slug of the owning organization, used for link reversal.
    pub organization_slug: String,
    /// The team that owns this project.
    pub team: Team,
}

impl Project {
    /// Returns `"{team name} {project name}"` unless the team name
    /// already appears inside the project name, in which case the
    /// project name alone.
    pub fn full_name(&self) -> String {
        if !self.name.contains(&self.team.name) {
            format!("{} {}", self.team.name, self.name)
        } else {
            self.name.clone()
        }
    }
}

/// The aggregation of semantically-similar events (a unique issue).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Group {
    /// Severity level as a display string ("debug" .. "fatal").
    /// Unknown strings are tolerated and map to the error color.
    pub level: String,
    /// The code location blamed for the issue, if known.
    #[serde(default)]
    pub culprit: Option<String>,
    /// Absolute URL of the issue page, used as the message title link.
    pub url: String,
    /// The project this issue belongs to.
    pub project: Project,
}

/// A single captured occurrence of an error/exception.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Event {
    /// Short one-line message describing the event.
    pub title: String,
    /// Raw (key, value) tag pairs attached to this occurrence.
    #[serde(default)]
    pub tags: Vec<(String, String)>,
    /// The issue this event was aggregated into.
    pub group: Group,
}

/// An alerting rule that triggered a notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Rule {
    pub id: u64,
    /// Human-readable rule label, e.g. "Send a notification for new issues".
    pub label: String,
}

/// An event paired with the alerting rules that fired for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Notification {
    pub event: Event,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Sends one notification to its configured destination(s).
///
/// This is the capability a host process consumes; implementations own
/// formatting and delivery but not retry policy.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// A unique, descriptive name for the sender (e.g., "slack").
    /// Used for logging.
    fn name(&self) -> &str;

    /// Formats and delivers the notification.
    ///
    /// # Returns
    /// * `Ok(())` when every required POST was handed to the transport,
    ///   or when the sender is not configured (silent no-op)
    /// * `Err` for malformed options or transport failures
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Resolves raw tag keys/values to human-readable labels.
///
/// Owned by the host platform; the relay falls back to the raw strings
/// whenever a label is unavailable.
pub trait TagLookup: Send + Sync {
    /// Returns the display label for a tag key, if one is registered.
    fn key_label(&self, project: &Project, key: &str) -> Option<String>;

    /// Returns the display label for a tag value, if one is registered.
    fn value_label(&self, project: &Project, key: &str, value: &str) -> Option<String>;

    /// Normalizes a tag key for include/exclude matching
    /// (e.g. "sentry:release" -> "release").
    fn standardize_key(&self, key: &str) -> String;
}

/// A lookup that never has labels. Suitable for hosts without a tag
/// registry; namespaced keys are still standardized.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTagLookup;

impl TagLookup for NoopTagLookup {
    fn key_label(&self, _project: &Project, _key: &str) -> Option<String> {
        None
    }

    fn value_label(&self, _project: &Project, _key: &str, _value: &str) -> Option<String> {
        None
    }

    fn standardize_key(&self, key: &str) -> String {
        match key.split_once(':') {
            Some((_, rest)) => rest.to_string(),
            None => key.to_string(),
        }
    }
}

/// Reverses named host routes into absolute URIs suitable for embedding
/// in outbound messages.
pub trait UrlResolver: Send + Sync {
    /// Absolute URL of the edit page for an alerting rule.
    fn rule_edit_url(&self, project: &Project, rule: &Rule) -> String;
}

/// Resolves rule-edit URLs against a fixed base URL.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: String,
}

impl BaseUrlResolver {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }
}

impl UrlResolver for BaseUrlResolver {
    fn rule_edit_url(&self, project: &Project, rule: &Rule) -> String {
        format!(
            "{}/{}/{}/settings/alerts/rules/{}/",
            self.base, project.organization_slug, project.slug, rule.id
        )
    }
}
