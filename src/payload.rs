//! Slack legacy incoming-webhook wire structures.
//!
//! The webhook expects a form field named `payload` carrying a JSON
//! document with top-level `parse`, optional `username` / `channel` /
//! `icon_url`, and a single attachment with `fallback`, `title`,
//! `title_link`, `color` and an ordered list of fields.

use serde::Serialize;

use crate::core::Group;

/// Maps a severity level string to its `#RRGGBB` attachment color.
/// Unknown levels fall back to the `error` color.
pub fn color_for_level(level: &str) -> &'static str {
    match level {
        "debug" => "#cfd3da",
        "info" => "#2788ce",
        "warning" => "#f18500",
        "error" => "#f43f20",
        "fatal" => "#d20f2a",
        _ => "#f43f20",
    }
}

impl Group {
    /// Attachment color for this issue's severity level.
    pub fn color(&self) -> &'static str {
        color_for_level(&self.level)
    }
}

/// One `{title, value, short}` record inside an attachment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    pub fn long(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }

    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// The single attachment carried by every relayed message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attachment {
    pub fallback: String,
    pub title: String,
    pub title_link: String,
    pub color: String,
    pub fields: Vec<AttachmentField>,
}

/// The full webhook payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Payload {
    pub parse: String,
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Payload {
    /// Builds a payload around a single attachment with `parse: "none"`.
    pub fn new(attachment: Attachment) -> Self {
        Self {
            parse: "none".to_string(),
            attachments: vec![attachment],
            username: None,
            channel: None,
            icon_url: None,
        }
    }

    /// The payload re-targeted at a different channel, other content
    /// unchanged. Used for routed sends.
    pub fn with_channel(&self, channel: &str) -> Self {
        let mut routed = self.clone();
        routed.channel = Some(channel.to_string());
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_table() {
        assert_eq!(color_for_level("debug"), "#cfd3da");
        assert_eq!(color_for_level("info"), "#2788ce");
        assert_eq!(color_for_level("warning"), "#f18500");
        assert_eq!(color_for_level("error"), "#f43f20");
        assert_eq!(color_for_level("fatal"), "#d20f2a");
    }

    #[test]
    fn test_unknown_level_falls_back_to_error_color() {
        assert_eq!(color_for_level("critical"), "#f43f20");
        assert_eq!(color_for_level(""), "#f43f20");
    }

    #[test]
    fn test_payload_serialization_omits_unset_options() {
        let payload = Payload::new(Attachment {
            fallback: "[Backend API] boom".to_string(),
            title: "boom".to_string(),
            title_link: "https://sentry.example.com/acme/api/issues/1/".to_string(),
            color: "#f43f20".to_string(),
            fields: vec![AttachmentField::short("Project", "Backend API")],
        });

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "parse": "none",
                "attachments": [{
                    "fallback": "[Backend API] boom",
                    "title": "boom",
                    "title_link": "https://sentry.example.com/acme/api/issues/1/",
                    "color": "#f43f20",
                    "fields": [
                        {"title": "Project", "value": "Backend API", "short": true}
                    ],
                }],
            })
        );
    }

    #[test]
    fn test_payload_serialization_includes_set_options() {
        let mut payload = Payload::new(Attachment {
            fallback: "f".to_string(),
            title: "t".to_string(),
            title_link: "l".to_string(),
            color: "#2788ce".to_string(),
            fields: vec![],
        });
        payload.username = Some("Sentry".to_string());
        payload.channel = Some("#alerts".to_string());
        payload.icon_url = Some("https://example.com/logo32.png".to_string());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["username"], "Sentry");
        assert_eq!(value["channel"], "#alerts");
        assert_eq!(value["icon_url"], "https://example.com/logo32.png");
    }

    #[test]
    fn test_with_channel_only_changes_channel() {
        let payload = Payload::new(Attachment {
            fallback: "f".to_string(),
            title: "t".to_string(),
            title_link: "l".to_string(),
            color: "#d20f2a".to_string(),
            fields: vec![],
        });
        let routed = payload.with_channel("#ops");
        assert_eq!(routed.channel.as_deref(), Some("#ops"));
        assert_eq!(routed.attachments, payload.attachments);
    }
}
