//! The Slack notifier: payload assembly and channel routing.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::config::SlackOptions;
use crate::core::{Notification, NotificationSender, TagLookup, UrlResolver};
use crate::payload::{Attachment, AttachmentField, Payload};
use crate::tags::{display_tags, tag_passes_filters, DisplayTag};
use crate::transport::WebhookTransport;

pub const TITLE: &str = "Slack";
pub const SLUG: &str = "slack";
pub const DESCRIPTION: &str = "Post notifications to a Slack channel.";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Relays notifications to a Slack incoming webhook, optionally fanning
/// out to per-tag override channels.
pub struct SlackNotifier {
    options: SlackOptions,
    tags: Arc<dyn TagLookup>,
    urls: Arc<dyn UrlResolver>,
    transport: Arc<dyn WebhookTransport>,
}

impl SlackNotifier {
    pub fn new(
        options: SlackOptions,
        tags: Arc<dyn TagLookup>,
        urls: Arc<dyn UrlResolver>,
        transport: Arc<dyn WebhookTransport>,
    ) -> Self {
        Self {
            options,
            tags,
            urls,
            transport,
        }
    }

    /// Builds the attachment field list in its fixed order: culprit,
    /// project, triggered-by rules, then tags.
    fn build_fields(
        &self,
        notification: &Notification,
        extracted: &[DisplayTag],
    ) -> Vec<AttachmentField> {
        let event = &notification.event;
        let group = &event.group;
        let project = &group.project;

        let mut fields = Vec::new();

        // Culprit and title can be identical when the platform had no
        // better blame location; skip the field instead of repeating
        // the text.
        if let Some(culprit) = group.culprit.as_deref().filter(|c| !c.is_empty()) {
            if culprit != event.title {
                fields.push(AttachmentField::long("Culprit", culprit));
            }
        }

        fields.push(AttachmentField::short("Project", project.full_name()));

        if self.options.include_rules && !notification.rules.is_empty() {
            let links = notification
                .rules
                .iter()
                .map(|rule| {
                    let url = self.urls.rule_edit_url(project, rule);
                    format!("<{} | {}>", url, rule.label)
                })
                .join(", ");
            fields.push(AttachmentField::long("Triggered By", links));
        }

        if self.options.include_tags {
            let included = self.options.included_tag_keys();
            let excluded = self.options.excluded_tag_keys();
            for tag in extracted {
                if !tag_passes_filters(tag, self.tags.as_ref(), included.as_ref(), excluded.as_ref())
                {
                    continue;
                }
                fields.push(AttachmentField::short(tag.key.clone(), tag.value.clone()));
            }
        }

        fields
    }

    fn build_payload(&self, notification: &Notification, extracted: &[DisplayTag]) -> Payload {
        let event = &notification.event;
        let group = &event.group;

        let mut payload = Payload::new(Attachment {
            fallback: format!("[{}] {}", group.project.full_name(), event.title),
            title: event.title.clone(),
            title_link: group.url.clone(),
            color: group.color().to_string(),
            fields: self.build_fields(notification, extracted),
        });

        let username = self.options.username();
        if !username.is_empty() {
            payload.username = Some(username);
        }
        payload.channel = self.options.channel();
        payload.icon_url = self.options.icon_url();

        payload
    }

    /// Issues the routed sends for a payload whose routing tag was
    /// found. A value present in several groups' lists sends once per
    /// group, each with that group's channel.
    async fn send_routed(
        &self,
        webhook: &str,
        payload: &Payload,
        tag_value: &str,
    ) -> Result<()> {
        let groups = self.options.routing_groups()?;
        for group in &groups {
            if group.tag_values.iter().any(|v| v == tag_value) {
                debug!(channel = %group.channel, "Routing notification to group channel");
                self.transport
                    .post(webhook, &payload.with_channel(&group.channel))
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for SlackNotifier {
    fn name(&self) -> &str {
        SLUG
    }

    #[instrument(skip(self, notification), fields(title = %notification.event.title))]
    async fn notify(&self, notification: &Notification) -> Result<()> {
        if !self.options.is_configured() {
            debug!("No webhook configured, skipping notification.");
            return Ok(());
        }
        // is_configured() guarantees the webhook is present.
        let webhook = self.options.webhook().unwrap_or_default();

        let extracted = display_tags(&notification.event, self.tags.as_ref());
        let payload = self.build_payload(notification, &extracted);

        if !self.options.sort_on_tag {
            self.transport.post(&webhook, &payload).await?;
            info!("Notification sent to default channel.");
            return Ok(());
        }

        if self.options.send_to_root_too {
            self.transport.post(&webhook, &payload).await?;
        }

        let sort_key = self.options.sort_on_tag_key();
        let Some(tag_value) = extracted
            .iter()
            .find(|tag| tag.key == sort_key)
            .map(|tag| tag.value.clone())
        else {
            // The routing tag is absent from this event, so no routed
            // sends happen. Without send_to_root_too the notification
            // is dropped entirely; this mirrors long-standing behavior
            // relied on as a filter, see DESIGN.md.
            debug!(key = %sort_key, "Routing tag not present on event, no routed sends.");
            return Ok(());
        };

        self.send_routed(&webhook, &payload, &tag_value).await
    }
}
