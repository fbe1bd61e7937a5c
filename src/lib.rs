//! slack-relay - forwards error-tracking notifications to Slack.
//!
//! This library turns a monitoring-platform notification (event, issue
//! group, triggering rules) into a Slack legacy-webhook payload and
//! delivers it to the default channel and/or tag-routed override
//! channels.
pub mod notification;

pub mod cli;
pub mod config;
pub mod core;
pub mod payload;
pub mod tags;
pub mod transport;

// Re-export core types for convenience
pub use core::*;
