//! Formatting and delivery of notifications.
//!
//! The only implementation today is Slack; the host consumes it through
//! the `NotificationSender` trait in `core` and stays unaware of the
//! wire format.
pub mod slack;
