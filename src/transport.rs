//! HTTP delivery of webhook payloads.
//!
//! The notifier never inspects delivery outcomes; it hands each payload
//! to a [`WebhookTransport`] and propagates whatever the transport
//! returns. The real transport posts the payload JSON as a form field
//! named `payload`, which is what Slack's legacy incoming webhooks
//! expect.

use async_trait::async_trait;
use tracing::{error, info};

use crate::payload::Payload;

/// A transport that can deliver one payload to a webhook URL.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Delivers the payload. One call, no retries.
    async fn post(&self, webhook_url: &str, payload: &Payload) -> anyhow::Result<()>;
}

/// The reqwest-backed transport used in production.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a 10 second request timeout.
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Creates a transport around an existing client, e.g. one with a
    /// custom timeout in tests.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post(&self, webhook_url: &str, payload: &Payload) -> anyhow::Result<()> {
        let body = serde_json::to_string(payload)?;
        let response = self
            .client
            .post(webhook_url)
            .form(&[("payload", body)])
            .send()
            .await;

        match response {
            Ok(res) => {
                if res.status().is_success() {
                    info!("Delivered payload to webhook.");
                    Ok(())
                } else {
                    let status = res.status();
                    let text = res.text().await.unwrap_or_default();
                    error!(
                        status = %status,
                        body = %text,
                        "Webhook rejected payload"
                    );
                    anyhow::bail!("webhook rejected payload: status {}, body: {}", status, text)
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to webhook failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod transport_tests {
    use super::*;
    use crate::payload::{Attachment, Payload};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_payload() -> Payload {
        Payload::new(Attachment {
            fallback: "[Backend API] boom".to_string(),
            title: "boom".to_string(),
            title_link: "https://sentry.example.com/acme/api/issues/1/".to_string(),
            color: "#f43f20".to_string(),
            fields: vec![],
        })
    }

    #[tokio::test]
    async fn test_posts_form_encoded_payload_field() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(header(
                "content-type",
                "application/x-www-form-urlencoded",
            ))
            .and(body_string_contains("payload="))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();

        // Act
        let result = transport
            .post(&format!("{}/webhook", server.uri()), &test_payload())
            .await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_surfaces_as_err() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();

        // Act
        let result = transport
            .post(&format!("{}/webhook", server.uri()), &test_payload())
            .await;

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_timeout_surfaces_as_err() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let transport = HttpTransport::with_client(client);

        // Act
        let result = transport
            .post(&format!("{}/webhook", server.uri()), &test_payload())
            .await;

        // Assert
        let err = result.unwrap_err();
        let is_timeout = err.chain().any(|cause| {
            cause
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_timeout())
        });
        assert!(is_timeout, "expected a timeout error, got: {}", err);
    }
}
