use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::MailSettings;

/// Errors that can occur when talking to the mail relay
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Relay returned error: {0}")]
    RelayError(String),
}

/// HTTP mail-relay client.
///
/// Posts messages to the relay's /messages endpoint. Constructed only
/// when the relay is fully configured; the report dispatcher treats an
/// absent mailer as "log instead of send".
pub struct Mailer {
    relay_url: String,
    api_key: String,
    from: String,
    client: Client,
}

impl Mailer {
    pub fn new(relay_url: String, api_key: String, from: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            relay_url,
            api_key,
            from,
            client,
        }
    }

    /// Build a mailer from settings, or None when the relay is not
    /// configured.
    pub fn from_settings(settings: &MailSettings) -> Option<Self> {
        match (&settings.relay_url, &settings.api_key, &settings.from) {
            (Some(relay_url), Some(api_key), Some(from)) => Some(Self::new(
                relay_url.clone(),
                api_key.clone(),
                from.clone(),
            )),
            _ => None,
        }
    }

    /// Send one message with both text and HTML bodies.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), MailError> {
        let url = format!("{}/messages", self.relay_url.trim_end_matches('/'));

        let payload = serde_json::json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "text": text,
            "html": html,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(MailError::RelayError(format!(
                "send failed with {status}: {body}"
            )));
        }

        tracing::debug!("Mail relayed to {}: {}", to, subject);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_posts_to_the_relay() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"id":"msg-1"}"#)
            .create_async()
            .await;

        let mailer = Mailer::new(server.url(), "test-key".to_string(), "noreply@herzmatch.de".to_string());

        let result = mailer
            .send("admin@herzmatch.de", "Subject", "text body", "<p>html body</p>")
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn relay_failure_surfaces_as_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/messages")
            .with_status(502)
            .with_body(r#"{"error":"upstream down"}"#)
            .create_async()
            .await;

        let mailer = Mailer::new(server.url(), "test-key".to_string(), "noreply@herzmatch.de".to_string());

        let result = mailer.send("admin@herzmatch.de", "Subject", "t", "h").await;

        assert!(matches!(result, Err(MailError::RelayError(_))));
    }

    #[test]
    fn unconfigured_relay_yields_no_mailer() {
        let settings = MailSettings {
            relay_url: Some("https://relay.test".to_string()),
            api_key: None,
            from: None,
            admin_email: None,
        };

        assert!(Mailer::from_settings(&settings).is_none());
    }
}
