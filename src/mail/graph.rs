use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{MailRelay, OutgoingEmail, RelayError};
use crate::config::MailConfig;

/// Relays mail through the Graph `sendMail` API, authenticating with an
/// OAuth2 client-credentials grant on every call.
pub struct GraphMailer {
    client: reqwest::Client,
    config: MailConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GraphMailer {
    pub fn new(config: MailConfig, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_url, self.config.tenant_id
        )
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1.0/users/{}/sendMail",
            self.config.api_url, self.config.sender
        )
    }

    async fn fetch_token(&self) -> Result<String, RelayError> {
        let scope = format!("{}/.default", self.config.api_url);
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .client
            .post(self.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| RelayError::Token(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncated_body(resp).await;
            return Err(RelayError::Token(format!("status {status}: {body}")));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| RelayError::Token(format!("invalid token response: {e}")))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl MailRelay for GraphMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), RelayError> {
        let token = self.fetch_token().await?;

        let payload = json!({
            "message": {
                "subject": email.subject,
                "body": {
                    "contentType": "HTML",
                    "content": email.html_body,
                },
                "toRecipients": [
                    { "emailAddress": { "address": self.config.recipient } }
                ],
                "replyTo": [
                    {
                        "emailAddress": {
                            "name": email.reply_to_name,
                            "address": email.reply_to_address,
                        }
                    }
                ],
            },
            "saveToSentItems": false,
        });

        let resp = self
            .client
            .post(self.send_url())
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Send(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncated_body(resp).await;
            return Err(RelayError::Send(format!("status {status}: {body}")));
        }

        Ok(())
    }
}

async fn truncated_body(resp: reqwest::Response) -> String {
    resp.text()
        .await
        .unwrap_or_default()
        .chars()
        .take(512)
        .collect()
}
