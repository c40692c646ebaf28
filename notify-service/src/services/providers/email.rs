use super::{EmailMessage, EmailProvider, ProviderError, ProviderResponse};
use crate::config::ResendConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorResponse {
    message: String,
}

impl ResendProvider {
    pub fn new(config: ResendConfig) -> Result<Self, ProviderError> {
        if config.enabled && config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::Configuration(
                "RESEND_API_KEY is not configured".to_string(),
            ));
        }

        Ok(Self {
            config,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::NotEnabled(
                "Resend email provider is not enabled".to_string(),
            ));
        }

        let request = ResendRequest {
            from: &self.config.from,
            to: vec![&email.to],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.api_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to Resend: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Resend error bodies are {"statusCode", "name", "message"};
            // surface the message alone when present.
            let message = serde_json::from_str::<ResendErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| {
                    format!("Resend API returned error status {}: {}", status, body)
                });

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::Authentication(message)
                }
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
                _ => ProviderError::SendFailed(message),
            });
        }

        let resend_response: ResendResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!("Failed to parse Resend response: {}", e))
        })?;

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Email sent successfully via Resend"
        );

        Ok(ProviderResponse::success(Some(resend_response.id)))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if !self.config.enabled {
            return Ok(());
        }

        // Resend has no dedicated health endpoint; validate configuration.
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::Configuration(
                "Resend api_key is not configured".to_string(),
            ));
        }

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Mock email provider for tests and for running without a Resend account.
pub struct MockEmailProvider {
    enabled: bool,
    fail_with: Option<String>,
    send_count: AtomicU64,
}

impl MockEmailProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fail_with: None,
            send_count: AtomicU64::new(0),
        }
    }

    /// A provider whose every send fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            enabled: true,
            fail_with: Some(message.to_string()),
            send_count: AtomicU64::new(0),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock email provider is not enabled".to_string(),
            ));
        }

        if let Some(message) = &self.fail_with {
            return Err(ProviderError::SendFailed(message.clone()));
        }

        self.send_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "[MOCK] Email would be sent"
        );

        Ok(ProviderResponse::success(Some(format!(
            "mock-email-{}",
            self.send_count.load(Ordering::SeqCst)
        ))))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
