//! Form-processing endpoint client (Formspree-compatible)

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use serde::Deserialize;

use super::error::TransportError;
use crate::config::EndpointConfig;
use crate::form::FieldValue;
use crate::wizard::{SubmissionResult, Submitter};

const DEFAULT_USER_AGENT: &str = concat!("inquiry/", env!("CARGO_PKG_VERSION"));

/// Posts collected fields as `multipart/form-data` and asks for JSON back
pub struct FormEndpoint {
    url: String,
    client: reqwest::Client,
}

/// Error body Formspree returns alongside a non-success status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

impl ErrorBody {
    fn summary(&self) -> Option<String> {
        if !self.errors.is_empty() {
            let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
            return Some(messages.join("; "));
        }
        self.error.clone()
    }
}

impl FormEndpoint {
    /// Create a client for the given endpoint URL
    pub fn new(url: impl Into<String>, user_agent: Option<&str>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| TransportError::client(e.to_string()))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self, TransportError> {
        Self::new(config.url.clone(), config.user_agent.as_deref())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_form(payload: &[FieldValue]) -> Form {
        payload.iter().fold(Form::new(), |form, field| {
            form.text(field.name.clone(), field.value.clone())
        })
    }

    /// Send one submission. Any 2xx status counts as delivered.
    pub async fn post(&self, payload: &[FieldValue]) -> Result<(), TransportError> {
        tracing::debug!(
            endpoint = %self.url,
            fields = payload.len(),
            "Posting form submission"
        );

        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .multipart(Self::build_form(payload))
            .send()
            .await
            .map_err(|e| TransportError::network(&self.url, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint = %self.url, status = %status, "Form delivered");
            return Ok(());
        }

        let fallback = status
            .canonical_reason()
            .unwrap_or("Unexpected status")
            .to_string();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.summary().unwrap_or(fallback),
            Err(_) => fallback,
        };

        tracing::warn!(
            endpoint = %self.url,
            status = %status,
            message = %message,
            "Endpoint returned non-success status"
        );
        Err(TransportError::status(&self.url, status.as_u16(), message))
    }
}

#[async_trait]
impl Submitter for FormEndpoint {
    async fn submit(&self, payload: &[FieldValue]) -> SubmissionResult {
        let result = self.post(payload).await;
        if let Err(err) = &result {
            tracing::debug!(
                endpoint = %self.url,
                status = ?err.status_code(),
                network = err.is_network(),
                "Submission not delivered"
            );
        }
        result.into()
    }
}
