use std::env;

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::message::RenderedMessage;

/// Environment variable naming the generation endpoint. There is no
/// built-in default address; startup fails when this is unset.
pub const ENDPOINT_ENV_VAR: &str = "DECK_API_URL";

/// A structured request for one presentation, built by the prompt
/// interpreter and serialized as the endpoint's expected JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    #[serde(rename = "description")]
    pub topic: String,
    pub urls: Vec<String>,
    pub slide_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    pub download_url: Option<String>,
    pub slides: Option<SlideDeck>,
}

#[derive(Debug, Deserialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Deserialize)]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub content: Vec<String>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request could not be completed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    HttpStatus { status: u16, message: String },
    #[error("could not understand the generation response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

pub struct GenerationClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl GenerationClient {
    /// Reads the endpoint from `DECK_API_URL`.
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var(ENDPOINT_ENV_VAR)
            .map_err(|_| eyre!("{} environment variable not set", ENDPOINT_ENV_VAR))?;
        Self::new(&endpoint)
    }

    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| eyre!("invalid generation endpoint {}: {}", endpoint, e))?;

        let client = reqwest::Client::new();

        Ok(Self { endpoint, client })
    }

    /// Performs one request/response cycle and renders the outcome.
    ///
    /// Every failure is converted into an `Error: ...` message here;
    /// nothing propagates past this boundary. Exactly one message is
    /// produced per call.
    pub async fn send(&self, request: &GenerationRequest) -> RenderedMessage {
        match self.request_deck(request).await {
            Ok(response) => render_response(&response),
            Err(e) => {
                error!("generation request failed: {}", e);
                let mut message = RenderedMessage::new();
                message.push_text(format!("Error: {}", e));
                message
            }
        }
    }

    async fn request_deck(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        debug!(
            "Sending generation request to {}: {:?}",
            self.endpoint, request
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("generation endpoint returned {}: {}", status, body);
            let message = server_error_message(&body).unwrap_or_else(|| {
                format!("request failed with HTTP {}", status.as_u16())
            });
            return Err(GenerationError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Received generation response: {}", body);

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pulls a human-readable message out of an error body, when the server
/// sent JSON with an `error` or `message` field.
fn server_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("error")
        .or_else(|| value.get("message"))?
        .as_str()?;
    Some(message.to_string())
}

fn render_response(response: &GenerationResponse) -> RenderedMessage {
    let mut message = RenderedMessage::new();

    match &response.download_url {
        Some(url) => {
            message.push_text("PowerPoint created successfully");
            message.push_link("Download PowerPoint", url);
        }
        None => {
            message.push_text(
                "No download link was returned; the presentation has to be assembled locally.",
            );
        }
    }

    if let Some(deck) = &response.slides {
        message.push_text("Slide Preview:");
        for (i, slide) in deck.slides.iter().enumerate() {
            message.push_text(format!("{}. {}", i + 1, slide.title));
            for bullet in &slide.content {
                message.push_text(format!("• {}", bullet));
            }
        }
    }

    message
}
