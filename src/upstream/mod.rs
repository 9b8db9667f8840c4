pub mod client;
pub mod models;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use client::OneApiClient;
pub use models::{Character, Page, Quote};

/// Failures talking to the character/quote service
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("upstream response could not be decoded: {0}")]
    Decode(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("upstream API key is not a valid header value")]
    InvalidApiKey,
}

/// Operations the gateway needs from the character/quote service
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// `GET /character?name=<name>`, in upstream order
    async fn search_characters(&self, name: &str) -> Result<Vec<Character>, UpstreamError>;

    /// `GET /character`
    async fn list_characters(&self) -> Result<Vec<Character>, UpstreamError>;

    /// `GET /quote`, the whole page body as returned upstream
    async fn list_quotes(&self) -> Result<Value, UpstreamError>;

    /// `GET /character/<id>/quote`, in upstream order
    async fn character_quotes(&self, character_id: &str) -> Result<Vec<Quote>, UpstreamError>;
}
