use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::upstream::{Character, Quote, UpstreamApi, UpstreamError};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("character not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Character reads against the upstream service, including the
/// character-plus-quotes composition
#[derive(Clone)]
pub struct CharacterService {
    upstream: Arc<dyn UpstreamApi>,
}

impl CharacterService {
    pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
        Self { upstream }
    }

    /// Resolve `name` to the first character upstream returns and, when
    /// `include_quotes` is set, attach that character's quotes in upstream
    /// order. A failed quote fetch fails the whole lookup.
    pub async fn lookup_character(&self, name: &str, include_quotes: bool) -> Result<Character, LookupError> {
        let mut character = self
            .upstream
            .search_characters(name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;

        if include_quotes {
            let quotes = self.upstream.character_quotes(&character.id).await?;
            tracing::debug!("Attached {} quotes to character {}", quotes.len(), character.id);
            character.quotes = Some(quotes);
        }

        Ok(character)
    }

    pub async fn list_characters(&self) -> Result<Vec<Character>, UpstreamError> {
        self.upstream.list_characters().await
    }

    pub async fn list_quotes(&self) -> Result<Value, UpstreamError> {
        self.upstream.list_quotes().await
    }

    pub async fn character_quotes(&self, character_id: &str) -> Result<Vec<Quote>, UpstreamError> {
        self.upstream.character_quotes(character_id).await
    }
}
