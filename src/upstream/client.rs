use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::models::{Character, Page, Quote};
use super::{UpstreamApi, UpstreamError};
use crate::config::UpstreamConfig;

/// `reqwest` client for The One API. Cheap to clone; the connection pool is
/// shared between clones.
#[derive(Clone)]
pub struct OneApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl OneApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| UpstreamError::InvalidUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.base_url.clone()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| UpstreamError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        tracing::debug!(url = %url, "upstream request");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .inspect_err(|e| tracing::error!(err = ?e, url = %url, "upstream request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "upstream returned non-success status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = resp.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(err = ?e, url = %url, "upstream response body did not parse");
            UpstreamError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl UpstreamApi for OneApiClient {
    async fn search_characters(&self, name: &str) -> Result<Vec<Character>, UpstreamError> {
        let mut url = self.endpoint(&["character"])?;
        url.query_pairs_mut().append_pair("name", name);

        let page: Page<Character> = self.get_json(url).await?;
        Ok(page.docs)
    }

    async fn list_characters(&self) -> Result<Vec<Character>, UpstreamError> {
        let page: Page<Character> = self.get_json(self.endpoint(&["character"])?).await?;
        Ok(page.docs)
    }

    async fn list_quotes(&self) -> Result<Value, UpstreamError> {
        self.get_json(self.endpoint(&["quote"])?).await
    }

    async fn character_quotes(&self, character_id: &str) -> Result<Vec<Quote>, UpstreamError> {
        let url = self.endpoint(&["character", character_id, "quote"])?;

        let page: Page<Quote> = self.get_json(url).await?;
        Ok(page.docs)
    }
}
