use gincana_core::BibleId;
use hyper::header::ACCEPT;
use log::{debug, error};
use reqwest_middleware::{
    reqwest::{StatusCode, Url},
    ClientWithMiddleware,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_KEY_HEADER: &str = "X-YVP-App-Key";

#[derive(Error, Debug)]
pub enum Error {
    #[error("passage not found: {0}")]
    NotFound(String),
    #[error("problem sending request to bible api: {0}")]
    Send(#[from] reqwest_middleware::reqwest::Error),
    #[error("problem sending request to bible api: {0}")]
    SendRetry(#[from] reqwest_middleware::Error),
    #[error("problem requesting bible api: {0}")]
    Request(String),
    #[error("bible api temporarily unavailable: {0}")]
    Transient(String),
    #[error("unexpected response from bible api: {0}")]
    BadResponse(String),
}

impl Error {
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }
}

/// Plain text passage as returned by the content API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    #[serde(default)]
    pub content: String,
    /// Human readable reference in the version's language ("João 3:16")
    #[serde(default)]
    pub reference: Option<String>,
}

#[async_trait::async_trait]
pub trait BibleApi: Send + Sync {
    /// Fetch one verse (`usfm` like `JHN.3.16`) as plain text
    async fn get_passage(&self, bible_id: &BibleId, usfm: &str) -> Result<Passage, Error>;
}

#[derive(Clone)]
pub struct YouVersionClient {
    pub base_url: String,
    pub client: ClientWithMiddleware,
    api_key: String,
}

impl YouVersionClient {
    pub fn new(client: ClientWithMiddleware, base_url: &str, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key,
        }
    }

    fn passage_url(&self, bible_id: &BibleId, usfm: &str) -> Result<Url, Error> {
        let raw = format!(
            "{}/v1/bibles/{}/passages/{}",
            self.base_url, bible_id, usfm
        );
        let mut url = Url::parse(&raw).map_err(|e| Error::Request(format!("{}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("format", "text");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl BibleApi for YouVersionClient {
    async fn get_passage(&self, bible_id: &BibleId, usfm: &str) -> Result<Passage, Error> {
        let url = self.passage_url(bible_id, usfm)?;
        debug!("requesting passage {} from bible {}", usfm, bible_id);

        let response = self
            .client
            .get(url)
            .header(APP_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("error sending to bible api: {}", e);
                Error::SendRetry(e)
            })?;

        let status = response.status();
        if status.is_success() {
            let passage: Passage = response.json().await?;
            if passage.content.trim().is_empty() {
                return Err(Error::BadResponse(format!(
                    "empty passage for {} in bible {}",
                    usfm, bible_id
                )));
            }
            Ok(passage)
        } else if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(format!("{} in bible {}", usfm, bible_id)))
        } else if status == StatusCode::SERVICE_UNAVAILABLE
            || status == StatusCode::BAD_GATEWAY
            || status == StatusCode::GATEWAY_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Transient(format!(
                "error response from bible api with status {}: {:?}",
                status, body
            )))
        } else {
            let body = response.text().await?;
            Err(Error::Request(format!(
                "error response from bible api with status {}: {:?}",
                status, body
            )))
        }
    }
}
