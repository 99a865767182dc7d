use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::AppConfig;

/// Countries are fetched 100 at a time, the provider's maximum page size.
const LIST_PAGE_SIZE: u32 = 100;

/// ISO codes reaching the client are already uppercased by the caller.
static ISO_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Z]{2,3}$").expect("ISO code pattern is valid"));

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid ISO code format: {0:?}")]
    InvalidIsoCode(String),
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Pagination header of the provider's two-element response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMetadata {
    #[serde(deserialize_with = "u32_from_int_or_string")]
    pub page: u32,
    #[serde(deserialize_with = "u32_from_int_or_string")]
    pub pages: u32,
    #[serde(deserialize_with = "u32_from_int_or_string")]
    pub per_page: u32,
    #[serde(deserialize_with = "u32_from_int_or_string")]
    pub total: u32,
}

/// The provider is inconsistent about numeric encoding: `per_page` comes
/// back as a string on some endpoints and as an integer on others.
fn u32_from_int_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// Splits the provider's `[metadata, records]` envelope. A `null` record
/// list (empty result set) collapses to an empty vec.
fn parse_envelope(payload: Value) -> Result<(PageMetadata, Vec<Value>), ClientError> {
    let Value::Array(elements) = payload else {
        return Err(ClientError::Decode(
            "expected a two-element response array".to_string(),
        ));
    };

    let mut elements = elements.into_iter();
    let (Some(metadata), Some(records)) = (elements.next(), elements.next()) else {
        return Err(ClientError::Decode(
            "response array has fewer than two elements".to_string(),
        ));
    };
    if elements.next().is_some() {
        return Err(ClientError::Decode(
            "response array has more than two elements".to_string(),
        ));
    }

    let metadata: PageMetadata = serde_json::from_value(metadata)
        .map_err(|err| ClientError::Decode(format!("bad page metadata: {err}")))?;

    let records = match records {
        Value::Null => Vec::new(),
        Value::Array(list) => list,
        other => {
            return Err(ClientError::Decode(format!(
                "expected a record list, got {other}"
            )))
        }
    };

    Ok((metadata, records))
}

/// Provider operations the lookup service depends on, kept behind a trait
/// so tests can substitute a mock.
#[async_trait]
pub trait CountryApi: Send + Sync {
    async fn country_by_iso(&self, iso: &str) -> Result<Value, ClientError>;
    async fn all_countries(&self) -> Result<Vec<Value>, ClientError>;
}

/// Thin HTTP client for the World Bank country API.
#[derive(Clone)]
pub struct WorldBankClient {
    http: reqwest::Client,
    base_url: String,
}

impl WorldBankClient {
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        url.query_pairs_mut().append_pair("format", "json");
        for (name, value) in params {
            url.query_pairs_mut().append_pair(name, value);
        }
        Ok(url)
    }

    /// Issues one bounded-timeout request to `{base_url}/{path}?format=json`.
    ///
    /// Only GET/POST/PUT/DELETE are accepted; anything else fails before
    /// any I/O happens.
    pub async fn fetch_single(&self, path: &str, method: Method) -> Result<Value, ClientError> {
        if ![Method::GET, Method::POST, Method::PUT, Method::DELETE].contains(&method) {
            return Err(ClientError::UnsupportedMethod(method));
        }

        let url = self.endpoint(path, &[])?;
        debug!("{} {}", method, url);

        let response = self.http.request(method, url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetches every page of a paginated listing, merging the record lists.
    ///
    /// Pages are requested sequentially starting at 1 until the requested
    /// page would exceed the provider-reported total. Any page failure
    /// fails the whole call; partial data is never returned.
    pub async fn fetch_all_pages(
        &self,
        path: &str,
        per_page: u32,
    ) -> Result<Vec<Value>, ClientError> {
        let mut merged = Vec::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            let per_page_param = per_page.to_string();
            let url = self.endpoint(
                path,
                &[("page", page_param.as_str()), ("per_page", per_page_param.as_str())],
            )?;
            debug!("GET {}", url);

            let response = self.http.get(url).send().await?;
            if !response.status().is_success() {
                return Err(ClientError::Status(response.status()));
            }

            let (metadata, records) = parse_envelope(response.json::<Value>().await?)?;
            merged.extend(records);

            if page >= metadata.pages {
                break;
            }
            page += 1;
        }

        info!("fetched {} records from {} across {} pages", merged.len(), path, page);
        Ok(merged)
    }
}

#[async_trait]
impl CountryApi for WorldBankClient {
    async fn country_by_iso(&self, iso: &str) -> Result<Value, ClientError> {
        if !ISO_CODE.is_match(iso) {
            return Err(ClientError::InvalidIsoCode(iso.to_string()));
        }
        self.fetch_single(&format!("country/{iso}"), Method::GET).await
    }

    async fn all_countries(&self) -> Result<Vec<Value>, ClientError> {
        self.fetch_all_pages("countries", LIST_PAGE_SIZE).await
    }
}
