use std::sync::Arc;

use serde_json::Value;
use shared::CountryRecord;
use thiserror::Error;
use tracing::{info, warn};

use crate::audit::ErrorLog;
use crate::client::{ClientError, CountryApi};

const ACTION_GET_COUNTRY: &str = "Get Country Service Method";
const ACTION_GET_ALL: &str = "Get All Countries Service Method";

const DEFAULT_NAME: &str = "N/A";
const DEFAULT_FIELD: &str = "Unknown";

/// Failure reported to the request layer.
///
/// The display text is deliberately generic; the raw cause only ever goes
/// to the audit log.
#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("No countries were found.")]
    NotFound,
    #[error("An error occurred while retrieving country data.")]
    Upstream,
}

/// Looks up countries through the provider client and reshapes the raw
/// payloads into flat display records.
#[derive(Clone)]
pub struct CountryService {
    client: Arc<dyn CountryApi>,
    error_log: ErrorLog,
}

impl CountryService {
    pub fn new(client: Arc<dyn CountryApi>, error_log: ErrorLog) -> Self {
        Self { client, error_log }
    }

    /// Looks up a single country by its (already uppercased) ISO code.
    ///
    /// The provider envelope is `[metadata, records]`; the country object
    /// is expected at index 0 of the record list.
    pub async fn country_by_iso(&self, iso: &str) -> Result<Vec<CountryRecord>, ServiceError> {
        info!("Looking up country by ISO code: {}", iso);

        match self.client.country_by_iso(iso).await {
            Ok(envelope) => match envelope.get(1).and_then(|records| records.get(0)) {
                Some(country) => Ok(vec![reshape(country)]),
                None => {
                    warn!("Provider returned no country data for {}", iso);
                    self.error_log.record(
                        ACTION_GET_COUNTRY,
                        &format!("no country data returned for {iso}"),
                    );
                    Err(ServiceError::NotFound)
                }
            },
            Err(err) => Err(self.fail(ACTION_GET_COUNTRY, err)),
        }
    }

    /// Fetches and reshapes the full country list, preserving provider order.
    pub async fn countries(&self) -> Result<Vec<CountryRecord>, ServiceError> {
        info!("Fetching all countries");

        match self.client.all_countries().await {
            Ok(raw) if raw.is_empty() => {
                warn!("Provider returned an empty country list");
                self.error_log.record(ACTION_GET_ALL, "no countries were returned");
                Err(ServiceError::NotFound)
            }
            Ok(raw) => {
                info!("Retrieved {} countries", raw.len());
                Ok(raw.iter().map(reshape).collect())
            }
            Err(err) => Err(self.fail(ACTION_GET_ALL, err)),
        }
    }

    fn fail(&self, action: &str, err: ClientError) -> ServiceError {
        self.error_log.record(action, &err.to_string());
        ServiceError::Upstream
    }
}

/// Flattens one provider country object, substituting defaults for missing
/// or empty fields.
fn reshape(country: &Value) -> CountryRecord {
    CountryRecord {
        name: text_or(country.get("name"), DEFAULT_NAME),
        region: text_or(country.pointer("/region/value"), DEFAULT_FIELD),
        capital_city: text_or(country.get("capitalCity"), DEFAULT_FIELD),
        longitude: text_or(country.get("longitude"), DEFAULT_FIELD),
        latitude: text_or(country.get("latitude"), DEFAULT_FIELD),
    }
}

/// Provider fields can be absent or empty strings, and the coordinates
/// occasionally come back as bare numbers. Anything unusable collapses to
/// the default.
fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}
