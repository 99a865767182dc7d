use serde::{Deserialize, Serialize};

/// Flat country record rendered on the lookup page.
///
/// Every field is always present; the lookup service substitutes defaults
/// before a record ever reaches the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: String,
    /// Region grouping as reported by the provider (e.g. "Europe & Central Asia")
    pub region: String,
    pub capital_city: String,
    pub longitude: String,
    pub latitude: String,
}

/// Form body for POST /search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// 2 or 3 letter country identifier, case-insensitive on input
    #[serde(rename = "isoCode")]
    pub iso_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_record_serializes_with_provider_field_names() {
        let record = CountryRecord {
            name: "United Kingdom".to_string(),
            region: "Europe & Central Asia".to_string(),
            capital_city: "London".to_string(),
            longitude: "-0.126236".to_string(),
            latitude: "51.5002".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["capitalCity"], "London");
        assert_eq!(json["name"], "United Kingdom");
        assert_eq!(json["longitude"], "-0.126236");
    }

    #[test]
    fn search_request_reads_iso_code_form_field() {
        let request: SearchRequest = serde_json::from_value(serde_json::json!({
            "isoCode": "gb"
        }))
        .unwrap();

        assert_eq!(request.iso_code, "gb");
    }
}
