use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use maud::Markup;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use shared::SearchRequest;
use tracing::info;
use url::form_urlencoded;

use crate::audit::ErrorLog;
use crate::domain::CountryService;
use crate::view;

/// Inbound codes may be either case; they are uppercased before lookup.
static ISO_CODE_INPUT: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z]{2,3}$").expect("ISO input pattern is valid"));

const ACTION_SEARCH: &str = "ISO Search";
const ACTION_GET_ALL: &str = "Get All Countries";

const SEARCH_FAILED: &str = "An error occurred while searching for the country.";
const LIST_FAILED: &str = "An error occurred while retrieving country data.";
const ISO_FORMAT_HINT: &str = "The ISO code must be 2 or 3 letters.";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub country_service: CountryService,
    pub error_log: ErrorLog,
}

impl AppState {
    pub fn new(country_service: CountryService, error_log: ErrorLog) -> Self {
        Self {
            country_service,
            error_log,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", post(search))
        .route("/get-all-countries", post(get_all_countries))
        .with_state(state)
}

/// One-shot flash parameters carried on the redirect back to the home page.
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    /// Generic error banner
    pub error: Option<String>,
    /// Field-level message shown under the ISO code input
    pub iso_error: Option<String>,
}

/// GET / - the lookup page with no data, plus any flash messages.
pub async fn home(Query(flash): Query<FlashParams>) -> Markup {
    view::lookup_page(None, flash.error.as_deref(), flash.iso_error.as_deref())
}

/// POST /search - validate the ISO code, look the country up, and render
/// the result page; any failure redirects home with a flash message.
pub async fn search(
    State(state): State<AppState>,
    Form(request): Form<SearchRequest>,
) -> Response {
    info!("POST /search - isoCode: {:?}", request.iso_code);

    let input = request.iso_code.trim();
    if !ISO_CODE_INPUT.is_match(input) {
        state
            .error_log
            .record(ACTION_SEARCH, &format!("rejected ISO code input {input:?}"));
        return redirect_home_with("iso_error", ISO_FORMAT_HINT).into_response();
    }

    // The provider errors on lowercase codes.
    let iso_code = input.to_uppercase();

    match state.country_service.country_by_iso(&iso_code).await {
        Ok(records) => view::lookup_page(Some(&records), None, None).into_response(),
        Err(err) => {
            state.error_log.record(ACTION_SEARCH, &err.to_string());
            redirect_home_with("error", SEARCH_FAILED).into_response()
        }
    }
}

/// POST /get-all-countries - the full listing, or an error flash.
pub async fn get_all_countries(State(state): State<AppState>) -> Response {
    info!("POST /get-all-countries");

    match state.country_service.countries().await {
        Ok(records) => view::lookup_page(Some(&records), None, None).into_response(),
        Err(err) => {
            state.error_log.record(ACTION_GET_ALL, &err.to_string());
            redirect_home_with("error", LIST_FAILED).into_response()
        }
    }
}

fn redirect_home_with(field: &str, message: &str) -> Redirect {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(field, message)
        .finish();
    Redirect::to(&format!("/?{query}"))
}
