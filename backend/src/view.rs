use maud::{html, Markup, DOCTYPE};
use shared::CountryRecord;

/// Result tiles render four to a row.
const TILES_PER_ROW: usize = 4;

/// Renders the lookup page: search form, optional error messages, and the
/// country tiles when there is data to show.
///
/// All interpolated strings are escaped by maud.
pub fn lookup_page(
    country_data: Option<&[CountryRecord]>,
    error: Option<&str>,
    iso_error: Option<&str>,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "World Bank ISO Lookup" }
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
            }
            body id="mainPageBody" {
                div id="searchContainer" class="container text-center" {
                    h1 { "Please Enter an ISO Code" }
                    form id="isoSubmitForm" action="/search" method="POST" class="d-flex" {
                        input id="isoCode" type="text" class="form-control me-2" name="isoCode"
                            maxlength="3" placeholder="Enter a 2 or 3 letter ISO code" required;
                        button type="submit" class="btn btn-primary" { "Search" }
                    }
                    @if let Some(message) = iso_error {
                        div class="error" { (message) }
                    }
                    form id="getAllForm" action="/get-all-countries" method="POST" class="mt-3" {
                        button type="submit" class="btn btn-secondary" { "Get All Countries" }
                    }
                    @if let Some(message) = error {
                        div class="error" { (message) }
                    }
                    @if let Some(countries) = country_data {
                        @for row in countries.chunks(TILES_PER_ROW) {
                            div class="countryRow row" {
                                @for country in row {
                                    div class="col-md-3" {
                                        div class="countryBlock" {
                                            h2 { (country.name) }
                                            p { strong { "Region: " } (country.region) }
                                            p { strong { "Capital City: " } (country.capital_city) }
                                            p { strong { "Longitude: " } (country.longitude) }
                                            p { strong { "Latitude: " } (country.latitude) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
