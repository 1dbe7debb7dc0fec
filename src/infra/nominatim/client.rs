use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use temp_traverse::fetch::{HttpClient, fetch_json};
use temp_traverse::geo::Coordinate;
use temp_traverse::services::Geocoder;

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct NominatimClient<C> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> NominatimClient<C> {
    /// `http` should already carry an identifying `User-Agent`.
    pub fn new(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .with_context(|| format!("invalid Nominatim URL '{}'", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("q", name)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }
}

/// First hit of a search response, if any.
fn first_place(places: Vec<Place>) -> Result<Option<Coordinate>> {
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };
    let lat: f64 = place
        .lat
        .parse()
        .with_context(|| format!("bad latitude '{}'", place.lat))?;
    let lon: f64 = place
        .lon
        .parse()
        .with_context(|| format!("bad longitude '{}'", place.lon))?;
    debug!(lat, lon, name = ?place.display_name, "Place resolved");
    Ok(Some(Coordinate::new(lat, lon)))
}

#[async_trait]
impl<C: HttpClient> Geocoder for NominatimClient<C> {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<Option<Coordinate>> {
        let url = self.search_url(name)?;
        let places: Vec<Place> = fetch_json(&self.http, url).await?;
        first_place(places)
    }
}
