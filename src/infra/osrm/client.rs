use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use super::response::OsrmRouteResponse;
use temp_traverse::fetch::HttpClient;
use temp_traverse::geo::{Coordinate, RouteGeometry};
use temp_traverse::services::Router;

/// Driving routes with alternatives from an OSRM `/route` endpoint.
///
/// Geometries are requested as GeoJSON so no polyline decoding is needed.
pub struct OsrmClient<C> {
    http: C,
    endpoint: String,
}

impl<C: HttpClient> OsrmClient<C> {
    /// Create a client for the given OSRM endpoint (e.g. `http://localhost:5000`).
    pub fn new(http: C, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn route_url(&self, start: Coordinate, end: Coordinate) -> Result<Url> {
        let base = format!(
            "{}/route/v1/driving/{:.6},{:.6};{:.6},{:.6}",
            self.endpoint, start.lon, start.lat, end.lon, end.lat
        );
        let mut url =
            Url::parse(&base).with_context(|| format!("failed to build OSRM URL '{base}'"))?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("alternatives", "true")
            .append_pair("geometries", "geojson");
        Ok(url)
    }
}

/// `NoRoute` is an answer, not a failure; every other non-`Ok` code is.
fn parse_route_response(resp: OsrmRouteResponse) -> Result<Vec<RouteGeometry>> {
    match resp.code.as_str() {
        "Ok" => {}
        "NoRoute" => {
            warn!("OSRM found no route");
            return Ok(Vec::new());
        }
        code => {
            return Err(anyhow!(
                "OSRM returned {}: {}",
                code,
                resp.message.unwrap_or_default()
            ));
        }
    }

    Ok(resp
        .routes
        .into_iter()
        .map(|route| {
            let points = route
                .geometry
                .coordinates
                .into_iter()
                .map(|[lon, lat]| Coordinate::new(lat, lon))
                .collect();
            RouteGeometry::new(points, route.distance)
        })
        .collect())
}

#[async_trait]
impl<C: HttpClient> Router for OsrmClient<C> {
    #[tracing::instrument(skip(self))]
    async fn routes(&self, start: Coordinate, end: Coordinate) -> Result<Vec<RouteGeometry>> {
        let url = self.route_url(start, end)?;
        let req = reqwest::Request::new(reqwest::Method::GET, url);
        let resp = self.http.execute(req).await?;

        // OSRM reports NoRoute with a 400 status, so the body decides
        let status = resp.status();
        let body = resp.bytes().await?;
        let parsed: OsrmRouteResponse = serde_json::from_slice(&body).map_err(|e| {
            anyhow!(
                "OSRM returned status {} with unreadable body: {}",
                status,
                e
            )
        })?;

        let routes = parse_route_response(parsed)?;
        debug!(candidates = routes.len(), "OSRM routes decoded");
        Ok(routes)
    }
}
