use serde::Deserialize;

#[derive(Deserialize)]
pub(super) struct OsrmRouteResponse {
    pub(super) code: String,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
pub(super) struct OsrmRoute {
    pub(super) distance: f64,
    pub(super) geometry: OsrmLineString,
}

/// GeoJSON `LineString`; positions are `[lon, lat]`.
#[derive(Deserialize)]
pub(super) struct OsrmLineString {
    pub(super) coordinates: Vec<[f64; 2]>,
}
