use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::debug;

use crate::error::RouteError;
use crate::geo::RouteGeometry;
use crate::predictor::TemperaturePredictor;
use crate::scoring::features::FeatureRecord;
use crate::scoring::sampler::sample_path;
use crate::scoring::utility::{max, mean, round1};

/// Predicted temperature exposure of one candidate route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteScore {
    pub route_id: usize,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub distance_km: f64,
    #[serde(skip)]
    pub geometry: RouteGeometry,
}

impl RouteScore {
    /// Human-facing name, numbered from 1.
    pub fn label(&self) -> String {
        format!("Route {}", self.route_id + 1)
    }
}

/// Samples `geometry`, predicts every sampled segment in one batch, and
/// reduces the predictions to mean and peak temperature.
///
/// # Errors
///
/// [`RouteError::EmptyGeometry`] for a route without points, and
/// [`RouteError::ModelUnavailable`] if the predictor fails or returns a
/// non-finite value.
#[tracing::instrument(skip(geometry, predictor), fields(points = geometry.len()))]
pub fn score_route(
    route_id: usize,
    geometry: &RouteGeometry,
    start_hour: u8,
    month: u8,
    samples: NonZeroUsize,
    predictor: &dyn TemperaturePredictor,
) -> Result<RouteScore, RouteError> {
    let sampled = sample_path(route_id, geometry, samples)?;
    let stride = predictor.segment_stride();
    let records: Vec<FeatureRecord> = sampled
        .iter()
        .map(|point| {
            FeatureRecord::build(
                route_id as u32,
                point.position as u32,
                start_hour,
                month,
                stride,
            )
        })
        .collect();

    let temps = predictor
        .predict_batch(&records)
        .map_err(|e| RouteError::ModelUnavailable(e.to_string()))?;

    if temps.len() != records.len() {
        return Err(RouteError::ModelUnavailable(format!(
            "predictor returned {} values for {} segments",
            temps.len(),
            records.len()
        )));
    }
    if let Some(bad) = temps.iter().find(|t| !t.is_finite()) {
        return Err(RouteError::ModelUnavailable(format!(
            "predictor returned non-finite temperature {bad}"
        )));
    }

    // sample_path never yields an empty set, so both reductions are Some
    let (Some(avg), Some(peak)) = (mean(&temps), max(&temps)) else {
        return Err(RouteError::EmptyGeometry { route_id });
    };

    let score = RouteScore {
        route_id,
        avg_temp: round1(avg),
        max_temp: round1(peak),
        distance_km: round1(geometry.distance_m() / 1000.0),
        geometry: geometry.clone(),
    };

    debug!(
        avg_temp = score.avg_temp,
        max_temp = score.max_temp,
        distance_km = score.distance_km,
        "Route scored"
    );
    Ok(score)
}
