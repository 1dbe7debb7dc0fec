use serde::Serialize;
use std::cmp::Ordering;

use crate::error::RouteError;
use crate::scoring::scorer::RouteScore;

/// Comfort ordering: cooler average first, then lower peak, then shorter.
pub fn compare_comfort(a: &RouteScore, b: &RouteScore) -> Ordering {
    compare_key(a.avg_temp, b.avg_temp)
        .then_with(|| compare_key(a.max_temp, b.max_temp))
        .then_with(|| compare_key(a.distance_km, b.distance_km))
}

/// `-0.0` and `0.0` compare equal; NaN only reaches here from hand-built
/// scores and falls back to the total order.
fn compare_key(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Scored routes in router order with the most comfortable one marked.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    routes: Vec<RouteScore>,
    recommended: usize,
}

impl RankedResult {
    pub fn routes(&self) -> &[RouteScore] {
        &self.routes
    }

    pub fn recommended(&self) -> &RouteScore {
        &self.routes[self.recommended]
    }

    pub fn is_recommended(&self, score: &RouteScore) -> bool {
        score.route_id == self.recommended().route_id
    }

    /// Copy of the routes sorted by comfort, best first. Stable, so full ties
    /// keep router order.
    pub fn by_comfort(&self) -> Vec<RouteScore> {
        let mut sorted = self.routes.clone();
        sorted.sort_by(compare_comfort);
        sorted
    }
}

/// Picks the minimum under [`compare_comfort`]; on a full tie the earliest
/// route wins.
///
/// # Errors
///
/// [`RouteError::NoRouteFound`] when `scores` is empty.
pub fn rank_routes(scores: Vec<RouteScore>) -> Result<RankedResult, RouteError> {
    let recommended = scores
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| compare_comfort(a, b))
        .map(|(idx, _)| idx)
        .ok_or(RouteError::NoRouteFound)?;

    Ok(RankedResult {
        routes: scores,
        recommended,
    })
}
