//! One trip query, end to end: geocode, route, score, rank.

use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::{info, warn};

use crate::error::RouteError;
use crate::geo::Coordinate;
use crate::predictor::TemperaturePredictor;
use crate::scoring::features::Departure;
use crate::scoring::ranker::{RankedResult, rank_routes};
use crate::scoring::scorer::{RouteScore, score_route};
use crate::scoring::sampler::DEFAULT_SAMPLE_COUNT;
use crate::services::{Geocoder, Router};

/// What the user asked for.
#[derive(Debug, Clone, Serialize)]
pub struct TripQuery {
    pub start: String,
    pub end: String,
    pub departure: Departure,
}

/// Resolved endpoints plus the ranked candidate routes.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub ranking: RankedResult,
}

impl TripPlan {
    /// Where a map of this trip should be centered.
    pub fn center(&self) -> Coordinate {
        self.origin.midpoint(&self.destination)
    }
}

/// Wires the collaborators together for any number of queries.
pub struct TripPlanner<'a, G, R> {
    geocoder: &'a G,
    router: &'a R,
    samples: NonZeroUsize,
}

impl<'a, G: Geocoder, R: Router> TripPlanner<'a, G, R> {
    pub fn new(geocoder: &'a G, router: &'a R) -> Self {
        Self {
            geocoder,
            router,
            samples: DEFAULT_SAMPLE_COUNT,
        }
    }

    pub fn with_samples(mut self, samples: NonZeroUsize) -> Self {
        self.samples = samples;
        self
    }

    /// Runs one query. `predictor` is `None` when the model artifact could not
    /// be loaded; the query is then refused before any network call.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`]; every one of them aborts the whole query and no
    /// partial ranking is returned.
    #[tracing::instrument(skip_all, fields(start = %query.start, end = %query.end))]
    pub async fn plan(
        &self,
        query: &TripQuery,
        predictor: Option<&dyn TemperaturePredictor>,
    ) -> Result<TripPlan, RouteError> {
        let predictor = predictor.ok_or_else(|| {
            RouteError::ModelUnavailable("model artifact was not loaded".to_string())
        })?;

        let origin = self.locate(&query.start).await?;
        let destination = self.locate(&query.end).await?;

        let geometries = self
            .router
            .routes(origin, destination)
            .await
            .map_err(|e| RouteError::upstream("routing", e))?;
        if geometries.is_empty() {
            warn!("Router returned no candidates");
            return Err(RouteError::NoRouteFound);
        }
        info!(candidates = geometries.len(), "Routes received");

        let departure = &query.departure;
        let scores = geometries
            .iter()
            .enumerate()
            .map(|(route_id, geometry)| {
                score_route(
                    route_id,
                    geometry,
                    departure.hour(),
                    departure.month(),
                    self.samples,
                    predictor,
                )
            })
            .collect::<Result<Vec<RouteScore>, RouteError>>()?;

        let ranking = rank_routes(scores)?;
        let best = ranking.recommended();
        info!(
            route = %best.label(),
            avg_temp = best.avg_temp,
            max_temp = best.max_temp,
            distance_km = best.distance_km,
            "Recommended route"
        );

        Ok(TripPlan {
            origin,
            destination,
            ranking,
        })
    }

    async fn locate(&self, name: &str) -> Result<Coordinate, RouteError> {
        self.geocoder
            .geocode(name)
            .await
            .map_err(|e| RouteError::upstream("geocoding", e))?
            .ok_or_else(|| RouteError::LocationNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::RouteGeometry;
    use crate::scoring::features::{FeatureRecord, SegmentStride};
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGeocoder {
        known: Vec<(&'static str, Coordinate)>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, name: &str) -> Result<Option<Coordinate>> {
            if self.fail {
                return Err(anyhow::anyhow!("connection reset"));
            }
            Ok(self
                .known
                .iter()
                .find(|(known, _)| *known == name)
                .map(|(_, c)| *c))
        }
    }

    struct FakeRouter {
        routes: Vec<RouteGeometry>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Router for FakeRouter {
        async fn routes(&self, _start: Coordinate, _end: Coordinate) -> Result<Vec<RouteGeometry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.routes.clone())
        }
    }

    /// Route 0 is hot, route 1 is cool; counts every prediction.
    struct PerRoute {
        seen: Mutex<Vec<FeatureRecord>>,
    }

    impl TemperaturePredictor for PerRoute {
        fn segment_stride(&self) -> SegmentStride {
            SegmentStride::new(4).unwrap()
        }

        fn predict(&self, record: &FeatureRecord) -> Result<f64> {
            self.seen.lock().unwrap().push(*record);
            Ok(if record.route_id == 0 { 34.0 } else { 29.0 })
        }
    }

    fn predictor() -> PerRoute {
        PerRoute {
            seen: Mutex::new(Vec::new()),
        }
    }

    fn geocoder() -> FakeGeocoder {
        FakeGeocoder {
            known: vec![
                ("Vadodara", Coordinate::new(22.305, 73.191)),
                ("Ahmedabad", Coordinate::new(23.070, 72.517)),
            ],
            fail: false,
        }
    }

    fn router(routes: Vec<RouteGeometry>) -> FakeRouter {
        FakeRouter {
            routes,
            calls: AtomicUsize::new(0),
        }
    }

    fn path(n: usize, distance_m: f64) -> RouteGeometry {
        let points = (0..n)
            .map(|i| Coordinate::new(22.305 + i as f64 * 0.01, 73.191 - i as f64 * 0.01))
            .collect();
        RouteGeometry::new(points, distance_m)
    }

    fn query(start: &str, end: &str) -> TripQuery {
        TripQuery {
            start: start.to_string(),
            end: end.to_string(),
            departure: Departure::new(NaiveDate::from_ymd_opt(2023, 5, 15).unwrap(), 14)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_plan_recommends_coolest_route() {
        let geocoder = geocoder();
        let router = router(vec![path(120, 112_000.0), path(80, 128_400.0)]);
        let predictor = predictor();
        let planner = TripPlanner::new(&geocoder, &router);

        let plan = planner
            .plan(&query("Vadodara", "Ahmedabad"), Some(&predictor))
            .await
            .unwrap();

        assert_eq!(plan.ranking.routes().len(), 2);
        assert_eq!(plan.ranking.recommended().route_id, 1);
        assert_eq!(plan.ranking.recommended().avg_temp, 29.0);
        assert_eq!(plan.ranking.recommended().distance_km, 128.4);
        assert_eq!(predictor.seen.lock().unwrap().len(), 40);

        let seen = predictor.seen.lock().unwrap();
        assert!(seen.iter().all(|r| r.start_hour == 14 && r.month == 5));
    }

    #[tokio::test]
    async fn test_unknown_start_never_predicts() {
        let geocoder = geocoder();
        let router = router(vec![path(10, 1000.0)]);
        let predictor = predictor();
        let planner = TripPlanner::new(&geocoder, &router);

        let result = planner
            .plan(&query("Atlantis", "Ahmedabad"), Some(&predictor))
            .await;

        match result {
            Err(RouteError::LocationNotFound(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected LocationNotFound, got {other:?}"),
        }
        assert!(predictor.seen.lock().unwrap().is_empty());
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_end_is_location_not_found() {
        let geocoder = geocoder();
        let router = router(vec![path(10, 1000.0)]);
        let planner = TripPlanner::new(&geocoder, &router);

        let result = planner
            .plan(&query("Vadodara", "Atlantis"), Some(&predictor()))
            .await;
        assert!(matches!(result, Err(RouteError::LocationNotFound(name)) if name == "Atlantis"));
    }

    #[tokio::test]
    async fn test_empty_router_result_is_no_route() {
        let geocoder = geocoder();
        let router = router(vec![]);
        let predictor = predictor();
        let planner = TripPlanner::new(&geocoder, &router);

        let result = planner
            .plan(&query("Vadodara", "Ahmedabad"), Some(&predictor))
            .await;

        assert!(matches!(result, Err(RouteError::NoRouteFound)));
        assert!(predictor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_model_refuses_before_network() {
        let geocoder = geocoder();
        let router = router(vec![path(10, 1000.0)]);
        let planner = TripPlanner::new(&geocoder, &router);

        let result = planner.plan(&query("Vadodara", "Ahmedabad"), None).await;

        assert!(matches!(result, Err(RouteError::ModelUnavailable(_))));
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_geometry_aborts_whole_query() {
        let geocoder = geocoder();
        let router = router(vec![path(10, 1000.0), path(0, 0.0)]);
        let planner = TripPlanner::new(&geocoder, &router);

        let result = planner
            .plan(&query("Vadodara", "Ahmedabad"), Some(&predictor()))
            .await;
        assert!(matches!(result, Err(RouteError::EmptyGeometry { route_id: 1 })));
    }

    #[tokio::test]
    async fn test_geocoder_transport_failure_is_upstream() {
        let geocoder = FakeGeocoder {
            known: vec![],
            fail: true,
        };
        let router = router(vec![path(10, 1000.0)]);
        let planner = TripPlanner::new(&geocoder, &router);

        let result = planner
            .plan(&query("Vadodara", "Ahmedabad"), Some(&predictor()))
            .await;
        assert!(matches!(
            result,
            Err(RouteError::Upstream {
                service: "geocoding",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_sample_count_override() {
        let geocoder = geocoder();
        let router = router(vec![path(300, 1000.0)]);
        let predictor = predictor();
        let planner =
            TripPlanner::new(&geocoder, &router).with_samples(NonZeroUsize::new(7).unwrap());

        planner
            .plan(&query("Vadodara", "Ahmedabad"), Some(&predictor))
            .await
            .unwrap();
        let seen = predictor.seen.lock().unwrap();
        assert_eq!(seen.len(), 7);
        assert_eq!(seen.last().unwrap().segment_id, 24);
    }

    #[test]
    fn test_plan_center() {
        let plan = TripPlan {
            origin: Coordinate::new(22.0, 73.0),
            destination: Coordinate::new(23.0, 72.0),
            ranking: rank_routes(vec![RouteScore {
                route_id: 0,
                avg_temp: 25.0,
                max_temp: 27.0,
                distance_km: 10.0,
                geometry: path(2, 10_000.0),
            }])
            .unwrap(),
        };
        assert_eq!(plan.center(), Coordinate::new(22.5, 72.5));
    }
}
