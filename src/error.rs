//! Terminal failures of a route query.

use thiserror::Error;

/// Every variant aborts the current query; none are retried.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("could not find location: {0}")]
    LocationNotFound(String),
    #[error("no driving routes found between these locations")]
    NoRouteFound,
    #[error("temperature model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("route {route_id} has an empty geometry")]
    EmptyGeometry { route_id: usize },
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
    #[error("departure hour {0} is outside 0-23")]
    InvalidDeparture(u8),
}

impl RouteError {
    pub fn upstream(service: &'static str, err: impl std::fmt::Display) -> Self {
        RouteError::Upstream {
            service,
            message: err.to_string(),
        }
    }
}
