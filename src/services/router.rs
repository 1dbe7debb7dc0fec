//! Alternative driving routes between two points.

use anyhow::Result;

use crate::geo::{Coordinate, RouteGeometry};

#[async_trait::async_trait]
pub trait Router: Send + Sync {
    /// Candidate paths from `start` to `end`, already decoded, in the order
    /// the provider ranks them. An empty list means no route exists.
    async fn routes(&self, start: Coordinate, end: Coordinate) -> Result<Vec<RouteGeometry>>;
}
