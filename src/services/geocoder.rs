//! Place-name lookup.

use anyhow::Result;

use crate::geo::Coordinate;

/// Resolves free text such as `"Vadodara, Gujarat"` into a coordinate.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the service answered but knows no such place; `Err` is
    /// reserved for transport and protocol failures.
    async fn geocode(&self, name: &str) -> Result<Option<Coordinate>>;
}
