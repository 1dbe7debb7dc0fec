use std::num::NonZeroUsize;

use crate::error::RouteError;
use crate::geo::{Coordinate, RouteGeometry};

/// Samples taken per route when no override is given.
pub const DEFAULT_SAMPLE_COUNT: NonZeroUsize = NonZeroUsize::new(20).unwrap();

/// One representative point of a route. `position` is the index within the
/// sampled subset, not within the raw geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    pub route_index: usize,
    pub position: usize,
    pub coordinate: Coordinate,
}

/// Reduces `geometry` to exactly `count` points evenly spaced over its index
/// range, both endpoints included. Short paths repeat points.
///
/// # Errors
///
/// Returns [`RouteError::EmptyGeometry`] if the geometry has no points.
pub fn sample_path(
    route_index: usize,
    geometry: &RouteGeometry,
    count: NonZeroUsize,
) -> Result<Vec<SampledPoint>, RouteError> {
    let points = geometry.points();
    if points.is_empty() {
        return Err(RouteError::EmptyGeometry {
            route_id: route_index,
        });
    }

    Ok(sample_indices(points.len(), count)
        .into_iter()
        .enumerate()
        .map(|(position, idx)| SampledPoint {
            route_index,
            position,
            coordinate: points[idx],
        })
        .collect())
}

/// `count` indices over `[0, len - 1]`, linearly interpolated and rounded to
/// the nearest integer (halves round up). Integer arithmetic keeps the last
/// index exactly `len - 1`.
fn sample_indices(len: usize, count: NonZeroUsize) -> Vec<usize> {
    let count = count.get();
    if count == 1 {
        return vec![0];
    }

    let span = len - 1;
    let steps = count - 1;
    (0..count)
        .map(|i| (2 * i * span + steps) / (2 * steps))
        .collect()
}
