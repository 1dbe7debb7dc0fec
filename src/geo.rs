//! Coordinates and decoded route geometries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Arithmetic midpoint, good enough for centering a regional map view.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            lat: (self.lat + other.lat) / 2.0,
            lon: (self.lon + other.lon) / 2.0,
        }
    }
}

/// A candidate path as returned by the router: ordered points plus its
/// total length in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGeometry {
    points: Vec<Coordinate>,
    distance_m: f64,
}

impl RouteGeometry {
    pub fn new(points: Vec<Coordinate>, distance_m: f64) -> Self {
        Self { points, distance_m }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
