//! Traits for the external services a trip query depends on.

pub mod geocoder;
pub mod router;

pub use geocoder::Geocoder;
pub use router::Router;
