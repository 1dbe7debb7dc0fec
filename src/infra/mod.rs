//! Concrete HTTP adapters for the service traits.
//!
//! [`NominatimClient`] implements [`Geocoder`](temp_traverse::services::Geocoder)
//! against OpenStreetMap Nominatim. [`OsrmClient`] implements
//! [`Router`](temp_traverse::services::Router) against an OSRM server.

pub mod nominatim;
pub mod osrm;

pub use nominatim::NominatimClient;
pub use osrm::OsrmClient;
