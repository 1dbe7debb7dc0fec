mod client;

pub use client::NominatimClient;
