pub mod config;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod output;
pub mod pipeline;
pub mod predictor;
pub mod scoring;
pub mod services;
