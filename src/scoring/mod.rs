//! Route temperature scoring.
//!
//! Each candidate route is reduced to a fixed number of sampled segments,
//! every segment is turned into a predictor input record, the predictions are
//! summarised per route, and the routes are ranked by comfort.

pub mod features;
pub mod ranker;
pub mod sampler;
pub mod scorer;
pub mod utility;
