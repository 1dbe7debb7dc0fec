//! Output formatting and persistence for trip plans.
//!
//! Supports a terminal comparison table, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::pipeline::{TripPlan, TripQuery};

/// One CSV row per scored route of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub timestamp: DateTime<Utc>,
    pub start: String,
    pub end: String,
    pub travel_date: NaiveDate,
    pub start_hour: u8,
    pub route: String,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub distance_km: f64,
    pub recommended: bool,
}

/// Flattens a plan into rows, router order.
pub fn score_rows(query: &TripQuery, plan: &TripPlan) -> Vec<ScoreRow> {
    let timestamp = Utc::now();
    plan.ranking
        .routes()
        .iter()
        .map(|score| ScoreRow {
            timestamp,
            start: query.start.clone(),
            end: query.end.clone(),
            travel_date: query.departure.date(),
            start_hour: query.departure.hour(),
            route: score.label(),
            avg_temp: score.avg_temp,
            max_temp: score.max_temp,
            distance_km: score.distance_km,
            recommended: plan.ranking.is_recommended(score),
        })
        .collect()
}

/// Logs the plan using Rust's debug pretty-print format.
pub fn print_pretty(plan: &TripPlan) {
    debug!("{:#?}", plan);
}

/// Pretty-printed JSON of the plan, geometries omitted.
pub fn to_json(plan: &TripPlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

/// Appends rows to a CSV file, writing the header only when the file is new.
pub fn append_records(path: &str, rows: &[ScoreRow]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Comparison table in router order; the recommended route is starred.
pub fn render_table(plan: &TripPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<10} {:>10} {:>10} {:>14}",
        "Route", "Avg Temp", "Max Temp", "Distance (km)"
    );
    for score in plan.ranking.routes() {
        let marker = if plan.ranking.is_recommended(score) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{} {:<10} {:>10.1} {:>10.1} {:>14.1}",
            marker,
            score.label(),
            score.avg_temp,
            score.max_temp,
            score.distance_km
        );
    }
    out
}

pub fn recommendation(plan: &TripPlan) -> String {
    let best = plan.ranking.recommended();
    format!(
        "Recommendation: take {}.\n- Average Temp: {:.1}°C\n- Maximum Temp: {:.1}°C\n- Total Distance: {:.1} km",
        best.label(),
        best.avg_temp,
        best.max_temp,
        best.distance_km
    )
}
