//! Predictor input records.
//!
//! The model was trained on segment ids spaced `stride` apart, so a sampled
//! position is scaled by the stride declared in the model artifact before it
//! is fed back in.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RouteError;

/// Column order the predictor expects. Changing it breaks every artifact.
pub const FEATURE_NAMES: [&str; 4] = ["route_id", "segment_id", "start_hour", "month"];

/// Multiplier from sampled position to the model's `segment_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SegmentStride(u32);

impl SegmentStride {
    pub fn new(stride: u32) -> Option<Self> {
        (stride > 0).then_some(Self(stride))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SegmentStride {
    type Error = String;

    fn try_from(stride: u32) -> Result<Self, Self::Error> {
        SegmentStride::new(stride).ok_or_else(|| "segment_stride must be at least 1".to_string())
    }
}

impl From<SegmentStride> for u32 {
    fn from(stride: SegmentStride) -> Self {
        stride.0
    }
}

/// When the trip starts: calendar date plus hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Departure {
    date: NaiveDate,
    hour: u8,
}

impl Departure {
    pub fn new(date: NaiveDate, hour: u8) -> Result<Self, RouteError> {
        if hour > 23 {
            return Err(RouteError::InvalidDeparture(hour));
        }
        Ok(Self { date, hour })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn month(&self) -> u8 {
        self.date.month() as u8
    }
}

/// Exactly the four columns of [`FEATURE_NAMES`], nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureRecord {
    pub route_id: u32,
    pub segment_id: u32,
    pub start_hour: u8,
    pub month: u8,
}

impl FeatureRecord {
    pub fn build(
        route_id: u32,
        segment_index: u32,
        start_hour: u8,
        month: u8,
        stride: SegmentStride,
    ) -> Self {
        FeatureRecord {
            route_id,
            segment_id: segment_index * stride.get(),
            start_hour,
            month,
        }
    }

    /// Values in [`FEATURE_NAMES`] order.
    pub fn as_vector(&self) -> [f64; 4] {
        [
            self.route_id as f64,
            self.segment_id as f64,
            self.start_hour as f64,
            self.month as f64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_scales_by_stride() {
        for stride in [1u32, 2, 4, 7, 40] {
            let stride = SegmentStride::new(stride).unwrap();
            for index in 0..25u32 {
                let record = FeatureRecord::build(1, index, 14, 5, stride);
                assert_eq!(record.segment_id, index * stride.get());
            }
        }
    }

    #[test]
    fn test_record_passes_other_fields_through() {
        let record = FeatureRecord::build(2, 3, 8, 12, SegmentStride::new(4).unwrap());
        assert_eq!(
            record,
            FeatureRecord {
                route_id: 2,
                segment_id: 12,
                start_hour: 8,
                month: 12,
            }
        );
        assert_eq!(record.as_vector(), [2.0, 12.0, 8.0, 12.0]);
    }

    #[test]
    fn test_serialized_columns_match_feature_names() {
        let record = FeatureRecord::build(0, 1, 14, 1, SegmentStride::new(4).unwrap());
        let value = serde_json::to_value(record).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected = FEATURE_NAMES.to_vec();
        expected.sort();
        let mut keys = keys;
        keys.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(SegmentStride::new(0).is_none());
    }

    #[test]
    fn test_departure_validates_hour() {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15).unwrap();
        let departure = Departure::new(date, 23).unwrap();
        assert_eq!(departure.month(), 5);
        assert_eq!(departure.hour(), 23);
        assert!(matches!(
            Departure::new(date, 24),
            Err(RouteError::InvalidDeparture(24))
        ));
    }
}
