/// Arithmetic mean of a slice of values. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Largest value. `None` for empty input.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Rounds to one decimal place, exact halves to the even digit. Never
/// returns `-0.0`.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0 + 0.0
}
