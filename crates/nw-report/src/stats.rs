//! Per-metric descriptive statistics.

use serde::Serialize;

/// Summary of one metric over a set of records.
///
/// `total` counts every record in the set; `known` counts the records
/// whose measurement succeeded. The moments are taken over the known
/// values only and are absent when nothing is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub total: usize,
    pub known: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

/// Summarize one metric column.
pub fn summarize(values: &[Option<f64>]) -> MetricSummary {
    let known: Vec<f64> = values.iter().copied().flatten().collect();
    if known.is_empty() {
        return MetricSummary {
            total: values.len(),
            known: 0,
            mean: None,
            min: None,
            max: None,
            std_dev: None,
        };
    }

    let count = known.len() as f64;
    let mean = known.iter().sum::<f64>() / count;
    let min = known.iter().copied().fold(f64::INFINITY, f64::min);
    let max = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = known.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;

    MetricSummary {
        total: values.len(),
        known: known.len(),
        mean: Some(mean),
        min: Some(min),
        max: Some(max),
        std_dev: Some(variance.sqrt()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_plain_values() {
        let s = summarize(&[Some(20.0), Some(25.0), Some(30.0), Some(22.0), Some(28.0)]);
        assert_eq!(s.total, 5);
        assert_eq!(s.known, 5);
        assert!((s.mean.unwrap() - 25.0).abs() < 1e-9);
        assert_eq!(s.min, Some(20.0));
        assert_eq!(s.max, Some(30.0));
        assert!(s.std_dev.unwrap() > 0.0);
    }

    #[test]
    fn test_summarize_skips_unknowns() {
        let s = summarize(&[Some(10.0), None, Some(20.0), None]);
        assert_eq!(s.total, 4);
        assert_eq!(s.known, 2);
        assert_eq!(s.mean, Some(15.0));
        assert_eq!(s.min, Some(10.0));
        assert_eq!(s.max, Some(20.0));
    }

    #[test]
    fn test_summarize_all_unknown() {
        let s = summarize(&[None, None, None]);
        assert_eq!(s.total, 3);
        assert_eq!(s.known, 0);
        assert_eq!(s.mean, None);
        assert_eq!(s.std_dev, None);
    }

    #[test]
    fn test_summarize_single_value_has_zero_spread() {
        let s = summarize(&[Some(42.0)]);
        assert_eq!(s.mean, Some(42.0));
        assert_eq!(s.min, Some(42.0));
        assert_eq!(s.max, Some(42.0));
        assert_eq!(s.std_dev, Some(0.0));
    }
}
