//! Summary statistics over a program's sampled output.

use serde::{Deserialize, Serialize};

/// Running summary of raw and rectified sample values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeStats {
    pub samples: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub mean_rectified: f64,
}

impl ProbeStats {
    pub fn new() -> Self {
        Self {
            samples: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            mean: 0.0,
            mean_rectified: 0.0,
        }
    }

    /// Fold one sample into the summary.
    pub fn record(&mut self, raw: f64, rectified: f64) {
        self.samples += 1;
        self.min = self.min.min(raw);
        self.max = self.max.max(raw);
        // Incremental mean; both terms are scaled first so saturated inputs cannot overflow.
        let n = self.samples as f64;
        self.mean += raw / n - self.mean / n;
        self.mean_rectified += rectified / n - self.mean_rectified / n;
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// True when every summary field is a finite number.
    pub fn is_finite(&self) -> bool {
        !self.is_empty()
            && self.min.is_finite()
            && self.max.is_finite()
            && self.mean.is_finite()
            && self.mean_rectified.is_finite()
    }
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = ProbeStats::new();
        assert!(stats.is_empty());
        assert!(!stats.is_finite());
    }

    #[test]
    fn test_record_samples() {
        let mut stats = ProbeStats::new();
        stats.record(-1.0, 0.0);
        stats.record(3.0, 1.0);
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.mean - 1.0).abs() < 1e-12);
        assert!((stats.mean_rectified - 0.5).abs() < 1e-12);
        assert!(stats.is_finite());
    }

    #[test]
    fn test_saturated_samples_stay_finite() {
        let mut stats = ProbeStats::new();
        stats.record(f64::MAX, 1.0);
        stats.record(f64::MAX, 1.0);
        stats.record(f64::MAX, 1.0);
        stats.record(f64::MIN, 0.0);
        assert!(stats.is_finite());
    }
}
