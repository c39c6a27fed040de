//! Metric summary statistics.
//!
//! Raw measurement series come back from Atlas as sparse sample lists
//! (missing values are `null` on the wire). Reduction to summary
//! statistics is pure so the safety evaluator can be tested without any
//! network access.

/// Summary statistics over one metric's lookback window.
///
/// `samples == 0` means the series was empty or every sample was null.
/// Such a summary is all zeroes, which no threshold rule triggers on —
/// callers must treat it as inconclusive-safe, not verified-safe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSummary {
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Number of non-null samples the summary was computed from.
    pub samples: usize,
}

impl MetricSummary {
    /// True when no samples backed this summary.
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }
}

/// The four summaries the safety evaluator consumes for one shard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardMetrics {
    /// CPU user utilization, percent.
    pub cpu: MetricSummary,
    /// Resident memory, GB.
    pub memory_gb: MetricSummary,
    /// Disk IOPS (reads + writes).
    pub iops: MetricSummary,
    /// Open connection count.
    pub connections: MetricSummary,
}

impl ShardMetrics {
    /// True when every series came back empty.
    pub fn is_inconclusive(&self) -> bool {
        self.cpu.is_empty()
            && self.memory_gb.is_empty()
            && self.iops.is_empty()
            && self.connections.is_empty()
    }
}

/// Reduce a sample series to summary statistics, dropping null samples.
///
/// Standard deviation is the population form (divide by N, not N-1), and
/// 0 when fewer than two samples remain.
pub fn summarize(samples: &[Option<f64>]) -> MetricSummary {
    summarize_with(samples, |v| v)
}

/// Like [`summarize`] but applies `transform` to each non-null sample
/// before reduction (e.g. bytes → GB).
pub fn summarize_with<F>(samples: &[Option<f64>], transform: F) -> MetricSummary
where
    F: Fn(f64) -> f64,
{
    let values: Vec<f64> = samples.iter().flatten().map(|&v| transform(v)).collect();
    if values.is_empty() {
        return MetricSummary::default();
    }

    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let std_dev = if values.len() > 1 {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    } else {
        0.0
    };

    MetricSummary {
        max,
        mean,
        std_dev,
        samples: values.len(),
    }
}
