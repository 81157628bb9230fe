//! Simulation metrics.

use std::collections::{BTreeMap, VecDeque};

/// Simulation metrics.
#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    /// Total groups evaluated.
    pub total_evaluations: u64,
    /// Groups approved.
    pub approved: u64,
    /// Groups rejected.
    pub rejected: u64,
    /// Evaluations whose verdict differed from the expected one.
    pub mismatches: u64,
    /// Rejections by code.
    rejections_by_code: BTreeMap<&'static str, u64>,
    /// Evaluation time samples (ns).
    latency_samples: VecDeque<u64>,
    /// Maximum samples to keep.
    max_samples: usize,
}

impl SimulationMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self {
            total_evaluations: 0,
            approved: 0,
            rejected: 0,
            mismatches: 0,
            rejections_by_code: BTreeMap::new(),
            latency_samples: VecDeque::with_capacity(10000),
            max_samples: 10000,
        }
    }

    /// Record an approved group.
    pub fn record_approval(&mut self, latency_ns: u64) {
        self.total_evaluations += 1;
        self.approved += 1;
        self.record_latency(latency_ns);
    }

    /// Record a rejected group.
    pub fn record_rejection(&mut self, code: &'static str, latency_ns: u64) {
        self.total_evaluations += 1;
        self.rejected += 1;
        *self.rejections_by_code.entry(code).or_insert(0) += 1;
        self.record_latency(latency_ns);
    }

    /// Record a verdict that differed from the expectation.
    pub fn record_mismatch(&mut self) {
        self.mismatches += 1;
    }

    fn record_latency(&mut self, latency_ns: u64) {
        if self.latency_samples.len() >= self.max_samples {
            self.latency_samples.pop_front();
        }
        self.latency_samples.push_back(latency_ns);
    }

    /// Rejection counts by code.
    pub fn rejections_by_code(&self) -> &BTreeMap<&'static str, u64> {
        &self.rejections_by_code
    }

    /// Get average evaluation time in ns.
    pub fn average_latency_ns(&self) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let sum: u128 = self.latency_samples.iter().map(|&ns| u128::from(ns)).sum();
        (sum / self.latency_samples.len() as u128) as u64
    }

    /// Get p99 evaluation time.
    pub fn p99_latency_ns(&self) -> u64 {
        if self.latency_samples.is_empty() {
            return 0;
        }

        let mut sorted: Vec<_> = self.latency_samples.iter().copied().collect();
        sorted.sort_unstable();

        let idx = (sorted.len() * 99 / 100).min(sorted.len() - 1);
        sorted[idx]
    }

    /// Get approval rate.
    pub fn approval_rate(&self) -> f64 {
        if self.total_evaluations == 0 {
            return 0.0;
        }

        self.approved as f64 / self.total_evaluations as f64
    }
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::new()
    }
}
