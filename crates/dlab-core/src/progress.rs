//! Progress aggregation over found/fixed counts.

use serde::Serialize;

use crate::events::Reporter;

/// Percentage of fixed scenarios, `0.0..=100.0`.
///
/// Returns `0.0` while nothing is fixed, which also covers `found == 0`.
pub fn compute_progress(found: usize, fixed: usize) -> f64 {
    if fixed > 0 && found > 0 {
        (fixed as f64 / found as f64) * 100.0
    } else {
        0.0
    }
}

/// Container-level aggregate counters.
///
/// Panels only ever write into this through [`Reporter`]; the displayed
/// percentage is recomputed from the stored counts on every
/// `report_progress_changed`, never from a panel's in-flight view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Counters {
    pub found: usize,
    pub fixed: usize,
    progress: f64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last computed percentage.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Percentage rounded for display.
    pub fn progress_rounded(&self) -> u32 {
        self.progress.round() as u32
    }
}

impl Reporter for Counters {
    fn report_found(&mut self, count: usize) {
        self.found = count;
    }

    fn report_fixed(&mut self, count: usize) {
        self.fixed = count;
    }

    fn report_progress_changed(&mut self) {
        self.progress = compute_progress(self.found, self.fixed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_when_nothing_fixed() {
        assert_eq!(compute_progress(0, 0), 0.0);
        assert_eq!(compute_progress(4, 0), 0.0);
        assert_eq!(compute_progress(100, 0), 0.0);
    }

    #[test]
    fn hundred_when_everything_fixed() {
        assert_eq!(compute_progress(4, 4), 100.0);
        assert_eq!(compute_progress(1, 1), 100.0);
    }

    #[test]
    fn monotonic_in_fixed() {
        let found = 7;
        let mut last = compute_progress(found, 0);
        for fixed in 1..=found {
            let next = compute_progress(found, fixed);
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn counters_recompute_on_progress_report() {
        let mut counters = Counters::new();
        counters.report_found(4);
        counters.report_fixed(1);
        // Not recomputed until the progress report arrives.
        assert_eq!(counters.progress(), 0.0);
        counters.report_progress_changed();
        assert_eq!(counters.progress(), 25.0);
        assert_eq!(counters.progress_rounded(), 25);
    }

    #[test]
    fn rounding_matches_display() {
        let mut counters = Counters::new();
        counters.report_found(3);
        counters.report_fixed(2);
        counters.report_progress_changed();
        assert_eq!(counters.progress_rounded(), 67);
    }
}
