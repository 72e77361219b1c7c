use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counts renders and empty selection results across a process lifetime.
pub struct MetricsRecorder {
    inner: Mutex<RenderMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMetrics {
    pub renders: usize,
    pub empty_selections: usize,
    pub rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RenderMetrics::default()),
        }
    }

    pub fn record_render(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.renders += 1;
        }
    }

    pub fn record_empty_selection(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.empty_selections += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn snapshot(&self) -> RenderMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            RenderMetrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_each_event() {
        let recorder = MetricsRecorder::new();
        recorder.record_render();
        recorder.record_render();
        recorder.record_empty_selection();
        recorder.record_rejected();
        assert_eq!(
            recorder.snapshot(),
            RenderMetrics {
                renders: 2,
                empty_selections: 1,
                rejected: 1,
            }
        );
    }
}
