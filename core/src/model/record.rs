use crate::model::labels::Selection;
use serde::{Deserialize, Serialize};

/// One synthetic violation row: three categorical labels and a count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViolationRecord {
    pub zone: String,
    pub time_bucket: String,
    pub violation_type: String,
    pub count: u32,
}

impl ViolationRecord {
    pub fn new(
        zone: impl Into<String>,
        time_bucket: impl Into<String>,
        violation_type: impl Into<String>,
        count: u32,
    ) -> Self {
        Self {
            zone: zone.into(),
            time_bucket: time_bucket.into(),
            violation_type: violation_type.into(),
            count,
        }
    }

    /// Exact match on both zone and time bucket.
    pub fn matches(&self, selection: &Selection) -> bool {
        self.zone == selection.zone && self.time_bucket == selection.time_bucket
    }
}

/// A labeled scalar drawn for a single render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricSample {
    pub label: String,
    pub value: i64,
}

impl MetricSample {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_matches_requires_both_labels() {
        let record = ViolationRecord::new("Zone A - Market", "Night", "Helmet", 3);
        assert!(record.matches(&Selection::new("Zone A - Market", "Night")));
        assert!(!record.matches(&Selection::new("Zone A - Market", "Morning")));
        assert!(!record.matches(&Selection::new("Zone B - School", "Night")));
    }
}
