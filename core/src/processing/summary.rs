use crate::math::stats::StatsHelper;
use crate::model::{LabelSet, ViolationRecord};
use crate::prelude::{AggregationStage, DashboardResult};
use crate::processing::index::LabelIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelTotal {
    pub label: String,
    pub count: u64,
}

/// Headline figures derived from a batch rather than drawn independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub record_count: usize,
    pub total_violations: u64,
    pub zone_totals: Vec<LabelTotal>,
    pub time_bucket_totals: Vec<LabelTotal>,
    pub type_totals: Vec<LabelTotal>,
}

impl BatchSummary {
    pub fn busiest_zone(&self) -> Option<&LabelTotal> {
        leader(&self.zone_totals)
    }

    pub fn peak_time_bucket(&self) -> Option<&LabelTotal> {
        leader(&self.time_bucket_totals)
    }

    pub fn top_violation_type(&self) -> Option<&LabelTotal> {
        leader(&self.type_totals)
    }

    /// Share of the leading violation type in the total, as a percentage.
    pub fn top_type_share(&self) -> f64 {
        self.top_violation_type()
            .map(|top| StatsHelper::share_percent(top.count, self.total_violations))
            .unwrap_or(0.0)
    }
}

fn leader(totals: &[LabelTotal]) -> Option<&LabelTotal> {
    if totals.iter().all(|total| total.count == 0) {
        return None;
    }
    let counts: Vec<u64> = totals.iter().map(|total| total.count).collect();
    StatsHelper::argmax(&counts).and_then(|idx| totals.get(idx))
}

fn totals_by<F>(seed: &[String], batch: &[ViolationRecord], key: F) -> Vec<LabelTotal>
where
    F: Fn(&ViolationRecord) -> &str,
{
    let mut index = LabelIndex::new(seed);
    let mut sums = vec![0u64; index.len()];
    for record in batch {
        let position = index.position_or_insert(key(record));
        if position >= sums.len() {
            sums.resize(position + 1, 0);
        }
        sums[position] += u64::from(record.count);
    }
    index
        .into_labels()
        .into_iter()
        .zip(sums)
        .map(|(label, count)| LabelTotal { label, count })
        .collect()
}

/// Per-axis totals of a batch; every known label appears, zero or not.
pub struct SummaryStage {
    labels: LabelSet,
}

impl SummaryStage {
    pub fn new(labels: &LabelSet) -> Self {
        Self {
            labels: labels.clone(),
        }
    }
}

impl AggregationStage for SummaryStage {
    type Output = BatchSummary;

    fn name(&self) -> &'static str {
        "summary"
    }

    fn execute(&self, batch: &[ViolationRecord]) -> DashboardResult<BatchSummary> {
        let zone_totals = totals_by(&self.labels.zones, batch, |r| r.zone.as_str());
        let time_bucket_totals =
            totals_by(&self.labels.time_buckets, batch, |r| r.time_bucket.as_str());
        let type_totals = totals_by(&self.labels.violation_types, batch, |r| {
            r.violation_type.as_str()
        });
        let counts: Vec<u64> = batch.iter().map(|r| u64::from(r.count)).collect();

        Ok(BatchSummary {
            record_count: batch.len(),
            total_violations: StatsHelper::total(&counts),
            zone_totals,
            time_bucket_totals,
            type_totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_leaders_by_summed_count() {
        let batch = vec![
            ViolationRecord::new("Zone B - School", "Morning", "Helmet", 9),
            ViolationRecord::new("Zone B - School", "Evening", "Helmet", 3),
            ViolationRecord::new("Zone E - Highway", "Evening", "Wrong Way", 8),
        ];
        let summary = SummaryStage::new(&LabelSet::default())
            .execute(&batch)
            .unwrap();

        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.total_violations, 20);
        assert_eq!(summary.zone_totals.len(), 5);
        assert_eq!(summary.busiest_zone().unwrap().label, "Zone B - School");
        assert_eq!(summary.peak_time_bucket().unwrap().label, "Evening");
        assert_eq!(summary.top_violation_type().unwrap().count, 12);
        assert_eq!(summary.top_type_share(), 60.0);
    }

    #[test]
    fn empty_batch_has_no_leaders() {
        let summary = SummaryStage::new(&LabelSet::default())
            .execute(&[])
            .unwrap();
        assert_eq!(summary.total_violations, 0);
        assert!(summary.busiest_zone().is_none());
        assert_eq!(summary.top_type_share(), 0.0);
    }
}
