use anyhow::Context;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use trafficcore::model::{LabelAxis, LabelSet, ViolationRecord};
use trafficcore::prelude::{
    DashboardError, DashboardResult, DEFAULT_RECORD_COUNT, MAX_RECORD_BATCH, MAX_RECORD_COUNT,
    MIN_RECORD_COUNT,
};

/// Configuration for generating a synthetic violation batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub record_count: usize,
    /// Fixed seed for reproducible renders; entropy is used when absent.
    pub seed: Option<u64>,
    pub labels: LabelSet,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            record_count: DEFAULT_RECORD_COUNT,
            seed: None,
            labels: LabelSet::default(),
            description: None,
            scenario: None,
        }
    }
}

impl GeneratorConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Rejects configs that cannot produce a batch: empty or duplicate
    /// labels, or a record count above [`MAX_RECORD_BATCH`].
    pub fn validate(&self) -> DashboardResult<()> {
        self.labels.validate()?;
        check_batch_size(self.record_count)
    }
}

fn check_batch_size(record_count: usize) -> DashboardResult<()> {
    if record_count > MAX_RECORD_BATCH {
        return Err(DashboardError::BatchTooLarge {
            requested: record_count,
            limit: MAX_RECORD_BATCH,
        });
    }
    Ok(())
}

/// Uniform draw from the inclusive range; reversed bounds are swapped.
pub fn next_metric<R: Rng + ?Sized>(rng: &mut R, lower: i64, upper: i64) -> i64 {
    let (low, high) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };
    rng.gen_range(low..=high)
}

fn pick<'a, R: Rng + ?Sized>(
    rng: &mut R,
    labels: &'a LabelSet,
    axis: LabelAxis,
) -> DashboardResult<&'a String> {
    labels
        .labels(axis)
        .choose(rng)
        .ok_or_else(|| DashboardError::EmptyLabels(axis.to_string()))
}

/// Draws `record_count` independent records: one label per axis, uniform
/// with replacement, and a count in the fixed per-record range.
pub fn generate_violation_batch<R: Rng + ?Sized>(
    rng: &mut R,
    labels: &LabelSet,
    record_count: usize,
) -> DashboardResult<Vec<ViolationRecord>> {
    check_batch_size(record_count)?;
    let mut batch = Vec::with_capacity(record_count);
    for _ in 0..record_count {
        let zone = pick(rng, labels, LabelAxis::Zone)?;
        let time_bucket = pick(rng, labels, LabelAxis::TimeBucket)?;
        let violation_type = pick(rng, labels, LabelAxis::ViolationType)?;
        let count = rng.gen_range(MIN_RECORD_COUNT..=MAX_RECORD_COUNT);
        batch.push(ViolationRecord::new(
            zone.as_str(),
            time_bucket.as_str(),
            violation_type.as_str(),
            count,
        ));
    }
    Ok(batch)
}

pub fn build_batch_from_config<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<ViolationRecord>> {
    config.validate().context("validating generator config")?;
    let batch = generate_violation_batch(rng, &config.labels, config.record_count)
        .context("generating violation batch")?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_metric_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for (lower, upper) in [(5500, 5800), (1000, 1200), (20, 30), (12, 16), (3, 3)] {
            for _ in 0..500 {
                let value = next_metric(&mut rng, lower, upper);
                assert!((lower..=upper).contains(&value));
            }
        }
    }

    #[test]
    fn next_metric_swaps_reversed_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let value = next_metric(&mut rng, 10, 5);
            assert!((5..=10).contains(&value));
        }
    }

    #[test]
    fn batches_respect_labels_and_count_range() {
        let labels = LabelSet::default();
        for seed in 0..25u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = generate_violation_batch(&mut rng, &labels, DEFAULT_RECORD_COUNT).unwrap();

            assert_eq!(batch.len(), DEFAULT_RECORD_COUNT);
            for record in &batch {
                assert!(labels.contains(LabelAxis::Zone, &record.zone));
                assert!(labels.contains(LabelAxis::TimeBucket, &record.time_bucket));
                assert!(labels.contains(LabelAxis::ViolationType, &record.violation_type));
                assert!((MIN_RECORD_COUNT..=MAX_RECORD_COUNT).contains(&record.count));
            }
        }
    }

    #[test]
    fn batch_honours_custom_record_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let batch = generate_violation_batch(&mut rng, &LabelSet::default(), 7).unwrap();
        assert_eq!(batch.len(), 7);
        assert!(generate_violation_batch(&mut rng, &LabelSet::default(), 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn same_seed_reproduces_batch() {
        let config = GeneratorConfig {
            seed: Some(42),
            ..Default::default()
        };
        let first = build_batch_from_config(&mut config.rng(), &config).unwrap();
        let second = build_batch_from_config(&mut config.rng(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn aggregations_conserve_generated_totals() {
        use trafficcore::model::Selection;
        use trafficcore::prelude::AggregationStage;
        use trafficcore::processing::{PivotStage, SelectionStage};

        let labels = LabelSet::default();
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let batch = generate_violation_batch(&mut rng, &labels, DEFAULT_RECORD_COUNT).unwrap();
            let batch_total: u64 = batch.iter().map(|r| u64::from(r.count)).sum();

            let table = PivotStage::new(&labels).execute(&batch).unwrap();
            assert_eq!(table.total(), batch_total);

            for zone in &labels.zones {
                for time_bucket in &labels.time_buckets {
                    let selection = Selection::new(zone.as_str(), time_bucket.as_str());
                    let expected: u64 = batch
                        .iter()
                        .filter(|r| r.matches(&selection))
                        .map(|r| u64::from(r.count))
                        .sum();
                    let grouped = SelectionStage::new(selection, &labels)
                        .execute(&batch)
                        .unwrap();
                    let grouped_total: u64 = grouped.iter().map(|entry| entry.count).sum();
                    assert_eq!(grouped_total, expected);
                    assert_eq!(grouped.is_empty(), expected == 0);
                }
            }
        }
    }

    #[test]
    fn empty_label_list_is_reported() {
        let config = GeneratorConfig {
            labels: LabelSet {
                zones: Vec::new(),
                ..LabelSet::default()
            },
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(build_batch_from_config(&mut rng, &config).is_err());

        let err = generate_violation_batch(&mut rng, &config.labels, 1).unwrap_err();
        assert_eq!(err, DashboardError::EmptyLabels("zone".into()));
    }

    #[test]
    fn oversized_batch_is_refused_before_allocating() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate_violation_batch(&mut rng, &LabelSet::default(), usize::MAX).unwrap_err();
        assert_eq!(
            err,
            DashboardError::BatchTooLarge {
                requested: usize::MAX,
                limit: MAX_RECORD_BATCH
            }
        );

        let config = GeneratorConfig {
            record_count: MAX_RECORD_BATCH + 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DashboardError::BatchTooLarge { .. })
        ));
        assert!(build_batch_from_config(&mut rng, &config).is_err());

        let at_limit = GeneratorConfig {
            record_count: MAX_RECORD_BATCH,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }
}
