use crate::model::{LabelSet, Selection, ViolationRecord};
use crate::prelude::{AggregationStage, DashboardResult};
use crate::processing::index::LabelIndex;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeCount {
    pub violation_type: String,
    pub count: u64,
}

/// Filters a batch on an exact (zone, time bucket) match and sums counts
/// per violation type. Only types that occur in the filtered subset are
/// returned; an empty result is a normal outcome.
pub struct SelectionStage {
    selection: Selection,
    violation_types: Vec<String>,
    logger: LogManager,
}

impl SelectionStage {
    pub fn new(selection: Selection, labels: &LabelSet) -> Self {
        Self {
            selection,
            violation_types: labels.violation_types.clone(),
            logger: LogManager::new("selection"),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

impl AggregationStage for SelectionStage {
    type Output = Vec<TypeCount>;

    fn name(&self) -> &'static str {
        "selection"
    }

    fn execute(&self, batch: &[ViolationRecord]) -> DashboardResult<Vec<TypeCount>> {
        let mut types = LabelIndex::new(&self.violation_types);
        let mut sums: Vec<Option<u64>> = vec![None; types.len()];

        for record in batch.iter().filter(|record| record.matches(&self.selection)) {
            let position = types.position_or_insert(&record.violation_type);
            if position >= sums.len() {
                sums.resize(position + 1, None);
            }
            let slot = sums[position].get_or_insert(0);
            *slot += u64::from(record.count);
        }

        let grouped: Vec<TypeCount> = types
            .into_labels()
            .into_iter()
            .zip(sums)
            .filter_map(|(violation_type, sum)| {
                sum.map(|count| TypeCount {
                    violation_type,
                    count,
                })
            })
            .collect();

        if grouped.is_empty() {
            self.logger
                .trace(&format!("no records for {}", self.selection));
        }
        Ok(grouped)
    }
}
