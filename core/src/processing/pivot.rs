use crate::model::{LabelSet, ViolationRecord};
use crate::prelude::{AggregationStage, DashboardResult};
use crate::processing::index::LabelIndex;
use crate::telemetry::log::LogManager;
use ndarray::{Array2, Axis};

/// Zone × violation-type table of summed counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    cells: Array2<u64>,
}

impl CrossTab {
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<u64> {
        let r = self.row_labels.iter().position(|label| label == row)?;
        let c = self.column_labels.iter().position(|label| label == column)?;
        self.cells.get((r, c)).copied()
    }

    pub fn total(&self) -> u64 {
        self.cells.sum()
    }

    /// Per-zone sums, in row-label order.
    pub fn row_totals(&self) -> Vec<u64> {
        self.cells.sum_axis(Axis(1)).to_vec()
    }

    /// Cells as nested rows, in row-label order.
    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }
}

/// Groups a batch by (zone, violation type) and sums the counts.
pub struct PivotStage {
    rows: Vec<String>,
    columns: Vec<String>,
    logger: LogManager,
}

impl PivotStage {
    pub fn new(labels: &LabelSet) -> Self {
        Self {
            rows: labels.zones.clone(),
            columns: labels.violation_types.clone(),
            logger: LogManager::new("pivot"),
        }
    }
}

impl AggregationStage for PivotStage {
    type Output = CrossTab;

    fn name(&self) -> &'static str {
        "pivot"
    }

    fn execute(&self, batch: &[ViolationRecord]) -> DashboardResult<CrossTab> {
        let mut rows = LabelIndex::new(&self.rows);
        let mut columns = LabelIndex::new(&self.columns);

        let placed: Vec<(usize, usize, u64)> = batch
            .iter()
            .map(|record| {
                (
                    rows.position_or_insert(&record.zone),
                    columns.position_or_insert(&record.violation_type),
                    u64::from(record.count),
                )
            })
            .collect();

        let mut cells = Array2::<u64>::zeros((rows.len(), columns.len()));
        for (row, column, count) in placed {
            cells[[row, column]] += count;
        }

        let table = CrossTab {
            row_labels: rows.into_labels(),
            column_labels: columns.into_labels(),
            cells,
        };
        self.logger.trace(&format!(
            "pivoted {} records into {}x{} cells, total {}",
            batch.len(),
            table.row_labels.len(),
            table.column_labels.len(),
            table.total()
        ));
        Ok(table)
    }
}
