use crate::model::ViolationRecord;

/// Number of records generated per render unless configured otherwise.
pub const DEFAULT_RECORD_COUNT: usize = 100;

/// Inclusive bounds for the per-record violation count.
pub const MIN_RECORD_COUNT: u32 = 1;
pub const MAX_RECORD_COUNT: u32 = 20;

/// Upper bound on records generated for a single render.
pub const MAX_RECORD_BATCH: usize = 100_000;

/// Common error type for label validation and lookups.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("label list for {0} is empty")]
    EmptyLabels(String),
    #[error("duplicate {axis} label: {label}")]
    DuplicateLabel { axis: String, label: String },
    #[error("unknown {axis} label: {label}")]
    UnknownLabel { axis: String, label: String },
    #[error("unknown page: {0}")]
    UnknownPage(String),
    #[error("batch of {requested} records exceeds the limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Trait describing a pure aggregation over one generated batch.
pub trait AggregationStage {
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&self, batch: &[ViolationRecord]) -> DashboardResult<Self::Output>;
}
