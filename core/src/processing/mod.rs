pub mod index;
pub mod pivot;
pub mod selection;
pub mod summary;

pub use index::LabelIndex;
pub use pivot::{CrossTab, PivotStage};
pub use selection::{SelectionStage, TypeCount};
pub use summary::{BatchSummary, LabelTotal, SummaryStage};
