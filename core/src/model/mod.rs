pub mod labels;
pub mod record;

pub use labels::{LabelAxis, LabelSet, Selection};
pub use record::{MetricSample, ViolationRecord};
