//! Data model, aggregations and render description for the synthetic
//! traffic violation dashboard.
//!
//! Nothing in this crate owns a random source or touches global state:
//! generators live in the simulator, which passes batches in and receives
//! plain values back.

pub mod insight;
pub mod math;
pub mod model;
pub mod prelude;
pub mod processing;
pub mod telemetry;
pub mod view;

pub use prelude::{AggregationStage, DashboardError, DashboardResult};
