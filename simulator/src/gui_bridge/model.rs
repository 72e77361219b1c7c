use serde::{Deserialize, Serialize};
use trafficcore::model::{LabelSet, Selection};
use trafficcore::telemetry::RenderMetrics;
use trafficcore::view::DashboardView;

/// Latest render served to the viewer, plus what it needs to build dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub view: Option<DashboardView>,
    pub labels: LabelSet,
    pub selection: Option<Selection>,
    pub status: String,
    pub metrics: RenderMetrics,
}

impl VisualizationModel {
    pub fn new(labels: LabelSet) -> Self {
        Self {
            labels,
            status: "Waiting for first render...".into(),
            ..Default::default()
        }
    }
}
