use crate::view::Page;
use serde::{Deserialize, Serialize};

/// Body of `POST /render`; a missing field falls back to the bridge's
/// active configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderRequest {
    #[serde(default)]
    pub page: Option<Page>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub time_bucket: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_request_leaves_missing_fields_empty() {
        let request: RenderRequest =
            serde_json::from_str(r#"{"page":"ai-insights","seed":4}"#).unwrap();
        assert_eq!(request.page, Some(Page::AiInsights));
        assert_eq!(request.seed, Some(4));
        assert!(request.zone.is_none() && request.time_bucket.is_none());
    }
}
