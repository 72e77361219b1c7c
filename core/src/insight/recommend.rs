use serde::{Deserialize, Serialize};

/// Fixed advisory shown in the recommendation panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HelmetEnforcement,
    WrongWayPatrol,
    Stable,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::HelmetEnforcement => {
                "High helmet violations expected near schools in the morning. \
                 Deploy officers at school entry points."
            }
            Recommendation::WrongWayPatrol => {
                "Wrong-way driving spikes on the highway in the evening. \
                 Activate dynamic signage and highway patrol units."
            }
            Recommendation::Stable => {
                "Violation levels are stable for this zone and time window. \
                 Continue routine monitoring."
            }
        }
    }

    pub fn is_alert(&self) -> bool {
        !matches!(self, Recommendation::Stable)
    }
}

/// (zone, time bucket) → advisory; anything unlisted falls through to `Stable`.
const RULES: [(&str, &str, Recommendation); 2] = [
    ("Zone B - School", "Morning", Recommendation::HelmetEnforcement),
    ("Zone E - Highway", "Evening", Recommendation::WrongWayPatrol),
];

pub fn select_recommendation(zone: &str, time_bucket: &str) -> Recommendation {
    RULES
        .iter()
        .find(|(rule_zone, rule_bucket, _)| *rule_zone == zone && *rule_bucket == time_bucket)
        .map(|(_, _, recommendation)| *recommendation)
        .unwrap_or(Recommendation::Stable)
}
