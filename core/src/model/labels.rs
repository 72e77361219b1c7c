use crate::prelude::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_ZONES: [&str; 5] = [
    "Zone A - Market",
    "Zone B - School",
    "Zone C - Hospital",
    "Zone D - Residential",
    "Zone E - Highway",
];

pub const DEFAULT_TIME_BUCKETS: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];

pub const DEFAULT_VIOLATION_TYPES: [&str; 4] = ["Helmet", "Red Light", "Wrong Way", "Speeding"];

/// One of the three categorical columns of a violation record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LabelAxis {
    Zone,
    TimeBucket,
    ViolationType,
}

impl fmt::Display for LabelAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LabelAxis::Zone => "zone",
            LabelAxis::TimeBucket => "time bucket",
            LabelAxis::ViolationType => "violation type",
        };
        f.write_str(name)
    }
}

/// Ordered label lists the generator samples from and the dashboards index by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelSet {
    pub zones: Vec<String>,
    pub time_buckets: Vec<String>,
    pub violation_types: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self {
            zones: to_owned(&DEFAULT_ZONES),
            time_buckets: to_owned(&DEFAULT_TIME_BUCKETS),
            violation_types: to_owned(&DEFAULT_VIOLATION_TYPES),
        }
    }
}

fn to_owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

impl LabelSet {
    pub fn new(
        zones: Vec<String>,
        time_buckets: Vec<String>,
        violation_types: Vec<String>,
    ) -> DashboardResult<Self> {
        let labels = Self {
            zones,
            time_buckets,
            violation_types,
        };
        labels.validate()?;
        Ok(labels)
    }

    /// Rejects empty lists and repeated labels on any axis.
    pub fn validate(&self) -> DashboardResult<()> {
        for axis in [
            LabelAxis::Zone,
            LabelAxis::TimeBucket,
            LabelAxis::ViolationType,
        ] {
            let labels = self.labels(axis);
            if labels.is_empty() {
                return Err(DashboardError::EmptyLabels(axis.to_string()));
            }
            let mut seen = HashSet::with_capacity(labels.len());
            for label in labels {
                if !seen.insert(label.as_str()) {
                    return Err(DashboardError::DuplicateLabel {
                        axis: axis.to_string(),
                        label: label.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn labels(&self, axis: LabelAxis) -> &[String] {
        match axis {
            LabelAxis::Zone => &self.zones,
            LabelAxis::TimeBucket => &self.time_buckets,
            LabelAxis::ViolationType => &self.violation_types,
        }
    }

    pub fn contains(&self, axis: LabelAxis, label: &str) -> bool {
        self.labels(axis).iter().any(|known| known == label)
    }

    /// Builds a selection after checking both labels against this set.
    pub fn selection(&self, zone: &str, time_bucket: &str) -> DashboardResult<Selection> {
        self.require(LabelAxis::Zone, zone)?;
        self.require(LabelAxis::TimeBucket, time_bucket)?;
        Ok(Selection::new(zone, time_bucket))
    }

    /// First zone and first time bucket, mirroring untouched dropdowns.
    pub fn default_selection(&self) -> DashboardResult<Selection> {
        let zone = self
            .zones
            .first()
            .ok_or_else(|| DashboardError::EmptyLabels(LabelAxis::Zone.to_string()))?;
        let time_bucket = self
            .time_buckets
            .first()
            .ok_or_else(|| DashboardError::EmptyLabels(LabelAxis::TimeBucket.to_string()))?;
        Ok(Selection::new(zone.as_str(), time_bucket.as_str()))
    }

    fn require(&self, axis: LabelAxis, label: &str) -> DashboardResult<()> {
        if self.contains(axis, label) {
            Ok(())
        } else {
            Err(DashboardError::UnknownLabel {
                axis: axis.to_string(),
                label: label.to_string(),
            })
        }
    }
}

/// The (zone, time bucket) pair picked through the two dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub zone: String,
    pub time_bucket: String,
}

impl Selection {
    pub fn new(zone: impl Into<String>, time_bucket: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            time_bucket: time_bucket.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.zone, self.time_bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_label_set_is_valid() {
        let labels = LabelSet::default();
        assert!(labels.validate().is_ok());
        assert_eq!(labels.zones.len(), 5);
        assert_eq!(labels.time_buckets.len(), 4);
        assert_eq!(labels.violation_types.len(), 4);
    }

    #[test]
    fn empty_and_duplicate_lists_are_rejected() {
        let err = LabelSet::new(vec![], vec!["Morning".into()], vec!["Helmet".into()]).unwrap_err();
        assert_eq!(err, DashboardError::EmptyLabels("zone".into()));

        let err = LabelSet::new(
            vec!["Zone A".into()],
            vec!["Night".into(), "Night".into()],
            vec!["Helmet".into()],
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::DuplicateLabel { .. }));
    }

    #[test]
    fn selection_checks_membership() {
        let labels = LabelSet::default();
        let selection = labels.selection("Zone B - School", "Morning").unwrap();
        assert_eq!(selection.to_string(), "Zone B - School / Morning");

        let err = labels.selection("Zone Z", "Morning").unwrap_err();
        assert_eq!(
            err,
            DashboardError::UnknownLabel {
                axis: "zone".into(),
                label: "Zone Z".into()
            }
        );
    }

    #[test]
    fn default_selection_uses_first_labels() {
        let selection = LabelSet::default().default_selection().unwrap();
        assert_eq!(selection, Selection::new("Zone A - Market", "Morning"));
    }
}
