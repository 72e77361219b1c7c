use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use trafficcore::model::Selection;
use trafficcore::view::Page;

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

fn default_report_path() -> PathBuf {
    PathBuf::from("tools/data/offline_dashboard.log")
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Dropdown state; the first zone and time bucket are used when absent.
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            page: Page::default(),
            generator: GeneratorConfig::default(),
            selection: None,
            bind_address: default_bind_address(),
            report_path: default_report_path(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .generator
            .validate()
            .with_context(|| format!("validating generator in {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(page: Page, seed: Option<u64>, record_count: usize) -> Self {
        Self {
            page,
            generator: GeneratorConfig {
                seed,
                record_count,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Applies dropdown overrides. A missing half keeps the configured value
    /// (or the default); the result is checked by `resolve_selection`.
    pub fn override_selection(&mut self, zone: Option<String>, time_bucket: Option<String>) {
        if zone.is_none() && time_bucket.is_none() {
            return;
        }
        let current = self.selection.clone();
        let labels = &self.generator.labels;
        let zone = zone
            .or_else(|| current.as_ref().map(|s| s.zone.clone()))
            .or_else(|| labels.zones.first().cloned())
            .unwrap_or_default();
        let time_bucket = time_bucket
            .or_else(|| current.as_ref().map(|s| s.time_bucket.clone()))
            .or_else(|| labels.time_buckets.first().cloned())
            .unwrap_or_default();
        self.selection = Some(Selection::new(zone, time_bucket));
    }

    /// Resolves the configured selection against the label set.
    pub fn resolve_selection(&self) -> anyhow::Result<Selection> {
        let labels = &self.generator.labels;
        let selection = match &self.selection {
            Some(selection) => labels.selection(&selection.zone, &selection.time_bucket)?,
            None => labels.default_selection()?,
        };
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use trafficcore::prelude::DashboardError;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_carries_generator_overrides() {
        let cfg = WorkflowConfig::from_args(Page::ZoneAnalysis, Some(9), 40);
        assert_eq!(cfg.page, Page::ZoneAnalysis);
        assert_eq!(cfg.generator.seed, Some(9));
        assert_eq!(cfg.generator.record_count, 40);
        assert_eq!(cfg.bind_address.port(), 9000);
        assert_eq!(
            cfg.resolve_selection().unwrap(),
            Selection::new("Zone A - Market", "Morning")
        );
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"page: zone-analysis\n\
generator:\n  record_count: 50\n  seed: 7\n\
selection:\n  zone: Zone E - Highway\n  time_bucket: Evening\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.page, Page::ZoneAnalysis);
        assert_eq!(cfg.generator.record_count, 50);
        assert_eq!(cfg.generator.seed, Some(7));
        assert_eq!(cfg.generator.labels.zones.len(), 5);
        assert_eq!(
            cfg.resolve_selection().unwrap(),
            Selection::new("Zone E - Highway", "Evening")
        );
    }

    #[test]
    fn config_load_rejects_empty_labels() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"generator:\n  labels:\n    zones: []\n    time_buckets: [Night]\n    violation_types: [Helmet]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn config_load_rejects_oversized_batch() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"generator:\n  record_count: 100000000000\n")
            .unwrap();
        let path = temp.into_temp_path();
        let err = WorkflowConfig::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::BatchTooLarge { .. })
        ));
    }

    #[test]
    fn overrides_replace_stale_selection() {
        let mut cfg = WorkflowConfig {
            selection: Some(Selection::new("Zone Q", "Dusk")),
            ..Default::default()
        };
        cfg.override_selection(Some("Zone B - School".into()), Some("Morning".into()));
        assert_eq!(
            cfg.resolve_selection().unwrap(),
            Selection::new("Zone B - School", "Morning")
        );
    }

    #[test]
    fn partial_override_keeps_other_half() {
        let mut cfg = WorkflowConfig {
            selection: Some(Selection::new("Zone E - Highway", "Evening")),
            ..Default::default()
        };
        cfg.override_selection(None, Some("Night".into()));
        assert_eq!(
            cfg.resolve_selection().unwrap(),
            Selection::new("Zone E - Highway", "Night")
        );

        let mut fresh = WorkflowConfig::default();
        fresh.override_selection(Some("Zone C - Hospital".into()), None);
        assert_eq!(
            fresh.resolve_selection().unwrap(),
            Selection::new("Zone C - Hospital", "Morning")
        );

        let mut stale = WorkflowConfig {
            selection: Some(Selection::new("Zone Q", "Dusk")),
            ..Default::default()
        };
        stale.override_selection(Some("Zone A - Market".into()), None);
        assert!(stale.resolve_selection().is_err());
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let cfg = WorkflowConfig {
            selection: Some(Selection::new("Zone Q", "Morning")),
            ..Default::default()
        };
        assert!(cfg.resolve_selection().is_err());
    }
}
