use crate::generator::profile::GeneratorConfig;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::pages::{self, PageOutcome};
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use std::sync::Arc;
use trafficcore::model::{LabelSet, Selection};
use trafficcore::telemetry::{LogManager, MetricsRecorder, RenderMetrics};
use trafficcore::view::{DashboardView, Page};

/// Drives one render per call: fresh data, no state carried between renders
/// beyond the counters.
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
            logger: LogManager::new("runner"),
        }
    }

    /// Same counters, different generator settings.
    pub fn with_generator(&self, generator: GeneratorConfig) -> Self {
        Self {
            config: WorkflowConfig {
                generator,
                ..self.config.clone()
            },
            metrics: self.metrics.clone(),
            logger: LogManager::new("runner"),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelSet {
        &self.config.generator.labels
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.metrics.snapshot()
    }

    pub fn record_rejected(&self) {
        self.metrics.record_rejected();
    }

    /// Renders the configured page with the configured selection and seed.
    pub fn execute(&self) -> anyhow::Result<DashboardView> {
        let selection = self.config.resolve_selection()?;
        let mut rng = self.config.generator.rng();
        self.render(
            &mut rng,
            self.config.page,
            &selection,
            Local::now().naive_local(),
        )
    }

    pub fn render<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        page: Page,
        selection: &Selection,
        now: NaiveDateTime,
    ) -> anyhow::Result<DashboardView> {
        let outcome: PageOutcome = match page {
            Page::LiveDashboard => pages::live_dashboard(rng, now),
            Page::ZoneAnalysis => {
                pages::zone_analysis(rng, &self.config.generator, selection, now)?
            }
            Page::AiInsights => pages::ai_insights(now),
            Page::ExportPdf => pages::export_pdf(now),
        };

        self.metrics.record_render();
        if outcome.empty_selection {
            self.metrics.record_empty_selection();
            self.logger
                .trace(&format!("empty selection for {}", selection));
        }
        self.logger.record(&format!(
            "rendered {} ({} sections)",
            page.slug(),
            outcome.view.sections.len()
        ));
        Ok(outcome.view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn runner_executes_every_page() {
        let runner = Runner::new(WorkflowConfig::from_args(Page::LiveDashboard, Some(3), 100));
        let selection = runner.config().resolve_selection().unwrap();
        for page in Page::ALL {
            let mut rng = StdRng::seed_from_u64(3);
            let view = runner
                .render(&mut rng, page, &selection, fixed_time())
                .unwrap();
            assert_eq!(view.page, page);
            assert!(!view.sections.is_empty());
        }
        assert_eq!(runner.metrics().renders, Page::ALL.len());
    }

    #[test]
    fn seeded_renders_are_reproducible() {
        let runner = Runner::new(WorkflowConfig::from_args(Page::ZoneAnalysis, Some(21), 100));
        let selection = Selection::new("Zone B - School", "Morning");
        let first = runner
            .render(
                &mut StdRng::seed_from_u64(21),
                Page::ZoneAnalysis,
                &selection,
                fixed_time(),
            )
            .unwrap();
        let second = runner
            .render(
                &mut StdRng::seed_from_u64(21),
                Page::ZoneAnalysis,
                &selection,
                fixed_time(),
            )
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_selection_is_counted() {
        let runner = Runner::new(WorkflowConfig::from_args(Page::ZoneAnalysis, Some(0), 0));
        let view = runner.execute().unwrap();
        assert_eq!(view.page, Page::ZoneAnalysis);
        assert_eq!(runner.metrics().empty_selections, 1);
    }

    #[test]
    fn with_generator_shares_counters() {
        let runner = Runner::new(WorkflowConfig::default());
        let derived = runner.with_generator(GeneratorConfig {
            record_count: 5,
            seed: Some(1),
            ..Default::default()
        });
        derived.execute().unwrap();
        assert_eq!(derived.config().generator.record_count, 5);
        assert_eq!(runner.metrics().renders, 1);
    }
}
