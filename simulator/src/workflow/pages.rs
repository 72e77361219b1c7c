use crate::generator::profile::{build_batch_from_config, GeneratorConfig};
use crate::generator::template::{
    ALERT_TREND, CAMERA_UPTIME, COVERAGE_MARKER, EMERGENCY_CALLS, FOOTER, LIVE_FEED,
    SUMMARY_CARDS, VEHICLE_MIX, VEHICLE_MIX_HOLE, ZONE_HEATMAP,
};
use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use trafficcore::insight::{export_notice, insight_bulletins, select_recommendation};
use trafficcore::model::{Selection, ViolationRecord};
use trafficcore::prelude::AggregationStage;
use trafficcore::processing::{CrossTab, LabelTotal, PivotStage, SelectionStage, SummaryStage};
use trafficcore::view::{
    DashboardView, GeoPoint, NoticeLevel, Page, Panel, Rgb, Section, SeriesPoint, TableRow,
};

/// A rendered page plus whether its selection filter came back empty.
pub struct PageOutcome {
    pub view: DashboardView,
    pub empty_selection: bool,
}

impl PageOutcome {
    fn plain(view: DashboardView) -> Self {
        Self {
            view,
            empty_selection: false,
        }
    }
}

fn stamp(now: NaiveDateTime) -> String {
    now.format("%I:%M:%S %p").to_string()
}

fn card(title: &str, value: impl ToString, caption: impl Into<String>) -> Panel {
    Panel::MetricCard {
        title: title.to_string(),
        value: value.to_string(),
        caption: caption.into(),
    }
}

/// Series labels walk back from `now`, oldest first.
fn timed_series(
    values: &[i64],
    now: NaiveDateTime,
    step: Duration,
    format: &str,
) -> Vec<SeriesPoint> {
    let last = values.len().saturating_sub(1) as i32;
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let at = now - step * (last - idx as i32);
            SeriesPoint::new(at.format(format).to_string(), *value as f64)
        })
        .collect()
}

/// The command-center page: every figure drawn from its own fixed range.
pub fn live_dashboard<R: Rng + ?Sized>(rng: &mut R, now: NaiveDateTime) -> PageOutcome {
    let mut view = DashboardView::new(Page::LiveDashboard, stamp(now));

    let cards = SUMMARY_CARDS
        .iter()
        .map(|template| {
            let sample = template.draw(rng);
            card(&sample.label, sample.value, template.caption)
        })
        .collect();
    view.push(Section::new(cards));

    let alerts = ALERT_TREND.sample(rng);
    view.push(Section::new(vec![
        card(CAMERA_UPTIME.0, CAMERA_UPTIME.1, CAMERA_UPTIME.2),
        card(
            EMERGENCY_CALLS.title,
            EMERGENCY_CALLS.sample(rng),
            EMERGENCY_CALLS.caption,
        ),
        Panel::LineChart {
            title: ALERT_TREND.title.to_string(),
            x_label: "Hour".into(),
            y_label: "Alerts".into(),
            color: Rgb::ORANGE,
            points: timed_series(&alerts, now, Duration::hours(1), "%H:%M"),
        },
        Panel::Map {
            title: "City Map Coverage".into(),
            markers: vec![GeoPoint {
                lat: COVERAGE_MARKER.0,
                lon: COVERAGE_MARKER.1,
            }],
        },
    ]));

    let feed = LIVE_FEED.sample(rng);
    view.push(Section::new(vec![Panel::LineChart {
        title: LIVE_FEED.title.to_string(),
        x_label: "Time".into(),
        y_label: "Violations".into(),
        color: Rgb::CYAN,
        points: timed_series(&feed, now, Duration::seconds(1), "%H:%M:%S"),
    }]));

    let heat = ZONE_HEATMAP
        .sample(rng)
        .into_iter()
        .map(|(zone, value)| SeriesPoint::new(zone, value as f64))
        .collect();
    let mix = VEHICLE_MIX
        .sample(rng)
        .into_iter()
        .map(|(kind, value)| SeriesPoint::new(kind, value as f64))
        .collect();
    view.push(Section::new(vec![
        Panel::BarChart {
            title: ZONE_HEATMAP.title.to_string(),
            color: Rgb::RED,
            bars: heat,
        },
        Panel::PieChart {
            title: VEHICLE_MIX.title.to_string(),
            hole: VEHICLE_MIX_HOLE,
            slices: mix,
        },
    ]));

    view.footer = Some(FOOTER.to_string());
    PageOutcome::plain(view)
}

fn pivot_table(table: &CrossTab) -> Panel {
    let rows = table
        .row_labels()
        .iter()
        .zip(table.rows())
        .map(|(label, cells)| TableRow {
            label: label.clone(),
            cells,
        })
        .collect();
    Panel::Table {
        title: "Zone vs Violation Type".into(),
        columns: table.column_labels().to_vec(),
        rows,
    }
}

fn run_stage<S: AggregationStage>(
    stage: &S,
    batch: &[ViolationRecord],
) -> anyhow::Result<S::Output> {
    stage
        .execute(batch)
        .with_context(|| format!("running {} stage on {} records", stage.name(), batch.len()))
}

fn leader_card(title: &str, leader: Option<&LabelTotal>, unit: &str) -> Panel {
    match leader {
        Some(total) => card(title, &total.label, format!("{} {}", total.count, unit)),
        None => card(title, "n/a", "no records"),
    }
}

/// The table-driven page: one generated batch feeds every panel.
pub fn zone_analysis<R: Rng + ?Sized>(
    rng: &mut R,
    generator: &GeneratorConfig,
    selection: &Selection,
    now: NaiveDateTime,
) -> anyhow::Result<PageOutcome> {
    let labels = &generator.labels;
    let batch = build_batch_from_config(rng, generator)?;

    let summary = run_stage(&SummaryStage::new(labels), &batch)?;
    let table = run_stage(&PivotStage::new(labels), &batch)?;
    let filter = SelectionStage::new(selection.clone(), labels);
    let grouped = run_stage(&filter, &batch)?;
    let selection = filter.selection();

    let mut view = DashboardView::new(Page::ZoneAnalysis, stamp(now));
    view.push(Section::with_heading(
        "Batch Overview",
        vec![
            card(
                "Total Violations",
                summary.total_violations,
                format!("{} records this render", summary.record_count),
            ),
            leader_card("Busiest Zone", summary.busiest_zone(), "violations"),
            leader_card("Peak Time", summary.peak_time_bucket(), "violations"),
            match summary.top_violation_type() {
                Some(top) => card(
                    "Top Violation",
                    &top.label,
                    format!("{:.1}% of total", summary.top_type_share()),
                ),
                None => card("Top Violation", "n/a", "no records"),
            },
        ],
    ));

    let zone_bars = table
        .row_labels()
        .iter()
        .zip(table.row_totals())
        .map(|(zone, total)| SeriesPoint::new(zone.as_str(), total as f64))
        .collect();
    view.push(Section::with_heading(
        "Violation Heatmap",
        vec![
            pivot_table(&table),
            Panel::BarChart {
                title: "Violations by Zone".into(),
                color: Rgb::RED,
                bars: zone_bars,
            },
        ],
    ));

    let empty_selection = grouped.is_empty();
    let selected_panel = if empty_selection {
        Panel::Notice {
            level: NoticeLevel::Info,
            message: format!(
                "No violations recorded for {} during {}.",
                selection.zone, selection.time_bucket
            ),
        }
    } else {
        Panel::BarChart {
            title: format!("Violation Types: {}", selection),
            color: Rgb::TEAL,
            bars: grouped
                .iter()
                .map(|entry| SeriesPoint::new(entry.violation_type.as_str(), entry.count as f64))
                .collect(),
        }
    };

    let recommendation = select_recommendation(&selection.zone, &selection.time_bucket);
    view.push(Section::with_heading(
        format!("Selected: {}", selection),
        vec![
            selected_panel,
            Panel::Notice {
                level: if recommendation.is_alert() {
                    NoticeLevel::Warning
                } else {
                    NoticeLevel::Success
                },
                message: recommendation.message().to_string(),
            },
        ],
    ));

    view.footer = Some(FOOTER.to_string());
    Ok(PageOutcome {
        view,
        empty_selection,
    })
}

pub fn ai_insights(now: NaiveDateTime) -> PageOutcome {
    let mut view = DashboardView::new(Page::AiInsights, stamp(now));
    view.push(Section::new(vec![Panel::Bullets {
        title: "Behavior Insights".into(),
        items: insight_bulletins(),
    }]));
    PageOutcome::plain(view)
}

pub fn export_pdf(now: NaiveDateTime) -> PageOutcome {
    let mut view = DashboardView::new(Page::ExportPdf, stamp(now));
    view.push(Section::new(vec![Panel::Notice {
        level: NoticeLevel::Info,
        message: export_notice().to_string(),
    }]));
    PageOutcome::plain(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn live_dashboard_lays_out_original_panels() {
        let mut rng = StdRng::seed_from_u64(4);
        let view = live_dashboard(&mut rng, noon()).view;

        assert_eq!(view.generated_at, "12:00:00 PM");
        assert_eq!(view.sections.len(), 4);
        assert_eq!(view.sections[0].panels.len(), 4);

        match view.find_panel("Vehicles on Road") {
            Some(Panel::MetricCard { value, .. }) => {
                let value: i64 = value.parse().unwrap();
                assert!((5500..=5800).contains(&value));
            }
            other => panic!("unexpected panel {:?}", other),
        }

        match view.find_panel("Alert Trends") {
            Some(Panel::LineChart { points, .. }) => {
                assert_eq!(points.len(), 10);
                assert_eq!(points.first().unwrap().label, "03:00");
                assert_eq!(points.last().unwrap().label, "12:00");
            }
            other => panic!("unexpected panel {:?}", other),
        }

        match view.find_panel("Live Violation Feed") {
            Some(Panel::LineChart { points, .. }) => {
                assert_eq!(points.len(), 30);
                assert_eq!(points.first().unwrap().label, "11:59:31");
            }
            other => panic!("unexpected panel {:?}", other),
        }

        assert!(matches!(
            view.find_panel("Violation by Vehicle Type"),
            Some(Panel::PieChart { slices, .. }) if slices.len() == 5
        ));
    }

    #[test]
    fn zone_analysis_table_conserves_batch_total() {
        let generator = GeneratorConfig::default();
        let selection = Selection::new("Zone B - School", "Morning");
        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = zone_analysis(&mut rng, &generator, &selection, noon()).unwrap();

            let total = match outcome.view.find_panel("Total Violations") {
                Some(Panel::MetricCard { value, .. }) => value.parse::<u64>().unwrap(),
                other => panic!("unexpected panel {:?}", other),
            };
            let table_total: u64 = match outcome.view.find_panel("Zone vs Violation Type") {
                Some(Panel::Table { rows, .. }) => {
                    rows.iter().flat_map(|row| row.cells.iter()).sum()
                }
                other => panic!("unexpected panel {:?}", other),
            };
            assert_eq!(total, table_total);

            let bar_total: f64 = match outcome.view.find_panel("Violations by Zone") {
                Some(Panel::BarChart { bars, .. }) => bars.iter().map(|bar| bar.value).sum(),
                other => panic!("unexpected panel {:?}", other),
            };
            assert_eq!(bar_total as u64, total);
        }
    }

    #[test]
    fn zone_analysis_shows_notice_for_empty_selection() {
        let generator = GeneratorConfig {
            record_count: 0,
            ..Default::default()
        };
        let selection = Selection::new("Zone E - Highway", "Evening");
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = zone_analysis(&mut rng, &generator, &selection, noon()).unwrap();

        assert!(outcome.empty_selection);
        let notices: Vec<_> = outcome.view.notices().collect();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].0, NoticeLevel::Info);
        assert!(notices[0].1.starts_with("No violations recorded"));
        assert_eq!(notices[1].0, NoticeLevel::Warning);
        assert!(notices[1].1.contains("Wrong-way"));
    }

    #[test]
    fn static_pages_need_no_randomness() {
        let insights = ai_insights(noon()).view;
        assert!(matches!(
            insights.find_panel("Behavior Insights"),
            Some(Panel::Bullets { items, .. }) if items.len() == 5
        ));

        let export = export_pdf(noon()).view;
        assert_eq!(export.notices().count(), 1);
    }
}
