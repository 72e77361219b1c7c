use crate::generator::profile::next_metric;
use rand::Rng;
use trafficcore::model::MetricSample;

/// A headline card whose value is redrawn on every render.
#[derive(Debug, Clone, Copy)]
pub struct MetricTemplate {
    pub title: &'static str,
    pub lower: i64,
    pub upper: i64,
    pub caption: &'static str,
}

impl MetricTemplate {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        next_metric(rng, self.lower, self.upper)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> MetricSample {
        MetricSample::new(self.title, self.sample(rng))
    }
}

pub const SUMMARY_CARDS: [MetricTemplate; 4] = [
    MetricTemplate {
        title: "Vehicles on Road",
        lower: 5500,
        upper: 5800,
        caption: "↑ 7.5% today",
    },
    MetricTemplate {
        title: "Detected Violations",
        lower: 1000,
        upper: 1200,
        caption: "↑ 12% since yesterday",
    },
    MetricTemplate {
        title: "AI Rules Triggered",
        lower: 20,
        upper: 30,
        caption: "+5 school zones",
    },
    MetricTemplate {
        title: "Zones Monitored",
        lower: 12,
        upper: 16,
        caption: "6 pending review",
    },
];

pub const EMERGENCY_CALLS: MetricTemplate = MetricTemplate {
    title: "Emergency Calls",
    lower: 6,
    upper: 10,
    caption: "Avg. Duration: 11m",
};

pub const CAMERA_UPTIME: (&str, &str, &str) = ("Camera Uptime", "Live: 96.7%", "Offline: 3 zones");

/// A fixed-length series with independent draws per point.
#[derive(Debug, Clone, Copy)]
pub struct SeriesTemplate {
    pub title: &'static str,
    pub points: usize,
    pub lower: i64,
    pub upper: i64,
}

impl SeriesTemplate {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<i64> {
        (0..self.points)
            .map(|_| next_metric(rng, self.lower, self.upper))
            .collect()
    }
}

/// Hourly alert counts ending at render time.
pub const ALERT_TREND: SeriesTemplate = SeriesTemplate {
    title: "Alert Trends",
    points: 10,
    lower: 5,
    upper: 20,
};

/// Per-second violation counts ending at render time.
pub const LIVE_FEED: SeriesTemplate = SeriesTemplate {
    title: "Live Violation Feed",
    points: 30,
    lower: 10,
    upper: 60,
};

/// One draw per category label.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTemplate {
    pub title: &'static str,
    pub categories: &'static [&'static str],
    pub lower: i64,
    pub upper: i64,
}

impl CategoryTemplate {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(&'static str, i64)> {
        self.categories
            .iter()
            .map(|category| (*category, next_metric(rng, self.lower, self.upper)))
            .collect()
    }
}

pub const ZONE_HEATMAP: CategoryTemplate = CategoryTemplate {
    title: "Violation Heatmap",
    categories: &["School", "Market", "Highway", "Bus Stand", "Residential"],
    lower: 30,
    upper: 100,
};

pub const VEHICLE_MIX: CategoryTemplate = CategoryTemplate {
    title: "Violation by Vehicle Type",
    categories: &["2-Wheelers", "Cars", "Autos", "Buses", "Trucks"],
    lower: 50,
    upper: 200,
};

pub const VEHICLE_MIX_HOLE: f32 = 0.3;

/// City map coverage marker (lat, lon).
pub const COVERAGE_MARKER: (f64, f64) = (27.4705, 94.9125);

pub const FOOTER: &str = "Built by Scintinova | Demo UI | © 2025";

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn series_templates_produce_expected_lengths() {
        let mut rng = StdRng::seed_from_u64(11);
        let alerts = ALERT_TREND.sample(&mut rng);
        assert_eq!(alerts.len(), 10);
        assert!(alerts.iter().all(|v| (5..=20).contains(v)));

        let feed = LIVE_FEED.sample(&mut rng);
        assert_eq!(feed.len(), 30);
        assert!(feed.iter().all(|v| (10..=60).contains(v)));
    }

    #[test]
    fn category_templates_cover_every_label() {
        let mut rng = StdRng::seed_from_u64(5);
        let zones = ZONE_HEATMAP.sample(&mut rng);
        assert_eq!(zones.len(), 5);
        assert_eq!(zones[3].0, "Bus Stand");
        assert!(zones.iter().all(|(_, v)| (30..=100).contains(v)));

        let mix = VEHICLE_MIX.sample(&mut rng);
        assert!(mix.iter().all(|(_, v)| (50..=200).contains(v)));
    }

    #[test]
    fn summary_cards_stay_within_ranges() {
        let mut rng = StdRng::seed_from_u64(99);
        for card in SUMMARY_CARDS.iter().chain([&EMERGENCY_CALLS]) {
            let value = card.sample(&mut rng);
            assert!(value >= card.lower && value <= card.upper, "{}", card.title);
        }
    }
}
