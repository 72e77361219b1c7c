//! Render description for the dashboard pages.
//!
//! A `DashboardView` is plain data: sections of panels with their values
//! already filled in. Presentation layers (the text report, the desktop
//! viewer) read it and never call back into the generators.

pub mod request;
pub mod text;

pub use request::RenderRequest;

use crate::prelude::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    LiveDashboard,
    ZoneAnalysis,
    AiInsights,
    ExportPdf,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::LiveDashboard,
        Page::ZoneAnalysis,
        Page::AiInsights,
        Page::ExportPdf,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Page::LiveDashboard => "live-dashboard",
            Page::ZoneAnalysis => "zone-analysis",
            Page::AiInsights => "ai-insights",
            Page::ExportPdf => "export-pdf",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::LiveDashboard => "City AI Core - Traffic Command Center",
            Page::ZoneAnalysis => "Zone Violation Analysis",
            Page::AiInsights => "AI Behavior Insights",
            Page::ExportPdf => "Export Dashboard to PDF",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Page::LiveDashboard => "Live Dashboard",
            Page::ZoneAnalysis => "Zone Analysis",
            Page::AiInsights => "AI Insights",
            Page::ExportPdf => "Export PDF (Soon)",
        };
        f.write_str(label)
    }
}

impl FromStr for Page {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Page::ALL
            .iter()
            .copied()
            .find(|page| page.slug() == wanted)
            .ok_or_else(|| DashboardError::UnknownPage(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const ORANGE: Rgb = Rgb::new(255, 165, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const TEAL: Rgb = Rgb::new(0, 255, 225);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A single display instruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    MetricCard {
        title: String,
        value: String,
        caption: String,
    },
    LineChart {
        title: String,
        x_label: String,
        y_label: String,
        color: Rgb,
        points: Vec<SeriesPoint>,
    },
    BarChart {
        title: String,
        color: Rgb,
        bars: Vec<SeriesPoint>,
    },
    PieChart {
        title: String,
        hole: f32,
        slices: Vec<SeriesPoint>,
    },
    Table {
        title: String,
        columns: Vec<String>,
        rows: Vec<TableRow>,
    },
    Map {
        title: String,
        markers: Vec<GeoPoint>,
    },
    Bullets {
        title: String,
        items: Vec<String>,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
}

impl Panel {
    pub fn title(&self) -> Option<&str> {
        match self {
            Panel::MetricCard { title, .. }
            | Panel::LineChart { title, .. }
            | Panel::BarChart { title, .. }
            | Panel::PieChart { title, .. }
            | Panel::Table { title, .. }
            | Panel::Map { title, .. }
            | Panel::Bullets { title, .. } => Some(title),
            Panel::Notice { .. } => None,
        }
    }
}

/// A row of panels, optionally under a heading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Section {
    pub heading: Option<String>,
    pub panels: Vec<Panel>,
}

impl Section {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            heading: None,
            panels,
        }
    }

    pub fn with_heading(heading: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            heading: Some(heading.into()),
            panels,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub page: Page,
    pub title: String,
    pub generated_at: String,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl DashboardView {
    pub fn new(page: Page, generated_at: impl Into<String>) -> Self {
        Self {
            page,
            title: page.title().to_string(),
            generated_at: generated_at.into(),
            sections: Vec::new(),
            footer: None,
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.sections.iter().flat_map(|section| section.panels.iter())
    }

    pub fn find_panel(&self, title: &str) -> Option<&Panel> {
        self.panels().find(|panel| panel.title() == Some(title))
    }

    pub fn notices(&self) -> impl Iterator<Item = (NoticeLevel, &str)> {
        self.panels().filter_map(|panel| match panel {
            Panel::Notice { level, message } => Some((*level, message.as_str())),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
