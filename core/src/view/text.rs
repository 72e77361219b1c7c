use crate::view::{DashboardView, NoticeLevel, Panel, SeriesPoint};
use std::fmt::{self, Write};

const BAR_WIDTH: f64 = 30.0;

/// Plain-text report used by the offline driver.
impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        writeln!(f, "Last updated: {}", self.generated_at)?;
        for section in &self.sections {
            writeln!(f)?;
            if let Some(heading) = &section.heading {
                writeln!(f, "-- {} --", heading)?;
            }
            for panel in &section.panels {
                write_panel(f, panel)?;
            }
        }
        if let Some(footer) = &self.footer {
            writeln!(f)?;
            writeln!(f, "{}", footer)?;
        }
        Ok(())
    }
}

fn write_panel(out: &mut impl Write, panel: &Panel) -> fmt::Result {
    match panel {
        Panel::MetricCard {
            title,
            value,
            caption,
        } => writeln!(out, "[{}] {} ({})", title, value, caption),
        Panel::LineChart {
            title,
            x_label,
            y_label,
            points,
            ..
        } => {
            writeln!(out, "{} ({} vs {})", title, y_label, x_label)?;
            let values: Vec<String> = points
                .iter()
                .map(|point| format!("{}={}", point.label, point.value))
                .collect();
            writeln!(out, "  {}", values.join(" "))
        }
        Panel::BarChart { title, bars, .. } => {
            writeln!(out, "{}", title)?;
            write_bars(out, bars)
        }
        Panel::PieChart { title, slices, .. } => {
            writeln!(out, "{}", title)?;
            let total: f64 = slices.iter().map(|slice| slice.value).sum();
            for slice in slices {
                let share = if total > 0.0 {
                    slice.value * 100.0 / total
                } else {
                    0.0
                };
                writeln!(out, "  {:<14} {:>6} ({:.1}%)", slice.label, slice.value, share)?;
            }
            Ok(())
        }
        Panel::Table {
            title,
            columns,
            rows,
        } => {
            writeln!(out, "{}", title)?;
            write!(out, "  {:<22}", "")?;
            for column in columns {
                write!(out, "{:>11}", column)?;
            }
            writeln!(out)?;
            for row in rows {
                write!(out, "  {:<22}", row.label)?;
                for cell in &row.cells {
                    write!(out, "{:>11}", cell)?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
        Panel::Map { title, markers } => {
            let coords: Vec<String> = markers
                .iter()
                .map(|marker| format!("({:.4}, {:.4})", marker.lat, marker.lon))
                .collect();
            writeln!(out, "{}: {}", title, coords.join(", "))
        }
        Panel::Bullets { title, items } => {
            writeln!(out, "{}", title)?;
            for item in items {
                writeln!(out, "  - {}", item)?;
            }
            Ok(())
        }
        Panel::Notice { level, message } => {
            let tag = match level {
                NoticeLevel::Info => "info",
                NoticeLevel::Success => "ok",
                NoticeLevel::Warning => "warn",
            };
            writeln!(out, "({}) {}", tag, message)
        }
    }
}

fn write_bars(out: &mut impl Write, bars: &[SeriesPoint]) -> fmt::Result {
    let max = bars.iter().map(|bar| bar.value).fold(0.0, f64::max);
    for bar in bars {
        let width = if max > 0.0 {
            (bar.value / max * BAR_WIDTH).round() as usize
        } else {
            0
        };
        writeln!(out, "  {:<22} {:<30} {}", bar.label, "#".repeat(width), bar.value)?;
    }
    Ok(())
}
