use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, pick_list, row, scrollable, text, text_input, Column, Container, Row,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Size, Subscription, Task,
    Theme,
};
use serde::Deserialize;
use std::{f32::consts::PI, time::Duration};
use trafficcore::model::{LabelSet, Selection};
use trafficcore::telemetry::RenderMetrics;
use trafficcore::view::{
    DashboardView, NoticeLevel, Page, Panel, RenderRequest, Rgb, Section, SeriesPoint,
};

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

const SLICE_COLORS: [Color; 5] = [
    Color::from_rgb(0.0, 0.9, 0.88),
    Color::from_rgb(0.95, 0.55, 0.2),
    Color::from_rgb(0.9, 0.2, 0.35),
    Color::from_rgb(0.45, 0.4, 0.95),
    Color::from_rgb(0.3, 0.85, 0.4),
];

const CANVAS_BACKGROUND: Color = Color::from_rgb(0.06, 0.06, 0.14);

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "City AI Core - Violation Dashboard".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_secs(1)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    payload: Option<DashboardPayload>,
    page: Page,
    zone: Option<String>,
    time_bucket: Option<String>,
    seed: String,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PayloadFetched(Result<DashboardPayload, String>),
    PageSelected(Page),
    ZoneSelected(String),
    TimeBucketSelected(String),
    SeedChanged(String),
    SubmitRender,
    RenderSubmitted(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                payload: None,
                page: Page::LiveDashboard,
                zone: None,
                time_bucket: None,
                seed: String::new(),
                status: "Waiting for dashboard...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_payload(), Message::PayloadFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_payload(), Message::PayloadFetched),
            Message::PayloadFetched(Ok(payload)) => {
                state.adopt_selection(&payload);
                state.status = payload.status.clone();
                state.payload = Some(payload);
                Task::none()
            }
            Message::PayloadFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::PageSelected(page) => {
                state.page = page;
                Task::none()
            }
            Message::ZoneSelected(zone) => {
                state.zone = Some(zone);
                Task::none()
            }
            Message::TimeBucketSelected(bucket) => {
                state.time_bucket = Some(bucket);
                Task::none()
            }
            Message::SeedChanged(value) => {
                state.seed = value;
                Task::none()
            }
            Message::SubmitRender => {
                let request = RenderRequest {
                    page: Some(state.page),
                    zone: state.zone.clone(),
                    time_bucket: state.time_bucket.clone(),
                    seed: state.seed.trim().parse().ok(),
                };
                Task::perform(post_render(request), Message::RenderSubmitted)
            }
            Message::RenderSubmitted(Ok(message)) => {
                state.push_history(format!("{} requested", state.page));
                state.status = message;
                Task::none()
            }
            Message::RenderSubmitted(Err(err)) => {
                state.status = format!("Render error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let labels = state
            .payload
            .as_ref()
            .map(|payload| payload.labels.clone())
            .unwrap_or_default();

        let metrics_line = state
            .payload
            .as_ref()
            .map(|payload| {
                format!(
                    "Renders {} | empty selections {} | rejected {}",
                    payload.metrics.renders,
                    payload.metrics.empty_selections,
                    payload.metrics.rejected
                )
            })
            .unwrap_or_else(|| "Renders: n/a".into());

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let sidebar = column![
            text("Navigation").size(26),
            pick_list(Page::ALL.to_vec(), Some(state.page), Message::PageSelected)
                .width(Length::Fill),
            text("Zone").size(14),
            pick_list(labels.zones.clone(), state.zone.clone(), Message::ZoneSelected)
                .placeholder("Select zone")
                .width(Length::Fill),
            text("Time of day").size(14),
            pick_list(
                labels.time_buckets.clone(),
                state.time_bucket.clone(),
                Message::TimeBucketSelected
            )
            .placeholder("Select time bucket")
            .width(Length::Fill),
            text_input("Seed (blank = random)", &state.seed)
                .on_input(Message::SeedChanged)
                .padding(6),
            button("Render").on_press(Message::SubmitRender).padding(10),
            text(&state.status).size(14),
            text(metrics_line).size(12),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(120.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(300.0));

        let dashboard = match state.payload.as_ref().and_then(|p| p.view.as_ref()) {
            Some(view) => dashboard_view(view),
            None => column![text("No dashboard rendered yet").size(18)].into(),
        };

        let layout = row![sidebar, scrollable(dashboard).width(Length::Fill)]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Seeds the dropdowns from the bridge until the user picks something.
    fn adopt_selection(&mut self, payload: &DashboardPayload) {
        let fallback = payload.selection.clone().or_else(|| {
            Some(Selection::new(
                payload.labels.zones.first()?.as_str(),
                payload.labels.time_buckets.first()?.as_str(),
            ))
        });
        if let Some(selection) = fallback {
            if self.zone.is_none() {
                self.zone = Some(selection.zone);
            }
            if self.time_bucket.is_none() {
                self.time_bucket = Some(selection.time_bucket);
            }
        }
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn dashboard_view(view: &DashboardView) -> Element<'_, Message> {
    let header = column![
        text(view.title.clone()).size(28),
        text(format!("Last updated: {}", view.generated_at)).size(12),
    ]
    .spacing(4);

    let body = view
        .sections
        .iter()
        .fold(Column::new().spacing(18).push(header), |col, section| {
            col.push(section_view(section))
        });

    let body = match &view.footer {
        Some(footer) => body.push(text(footer.clone()).size(12)),
        None => body,
    };
    body.padding(8).width(Length::Fill).into()
}

fn section_view(section: &Section) -> Element<'_, Message> {
    let panels = section
        .panels
        .iter()
        .fold(Row::new().spacing(12), |row, panel| {
            row.push(Container::new(panel_view(panel)).padding(10).width(Length::Fill))
        });

    match &section.heading {
        Some(heading) => column![text(heading.clone()).size(20), panels]
            .spacing(8)
            .into(),
        None => panels.into(),
    }
}

fn panel_view(panel: &Panel) -> Element<'_, Message> {
    match panel {
        Panel::MetricCard {
            title,
            value,
            caption,
        } => column![
            text(title.clone()).size(16),
            text(value.clone()).size(24),
            text(caption.clone()).size(12),
        ]
        .spacing(4)
        .into(),
        Panel::LineChart {
            title,
            x_label,
            y_label,
            color,
            points,
        } => column![
            text(title.clone()).size(16),
            Canvas::new(LineChart {
                values: values_of(points),
                color: to_color(*color),
            })
            .width(Length::Fill)
            .height(Length::Fixed(180.0)),
            text(format!(
                "{} ({} → {}) vs {}",
                y_label,
                points.first().map(|p| p.label.as_str()).unwrap_or("-"),
                points.last().map(|p| p.label.as_str()).unwrap_or("-"),
                x_label
            ))
            .size(12),
        ]
        .spacing(6)
        .into(),
        Panel::BarChart { title, color, bars } => column![
            text(title.clone()).size(16),
            Canvas::new(BarChart {
                values: values_of(bars),
                color: to_color(*color),
            })
            .width(Length::Fill)
            .height(Length::Fixed(180.0)),
            legend(bars),
        ]
        .spacing(6)
        .into(),
        Panel::PieChart {
            title,
            hole,
            slices,
        } => column![
            text(title.clone()).size(16),
            Canvas::new(PieChart {
                values: values_of(slices),
                hole: *hole,
            })
            .width(Length::Fill)
            .height(Length::Fixed(200.0)),
            legend(slices),
        ]
        .spacing(6)
        .into(),
        Panel::Table {
            title,
            columns,
            rows,
        } => {
            let header = format!("{:<22}{}", "", padded(columns.iter().map(String::as_str)));
            let table = rows.iter().fold(
                Column::new().spacing(2).push(text(header).size(12)),
                |col, row| {
                    let cells = row.cells.iter().map(|cell| cell.to_string()).collect::<Vec<_>>();
                    col.push(
                        text(format!(
                            "{:<22}{}",
                            row.label,
                            padded(cells.iter().map(String::as_str))
                        ))
                        .size(12),
                    )
                },
            );
            column![text(title.clone()).size(16), table].spacing(6).into()
        }
        Panel::Map { title, markers } => {
            let markers = markers.iter().fold(Column::new().spacing(2), |col, marker| {
                col.push(text(format!("lat {:.4}, lon {:.4}", marker.lat, marker.lon)).size(12))
            });
            column![text(title.clone()).size(16), markers].spacing(6).into()
        }
        Panel::Bullets { title, items } => {
            let items = items.iter().fold(Column::new().spacing(4), |col, item| {
                col.push(text(format!("• {}", item)).size(14))
            });
            column![text(title.clone()).size(18), items].spacing(6).into()
        }
        Panel::Notice { level, message } => {
            let tag = match level {
                NoticeLevel::Info => "ℹ",
                NoticeLevel::Success => "✔",
                NoticeLevel::Warning => "⚠",
            };
            text(format!("{} {}", tag, message)).size(16).into()
        }
    }
}

fn padded<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(|cell| format!("{:>11}", cell)).collect()
}

fn legend(points: &[SeriesPoint]) -> Column<'_, Message> {
    points.iter().fold(Column::new().spacing(2), |col, point| {
        col.push(text(format!("{}: {}", point.label, point.value)).size(12))
    })
}

fn values_of(points: &[SeriesPoint]) -> Vec<f32> {
    points.iter().map(|point| point.value as f32).collect()
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.r, rgb.g, rgb.b)
}

async fn fetch_payload() -> Result<DashboardPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/payload"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<DashboardPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_render(request: RenderRequest) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/render"))
        .json(&request)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Render requested".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardPayload {
    #[serde(default)]
    view: Option<DashboardView>,
    #[serde(default)]
    labels: LabelSet,
    #[serde(default)]
    selection: Option<Selection>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    metrics: RenderMetrics,
}

fn background(renderer: &Renderer, bounds: Rectangle) -> Frame {
    let mut frame = Frame::new(renderer, bounds.size());
    frame.fill_rectangle(Point::ORIGIN, bounds.size(), CANVAS_BACKGROUND);
    frame
}

#[derive(Clone)]
struct LineChart {
    values: Vec<f32>,
    color: Color,
}

impl canvas::Program<Message> for LineChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);

        if self.values.len() > 1 {
            let min = self.values.iter().cloned().fold(f32::INFINITY, f32::min);
            let max = self.values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let range = (max - min).max(1.0);
            let step = bounds.width / (self.values.len() as f32 - 1.0);
            let path = Path::new(|builder| {
                for (i, value) in self.values.iter().enumerate() {
                    let x = i as f32 * step;
                    let y = bounds.height - (value - min) / range * (bounds.height - 8.0) - 4.0;
                    if i == 0 {
                        builder.move_to(Point::new(x, y));
                    } else {
                        builder.line_to(Point::new(x, y));
                    }
                }
            });
            frame.stroke(
                &path,
                Stroke::default().with_width(2.5).with_color(self.color),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct BarChart {
    values: Vec<f32>,
    color: Color,
}

impl canvas::Program<Message> for BarChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);

        let max = self.values.iter().cloned().fold(0.0, f32::max);
        if !self.values.is_empty() && max > 0.0 {
            let slot = bounds.width / self.values.len() as f32;
            let bar_width = slot * 0.7;
            for (i, value) in self.values.iter().enumerate() {
                let height = value / max * (bounds.height - 8.0);
                let x = i as f32 * slot + (slot - bar_width) / 2.0;
                frame.fill_rectangle(
                    Point::new(x, bounds.height - height),
                    Size::new(bar_width, height),
                    self.color,
                );
            }
        }

        vec![frame.into_geometry()]
    }
}

#[derive(Clone)]
struct PieChart {
    values: Vec<f32>,
    hole: f32,
}

impl canvas::Program<Message> for PieChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = background(renderer, bounds);

        let total: f32 = self.values.iter().sum();
        if total > 0.0 {
            let center = Point::new(bounds.width / 2.0, bounds.height / 2.0);
            let radius = bounds.width.min(bounds.height) / 2.0 - 8.0;
            let mut start = -PI / 2.0;

            for (i, value) in self.values.iter().enumerate() {
                let sweep = value / total * 2.0 * PI;
                let steps = ((sweep / (2.0 * PI)) * 64.0).ceil().max(2.0) as usize;
                let wedge = Path::new(|builder| {
                    builder.move_to(center);
                    for step in 0..=steps {
                        let angle = start + sweep * step as f32 / steps as f32;
                        builder.line_to(Point::new(
                            center.x + radius * angle.cos(),
                            center.y + radius * angle.sin(),
                        ));
                    }
                    builder.close();
                });
                frame.fill(&wedge, SLICE_COLORS[i % SLICE_COLORS.len()]);
                start += sweep;
            }

            if self.hole > 0.0 {
                let hole = Path::new(|builder| builder.circle(center, radius * self.hole));
                frame.fill(&hole, CANVAS_BACKGROUND);
            }
        }

        vec![frame.into_geometry()]
    }
}
