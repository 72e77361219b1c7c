use crate::generator::profile::GeneratorConfig;
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};
use tokio::runtime::Builder;
use trafficcore::model::Selection;
use trafficcore::prelude::DashboardError;
use trafficcore::view::{DashboardView, Page, RenderRequest};
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<VisualizationModel>>;
type SharedGenerator = Arc<RwLock<GeneratorConfig>>;

const BODY_LIMIT: u64 = 16 * 1024;

fn read_model(state: &SharedModel) -> RwLockReadGuard<'_, VisualizationModel> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_model(state: &SharedModel) -> RwLockWriteGuard<'_, VisualizationModel> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

fn active_generator(generator: &SharedGenerator) -> GeneratorConfig {
    generator
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Bridge that hosts the dashboard HTTP endpoint and renders on request.
///
/// The active generator config starts as the workflow's and is replaced by
/// `/ingest-config`; renders and the advertised labels both follow it.
pub struct GuiBridge {
    state: SharedModel,
    generator: SharedGenerator,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let generator = runner.config().generator.clone();
        let state = Arc::new(RwLock::new(VisualizationModel::new(
            generator.labels.clone(),
        )));
        Self {
            state,
            generator: Arc::new(RwLock::new(generator)),
            runner,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        routes(
            self.state.clone(),
            self.generator.clone(),
            self.runner.clone(),
        )
    }

    /// Serves the routes on a background thread with its own runtime.
    pub fn spawn(&self, address: SocketAddr) -> anyhow::Result<()> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building runtime for the HTTP bridge")?;
        let routes = self.routes();
        thread::Builder::new()
            .name("gui-bridge".into())
            .spawn(move || {
                runtime.block_on(async move {
                    warp::serve(routes).run(address).await;
                });
            })
            .context("spawning HTTP bridge thread")?;
        info!("HTTP bridge listening on http://{}", address);
        Ok(())
    }

    pub fn publish(&self, view: &DashboardView, selection: Option<&Selection>) {
        let generator = active_generator(&self.generator);
        store(
            &self.state,
            &self.runner,
            &generator,
            view.clone(),
            selection.cloned(),
        );
        println!(
            "[GUI] {} published: {} sections",
            view.page,
            view.sections.len()
        );
    }

    pub fn publish_status(&self, message: &str) {
        write_model(&self.state).status = message.to_string();
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        read_model(&self.state).clone()
    }
}

fn store(
    state: &SharedModel,
    runner: &Runner,
    generator: &GeneratorConfig,
    view: DashboardView,
    selection: Option<Selection>,
) {
    let mut guard = write_model(state);
    guard.status = format!("{} rendered at {}", view.page, view.generated_at);
    guard.view = Some(view);
    if selection.is_some() {
        guard.selection = selection;
    }
    guard.labels = generator.labels.clone();
    guard.metrics = runner.metrics();
}

fn routes(
    state: SharedModel,
    generator: SharedGenerator,
    runner: Arc<Runner>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let generator_filter = warp::any().map(move || generator.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let payload_route = warp::path("payload")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| warp::reply::json(&*read_model(&state)));

    let render_route = warp::path("render")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(state_filter.clone())
        .and(generator_filter.clone())
        .and(runner_filter.clone())
        .and_then(handle_render);

    let generator_route = warp::path("ingest-config")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(state_filter)
        .and(generator_filter)
        .and(runner_filter)
        .and_then(handle_ingest_config);

    payload_route.or(render_route).or(generator_route)
}

fn error_status(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<DashboardError>().is_some() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_reply(err: anyhow::Error, runner: &Runner) -> warp::reply::WithStatus<warp::reply::Json> {
    runner.record_rejected();
    warn!("render request failed: {:#}", err);
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "message": format!("{:#}", err)})),
        error_status(&err),
    )
}

fn render_request(
    request: &RenderRequest,
    generator: &GeneratorConfig,
    runner: &Runner,
) -> anyhow::Result<(DashboardView, Selection)> {
    let active = runner.with_generator(generator.clone());
    let labels = active.labels();
    let fallback = active
        .config()
        .resolve_selection()
        .or_else(|_| labels.default_selection())?;
    let zone = request.zone.as_deref().unwrap_or(&fallback.zone);
    let time_bucket = request
        .time_bucket
        .as_deref()
        .unwrap_or(&fallback.time_bucket);
    let selection = labels.selection(zone, time_bucket)?;

    let page = request.page.unwrap_or(active.config().page);
    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => generator.rng(),
    };
    let view = active.render(&mut rng, page, &selection, Local::now().naive_local())?;
    Ok((view, selection))
}

async fn handle_render(
    request: RenderRequest,
    state: SharedModel,
    generator: SharedGenerator,
    runner: Arc<Runner>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    let active = active_generator(&generator);
    match render_request(&request, &active, &runner) {
        Ok((view, selection)) => {
            let body = json!({
                "status": "ok",
                "page": view.page.slug(),
                "sections": view.sections.len(),
            });
            store(&state, &runner, &active, view, Some(selection));
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::OK,
            ))
        }
        Err(err) => Ok(error_reply(err, &runner)),
    }
}

fn render_generator(
    config: &GeneratorConfig,
    runner: &Runner,
) -> anyhow::Result<(DashboardView, Selection)> {
    config.validate()?;
    let derived = runner.with_generator(config.clone());
    let selection = derived
        .config()
        .resolve_selection()
        .or_else(|_| config.labels.default_selection())?;
    let mut rng = config.rng();
    let view = derived.render(
        &mut rng,
        Page::ZoneAnalysis,
        &selection,
        Local::now().naive_local(),
    )?;
    Ok((view, selection))
}

async fn handle_ingest_config(
    config: GeneratorConfig,
    state: SharedModel,
    generator: SharedGenerator,
    runner: Arc<Runner>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, Infallible> {
    match render_generator(&config, &runner) {
        Ok((view, selection)) => {
            if let Some(name) = config.scenario.as_ref() {
                info!("scenario {} -> {} records", name, config.record_count);
            }
            *generator.write().unwrap_or_else(PoisonError::into_inner) = config.clone();
            store(&state, &runner, &config, view, Some(selection));
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({
                    "status": "ok",
                    "records": config.record_count,
                    "description": config.description.clone().unwrap_or_default()
                })),
                StatusCode::OK,
            ))
        }
        Err(err) => Ok(error_reply(err, &runner)),
    }
}
