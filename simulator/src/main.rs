use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::GuiBridge;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use trafficcore::prelude::DEFAULT_RECORD_COUNT;
use trafficcore::view::Page;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic traffic violation dashboard driver")]
struct Args {
    /// Render one page offline and print it as a text report
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// live-dashboard, zone-analysis, ai-insights or export-pdf
    #[arg(long, default_value = "live-dashboard")]
    page: Page,
    #[arg(long)]
    zone: Option<String>,
    #[arg(long)]
    time_bucket: Option<String>,
    /// Fix the random source so renders replay identically
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_RECORD_COUNT)]
    records: usize,
    /// Print the render description as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Keep the GUI bridge alive for viewer requests
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.page, args.seed, args.records)
    };
    workflow_config.override_selection(args.zone.clone(), args.time_bucket.clone());
    workflow_config
        .generator
        .validate()
        .context("validating generator settings")?;
    let selection = workflow_config
        .resolve_selection()
        .context("resolving zone / time bucket selection")?;

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let gui_bridge = GuiBridge::new(runner.clone());

    if args.offline {
        let view = runner.execute()?;

        if args.json {
            println!("{}", view.to_json().context("serializing view")?);
        } else {
            println!("{}", view);
        }

        gui_bridge.publish(&view, Some(&selection));
        gui_bridge.publish_status("Offline render ready.");

        let report = format!(
            "page={} generated_at={} sections={} panels={} selection=\"{}\"\n",
            view.page.slug(),
            view.generated_at,
            view.sections.len(),
            view.panels().count(),
            selection
        );
        let report_path = &workflow_config.report_path;
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        gui_bridge.spawn(workflow_config.bind_address)?;
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
