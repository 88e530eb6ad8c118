use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use graph_lens::app::{AppOptions, ExplorerApp};
use graph_lens::config::{LayoutConfig, load_layout_config};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph snapshot JSON to load on start.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Start without the demo graph.
    #[arg(long)]
    empty: bool,

    /// JSON file overriding layout tuning.
    #[arg(long)]
    layout_config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let layout = match &args.layout_config {
        Some(path) => load_layout_config(path)?,
        None => LayoutConfig::default(),
    };
    let app_options = AppOptions {
        layout,
        snapshot: args.snapshot,
        seed_demo: !args.empty,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Knowledge Graph Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(cc, app_options)))),
    )
    .map_err(|error| anyhow::anyhow!("failed to run the explorer window: {error}"))
}
