mod app;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use orgchart::config::ChartConfig;
use orgchart::engine::load_config;

use app::ChartApp;

/// Interactive organizational chart viewer
#[derive(Parser, Debug)]
#[command(name = "orgchart", version, about)]
struct Args {
    /// Employee rows: a JSON export or a spreadsheet (.xlsx, .xls, .ods)
    rows: Option<PathBuf>,

    /// Palette, zoom and card settings (JSON)
    #[arg(short, long, value_name = "CONFIG.json")]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                eprintln!("orgchart: {}", e);
                std::process::exit(2);
            }
        },
        None => ChartConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let rows = args.rows;
    eframe::run_native(
        "Org Chart",
        options,
        Box::new(move |cc| Ok(Box::new(ChartApp::new(config, rows, &cc.egui_ctx)))),
    )
    .expect("Failed to start org chart viewer");
}
