//! `ChartApp`: the top-level egui application state.
//!
//! This module declares the `ChartApp` struct and its constructor.
//! All methods are split across the sibling sub-modules:
//!
//! - `loading` for background file loads and dropped files
//! - `toolbar` for zoom, path field, company filter and legend toggle
//! - `chart` for the card canvas and the side panel

pub mod chart;
pub mod loading;
pub mod toolbar;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui;

use orgchart::config::ChartConfig;
use orgchart::engine::{ChartEngine, ChartStats, LoadError};
use orgchart::org::filter::CompanyFilter;
use orgchart::render::VisibilityState;
use orgchart::source::PhotoLoader;

pub struct ChartApp {
    pub config: ChartConfig,
    pub path_input: String,
    pub engine: Option<ChartEngine>,
    pub stats: Option<ChartStats>,
    pub error: Option<String>,
    pub loading: bool,
    pub load_rx: Option<mpsc::Receiver<Result<ChartEngine, LoadError>>>,
    pub filter: CompanyFilter,
    /// Collapse flags, keyed by row; cleared on every successful load
    pub visibility: VisibilityState,
    pub zoom: f32,
    pub show_legend: bool,
    pub photos: PhotoLoader,
    pub photo_textures: HashMap<String, egui::TextureHandle>,
}

impl ChartApp {
    pub fn new(config: ChartConfig, initial: Option<PathBuf>, ctx: &egui::Context) -> Self {
        let mut app = Self {
            zoom: config.zoom.initial,
            config,
            path_input: String::new(),
            engine: None,
            stats: None,
            error: None,
            loading: false,
            load_rx: None,
            filter: CompanyFilter::All,
            visibility: VisibilityState::new(),
            show_legend: true,
            photos: PhotoLoader::new(None),
            photo_textures: HashMap::new(),
        };
        if let Some(path) = initial {
            app.path_input = path.display().to_string();
            app.start_load(ctx);
        }
        app
    }

    /// Turn finished photo downloads into textures.
    fn upload_photos(&mut self, ctx: &egui::Context) {
        self.photos.poll();
        let ready: Vec<String> = self
            .photos
            .loaded_keys()
            .filter(|k| !self.photo_textures.contains_key(*k))
            .map(str::to_owned)
            .collect();
        for key in ready {
            if let Some(data) = self.photos.get(&key) {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [data.width as usize, data.height as usize],
                    &data.rgba,
                );
                let tex = ctx.load_texture(format!("photo_{}", key), image, egui::TextureOptions::LINEAR);
                self.photo_textures.insert(key, tex);
            }
        }
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load();
        self.handle_dropped_files(ctx);
        self.upload_photos(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        if self.show_legend {
            egui::SidePanel::right("legend")
                .default_width(200.0)
                .show(ctx, |ui| {
                    self.draw_side_panel(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_chart(ui);
        });

        if self.photos.pending_count() > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
