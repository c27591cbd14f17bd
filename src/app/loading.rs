//! Background loading for `ChartApp`.
//!
//! A rows file is read and turned into a `ChartEngine` on a worker thread;
//! `check_load` picks the result up on the UI thread and swaps it in.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use eframe::egui;

use orgchart::engine::ChartEngine;
use orgchart::source::PhotoLoader;

use super::ChartApp;

impl ChartApp {
    /// Start loading the file named in the path field.
    pub fn start_load(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        let path = PathBuf::from(self.path_input.trim());
        if path.as_os_str().is_empty() {
            self.error = Some("Enter the path of a rows file".to_string());
            return;
        }

        self.loading = true;
        self.error = None;

        let (tx, rx) = mpsc::channel();
        self.load_rx = Some(rx);

        let palette = self.config.palette.clone();
        let ctx = ctx.clone();
        let spawned = std::thread::Builder::new()
            .name("rows-loader".into())
            .spawn(move || {
                let result = ChartEngine::load(&path, palette);
                let _ = tx.send(result);
                ctx.request_repaint();
            });
        if let Err(e) = spawned {
            log::error!("Failed to start loader thread: {}", e);
            self.error = Some(format!("Failed to start loader thread: {}", e));
            self.loading = false;
            self.load_rx = None;
        }
    }

    /// Poll the load channel and swap in the new chart when it arrives.
    pub fn check_load(&mut self) {
        let Some(rx) = &self.load_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.error = Some("Loader thread exited without a result".to_string());
                self.loading = false;
                self.load_rx = None;
                return;
            }
        };

        match result {
            Ok(engine) => {
                let base_dir = engine.source().and_then(Path::parent).map(Path::to_path_buf);
                self.photos = PhotoLoader::new(base_dir);
                self.photo_textures.clear();
                self.visibility.reset();
                self.stats = Some(engine.stats());
                self.engine = Some(engine);
                self.error = None;
            }
            Err(e) => {
                // Keep showing the previous chart
                log::warn!("Load failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
        self.load_rx = None;
    }

    /// Load the first file dropped onto the window.
    pub fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.path_input = path.display().to_string();
            self.start_load(ctx);
        }
    }
}
