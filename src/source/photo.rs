//! Background photo loader.
//!
//! A `Photo` cell is either an `http(s)` URL, a `file://` URL, or a path
//! relative to the directory of the loaded rows file. Each source is fetched
//! and decoded once on its own thread; failures are remembered and never
//! retried.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use url::Url;

/// Longest edge of a decoded photo, in pixels.
const MAX_EDGE: u32 = 256;

/// Decoded image data (RGBA).
pub struct PhotoData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Where a `Photo` cell points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    Remote(Url),
    File(PathBuf),
}

impl PhotoSource {
    /// Classify a cell. Blank cells and unsupported URL schemes give `None`.
    pub fn resolve(cell: &str, base_dir: Option<&Path>) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        match Url::parse(cell) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Some(PhotoSource::Remote(url)),
                "file" => url.to_file_path().ok().map(PhotoSource::File),
                // `C:\photos\a.jpg` parses with scheme "c"
                s if s.len() == 1 => Some(PhotoSource::File(PathBuf::from(cell))),
                _ => None,
            },
            Err(_) => {
                let path = Path::new(cell);
                match base_dir {
                    Some(dir) if path.is_relative() => Some(PhotoSource::File(dir.join(path))),
                    _ => Some(PhotoSource::File(path.to_path_buf())),
                }
            }
        }
    }
}

/// Manages background photo fetching and decoding, keyed by the cell text.
pub struct PhotoLoader {
    base_dir: Option<PathBuf>,
    pending: HashMap<String, mpsc::Receiver<Option<PhotoData>>>,
    loaded: HashMap<String, PhotoData>,
    failed: HashSet<String>,
}

impl PhotoLoader {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self {
            base_dir,
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Request a photo to be fetched in the background.
    pub fn request(&mut self, cell: &str) {
        if self.loaded.contains_key(cell) || self.pending.contains_key(cell) || self.failed.contains(cell) {
            return;
        }

        let Some(source) = PhotoSource::resolve(cell, self.base_dir.as_deref()) else {
            log::warn!("Unsupported photo reference {:?}", cell);
            self.failed.insert(cell.to_string());
            return;
        };

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = fetch_and_decode(&source);
            let _ = tx.send(result);
        });

        self.pending.insert(cell.to_string(), rx);
    }

    /// Poll for completed downloads. Call every frame.
    pub fn poll(&mut self) {
        let mut completed = Vec::new();
        for (cell, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Some(data)) => {
                    self.loaded.insert(cell.clone(), data);
                    completed.push(cell.clone());
                }
                Ok(None) | Err(mpsc::TryRecvError::Disconnected) => {
                    self.failed.insert(cell.clone());
                    completed.push(cell.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for cell in completed {
            self.pending.remove(&cell);
        }
    }

    pub fn get(&self, cell: &str) -> Option<&PhotoData> {
        self.loaded.get(cell)
    }

    /// Cells whose photo has been decoded.
    pub fn loaded_keys(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }

    pub fn has_failed(&self, cell: &str) -> bool {
        self.failed.contains(cell)
    }

    /// Number of photos still being fetched.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn read_bytes(source: &PhotoSource) -> Result<Vec<u8>, String> {
    match source {
        PhotoSource::Remote(url) => {
            let resp = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .map_err(|e| e.to_string())?
                .get(url.clone())
                .send()
                .map_err(|e| e.to_string())?;
            if !resp.status().is_success() {
                return Err(format!("HTTP {}", resp.status()));
            }
            resp.bytes().map(|b| b.to_vec()).map_err(|e| e.to_string())
        }
        PhotoSource::File(path) => std::fs::read(path).map_err(|e| e.to_string()),
    }
}

fn fetch_and_decode(source: &PhotoSource) -> Option<PhotoData> {
    let decoded = read_bytes(source).and_then(|bytes| image::load_from_memory(&bytes).map_err(|e| e.to_string()));
    let img = match decoded {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Photo {:?} failed: {}", source, e);
            return None;
        }
    };

    // Cards show a small circle; keep textures small
    let img = if img.width() > MAX_EDGE || img.height() > MAX_EDGE {
        img.thumbnail(MAX_EDGE, MAX_EDGE)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Some(PhotoData {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
