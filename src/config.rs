//! Chart configuration.
//!
//! Everything has a built-in default. An optional JSON file overrides parts
//! of it:
//!
//! ```json
//! {
//!   "palette": {
//!     "companies": { "УК": "#e0f2ff", "Acme": "#ffd8a8" },
//!     "no_company": "#ffffff",
//!     "unknown": "#cccccc"
//!   },
//!   "zoom": { "initial": 1.0 },
//!   "card": { "width": 280 }
//! }
//! ```
//!
//! Listed companies are merged into the default palette unless
//! `"replace": true` is set, in which case only the listed ones remain.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::company::{parse_hex_color, CompanyPalette, Rgba};
use crate::render::CardMetrics;

/// Error while reading or validating a config file
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

fn config_error(message: impl Into<String>) -> ConfigError {
    ConfigError {
        message: message.into(),
    }
}

/// Zoom bounds and step for the chart canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub initial: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.3,
            max: 2.0,
            step: 0.1,
            initial: 0.75,
        }
    }
}

/// Round to whole percent so repeated steps do not drift.
fn round_percent(zoom: f32) -> f32 {
    (zoom * 100.0).round() / 100.0
}

impl ZoomConfig {
    pub fn clamp(&self, zoom: f32) -> f32 {
        round_percent(zoom.clamp(self.min, self.max))
    }

    pub fn zoom_in(&self, zoom: f32) -> f32 {
        self.clamp(zoom + self.step)
    }

    pub fn zoom_out(&self, zoom: f32) -> f32 {
        self.clamp(zoom - self.step)
    }

    /// The "100 %" button.
    pub fn reset(&self) -> f32 {
        self.clamp(1.0)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min > 0.0 && self.min <= self.max) {
            return Err(config_error(format!(
                "zoom bounds must satisfy 0 < min <= max, got {}..{}",
                self.min, self.max
            )));
        }
        if self.step <= 0.0 {
            return Err(config_error(format!("zoom step must be positive, got {}", self.step)));
        }
        if !(self.min..=self.max).contains(&self.initial) {
            return Err(config_error(format!(
                "initial zoom {} is outside {}..{}",
                self.initial, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Everything the engine and the viewer can be configured with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartConfig {
    pub palette: CompanyPalette,
    pub zoom: ZoomConfig,
    pub card: CardMetrics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    palette: PaletteFile,
    zoom: Option<ZoomConfig>,
    card: Option<CardMetrics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PaletteFile {
    replace: bool,
    companies: Map<String, Value>,
    no_company: Option<String>,
    unknown: Option<String>,
}

fn color_entry(name: &str, value: &str) -> Result<Rgba, ConfigError> {
    parse_hex_color(value).ok_or_else(|| config_error(format!("{}: invalid hex color {:?}", name, value)))
}

impl ChartConfig {
    pub fn with_palette(mut self, palette: CompanyPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_card(mut self, card: CardMetrics) -> Self {
        self.card = card;
        self
    }

    /// Parse a config document, layering it over the defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(text).map_err(|e| config_error(format!("Invalid config: {}", e)))?;

        let defaults = CompanyPalette::default();
        let mut palette = if file.palette.replace {
            CompanyPalette::new(defaults.no_company(), defaults.unknown())
        } else {
            defaults
        };

        for (token, value) in &file.palette.companies {
            let name = format!("palette.companies.{}", token);
            let hex = value
                .as_str()
                .ok_or_else(|| config_error(format!("{}: expected a hex string", name)))?;
            let color = color_entry(&name, hex)?;
            palette = palette.with_company(token.trim(), color);
        }
        if let Some(hex) = &file.palette.no_company {
            palette = palette.with_no_company(color_entry("palette.no_company", hex)?);
        }
        if let Some(hex) = &file.palette.unknown {
            palette = palette.with_unknown(color_entry("palette.unknown", hex)?);
        }
        let mut config = ChartConfig::default().with_palette(palette);

        if let Some(zoom) = file.zoom {
            zoom.validate()?;
            config = config.with_zoom(zoom);
        }
        if let Some(card) = file.card {
            if card.width <= 0.0 || card.height <= 0.0 {
                return Err(config_error("card width and height must be positive"));
            }
            config = config.with_card(card);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&text)?;
        log::info!(
            "Config loaded from {} ({} companies)",
            path.display(),
            config.palette.entries().len()
        );
        Ok(config)
    }
}
