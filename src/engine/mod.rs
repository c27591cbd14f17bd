pub mod pipeline;

pub use pipeline::{load_config, ChartEngine, ChartStats, LoadError};
