pub mod layout;
pub mod legend;
pub mod visibility;

pub use layout::{compute_layout, CardBox, CardMetrics, ChartLayout, Connector, LayoutBox};
pub use legend::{legend_entries, LegendEntry, LegendMarker};
pub use visibility::VisibilityState;
