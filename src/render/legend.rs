use crate::company::{CompanyPalette, Rgba};

/// What a legend row shows next to its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMarker {
    Swatch(Rgba),
    /// Dashed card outline
    Manager,
    Expand,
    Collapse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub marker: LegendMarker,
    pub label: String,
}

impl LegendEntry {
    fn new(marker: LegendMarker, label: impl Into<String>) -> Self {
        Self {
            marker,
            label: label.into(),
        }
    }
}

/// Palette companies in palette order, then the card affordances.
pub fn legend_entries(palette: &CompanyPalette) -> Vec<LegendEntry> {
    palette
        .entries()
        .iter()
        .map(|(token, color)| LegendEntry::new(LegendMarker::Swatch(*color), token.as_str()))
        .chain([
            LegendEntry::new(LegendMarker::Manager, "Manager"),
            LegendEntry::new(LegendMarker::Expand, "Expand"),
            LegendEntry::new(LegendMarker::Collapse, "Collapse"),
        ])
        .collect()
}
