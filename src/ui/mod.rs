//! Stateless painting helpers for the chart canvas and the legend, plus
//! small text utilities.

use egui::{Color32, FontId, Painter, Pos2, Rect, Stroke};

use orgchart::company::{CompanyColor, Rgba};
use orgchart::render::{CardBox, LegendEntry, LegendMarker};

// ─── Colors ───────────────────────────────────────────────────────────────────

pub fn to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

const TEXT: Color32 = Color32::from_rgb(34, 34, 34);
const MUTED: Color32 = Color32::from_rgb(110, 110, 110);
const OUTLINE: Color32 = Color32::from_rgb(170, 170, 170);
const MANAGER_OUTLINE: Color32 = Color32::from_rgb(60, 60, 60);
const PLACEHOLDER: Color32 = Color32::from_rgb(200, 200, 200);
pub const CONNECTOR: Color32 = Color32::from_rgb(150, 150, 150);

// ─── Geometry ─────────────────────────────────────────────────────────────────

/// Split `rect` into `n` equal vertical bands, left to right.
pub fn vertical_bands(rect: Rect, n: usize) -> Vec<Rect> {
    let n = n.max(1);
    let w = rect.width() / n as f32;
    (0..n)
        .map(|i| {
            let x0 = rect.min.x + w * i as f32;
            Rect::from_min_max(Pos2::new(x0, rect.min.y), Pos2::new(x0 + w, rect.max.y))
        })
        .collect()
}

/// Closed outline of `rect`, for dashed strokes.
pub fn outline_points(rect: Rect) -> Vec<Pos2> {
    vec![
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ]
}

// ─── Cards ────────────────────────────────────────────────────────────────────

/// What a card needs beyond its layout box.
pub struct CardStyle<'a> {
    pub color: &'a CompanyColor,
    pub is_manager: bool,
    pub photo: Option<&'a egui::TextureHandle>,
    pub zoom: f32,
}

/// Paint one card into `rect` (screen space).
pub fn paint_card(painter: &Painter, rect: Rect, card: &CardBox, style: &CardStyle<'_>) {
    let z = style.zoom;
    let rounding = 6.0 * z;

    match style.color {
        CompanyColor::Solid(c) => {
            painter.rect_filled(rect, rounding, to_color32(*c));
        }
        CompanyColor::Blend(colors) => {
            for (band, c) in vertical_bands(rect, colors.len()).into_iter().zip(colors) {
                painter.rect_filled(band, 0.0, to_color32(*c));
            }
        }
    }

    if style.is_manager {
        let stroke = Stroke::new(1.5 * z.max(0.5), MANAGER_OUTLINE);
        painter.extend(egui::Shape::dashed_line(&outline_points(rect), stroke, 6.0 * z, 4.0 * z));
    } else {
        painter.rect_stroke(rect, rounding, Stroke::new(1.0, OUTLINE));
    }

    // Photo
    let pad = 8.0 * z;
    let photo_size = 40.0 * z;
    let photo_rect = Rect::from_min_size(rect.min + egui::vec2(pad, pad), egui::vec2(photo_size, photo_size));
    let record = &card.record;
    match style.photo {
        Some(tex) => {
            painter.image(
                tex.id(),
                photo_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        None => {
            painter.circle_filled(photo_rect.center(), photo_size / 2.0, PLACEHOLDER);
            let name = record.name();
            painter.text(
                photo_rect.center(),
                egui::Align2::CENTER_CENTER,
                initials(name.as_deref().unwrap_or("")),
                FontId::proportional(14.0 * z),
                Color32::WHITE,
            );
        }
    }

    // Descriptive fields
    let text_x = photo_rect.right() + pad;
    let text_width = rect.right() - text_x - pad;
    let mut y = rect.top() + pad;
    let lines = [
        (record.name(), 14.0, TEXT),
        (record.position(), 12.0, TEXT),
        (record.department(), 11.0, MUTED),
        (record.mobile(), 11.0, MUTED),
        (record.email(), 11.0, MUTED),
    ];
    for (value, size, color) in lines {
        let font = FontId::proportional(size * z);
        if let Some(text) = value {
            painter.text(
                Pos2::new(text_x, y),
                egui::Align2::LEFT_TOP,
                truncate_str(&text, chars_that_fit(text_width, &font)),
                font,
                color,
            );
        }
        y += (size + 4.0) * z;
    }

    // Company and location in the corner
    let corner: Vec<_> = [record.company(), record.location()].into_iter().flatten().collect();
    if !corner.is_empty() {
        let font = FontId::proportional(10.0 * z);
        painter.text(
            rect.right_bottom() - egui::vec2(pad, pad / 2.0),
            egui::Align2::RIGHT_BOTTOM,
            truncate_str(&corner.join(" \u{00B7} "), chars_that_fit(rect.width() / 2.0, &font)),
            font,
            MUTED,
        );
    }
}

/// Paint the +/− toggle into `rect` (screen space).
pub fn paint_toggle(painter: &Painter, rect: Rect, collapsed: bool) {
    let radius = rect.width() / 2.0;
    painter.circle_filled(rect.center(), radius, Color32::WHITE);
    painter.circle_stroke(rect.center(), radius, Stroke::new(1.0, MANAGER_OUTLINE));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        toggle_label(collapsed),
        FontId::proportional(rect.height() * 0.8),
        TEXT,
    );
}

pub fn toggle_label(collapsed: bool) -> &'static str {
    if collapsed {
        "+"
    } else {
        "\u{2212}"
    }
}

// ─── Legend ───────────────────────────────────────────────────────────────────

pub fn draw_legend_entry(ui: &mut egui::Ui, entry: &LegendEntry) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
        let painter = ui.painter();
        match entry.marker {
            LegendMarker::Swatch(c) => {
                painter.rect_filled(rect, 3.0, to_color32(c));
                painter.rect_stroke(rect, 3.0, Stroke::new(1.0, OUTLINE));
            }
            LegendMarker::Manager => {
                let stroke = Stroke::new(1.5, MANAGER_OUTLINE);
                painter.extend(egui::Shape::dashed_line(&outline_points(rect.shrink(1.0)), stroke, 4.0, 2.0));
            }
            LegendMarker::Expand => paint_toggle(painter, rect, true),
            LegendMarker::Collapse => paint_toggle(painter, rect, false),
        }
        ui.label(entry.label.as_str());
    });
}

// ─── Text utilities ───────────────────────────────────────────────────────────

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}

/// Rough character budget for `width` pixels of proportional text.
fn chars_that_fit(width: f32, font: &FontId) -> usize {
    (width / (font.size * 0.55)).max(0.0) as usize
}

/// Up to two uppercase initials from a full name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
