//! Chart canvas and side panel for `ChartApp`.
//!
//! - `draw_chart`: the scrollable card canvas (filter → layout → paint)
//! - `draw_side_panel`: legend and load statistics

use eframe::egui;

use orgchart::render::{compute_layout, legend_entries};

use crate::ui::{self, CardStyle};

use super::ChartApp;

/// Blank border around the chart, in screen pixels.
const MARGIN: f32 = 24.0;

impl ChartApp {
    pub fn draw_chart(&mut self, ui: &mut egui::Ui) {
        let Self {
            engine,
            filter,
            visibility,
            photos,
            photo_textures,
            config,
            zoom,
            loading,
            ..
        } = self;

        let Some(engine) = engine.as_ref() else {
            ui.centered_and_justified(|ui| {
                if *loading {
                    ui.spinner();
                } else {
                    ui.label("Open a JSON export or a spreadsheet of employee rows, or drop one onto the window.");
                }
            });
            return;
        };

        let forest = engine.filtered(filter);
        if forest.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(format!("Nobody matches {}", filter));
            });
            return;
        }

        let metrics = config.card;
        let layout = compute_layout(&forest, visibility, &metrics);
        let z = *zoom;
        let mut toggled = None;

        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            let size = egui::vec2(layout.width, layout.height) * z + egui::vec2(MARGIN, MARGIN) * 2.0;
            let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
            let origin = response.rect.min + egui::vec2(MARGIN, MARGIN);
            let to_screen = |x: f32, y: f32| origin + egui::vec2(x, y) * z;
            let to_chart = |p: egui::Pos2| {
                let v = (p - origin) / z;
                (v.x, v.y)
            };
            let clip = ui.clip_rect();

            let stroke = egui::Stroke::new(1.0, ui::CONNECTOR);
            for connector in &layout.connectors {
                let points: Vec<_> = connector.points.iter().map(|&(x, y)| to_screen(x, y)).collect();
                painter.add(egui::Shape::line(points, stroke));
            }

            for card in &layout.cards {
                let b = card.bounds;
                let rect = egui::Rect::from_min_max(to_screen(b.x, b.y), to_screen(b.right(), b.bottom()));
                if !clip.intersects(rect.expand(metrics.toggle * z)) {
                    continue;
                }

                let photo = card.record.photo();
                if let Some(cell) = photo.as_deref() {
                    photos.request(cell);
                }
                let color = engine.company_color(&card.record);
                let style = CardStyle {
                    color: &color,
                    is_manager: engine.is_manager(&card.record),
                    photo: photo.as_deref().and_then(|cell| photo_textures.get(cell)),
                    zoom: z,
                };
                ui::paint_card(&painter, rect, card, &style);

                if let Some(t) = card.toggle_bounds(&metrics) {
                    let toggle_rect = egui::Rect::from_min_max(to_screen(t.x, t.y), to_screen(t.right(), t.bottom()));
                    ui::paint_toggle(&painter, toggle_rect, card.collapsed);
                }
            }

            if let Some(pos) = response.hover_pos() {
                let (x, y) = to_chart(pos);
                if layout.toggle_at(x, y, &metrics).is_some() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
            }
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = to_chart(pos);
                    toggled = layout.toggle_at(x, y, &metrics);
                }
            }
        });

        if let Some(key) = toggled {
            visibility.toggle(key);
        }
    }

    pub fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Legend");
        ui.add_space(4.0);
        for entry in legend_entries(&self.config.palette) {
            ui::draw_legend_entry(ui, &entry);
        }

        if let Some(stats) = &self.stats {
            ui.add_space(12.0);
            ui.separator();
            ui.heading("Chart");
            if let Some(path) = self.engine.as_ref().and_then(|e| e.source()) {
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                ui.label(ui::truncate_str(&name, 28)).on_hover_text(path.display().to_string());
            }
            egui::Grid::new("chart_stats").num_columns(2).show(ui, |ui| {
                for (label, value) in [
                    ("Employees", stats.records),
                    ("Top level", stats.roots),
                    ("Managers", stats.managers),
                    ("Unknown manager", stats.orphans),
                    ("Not placed", stats.unreachable),
                ] {
                    ui.label(label);
                    ui.label(value.to_string());
                    ui.end_row();
                }
            });
        }

        let collapsed = self.visibility.collapsed_count();
        if collapsed > 0 {
            ui.add_space(8.0);
            if ui.button(format!("Expand all ({})", collapsed)).clicked() {
                self.visibility.expand_all();
            }
        }
    }
}
