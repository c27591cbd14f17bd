//! Toolbar rendering for `ChartApp`.
//!
//! Draws the zoom controls, the rows-file path field, the company filter
//! selector and the legend toggle.

use eframe::egui;

use orgchart::org::filter::{filter_options, CompanyFilter};

use super::ChartApp;

impl ChartApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            // Zoom
            let zoom = self.config.zoom;
            if ui
                .add_enabled(
                    self.zoom > zoom.min,
                    egui::Button::new("\u{2212}").min_size(egui::vec2(28.0, 24.0)),
                )
                .on_hover_text("Zoom out")
                .clicked()
            {
                self.zoom = zoom.zoom_out(self.zoom);
            }
            if ui
                .add(egui::Button::new(format!("{:.0}%", self.zoom * 100.0)).min_size(egui::vec2(52.0, 24.0)))
                .on_hover_text("Reset to 100%")
                .clicked()
            {
                self.zoom = zoom.reset();
            }
            if ui
                .add_enabled(
                    self.zoom < zoom.max,
                    egui::Button::new("+").min_size(egui::vec2(28.0, 24.0)),
                )
                .on_hover_text("Zoom in")
                .clicked()
            {
                self.zoom = zoom.zoom_in(self.zoom);
            }

            ui.separator();

            // Rows file
            let response = ui.add_sized(
                [(ui.available_width() - 320.0).max(160.0), 24.0],
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("Path to rows .json or .xlsx (or drop a file)")
                    .font(egui::TextStyle::Monospace),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.start_load(ctx);
            }
            if ui.add_enabled(!self.loading, egui::Button::new("Load")).clicked() {
                self.start_load(ctx);
            }
            if self.loading {
                ui.spinner();
            }

            ui.separator();

            // Company filter
            let prev_filter = self.filter.clone();
            egui::ComboBox::from_id_salt("company_filter")
                .selected_text(self.filter.to_string())
                .show_ui(ui, |ui| {
                    for option in filter_options(&self.config.palette) {
                        let label = option.to_string();
                        ui.selectable_value(&mut self.filter, option, label);
                    }
                });
            if self.filter != prev_filter {
                log::debug!("Filter changed to {}", self.filter);
            }
            if !self.filter.is_all() && ui.small_button("\u{2715}").on_hover_text("Clear filter").clicked() {
                self.filter = CompanyFilter::All;
            }

            ui.toggle_value(&mut self.show_legend, "Legend");
        });

        if let Some(ref err) = self.error {
            ui.colored_label(egui::Color32::from_rgb(200, 40, 40), err.as_str());
        }
    }
}
