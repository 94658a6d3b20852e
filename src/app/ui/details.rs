use eframe::egui::{self, RichText, Ui};

use crate::util::{format_count, format_last_modified};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.add_space(6.0);

        let Some(sim) = self.sim.as_ref() else {
            ui.label("Waiting for the first frame...");
            return;
        };

        let pointer = sim.pointer();
        let focus = pointer.selected.or(pointer.hovered());
        let Some(node) = focus.and_then(|index| sim.node(index)) else {
            ui.label("Hover or click a session in the graph.");
            return;
        };

        let heading = if pointer.selected.is_some() {
            "Selected"
        } else {
            "Hovered"
        };
        ui.small(heading);
        ui.label(RichText::new(node.display_name.as_str()).strong().size(16.0));
        if let Some(description) = node.description.as_deref().filter(|text| !text.is_empty()) {
            ui.label(description);
        }
        ui.add_space(6.0);

        egui::Grid::new("node_stats")
            .num_columns(2)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                let rows = [
                    ("Items", format_count(node.weight)),
                    ("Documents", format_count(node.stats.documents)),
                    ("Text nodes", format_count(node.stats.text_nodes)),
                    ("Images", format_count(node.stats.images)),
                    ("Websites", format_count(node.stats.websites)),
                    ("Words", format_count(node.stats.total_words)),
                    ("Last modified", format_last_modified(node.last_modified)),
                ];
                for (label, value) in rows {
                    ui.label(label);
                    ui.label(value);
                    ui.end_row();
                }
            });

        if !node.is_central() {
            ui.add_space(6.0);
            ui.small(format!("id: {}", node.id));
        }

        let clear = pointer.selected.is_some() && ui.button("Clear selection").clicked();

        if let Some(last_opened) = self.navigator.last_opened() {
            ui.separator();
            ui.label(format!("Last opened session: {last_opened}"));
        }

        if clear && let Some(sim) = self.sim.as_mut() {
            sim.clear_selection();
        }
    }
}
