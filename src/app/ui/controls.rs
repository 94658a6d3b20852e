use std::ops::RangeInclusive;

use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

fn physics_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hover: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(text)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hover)
    .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Sessions");
        ui.add_space(4.0);

        let search = ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("Search sessions")
                .desired_width(f32::INFINITY),
        );
        if search.changed() {
            self.search_match_cache = None;
        }
        if let Some(matches) = self.cached_search_match_count() {
            ui.small(format!("{matches} matching sessions"));
        }

        ui.add_space(8.0);
        ui.checkbox(&mut self.show_links, "Show hub links");
        ui.checkbox(&mut self.show_fps_bar, "Show FPS");

        ui.separator();
        ui.label(RichText::new("Physics").strong());
        self.draw_physics_controls(ui);

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        match self.seed {
            Some(seed) => ui.small(format!("Seed: {seed}")),
            None => ui.small("Seed: random"),
        };
        if let Some(sim) = &self.sim {
            let space = sim.space();
            ui.small(format!(
                "Canvas {:.0} x {:.0}, ideal radius {:.0}",
                space.width,
                space.height,
                space.ideal_radius()
            ));
        }
    }

    fn draw_physics_controls(&mut self, ui: &mut Ui) {
        let physics = &mut self.physics;
        let mut changed = false;

        changed |= physics_slider(
            ui,
            &mut physics.damping,
            0.70..=0.99,
            "Damping",
            "Fraction of velocity kept each frame.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.repulsion,
            0.0..=40_000.0,
            "Repulsion",
            "How strongly nearby sessions push each other apart.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.center_attraction,
            0.0..=0.01,
            "Ring spring",
            "How strongly sessions are pulled back onto the orbit ring.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.orbit_force,
            -1.5..=1.5,
            "Orbit",
            "Tangential push that keeps the ring slowly rotating.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.min_distance,
            40.0..=400.0,
            "Spacing",
            "Repulsion only acts between sessions closer than three times this.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.max_velocity,
            0.5..=10.0,
            "Max speed",
            "Speed limit applied after every step.",
        );
        changed |= physics_slider(
            ui,
            &mut physics.ideal_radius_factor,
            0.1..=0.5,
            "Orbit radius",
            "Ideal orbit radius as a share of the smaller canvas side.",
        );

        if ui.button("Reset physics").clicked() {
            *physics = self.default_physics;
            changed = true;
        }

        if changed {
            *physics = physics.sanitized();
        }
    }

    fn cached_search_match_count(&mut self) -> Option<usize> {
        self.cached_search_matches().map(|matches| matches.len())
    }
}
