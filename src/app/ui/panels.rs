use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::sessions::{SessionSnapshot, SessionSource, SnapshotWatcher};

use super::super::navigate::SessionNavigator;
use super::super::sim::FrameLoop;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(
        ctx: &Context,
        snapshot: SessionSnapshot,
        config: &AppConfig,
        watcher: Option<SnapshotWatcher>,
        navigator: SessionNavigator,
    ) -> Self {
        Self {
            snapshot,
            sim: None,
            frame_loop: FrameLoop::start(ctx.clone()),
            watcher,
            navigator,
            physics: config.physics,
            default_physics: config.physics,
            seed: config.seed,
            search: String::new(),
            search_match_cache: None,
            reload_error: None,
            show_fps_bar: true,
            show_links: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    /// Hands a freshly loaded session list to the view; the graph reseeds on its next frame.
    pub(in crate::app) fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        info!(sessions = snapshot.len(), "received new session snapshot");
        self.snapshot = snapshot;
        self.search_match_cache = None;
        self.reload_error = None;
    }

    pub(in crate::app) fn report_reload_error(&mut self, error: String) {
        warn!("session reload failed: {error}");
        self.reload_error = Some(error);
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &SessionSource,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.update_fps_counter(ctx);
        if let Some(snapshot) = self.watcher.as_ref().and_then(SnapshotWatcher::poll) {
            self.apply_snapshot(snapshot);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Second Brain");
                    ui.separator();
                    ui.label(format!("source: {}", source.describe()));
                    ui.label(format!("sessions: {}", self.snapshot.len()));
                    if self.watcher.is_some() {
                        ui.label("watching");
                    }
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload sessions"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reseed layout").clicked()
                        && let Some(sim) = self.sim.as_mut()
                    {
                        sim.reseed();
                    }
                    if let Some(error) = &self.reload_error {
                        ui.colored_label(egui::Color32::from_rgb(240, 120, 100), "reload failed")
                            .on_hover_text(error.as_str());
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(graph_text) = self.graph_status_text() {
                            ui.label(graph_text);
                        }
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
