use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::config::{AppConfig, PhysicsConfig};
use crate::sessions::{SessionSnapshot, SessionSource, SnapshotWatcher, spawn_load};

mod graph;
mod navigate;
mod render_utils;
mod sim;
mod ui;

use navigate::SessionNavigator;
use sim::{FrameLoop, Simulation};

pub struct SecondBrainApp {
    source: SessionSource,
    config: AppConfig,
    settings: LaunchSettings,
    state: AppState,
    reload_rx: Option<Receiver<Result<SessionSnapshot, String>>>,
}

/// Command-line choices that outlive a single view.
#[derive(Clone, Debug, Default)]
pub struct LaunchSettings {
    pub watch: bool,
    pub open_command: Option<String>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<SessionSnapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    snapshot: SessionSnapshot,
    sim: Option<Simulation>,
    frame_loop: FrameLoop<Context>,
    watcher: Option<SnapshotWatcher>,
    navigator: SessionNavigator,
    physics: PhysicsConfig,
    default_physics: PhysicsConfig,
    seed: Option<u64>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    reload_error: Option<String>,
    show_fps_bar: bool,
    show_links: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchMatchCache {
    query: String,
    snapshot: SessionSnapshot,
    matches: Arc<HashSet<usize>>,
}

impl SecondBrainApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        source: SessionSource,
        config: AppConfig,
        settings: LaunchSettings,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let state = Self::start_load(source.clone());
        Self {
            source,
            config,
            settings,
            state,
            reload_rx: None,
        }
    }

    fn start_load(source: SessionSource) -> AppState {
        AppState::Loading {
            rx: spawn_load(source),
        }
    }

    fn ready_state(&self, ctx: &Context, snapshot: SessionSnapshot) -> AppState {
        let watcher = match (self.settings.watch, self.source.path()) {
            (true, Some(path)) => Some(SnapshotWatcher::spawn(
                path.to_path_buf(),
                self.config.watch_interval(),
                &snapshot,
            )),
            (true, None) => {
                warn!("--watch has no effect without a session file");
                None
            }
            (false, _) => None,
        };

        AppState::Ready(Box::new(ViewModel::new(
            ctx,
            snapshot,
            &self.config,
            watcher,
            SessionNavigator::new(self.settings.open_command.clone()),
        )))
    }
}

impl eframe::App for SecondBrainApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(snapshot)) => transition = Some(Ok(snapshot)),
                    Ok(Err(error)) => transition = Some(Err(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading sessions...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load sessions");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(snapshot)) => model.apply_snapshot(snapshot),
                        Ok(Err(error)) => model.report_reload_error(error),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.report_reload_error(
                                "Background load worker disconnected".to_owned(),
                            );
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.source.clone());
        } else if let Some(result) = transition {
            self.state = match result {
                Ok(snapshot) => {
                    info!(sessions = snapshot.len(), "session view ready");
                    self.ready_state(ctx, snapshot)
                }
                Err(error) => {
                    warn!("session load failed: {error}");
                    AppState::Error(error)
                }
            };
        } else if matches!(self.state, AppState::Loading { .. }) {
            ctx.request_repaint();
        }
    }
}
