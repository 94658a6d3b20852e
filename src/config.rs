use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub seed: Option<u64>,
    pub watch_interval_ms: u64,
    pub physics: PhysicsConfig,
}

/// Tunable constants of the session graph simulation.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Per-frame velocity multiplier, below 1.
    pub damping: f32,
    pub repulsion: f32,
    pub center_attraction: f32,
    pub orbit_force: f32,
    /// Repulsion only acts between nodes closer than three times this.
    pub min_distance: f32,
    pub max_velocity: f32,
    pub margin: f32,
    /// Fraction of the velocity kept (and inverted) when bouncing off a bound.
    pub restitution: f32,
    /// Ideal orbit radius as a fraction of the smaller canvas dimension.
    pub ideal_radius_factor: f32,
    /// Extra seed radius applied when there are more than four sessions.
    pub crowd_spread: f32,
    pub initial_jitter: f32,
    pub hub_radius: f32,
    pub session_radius: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            seed: None,
            watch_interval_ms: 1000,
            physics: PhysicsConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.92,
            repulsion: 12_000.0,
            center_attraction: 0.0015,
            orbit_force: 0.4,
            min_distance: 180.0,
            max_velocity: 3.0,
            margin: 100.0,
            restitution: 0.3,
            ideal_radius_factor: 0.35,
            crowd_spread: 1.1,
            initial_jitter: 0.25,
            hub_radius: 46.0,
            session_radius: 28.0,
        }
    }
}

impl PhysicsConfig {
    pub fn repulsion_cutoff(&self) -> f32 {
        self.min_distance * 3.0
    }

    /// Returns a copy with every value forced into a range the integrator can work with.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };

        let sanitized = Self {
            damping: finite_or(self.damping, defaults.damping).clamp(0.0, 0.999),
            repulsion: finite_or(self.repulsion, defaults.repulsion).max(0.0),
            center_attraction: finite_or(self.center_attraction, defaults.center_attraction)
                .max(0.0),
            orbit_force: finite_or(self.orbit_force, defaults.orbit_force),
            min_distance: finite_or(self.min_distance, defaults.min_distance).max(1.0),
            max_velocity: finite_or(self.max_velocity, defaults.max_velocity).max(0.01),
            margin: finite_or(self.margin, defaults.margin).max(0.0),
            restitution: finite_or(self.restitution, defaults.restitution).clamp(0.0, 1.0),
            ideal_radius_factor: finite_or(self.ideal_radius_factor, defaults.ideal_radius_factor)
                .clamp(0.0, 1.0),
            crowd_spread: finite_or(self.crowd_spread, defaults.crowd_spread).max(0.0),
            initial_jitter: finite_or(self.initial_jitter, defaults.initial_jitter)
                .clamp(0.0, 0.49),
            hub_radius: finite_or(self.hub_radius, defaults.hub_radius).max(1.0),
            session_radius: finite_or(self.session_radius, defaults.session_radius).max(1.0),
        };

        if sanitized != self {
            warn!(?self, ?sanitized, "physics settings were out of range and have been clamped");
        }
        sanitized
    }
}

impl AppConfig {
    /// Load from a TOML file when one is given, then apply env var overrides.
    ///
    /// Physics values come back as written; call [`AppConfig::sanitize`]
    /// once logging is up so clamping is reported.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::parse(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn sanitize(&mut self) {
        self.physics = self.physics.sanitized();
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config TOML")
    }

    /// Apply environment variable overrides (SECOND_BRAIN_LOG_LEVEL, SECOND_BRAIN_SEED).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SECOND_BRAIN_LOG_LEVEL") {
            self.log_level = val;
        }
        if let Ok(val) = std::env::var("SECOND_BRAIN_SEED") {
            match val.parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => info!("ignoring non-numeric SECOND_BRAIN_SEED={val}"),
            }
        }
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}
