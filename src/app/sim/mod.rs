//! Session graph simulation: seeding, force integration, pointer interaction
//! and the frame loop that drives them.

mod build;
mod frame;
mod interaction;
mod physics;
mod space;

use eframe::egui::{Pos2, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::PhysicsConfig;
use crate::sessions::{SessionSnapshot, SessionStats};

pub(in crate::app) use frame::FrameLoop;
use interaction::{PointerPhase, PointerState};
use space::SimulationSpace;

pub(in crate::app) const CENTRAL_NODE_ID: &str = "second-brain";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeKind {
    Central,
    Session,
}

#[derive(Clone, Debug)]
pub(in crate::app) struct SimNode {
    pub id: String,
    pub kind: NodeKind,
    pub display_name: String,
    pub description: Option<String>,
    /// Content-item count, only shown as a badge.
    pub weight: u64,
    pub stats: SessionStats,
    pub last_modified: i64,
    pub position: Pos2,
    pub velocity: Vec2,
}

impl SimNode {
    pub fn is_central(&self) -> bool {
        self.kind == NodeKind::Central
    }
}

/// Read-only view of one node handed to the renderer.
pub(in crate::app) struct NodeView<'a> {
    pub index: usize,
    pub node: &'a SimNode,
    pub radius: f32,
    pub hovered: bool,
    pub selected: bool,
    pub dragged: bool,
}

/// Owns the node set and everything that mutates it.
///
/// Index 0 is always the hub; the rest follow the snapshot's session order.
#[derive(Clone)]
pub(in crate::app) struct Simulation {
    nodes: Vec<SimNode>,
    space: SimulationSpace,
    physics: PhysicsConfig,
    pointer: PointerState,
    snapshot: SessionSnapshot,
    rng: StdRng,
    forces: Vec<Vec2>,
}

impl Simulation {
    pub fn new(
        snapshot: SessionSnapshot,
        width: f32,
        height: f32,
        physics: PhysicsConfig,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let space = SimulationSpace::new(width, height, physics.margin, physics.ideal_radius_factor);

        let mut sim = Self {
            nodes: Vec::new(),
            space,
            physics,
            pointer: PointerState::default(),
            snapshot,
            rng,
            forces: Vec::new(),
        };
        sim.reseed();
        sim
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn space(&self) -> SimulationSpace {
        self.space
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn session_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn radius_for(&self, kind: NodeKind) -> f32 {
        match kind {
            NodeKind::Central => self.physics.hub_radius,
            NodeKind::Session => self.physics.session_radius,
        }
    }

    /// Reseeds when `snapshot` is a different list than the current one.
    pub fn sync_snapshot(&mut self, snapshot: &SessionSnapshot) -> bool {
        if self.snapshot.same_identity(snapshot) {
            return false;
        }
        self.snapshot = snapshot.clone();
        self.reseed();
        true
    }

    /// Discards every node and rebuilds the layout from the current snapshot.
    pub fn reseed(&mut self) {
        let selected_id = self
            .pointer
            .selected
            .and_then(|index| self.nodes.get(index))
            .map(|node| node.id.clone());

        self.nodes = build::seed_nodes(
            self.snapshot.sessions(),
            &self.space,
            &self.physics,
            &mut self.rng,
        );
        self.pointer = PointerState {
            position: self.pointer.position,
            phase: PointerPhase::Idle,
            selected: selected_id.and_then(|id| self.index_of(&id)),
        };

        info!(
            sessions = self.session_count(),
            width = self.space.width,
            height = self.space.height,
            "reseeded session graph"
        );
    }

    /// Updates the canvas size. Derived values such as the ideal radius follow.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let next = SimulationSpace::new(width, height, self.physics.margin, self.physics.ideal_radius_factor);
        if next == self.space {
            return false;
        }
        debug!(width = next.width, height = next.height, "simulation space resized");
        self.space = next;
        true
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        if physics == self.physics {
            return;
        }
        self.physics = physics;
        self.space = SimulationSpace::new(
            self.space.width,
            self.space.height,
            physics.margin,
            physics.ideal_radius_factor,
        );
    }

    /// Advances the layout by one frame; a dragged node is left where the pointer put it.
    pub fn tick(&mut self) {
        physics::step_physics(
            &mut self.nodes,
            &mut self.forces,
            &self.space,
            &self.physics,
            self.pointer.dragged(),
        );
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(|node| node.velocity.length_sq()).sum()
    }

    pub fn render_nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        let hovered = self.pointer.hovered();
        let dragged = self.pointer.dragged();
        let selected = self.pointer.selected;

        self.nodes.iter().enumerate().map(move |(index, node)| NodeView {
            index,
            node,
            radius: self.radius_for(node.kind),
            hovered: hovered == Some(index),
            selected: selected == Some(index),
            dragged: dragged == Some(index),
        })
    }
}

#[cfg(test)]
pub(super) mod tests {
    use eframe::egui::pos2;

    use crate::sessions::{SessionRecord, SessionStats};

    use super::*;

    pub(in crate::app::sim) fn session_records(node_counts: &[u32]) -> Vec<SessionRecord> {
        node_counts
            .iter()
            .enumerate()
            .map(|(index, &node_count)| SessionRecord {
                id: format!("session-{index}"),
                name: format!("Session {index}"),
                description: Some(format!("notes for session {index}")),
                node_count,
                stats: SessionStats {
                    documents: u64::from(node_count),
                    ..SessionStats::default()
                },
                last_modified: 1_700_000_000_000 + index as i64,
            })
            .collect()
    }

    pub(in crate::app::sim) fn simulation(records: &[SessionRecord], width: f32, height: f32) -> Simulation {
        Simulation::new(
            SessionSnapshot::new(records.to_vec()),
            width,
            height,
            PhysicsConfig::default(),
            Some(7),
        )
    }

    fn assert_invariants(sim: &Simulation, frame: usize) {
        let max_velocity = sim.physics.max_velocity;
        for node in sim.nodes() {
            assert!(
                sim.space().contains(node.position),
                "frame {frame}: {} escaped to {:?}",
                node.id,
                node.position
            );
            assert!(
                node.velocity.length() <= max_velocity + 1e-4,
                "frame {frame}: {} moving at {:?}",
                node.id,
                node.velocity
            );
            assert!(node.position.x.is_finite() && node.position.y.is_finite());
        }
    }

    #[test]
    fn four_sessions_stay_bounded_for_500_ticks() {
        let mut sim = simulation(&session_records(&[3, 5, 2, 8]), 800.0, 600.0);
        assert_eq!(sim.nodes().len(), 5);
        assert_eq!(sim.nodes()[0].position, pos2(400.0, 300.0));
        assert!((sim.nodes()[1].position - pos2(610.0, 300.0)).length() < 1e-3);

        for frame in 0..500 {
            sim.tick();
            assert_invariants(&sim, frame);
        }
    }

    #[test]
    fn many_sessions_stay_bounded_on_small_canvas() {
        let counts = (0..40).collect::<Vec<u32>>();
        let mut sim = simulation(&session_records(&counts), 420.0, 260.0);

        for frame in 0..800 {
            sim.tick();
            assert_invariants(&sim, frame);
        }
    }

    #[test]
    fn energy_never_grows_without_bound() {
        let mut sim = simulation(&session_records(&[3, 5, 2, 8, 1, 4]), 1024.0, 768.0);
        let ceiling = sim.nodes().len() as f32 * sim.physics.max_velocity.powi(2);

        for _ in 0..2_000 {
            sim.tick();
            assert!(sim.kinetic_energy() <= ceiling + 1e-3);
        }
    }

    #[test]
    fn energy_dissipates_without_orbit_drive() {
        let mut sim = simulation(&session_records(&[3, 5, 2, 8]), 800.0, 600.0);
        sim.set_physics(PhysicsConfig {
            orbit_force: 0.0,
            ..PhysicsConfig::default()
        });

        let mut energies = Vec::with_capacity(1_000);
        for _ in 0..1_000 {
            sim.tick();
            energies.push(sim.kinetic_energy());
        }

        let window_mean = |range: std::ops::Range<usize>| {
            let len = range.len() as f32;
            energies[range].iter().sum::<f32>() / len
        };
        let early = window_mean(0..100);
        let late = window_mean(900..1_000);
        assert!(late <= early, "late {late} > early {early}");
    }

    #[test]
    fn empty_snapshot_keeps_a_lonely_hub() {
        let mut sim = simulation(&[], 800.0, 600.0);
        assert_eq!(sim.nodes().len(), 1);
        assert_eq!(sim.session_count(), 0);

        for frame in 0..50 {
            sim.tick();
            assert_invariants(&sim, frame);
        }
        assert_eq!(sim.nodes()[0].position, pos2(400.0, 300.0));
    }

    #[test]
    fn new_snapshot_identity_triggers_full_reseed() {
        let records = session_records(&[3, 5]);
        let mut sim = simulation(&records, 800.0, 600.0);
        for _ in 0..30 {
            sim.tick();
        }

        let same = sim.snapshot.clone();
        assert!(!sim.sync_snapshot(&same));

        let reloaded = SessionSnapshot::new(session_records(&[3, 5, 2]));
        assert!(sim.sync_snapshot(&reloaded));
        assert_eq!(sim.nodes().len(), 4);
        assert!((sim.nodes()[1].position - pos2(610.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn reseed_keeps_selection_and_drops_drag() {
        let mut sim = simulation(&session_records(&[3, 5, 2]), 800.0, 600.0);
        let target = sim.nodes()[2].position;
        assert!(sim.pointer_down(target));
        sim.pointer_up(target, |_| {});
        assert_eq!(sim.pointer().selected, Some(2));

        assert!(sim.pointer_down(sim.nodes()[1].position));
        let reloaded = SessionSnapshot::new(vec![
            session_records(&[1, 1, 1])[2].clone(),
            session_records(&[1, 1])[1].clone(),
        ]);
        sim.sync_snapshot(&reloaded);

        assert!(!sim.pointer().is_dragging());
        assert_eq!(sim.pointer().selected, sim.index_of("session-1"));
        assert_eq!(sim.pointer().selected, Some(2));
    }

    #[test]
    fn resize_updates_derived_radius_without_reseeding() {
        let mut sim = simulation(&session_records(&[3, 5]), 800.0, 600.0);
        let before = sim.nodes()[1].position;

        assert!(sim.resize(1200.0, 1000.0));
        assert!(!sim.resize(1200.0, 1000.0));
        assert!((sim.space().ideal_radius() - 350.0).abs() < 1e-3);
        assert_eq!(sim.nodes()[1].position, before);
    }

    #[test]
    fn shrinking_canvas_pulls_settled_nodes_inside_new_bounds() {
        let mut sim = simulation(&session_records(&[3, 5, 2, 8, 1, 4]), 1200.0, 1000.0);
        for frame in 0..300 {
            sim.tick();
            assert_invariants(&sim, frame);
        }

        assert!(sim.resize(400.0, 300.0));
        assert_eq!(sim.space().x_bounds(), (100.0, 300.0));
        assert_eq!(sim.space().y_bounds(), (100.0, 200.0));

        sim.tick();
        assert_invariants(&sim, 300);
        for frame in 301..400 {
            sim.tick();
            assert_invariants(&sim, frame);
        }
    }

    #[test]
    fn render_view_reports_flags() {
        let mut sim = simulation(&session_records(&[3, 5]), 800.0, 600.0);
        let target = sim.nodes()[1].position;
        sim.pointer_move(target);

        let views = sim.render_nodes().collect::<Vec<_>>();
        assert_eq!(views.len(), 3);
        assert!(views[1].hovered);
        assert!(!views[0].hovered && !views[2].hovered);
        assert!(views[0].radius > views[1].radius);
        assert!(views[0].node.is_central());
    }
}
