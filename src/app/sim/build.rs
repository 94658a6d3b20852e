use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::config::PhysicsConfig;
use crate::sessions::{SessionRecord, SessionStats};

use super::{CENTRAL_NODE_ID, NodeKind, SimNode, SimulationSpace};

fn central_node(sessions: &[SessionRecord], space: &SimulationSpace) -> SimNode {
    let stats = sessions
        .iter()
        .fold(SessionStats::default(), |total, session| total + session.stats);
    let weight = sessions
        .iter()
        .map(|session| u64::from(session.node_count))
        .sum();
    let last_modified = sessions
        .iter()
        .map(|session| session.last_modified)
        .max()
        .unwrap_or(0);

    SimNode {
        id: CENTRAL_NODE_ID.to_owned(),
        kind: NodeKind::Central,
        display_name: "Second Brain".to_owned(),
        description: Some(match sessions.len() {
            1 => "1 session".to_owned(),
            count => format!("{count} sessions"),
        }),
        weight,
        stats,
        last_modified,
        position: space.center(),
        velocity: Vec2::ZERO,
    }
}

/// Seed radius for `session_count` sessions: the ideal orbit, widened when crowded.
pub(super) fn seed_radius(session_count: usize, space: &SimulationSpace, physics: &PhysicsConfig) -> f32 {
    let radius = space.ideal_radius();
    if session_count > 4 {
        radius * physics.crowd_spread
    } else {
        radius
    }
}

/// Builds the hub plus one node per session, evenly spaced on a ring.
pub(super) fn seed_nodes(
    sessions: &[SessionRecord],
    space: &SimulationSpace,
    physics: &PhysicsConfig,
    rng: &mut impl Rng,
) -> Vec<SimNode> {
    let mut nodes = Vec::with_capacity(sessions.len() + 1);
    nodes.push(central_node(sessions, space));

    if sessions.is_empty() {
        return nodes;
    }

    let center = space.center();
    let radius = seed_radius(sessions.len(), space, physics);
    let angle_step = TAU / sessions.len() as f32;
    let jitter = physics.initial_jitter;

    for (index, session) in sessions.iter().enumerate() {
        let angle = index as f32 * angle_step;
        let velocity = if jitter > 0.0 {
            vec2(rng.gen_range(-jitter..jitter), rng.gen_range(-jitter..jitter))
        } else {
            Vec2::ZERO
        };

        nodes.push(SimNode {
            id: session.id.clone(),
            kind: NodeKind::Session,
            display_name: session.name.clone(),
            description: session.description.clone(),
            weight: u64::from(session.node_count),
            stats: session.stats,
            last_modified: session.last_modified,
            position: center + vec2(angle.cos(), angle.sin()) * radius,
            velocity,
        });
    }

    nodes
}
