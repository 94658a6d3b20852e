use eframe::egui::{Pos2, Vec2, vec2};

use crate::config::PhysicsConfig;

use super::{SimNode, SimulationSpace};

fn fallback_direction(first: usize, second: usize) -> Vec2 {
    let (low, high, sign) = if first <= second {
        (first, second, 1.0)
    } else {
        (second, first, -1.0)
    };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin()) * sign
}

/// Inverse-square push exerted on the node at `point_a` by the node at `point_b`.
///
/// Zero beyond the cutoff. Swapping the arguments (and indices) negates the result.
pub(super) fn repulsion_between(
    point_a: Pos2,
    index_a: usize,
    point_b: Pos2,
    index_b: usize,
    physics: &PhysicsConfig,
) -> Vec2 {
    let delta = point_a - point_b;
    let raw_distance = delta.length();
    if raw_distance >= physics.repulsion_cutoff() {
        return Vec2::ZERO;
    }

    let direction = if raw_distance > 0.0001 {
        delta / raw_distance
    } else {
        fallback_direction(index_a, index_b)
    };
    let distance = raw_distance.max(1.0);
    direction * (physics.repulsion / (distance * distance))
}

/// Spring toward the ideal orbit radius plus the tangential orbit push.
fn orbit_forces(position: Pos2, center: Pos2, ideal_radius: f32, physics: &PhysicsConfig) -> Vec2 {
    let to_center = center - position;
    let distance = to_center.length().max(1.0);
    let inward = to_center / distance;

    let spring = inward * ((distance - ideal_radius) * physics.center_attraction);
    let radial = -inward;
    let tangent = vec2(-radial.y, radial.x) * physics.orbit_force;

    spring + tangent
}

fn bounce_axis(coordinate: &mut f32, velocity: &mut f32, (min, max): (f32, f32), restitution: f32) {
    if *coordinate < min {
        *coordinate = min;
        *velocity *= -restitution;
    } else if *coordinate > max {
        *coordinate = max;
        *velocity *= -restitution;
    }
}

/// Advances every node except `pinned` by one frame.
pub(super) fn step_physics(
    nodes: &mut [SimNode],
    forces: &mut Vec<Vec2>,
    space: &SimulationSpace,
    physics: &PhysicsConfig,
    pinned: Option<usize>,
) {
    let node_count = nodes.len();
    if node_count == 0 {
        return;
    }

    forces.resize(node_count, Vec2::ZERO);
    forces.fill(Vec2::ZERO);

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let push = repulsion_between(nodes[i].position, i, nodes[j].position, j, physics);
            forces[i] += push;
            forces[j] -= push;
        }
    }

    let center = nodes[0].position;
    let ideal_radius = space.ideal_radius();
    for (node, force) in nodes.iter().zip(forces.iter_mut()).skip(1) {
        *force += orbit_forces(node.position, center, ideal_radius, physics);
    }

    let max_speed = physics.max_velocity;
    let max_speed_sq = max_speed * max_speed;
    let x_bounds = space.x_bounds();
    let y_bounds = space.y_bounds();
    for (index, node) in nodes.iter_mut().enumerate() {
        if Some(index) == pinned {
            continue;
        }

        let mut velocity = (node.velocity + forces[index]) * physics.damping;
        let speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= max_speed / speed_sq.sqrt();
        }

        let mut position = node.position + velocity;
        bounce_axis(&mut position.x, &mut velocity.x, x_bounds, physics.restitution);
        bounce_axis(&mut position.y, &mut velocity.y, y_bounds, physics.restitution);

        node.position = position;
        node.velocity = velocity;
    }
}
