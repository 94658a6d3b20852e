use eframe::egui::{Pos2, Vec2};
use tracing::{debug, info};

use super::{NodeKind, Simulation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum PointerPhase {
    #[default]
    Idle,
    Hovering(usize),
    Dragging(usize),
}

#[derive(Clone, Copy, Debug, Default)]
pub(in crate::app) struct PointerState {
    pub position: Option<Pos2>,
    pub phase: PointerPhase,
    pub selected: Option<usize>,
}

impl PointerState {
    pub fn hovered(&self) -> Option<usize> {
        match self.phase {
            PointerPhase::Hovering(index) | PointerPhase::Dragging(index) => Some(index),
            PointerPhase::Idle => None,
        }
    }

    pub fn dragged(&self) -> Option<usize> {
        match self.phase {
            PointerPhase::Dragging(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged().is_some()
    }

    fn settle(&mut self, hit: Option<usize>) {
        self.phase = hit.map_or(PointerPhase::Idle, PointerPhase::Hovering);
    }
}

impl Simulation {
    /// First node whose hit circle contains `point`, hub first.
    pub fn hit_test(&self, point: Pos2) -> Option<usize> {
        self.nodes.iter().position(|node| {
            let radius = self.radius_for(node.kind);
            (node.position - point).length_sq() <= radius * radius
        })
    }

    pub fn pointer_move(&mut self, point: Pos2) {
        self.pointer.position = Some(point);

        if let Some(index) = self.pointer.dragged() {
            let node = &mut self.nodes[index];
            node.position = point;
            node.velocity = Vec2::ZERO;
            return;
        }

        let hit = self.hit_test(point);
        self.pointer.settle(hit);
    }

    /// Starts dragging the node under `point`. Returns whether a drag began.
    pub fn pointer_down(&mut self, point: Pos2) -> bool {
        self.pointer.position = Some(point);
        if self.pointer.is_dragging() {
            return false;
        }

        let Some(index) = self.hit_test(point) else {
            self.pointer.settle(None);
            return false;
        };

        self.nodes[index].velocity = Vec2::ZERO;
        self.pointer.phase = PointerPhase::Dragging(index);
        debug!(node = %self.nodes[index].id, "drag started");
        true
    }

    /// Ends a drag at `point`.
    ///
    /// When the release lands on a node it becomes selected; releasing on a
    /// session node also calls `on_activate` with its id. Returns the node
    /// that was activated.
    pub fn pointer_up(&mut self, point: Pos2, mut on_activate: impl FnMut(&str)) -> Option<usize> {
        self.pointer.position = Some(point);
        let dragged = self.pointer.dragged()?;

        let node = &mut self.nodes[dragged];
        node.position = point;
        node.velocity = Vec2::ZERO;

        let hit = self.hit_test(point);
        self.pointer.settle(hit);

        let index = hit?;
        self.pointer.selected = Some(index);
        let node = &self.nodes[index];
        if node.kind == NodeKind::Session {
            info!(session = %node.id, "session activated");
            on_activate(&node.id);
        }
        Some(index)
    }

    /// Pointer left the canvas. An active drag keeps going until release.
    pub fn pointer_left(&mut self) {
        if self.pointer.is_dragging() {
            return;
        }
        self.pointer.position = None;
        self.pointer.settle(None);
    }

    pub fn clear_selection(&mut self) {
        self.pointer.selected = None;
    }
}
