use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Stroke, Vec2, vec2};

use crate::util::truncate_label;

use super::super::render_utils::{
    HOVER_COLOR, HUB_COLOR, MATCH_COLOR, SELECTED_COLOR, blend_color, dim_color, recency,
    session_color,
};
use super::super::sim::{NodeView, Simulation};

const LABEL_MAX_CHARS: usize = 22;

pub(super) struct RenderOptions<'a> {
    pub search_matches: Option<&'a HashSet<usize>>,
    pub show_links: bool,
}

/// Paints the current simulation state. Never mutates it.
pub(super) fn draw_simulation(
    painter: &Painter,
    rect: Rect,
    sim: &Simulation,
    options: &RenderOptions<'_>,
) {
    let offset = rect.min.to_vec2();
    let nodes = sim.nodes();
    let Some(hub) = nodes.first() else {
        return;
    };

    let (oldest, newest) = nodes
        .iter()
        .skip(1)
        .fold((i64::MAX, i64::MIN), |(oldest, newest), node| {
            (oldest.min(node.last_modified), newest.max(node.last_modified))
        });

    if options.show_links {
        let hub_pos = hub.position + offset;
        for node in nodes.iter().skip(1) {
            painter.line_segment(
                [hub_pos, node.position + offset],
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(110, 120, 140, 70)),
            );
        }
    }

    let search_active = options
        .search_matches
        .is_some_and(|matches| !matches.is_empty());

    for view in sim.render_nodes() {
        let is_match = options
            .search_matches
            .is_some_and(|matches| matches.contains(&view.index));
        let base = if view.node.is_central() {
            HUB_COLOR
        } else {
            session_color(recency(view.node.last_modified, oldest, newest))
        };
        let color = if view.dragged || view.hovered {
            blend_color(base, HOVER_COLOR, 0.65)
        } else if is_match {
            blend_color(base, MATCH_COLOR, 0.7)
        } else if search_active && !view.node.is_central() {
            dim_color(base, 0.4)
        } else {
            base
        };

        draw_node(painter, offset, &view, color);
    }
}

fn draw_node(painter: &Painter, offset: Vec2, view: &NodeView<'_>, color: Color32) {
    let center = view.node.position + offset;
    let radius = view.radius;

    if view.selected {
        painter.circle_stroke(center, radius + 6.0, Stroke::new(2.2, SELECTED_COLOR));
    }

    painter.circle_filled(center, radius, color);
    let outline = if view.dragged { 2.4 } else { 1.0 };
    painter.circle_stroke(
        center,
        radius,
        Stroke::new(outline, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
    );

    let (font_size, label_color) = if view.node.is_central() {
        (15.0, Color32::from_gray(250))
    } else {
        (12.5, Color32::from_gray(232))
    };
    painter.text(
        center + vec2(0.0, radius + 6.0),
        Align2::CENTER_TOP,
        truncate_label(&view.node.display_name, LABEL_MAX_CHARS),
        FontId::proportional(font_size),
        label_color,
    );

    if view.node.weight > 0 {
        let badge_center = center + vec2(radius * 0.72, -radius * 0.72);
        let badge_text = if view.node.weight > 999 {
            "999+".to_owned()
        } else {
            view.node.weight.to_string()
        };
        let badge_radius = 7.0 + badge_text.len() as f32 * 2.2;
        painter.circle_filled(badge_center, badge_radius, Color32::from_rgb(36, 42, 52));
        painter.circle_stroke(badge_center, badge_radius, Stroke::new(1.0, color));
        painter.text(
            badge_center,
            Align2::CENTER_CENTER,
            badge_text,
            FontId::proportional(10.5),
            Color32::from_gray(240),
        );
    }
}
