use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::navigate::SessionNavigator;
use super::super::sim::Simulation;

struct PointerInput {
    latest: Option<Pos2>,
    pressed: bool,
    down: bool,
    released: bool,
}

impl PointerInput {
    fn read(ui: &Ui) -> Self {
        ui.input(|input| Self {
            latest: input.pointer.latest_pos(),
            pressed: input.pointer.primary_pressed(),
            down: input.pointer.primary_down(),
            released: input.pointer.primary_released(),
        })
    }
}

fn to_canvas(rect: Rect, screen: Pos2) -> Pos2 {
    (screen - rect.min).to_pos2()
}

/// Feeds this frame's pointer input into the simulation's interaction state.
///
/// Releases are read from the whole window, and a drag whose button is no
/// longer held ends even if the release itself happened outside the window.
pub(super) fn handle_pointer(
    ui: &Ui,
    rect: Rect,
    sim: &mut Simulation,
    navigator: &mut SessionNavigator,
) {
    let input = PointerInput::read(ui);
    let canvas_pos = input.latest.map(|pos| to_canvas(rect, pos));

    if sim.pointer().is_dragging() {
        if let Some(pos) = canvas_pos {
            sim.pointer_move(pos);
        }
        if input.released || !input.down {
            release(sim, canvas_pos, navigator);
        }
        return;
    }

    let over_canvas = input.latest.filter(|pos| rect.contains(*pos));
    let Some(screen_pos) = over_canvas else {
        sim.pointer_left();
        return;
    };

    let pos = to_canvas(rect, screen_pos);
    sim.pointer_move(pos);

    if input.pressed && sim.pointer_down(pos) && input.released {
        release(sim, Some(pos), navigator);
    }
}

fn release(sim: &mut Simulation, canvas_pos: Option<Pos2>, navigator: &mut SessionNavigator) {
    let Some(pos) = canvas_pos.or(sim.pointer().position) else {
        return;
    };
    sim.pointer_up(pos, |session_id| navigator.open(session_id));
}

pub(super) fn update_cursor(ui: &Ui, sim: &Simulation) {
    let pointer = sim.pointer();
    let icon = if pointer.is_dragging() {
        egui::CursorIcon::Grabbing
    } else if pointer.hovered().is_some() {
        egui::CursorIcon::PointingHand
    } else {
        return;
    };
    ui.output_mut(|output| output.cursor_icon = icon);
}
