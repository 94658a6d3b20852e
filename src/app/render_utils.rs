use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

pub(super) const HUB_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(255, 236, 160);
pub(super) const HOVER_COLOR: Color32 = Color32::from_rgb(255, 164, 101);
pub(super) const MATCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    const GRID_STEP: f32 = 56.0;

    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (rect.width() * 0.5).rem_euclid(GRID_STEP);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += GRID_STEP;
    }

    let mut y = rect.top() + (rect.height() * 0.5).rem_euclid(GRID_STEP);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += GRID_STEP;
    }
}

/// 0 for the oldest timestamp in `[oldest, newest]`, 1 for the newest.
pub(super) fn recency(last_modified: i64, oldest: i64, newest: i64) -> f32 {
    if newest <= oldest {
        return 1.0;
    }
    let span = i128::from(newest) - i128::from(oldest);
    let age = i128::from(last_modified) - i128::from(oldest);
    (age as f64 / span as f64).clamp(0.0, 1.0) as f32
}

/// Session colour: recently edited sessions are brighter and warmer.
pub(super) fn session_color(recency: f32) -> Color32 {
    let t = recency.clamp(0.0, 1.0);
    let r = (70.0 + (80.0 * t)) as u8;
    let g = (110.0 + (70.0 * t)) as u8;
    let b = (170.0 + (75.0 * t)) as u8;
    Color32::from_rgb(r, g, b)
}
