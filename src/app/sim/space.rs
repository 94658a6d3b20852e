use eframe::egui::{Pos2, pos2};

/// Logical canvas the simulation lives in, in device-independent points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SimulationSpace {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub ideal_radius_factor: f32,
}

impl SimulationSpace {
    pub fn new(width: f32, height: f32, margin: f32, ideal_radius_factor: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            margin,
            ideal_radius_factor,
        }
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }

    pub fn ideal_radius(&self) -> f32 {
        self.width.min(self.height) * self.ideal_radius_factor
    }

    /// Allowed `[min, max]` interval on the x axis.
    pub fn x_bounds(&self) -> (f32, f32) {
        axis_bounds(self.width, self.margin)
    }

    /// Allowed `[min, max]` interval on the y axis.
    pub fn y_bounds(&self) -> (f32, f32) {
        axis_bounds(self.height, self.margin)
    }

    #[cfg(test)]
    pub fn contains(&self, position: Pos2) -> bool {
        let (min_x, max_x) = self.x_bounds();
        let (min_y, max_y) = self.y_bounds();
        position.x >= min_x && position.x <= max_x && position.y >= min_y && position.y <= max_y
    }
}

// A canvas narrower than twice the margin collapses to its midpoint.
fn axis_bounds(dimension: f32, margin: f32) -> (f32, f32) {
    let mid = dimension * 0.5;
    (margin.min(mid), (dimension - margin).max(mid))
}
