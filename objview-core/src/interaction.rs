//! Turns relative pointer and wheel gestures into absolute transform parameters
//!
//! Front ends track gestures here and hand the resulting totals to the
//! facade, which only understands absolute move/rotate/scale values.

/// Degrees of rotation per pixel of drag
pub const ROTATE_SENSITIVITY: f64 = 0.5;
/// Scene units of translation per pixel of drag
pub const MOVE_SENSITIVITY: f64 = 0.01;
/// Scale multiplier per wheel step
pub const ZOOM_FACTOR: f64 = 1.1;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;
/// Pitch is kept within this many degrees of level
pub const MAX_PITCH: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    rot_x: f64,
    rot_y: f64,
    move_x: f64,
    move_y: f64,
    scale: f64,
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            rot_x: 0.0,
            rot_y: 0.0,
            move_x: 0.0,
            move_y: 0.0,
            scale: 1.0,
        }
    }

    /// Rotation drag by `(dx, dy)` pixels; returns the absolute angles
    pub fn drag_rotate(&mut self, dx: f64, dy: f64) -> (f64, f64, f64) {
        self.rot_y += dx * ROTATE_SENSITIVITY;
        self.rot_x -= dy * ROTATE_SENSITIVITY;
        self.rot_x = self.rot_x.clamp(-MAX_PITCH, MAX_PITCH);
        self.rotation()
    }

    /// Pan drag by `(dx, dy)` pixels; returns the absolute translation
    pub fn drag_move(&mut self, dx: f64, dy: f64) -> (f64, f64, f64) {
        self.move_x += dx * MOVE_SENSITIVITY;
        self.move_y -= dy * MOVE_SENSITIVITY;
        self.translation()
    }

    /// Wheel by `steps` notches (positive zooms in); returns the absolute scale
    pub fn zoom(&mut self, steps: i32) -> f64 {
        self.scale *= ZOOM_FACTOR.powi(steps);
        self.scale = self.scale.clamp(MIN_SCALE, MAX_SCALE);
        self.scale
    }

    pub fn rotation(&self) -> (f64, f64, f64) {
        (self.rot_x, self.rot_y, 0.0)
    }

    pub fn translation(&self) -> (f64, f64, f64) {
        (self.move_x, self.move_y, 0.0)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}
