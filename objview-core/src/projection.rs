//! Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Half height of the orthographic view volume
const ORTHO_HALF_HEIGHT: f64 = 2.0;
/// Depth range of the orthographic view volume
const ORTHO_DEPTH: f64 = 100.0;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }
}

/// Camera looking at the canonical working volume
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_aspect(width as f64 / height.max(1) as f64)
    }

    pub fn with_aspect(aspect: f64) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 45f64.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_width = ORTHO_HALF_HEIGHT * self.aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -ORTHO_HALF_HEIGHT,
                    ORTHO_HALF_HEIGHT,
                    -ORTHO_DEPTH,
                    ORTHO_DEPTH,
                )
            }
        }
    }

    /// Project a world point to screen space without clipping to the viewport
    ///
    /// Returns `None` only for points behind a perspective camera. The depth
    /// is in normalized device coordinates, smaller is closer.
    pub fn project(&self, point: &Point3<f64>, width: u32, height: u32) -> Option<(f64, f64, f64)> {
        let eye = self.view_matrix().transform_point(point);
        if self.mode == ProjectionMode::Perspective && eye.z > -self.near {
            return None;
        }

        let ndc = self.projection_matrix().transform_point(&eye);
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f64;

        Some((screen_x, screen_y, ndc.z))
    }

    /// Project a world point to 2D screen space, `None` outside the viewport
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let (x, y, depth) = self.project(point, width, height)?;
        let inside = (0.0..=width as f64).contains(&x)
            && (0.0..=height as f64).contains(&y)
            && (-1.0..=1.0).contains(&depth);
        inside.then_some((x, y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
