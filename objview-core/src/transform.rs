//! Interactive move/rotate/scale of a normalized scene
use nalgebra::{Matrix4, Point3 as NaPoint3, Vector3};
use tracing::trace;

use crate::geometry::Point3;
use crate::mesh::Scene;

/// Rotation around three axes, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Angles in radians, in x/y/z order
    pub fn to_radians(&self) -> Vector3<f64> {
        Vector3::new(self.x.to_radians(), self.y.to_radians(), self.z.to_radians())
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Absolute move/rotate/scale parameters applied on top of the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub translation: Vector3<f64>,
    pub rotation: RotationState,
    pub scale: f64,
}

impl TransformState {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: RotationState::zero(),
            scale: 1.0,
        }
    }

    /// `T * S * Rz * Ry * Rx`
    pub fn model_matrix(&self) -> Matrix4<f64> {
        Transform::translation_matrix(self.translation.x, self.translation.y, self.translation.z)
            * Transform::scale_matrix(self.scale)
            * Transform::rotation_matrix(&self.rotation)
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about X, then Y, then Z
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f64> {
        let angles = rotation.to_radians();
        let rx = Matrix4::new_rotation(Vector3::new(angles.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, angles.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, angles.z));

        rz * ry * rx
    }

    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale_matrix(factor: f64) -> Matrix4<f64> {
        Matrix4::new_scaling(factor)
    }
}

/// Re-derives vertex positions from the normalized baseline on every update
///
/// The engine never reads back the positions it wrote, so repeated small
/// updates cannot accumulate floating point drift. Inputs are assumed finite;
/// the scale factor is applied as given.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    baseline: Vec<Point3>,
    state: TransformState,
}

impl TransformEngine {
    /// Capture the scene's current positions as the baseline
    pub fn new(baseline: &Scene) -> Self {
        Self {
            baseline: baseline.positions().collect(),
            state: TransformState::identity(),
        }
    }

    pub fn baseline(&self) -> &[Point3] {
        &self.baseline
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn set_translation(&mut self, dx: f64, dy: f64, dz: f64) {
        self.state.translation = Vector3::new(dx, dy, dz);
    }

    pub fn set_rotation(&mut self, rx: f64, ry: f64, rz: f64) {
        self.state.rotation = RotationState::new(rx, ry, rz);
    }

    pub fn set_scale(&mut self, factor: f64) {
        self.state.scale = factor;
    }

    pub fn reset(&mut self) {
        self.state = TransformState::identity();
    }

    /// Overwrite the scene's positions with the transformed baseline
    pub fn apply(&self, scene: &mut Scene) {
        debug_assert_eq!(scene.vertices().len(), self.baseline.len());

        let model = self.state.model_matrix();
        for (vertex, base) in scene.vertices_mut().iter_mut().zip(&self.baseline) {
            let p: NaPoint3<f64> = model.transform_point(&base.to_na());
            vertex.set_position(p.into());
        }

        trace!(state = ?self.state, vertices = self.baseline.len(), "applied transform");
    }
}
