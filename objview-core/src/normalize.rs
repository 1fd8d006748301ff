//! One-time normalization of freshly parsed geometry
//!
//! Moves the scene's center to the origin and scales it uniformly so the
//! largest half extent matches the configured target.
use crate::error::ViewerError;
use crate::geometry::{BoundingBox, Point3};
use crate::mesh::Scene;

/// Which point of the input becomes the origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CenteringMode {
    /// Midpoint of the axis-aligned bounding box
    #[default]
    BoundingBox,
    /// Arithmetic mean of all vertex positions
    Centroid,
}

/// Normalization settings. Scaling is always uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationParameters {
    pub target_extent: f64,
    pub centering: CenteringMode,
}

impl NormalizationParameters {
    pub fn new(target_extent: f64, centering: CenteringMode) -> Self {
        Self {
            target_extent,
            centering,
        }
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        if !self.target_extent.is_finite() || self.target_extent <= 0.0 {
            return Err(ViewerError::InvalidParameters(format!(
                "target extent must be a positive finite number, got {}",
                self.target_extent
            )));
        }
        Ok(())
    }
}

impl Default for NormalizationParameters {
    fn default() -> Self {
        Self::new(1.0, CenteringMode::default())
    }
}

/// What [`normalize`] did to the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub center: Point3,
    pub scale: f64,
}

impl Normalization {
    pub fn identity() -> Self {
        Self {
            center: Point3::ORIGIN,
            scale: 1.0,
        }
    }
}

/// Center point of the scene for the given mode, `None` if it has no vertices
pub fn center_of(scene: &Scene, mode: CenteringMode) -> Option<Point3> {
    match mode {
        CenteringMode::BoundingBox => scene.bounding_box().map(|bb| bb.center()),
        CenteringMode::Centroid => {
            if scene.is_empty() {
                return None;
            }
            let sum = scene
                .positions()
                .fold(Point3::ORIGIN, |acc, p| acc + p);
            Some(sum / scene.vertices().len() as f64)
        }
    }
}

/// Rewrite every vertex so the scene sits centered in the canonical volume
///
/// A degenerate scene (all vertices coincide) is only translated; its scale
/// factor is 1.0.
pub fn normalize(scene: &mut Scene, params: &NormalizationParameters) -> Normalization {
    let Some(center) = center_of(scene, params.centering) else {
        return Normalization::identity();
    };

    for vertex in scene.vertices_mut() {
        vertex.set_position(vertex.position() - center);
    }

    let max_extent = BoundingBox::from_points(scene.positions())
        .map(|bb| bb.max_extent_from_origin())
        .unwrap_or(0.0);
    let scale = if max_extent > 0.0 && max_extent.is_finite() {
        params.target_extent / max_extent
    } else {
        1.0
    };

    for vertex in scene.vertices_mut() {
        vertex.set_position(vertex.position() * scale);
    }

    Normalization { center, scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Figure, Vertex};

    fn tetra() -> Scene {
        Scene::new(
            vec![
                Vertex::new(0.0, 0.0, 0.0),
                Vertex::new(2.0, 0.0, 0.0),
                Vertex::new(0.0, 2.0, 0.0),
                Vertex::new(0.0, 0.0, 2.0),
            ],
            vec![Figure::polygon(vec![0, 1, 2])],
        )
        .unwrap()
    }

    fn assert_close(a: Point3, b: Point3) {
        assert!(a.distance(&b) < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_centroid_centering() {
        let mut scene = tetra();
        let params = NormalizationParameters::new(1.0, CenteringMode::Centroid);
        let result = normalize(&mut scene, &params);

        assert_close(result.center, Point3::new(0.5, 0.5, 0.5));
        assert!((result.scale - 1.0 / 1.5).abs() < 1e-9);
        assert_close(
            scene.vertices()[1].position(),
            Point3::new(1.0, -1.0 / 3.0, -1.0 / 3.0),
        );
    }

    #[test]
    fn test_bounding_box_centering() {
        let mut scene = tetra();
        let params = NormalizationParameters::new(2.0, CenteringMode::BoundingBox);
        let result = normalize(&mut scene, &params);

        assert_close(result.center, Point3::new(1.0, 1.0, 1.0));
        let bb = scene.bounding_box().unwrap();
        assert_close(bb.center(), Point3::ORIGIN);
        assert!((bb.max_extent_from_origin() - 2.0).abs() < 1e-9);
        assert_close(bb.min, Point3::new(-2.0, -2.0, -2.0));
    }

    #[test]
    fn test_uniform_scaling_keeps_proportions() {
        let mut scene = Scene::new(
            vec![Vertex::new(-10.0, -1.0, 0.0), Vertex::new(10.0, 1.0, 0.0)],
            Vec::new(),
        )
        .unwrap();
        normalize(&mut scene, &NormalizationParameters::default());
        let half = scene.bounding_box().unwrap().half_extents();
        assert!((half.x - 1.0).abs() < 1e-9);
        assert!((half.y - 0.1).abs() < 1e-9);
        assert_eq!(half.z, 0.0);
    }

    #[test]
    fn test_single_vertex_is_degenerate() {
        let mut scene = Scene::new(vec![Vertex::new(3.0, -4.0, 7.0)], Vec::new()).unwrap();
        let result = normalize(&mut scene, &NormalizationParameters::default());
        assert_eq!(result.scale, 1.0);
        assert_close(scene.vertices()[0].position(), Point3::ORIGIN);
    }

    #[test]
    fn test_empty_scene_is_untouched() {
        let mut scene = Scene::default();
        let result = normalize(&mut scene, &NormalizationParameters::default());
        assert_eq!(result, Normalization::identity());
    }

    #[test]
    fn test_parameter_validation() {
        assert!(NormalizationParameters::default().validate().is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = NormalizationParameters::new(bad, CenteringMode::Centroid);
            assert!(matches!(
                params.validate(),
                Err(ViewerError::InvalidParameters(_))
            ));
        }
    }
}
