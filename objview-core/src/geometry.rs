//! Geometry primitives shared by the mesh, normalizer and transform engine
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use nalgebra as na;

/// A point (or displacement) in 3D space
///
/// Points are ordered lexicographically on `(x, y, z)` using IEEE total
/// ordering, so they can be sorted and deduplicated deterministically.
/// Negative zero compares equal to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum
    pub fn min(self, other: Point3) -> Point3 {
        Point3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum
    pub fn max(self, other: Point3) -> Point3 {
        Point3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Largest absolute coordinate
    pub fn max_abs_component(&self) -> f64 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    pub fn distance(&self, other: &Point3) -> f64 {
        self.to_na().coords.metric_distance(&other.to_na().coords)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_na(self) -> na::Point3<f64> {
        na::Point3::new(self.x, self.y, self.z)
    }

    pub fn to_vector(self) -> na::Vector3<f64> {
        na::Vector3::new(self.x, self.y, self.z)
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point3 {}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_coord(self.x, other.x)
            .then_with(|| cmp_coord(self.y, other.y))
            .then_with(|| cmp_coord(self.z, other.z))
    }
}

/// `total_cmp` with `-0.0` folded into `0.0`
fn cmp_coord(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

impl From<na::Point3<f64>> for Point3 {
    fn from(p: na::Point3<f64>) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

impl From<na::Vector3<f64>> for Point3 {
    fn from(v: na::Vector3<f64>) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for na::Point3<f64> {
    fn from(p: Point3) -> Self {
        p.to_na()
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point3 {
    type Output = Point3;

    fn neg(self) -> Point3 {
        Point3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f64) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Point3 {
    type Output = Point3;

    fn div(self, rhs: f64) -> Point3 {
        Point3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    /// Smallest box containing every point, `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bb, p| BoundingBox {
                min: bb.min.min(p),
                max: bb.max.max(p),
            },
        ))
    }

    /// Midpoint of the box extremes
    pub fn center(&self) -> Point3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Point3 {
        self.max - self.min
    }

    /// Half of the box size along each axis
    pub fn half_extents(&self) -> Point3 {
        self.size() * 0.5
    }

    /// Largest distance from the origin to a box face, per axis
    ///
    /// For a box centered on the origin this equals the largest half extent.
    pub fn max_extent_from_origin(&self) -> f64 {
        self.min.max_abs_component().max(self.max.max_abs_component())
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}
