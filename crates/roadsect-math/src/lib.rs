#![warn(missing_docs)]

//! Math types for roadsect.
//!
//! Thin wrappers around nalgebra providing the types used by the
//! cross-section pipeline: points, vectors, the Y-up world convention,
//! bounding boxes, and tolerance constants.

use nalgebra::{Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in 2D space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A unit quaternion used for label orientation.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// World up axis. The model is Y-up; X and Z are horizontal.
pub fn up() -> Vec3 {
    Vec3::y()
}

/// Drop the vertical component of a vector.
pub fn horizontal(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Length of the horizontal component of a vector.
pub fn horizontal_norm(v: &Vec3) -> f64 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Midpoint of two points.
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Distance tolerance for vertex comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Linear distance tolerance in world units.
    pub linear: f64,
}

impl Tolerance {
    /// Default vertex-equality tolerance (1e-3 world units).
    pub const DEFAULT: Self = Self { linear: 1e-3 };

    /// Tolerance with the given linear distance.
    pub const fn new(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if `p` lies within tolerance of the line through `a` and `b`,
    /// between the two points.
    pub fn is_between_collinear(&self, a: &Point3, p: &Point3, b: &Point3) -> bool {
        let ab = b - a;
        let len_sq = ab.norm_squared();
        if len_sq < self.linear * self.linear {
            return false;
        }
        let t = (p - a).dot(&ab) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return false;
        }
        let closest = a + ab * t;
        (p - closest).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Bounding box of a set of points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.include_point(p);
        }
        bb
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Merge another box into this one.
    pub fn include_box(&mut self, other: &Aabb3) {
        if other.is_valid() {
            self.include_point(&other.min);
            self.include_point(&other.max);
        }
    }

    /// Check if the box contains at least one point.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        midpoint(&self.min, &self.max)
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ]
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_drops_y() {
        let v = Vec3::new(3.0, 7.0, 4.0);
        let h = horizontal(&v);
        assert_eq!(h.y, 0.0);
        assert_relative_eq!(horizontal_norm(&v), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-4, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.01, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }

    #[test]
    fn test_tolerance_new() {
        let tol = Tolerance::new(0.5);
        let a = Point3::origin();
        assert!(tol.points_equal(&a, &Point3::new(0.4, 0.0, 0.0)));
        assert!(!Tolerance::DEFAULT.points_equal(&a, &Point3::new(0.4, 0.0, 0.0)));
        assert_eq!(Tolerance::default(), Tolerance::DEFAULT);
    }

    #[test]
    fn test_between_collinear() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);
        assert!(tol.is_between_collinear(&a, &Point3::new(4.0, 0.0, 0.0), &b));
        assert!(!tol.is_between_collinear(&a, &Point3::new(4.0, 0.5, 0.0), &b));
        assert!(!tol.is_between_collinear(&a, &Point3::new(12.0, 0.0, 0.0), &b));
    }

    #[test]
    fn test_aabb_corners() {
        let bb = Aabb3::from_points(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)]);
        assert!(bb.is_valid());
        let corners = bb.corners();
        assert_eq!(corners.len(), 8);
        assert!(corners.contains(&Point3::new(2.0, 0.0, 6.0)));
        assert_relative_eq!(bb.center().y, 2.0);
    }

    #[test]
    fn test_empty_aabb_is_invalid() {
        let mut bb = Aabb3::empty();
        assert!(!bb.is_valid());
        bb.include_box(&Aabb3::empty());
        assert!(!bb.is_valid());
    }
}
