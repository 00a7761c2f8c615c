//! The vertical cutting plane spanned by two anchor points.

use roadsect_math::{horizontal, midpoint, up, Aabb3, Point3, Vec3};

use crate::error::{Result, SectionError};
use crate::project::project_point;
use crate::types::Point2D;

/// Minimum horizontal anchor separation.
const MIN_SPAN: f64 = 1e-9;

/// A vertical cutting plane defined by two anchor points.
///
/// `normal` and `forward` are derived from the anchors and are always
/// perpendicular, horizontal unit vectors. `normal × up == forward`.
#[derive(Debug, Clone, PartialEq)]
pub struct CutPlane {
    point0: Point3,
    point1: Point3,
    vertical_center: Option<f64>,
    normal: Vec3,
    forward: Vec3,
    position: Point3,
}

impl CutPlane {
    /// Create a plane through two anchors.
    ///
    /// Fails when the anchors are stacked vertically (no horizontal extent).
    pub fn new(point0: Point3, point1: Point3) -> Result<Self> {
        let mut plane = Self {
            point0,
            point1,
            vertical_center: None,
            normal: Vec3::zeros(),
            forward: Vec3::zeros(),
            position: Point3::origin(),
        };
        plane.derive()?;
        Ok(plane)
    }

    /// Re-center the plane position vertically, typically on the model's
    /// vertical bounds center.
    pub fn with_vertical_center(mut self, y: f64) -> Self {
        self.vertical_center = Some(y);
        self.position.y = y;
        self
    }

    /// Re-center on the vertical center of a bounding box.
    pub fn centered_on(self, bounds: &Aabb3) -> Self {
        if bounds.is_valid() {
            self.with_vertical_center(bounds.center().y)
        } else {
            self
        }
    }

    /// Move the anchors. Derived vectors are recomputed.
    pub fn set_anchors(&mut self, point0: Point3, point1: Point3) -> Result<()> {
        let previous = (self.point0, self.point1);
        self.point0 = point0;
        self.point1 = point1;
        if let Err(err) = self.derive() {
            self.point0 = previous.0;
            self.point1 = previous.1;
            return Err(err);
        }
        Ok(())
    }

    fn derive(&mut self) -> Result<()> {
        let direction = horizontal(&(self.point0 - self.point1));
        let span = direction.norm();
        if !(span > MIN_SPAN) {
            return Err(SectionError::DegeneratePlane);
        }
        let forward = direction / span;
        self.forward = forward;
        self.normal = Vec3::new(forward.z, 0.0, -forward.x);
        self.position = midpoint(&self.point0, &self.point1);
        if let Some(y) = self.vertical_center {
            self.position.y = y;
        }
        Ok(())
    }

    /// First anchor.
    pub fn point0(&self) -> Point3 {
        self.point0
    }

    /// Second anchor.
    pub fn point1(&self) -> Point3 {
        self.point1
    }

    /// Unit normal of the plane.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Unit horizontal direction from `point1` toward `point0`.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Reference position used by the 2D view.
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Midpoint of the anchors.
    pub fn center(&self) -> Point3 {
        midpoint(&self.point0, &self.point1)
    }

    /// Horizontal distance between the anchors.
    pub fn span(&self) -> f64 {
        horizontal(&(self.point0 - self.point1)).norm()
    }

    /// Signed distance of a point from the plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&(p - self.position))
    }

    /// Horizontal position of `p` along the anchor segment:
    /// 0 at `point0`, 1 at `point1`.
    pub fn anchor_parameter(&self, p: &Point3) -> f64 {
        let along = horizontal(&(self.point1 - self.point0));
        horizontal(&(p - self.point0)).dot(&along) / along.norm_squared()
    }

    /// Check whether `p` lies horizontally between the anchors, allowing
    /// `slack` (a fraction of the span) past either anchor.
    pub fn is_between_anchors(&self, p: &Point3, slack: f64) -> bool {
        let s = self.anchor_parameter(p);
        s >= -slack && s <= 1.0 + slack
    }

    /// Check whether a bounding box touches or crosses the plane.
    ///
    /// Returns false only when all eight corners are strictly on one side.
    pub fn straddles(&self, bounds: &Aabb3) -> bool {
        if !bounds.is_valid() {
            return false;
        }
        let mut above = false;
        let mut below = false;
        for corner in bounds.corners() {
            let d = self.signed_distance(&corner);
            if d >= 0.0 {
                above = true;
            }
            if d <= 0.0 {
                below = true;
            }
        }
        above && below
    }

    /// Project a world point into the 2D view.
    pub fn project(&self, p: &Point3, rate: f64) -> Point2D {
        project_point(p, &self.normal, &self.position, rate)
    }

    /// Map a 2D view point back onto the plane.
    pub fn unproject(&self, p: Point2D, rate: f64) -> Point3 {
        self.position - (p.x / rate) * self.forward + (p.y / rate) * up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_is_orthonormal() {
        let plane = CutPlane::new(Point3::new(3.0, 1.0, -2.0), Point3::new(-4.0, 6.0, 5.0)).unwrap();
        let n = plane.normal();
        let f = plane.forward();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.dot(&f), 0.0, epsilon = 1e-12);
        assert_relative_eq!(n.y, 0.0);
        assert_relative_eq!((n.cross(&up()) - f).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_anchors_lie_on_plane() {
        let p0 = Point3::new(10.0, 2.0, 0.0);
        let p1 = Point3::new(0.0, -3.0, 10.0);
        let plane = CutPlane::new(p0, p1).unwrap();
        assert_relative_eq!(plane.signed_distance(&p0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(plane.signed_distance(&p1), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_anchors_rejected() {
        let err = CutPlane::new(Point3::new(1.0, 0.0, 1.0), Point3::new(1.0, 5.0, 1.0)).unwrap_err();
        assert!(matches!(err, SectionError::DegeneratePlane));
    }

    #[test]
    fn test_set_anchors_recomputes() {
        let mut plane = CutPlane::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, -5.0)).unwrap();
        assert_relative_eq!(plane.normal().x, 1.0);
        plane
            .set_anchors(Point3::new(5.0, 0.0, 0.0), Point3::new(-5.0, 0.0, 0.0))
            .unwrap();
        assert_relative_eq!(plane.forward().x, 1.0);
        assert_relative_eq!(plane.normal().z, -1.0);

        assert!(plane.set_anchors(Point3::origin(), Point3::origin()).is_err());
        assert_relative_eq!(plane.point0().x, 5.0);
    }

    #[test]
    fn test_vertical_center() {
        let plane = CutPlane::new(Point3::new(0.0, 2.0, 5.0), Point3::new(0.0, 4.0, -5.0))
            .unwrap()
            .with_vertical_center(-7.0);
        assert_relative_eq!(plane.position().y, -7.0);
        assert_relative_eq!(plane.center().y, 3.0);
    }

    #[test]
    fn test_anchor_parameter() {
        let plane = CutPlane::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 10.0)).unwrap();
        assert_relative_eq!(plane.anchor_parameter(&Point3::new(0.0, 9.0, 2.5)), 0.25);
        assert!(plane.is_between_anchors(&Point3::new(0.0, 0.0, 10.0), 0.0));
        assert!(!plane.is_between_anchors(&Point3::new(0.0, 0.0, 10.5), 0.0));
    }

    #[test]
    fn test_straddles() {
        let plane = CutPlane::new(Point3::new(5.0, 0.0, 20.0), Point3::new(5.0, 0.0, -20.0)).unwrap();
        let crossing = Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 1.0, 10.0));
        let beside = Aabb3::new(Point3::new(6.0, 0.0, 0.0), Point3::new(10.0, 1.0, 10.0));
        assert!(plane.straddles(&crossing));
        assert!(!plane.straddles(&beside));
    }
}
