//! Projection of 3D cut geometry into the section's 2D view.
//!
//! The view's horizontal axis is the signed horizontal distance from the
//! plane position, the vertical axis is height relative to the plane
//! position. Both are scaled by the display rate.

use roadsect_math::{horizontal_norm, up, Point3, Vec3};

use crate::types::{Color, Point2D, Polyline2D, Polyline3D, SurfaceKind};

/// Project a vertex into the view frame of a plane.
///
/// Pure function of its arguments; the sign of the horizontal coordinate
/// follows `(normal × up) · (position - vertex)`.
pub fn project_point(vertex: &Point3, normal: &Vec3, position: &Point3, rate: f64) -> Point2D {
    let v = position - vertex;
    let mut x = horizontal_norm(&v);
    if normal.cross(&up()).dot(&v) < 0.0 {
        x = -x;
    }
    Point2D::new(rate * x, rate * -v.y)
}

/// Project a 3D polyline into a tagged 2D polyline.
pub fn project_polyline(
    polyline: &Polyline3D,
    normal: &Vec3,
    position: &Point3,
    rate: f64,
    kind: SurfaceKind,
    color: Color,
) -> Polyline2D {
    let points = polyline
        .points()
        .iter()
        .map(|p| project_point(p, normal, position, rate))
        .collect();
    Polyline2D::new(points, kind, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::CutPlane;
    use approx::assert_relative_eq;

    fn plane() -> CutPlane {
        CutPlane::new(Point3::new(12.0, 3.0, -4.0), Point3::new(-8.0, 1.0, 6.0)).unwrap()
    }

    #[test]
    fn test_position_maps_to_origin() {
        let plane = plane();
        let p = plane.project(&plane.position(), 10.0);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn test_point0_side_is_negative() {
        let plane = plane();
        let p0 = Point3::new(plane.point0().x, plane.position().y, plane.point0().z);
        let p1 = Point3::new(plane.point1().x, plane.position().y, plane.point1().z);
        let half = plane.span() / 2.0;
        assert_relative_eq!(plane.project(&p0, 1.0).x, -half, epsilon = 1e-9);
        assert_relative_eq!(plane.project(&p1, 1.0).x, half, epsilon = 1e-9);
    }

    #[test]
    fn test_height_is_relative_and_scaled() {
        let plane = plane();
        let above = plane.position() + Vec3::new(0.0, 2.5, 0.0);
        let p = plane.project(&above, 10.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let plane = plane();
        let rate = 10.0;
        for (s, h) in [(0.1, -3.0), (0.5, 0.0), (0.9, 7.5), (1.3, 2.0)] {
            let mut p = plane.point0() + (plane.point1() - plane.point0()) * s;
            p.y = h;
            let view = plane.project(&p, rate);
            let back = plane.unproject(view, rate);
            assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
            assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
            assert_relative_eq!(back.z, p.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_projection_is_stable() {
        let plane = plane();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(plane.project(&p, 10.0), plane.project(&p, 10.0));
    }
}
