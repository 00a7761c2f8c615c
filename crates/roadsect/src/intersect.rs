//! Plane-triangle intersection.
//!
//! Each triangle edge is classified against the half-space
//! `signed_distance >= 0`; an edge whose endpoints fall on different sides
//! crosses the plane once. Only crossings that lie horizontally between the
//! two anchors count, so the cut is limited to the anchor segment rather
//! than the infinite plane.

use rayon::prelude::*;
use roadsect_math::Point3;

use crate::plane::CutPlane;
use crate::types::{RawSegment, Triangle};

/// Intersect a single triangle with the cut plane.
///
/// Returns a segment only when exactly two edges cross inside the anchor
/// span; every other case is a tangent or out-of-span touch and is dropped.
pub fn intersect_triangle(tri: &Triangle, plane: &CutPlane, anchor_slack: f64) -> Option<RawSegment> {
    let mut points: [Point3; 3] = [Point3::origin(); 3];
    let mut count = 0;

    for (a, b) in tri.edges() {
        let da = plane.signed_distance(&a);
        let db = plane.signed_distance(&b);

        if (da >= 0.0) == (db >= 0.0) {
            continue;
        }

        let t = da / (da - db);
        let p = a + (b - a) * t;
        if plane.is_between_anchors(&p, anchor_slack) {
            points[count] = p;
            count += 1;
        }
    }

    if count == 2 {
        Some(RawSegment::new(points[0], points[1]))
    } else {
        None
    }
}

/// Intersect every triangle with the plane.
///
/// Triangles are processed in parallel; the result keeps triangle order.
pub fn intersect_triangles(
    triangles: &[Triangle],
    plane: &CutPlane,
    anchor_slack: f64,
) -> Vec<RawSegment> {
    triangles
        .par_iter()
        .filter_map(|tri| intersect_triangle(tri, plane, anchor_slack))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plane_x5() -> CutPlane {
        CutPlane::new(Point3::new(5.0, 0.0, 20.0), Point3::new(5.0, 0.0, -20.0)).unwrap()
    }

    #[test]
    fn test_triangle_no_intersection() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        );
        assert!(intersect_triangle(&tri, &plane_x5(), 0.0).is_none());
    }

    #[test]
    fn test_two_crossings_lie_on_plane() {
        let plane = plane_x5();
        let triangles = [
            Triangle::new(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 3.0, 1.0),
                Point3::new(2.0, -1.0, 8.0),
            ),
            Triangle::new(
                Point3::new(7.0, 2.0, -3.0),
                Point3::new(1.0, 5.0, 4.0),
                Point3::new(9.0, 0.5, 6.0),
            ),
        ];
        for tri in &triangles {
            let seg = intersect_triangle(tri, &plane, 0.0).expect("segment");
            assert_relative_eq!(plane.signed_distance(&seg.start), 0.0, epsilon = 1e-9);
            assert_relative_eq!(plane.signed_distance(&seg.end), 0.0, epsilon = 1e-9);
            assert!((seg.start - seg.end).norm() > 1e-6);
        }
    }

    #[test]
    fn test_crossing_outside_anchor_span_is_dropped() {
        // Anchors cover z in [-1, 1]; the triangle crosses x = 5 at z = 10..12.
        let plane = CutPlane::new(Point3::new(5.0, 0.0, 1.0), Point3::new(5.0, 0.0, -1.0)).unwrap();
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(10.0, 0.0, 10.0),
            Point3::new(10.0, 0.0, 12.0),
        );
        assert!(intersect_triangle(&tri, &plane, 0.0).is_none());
    }

    #[test]
    fn test_partial_span_is_dropped() {
        // One crossing inside the span, one outside: a single crossing is discarded.
        let plane = CutPlane::new(Point3::new(5.0, 0.0, 5.0), Point3::new(5.0, 0.0, 0.0)).unwrap();
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 20.0),
        );
        assert!(intersect_triangle(&tri, &plane, 0.0).is_none());
    }

    #[test]
    fn test_intersect_triangles_keeps_order() {
        let plane = plane_x5();
        let triangles: Vec<Triangle> = (0..64)
            .map(|i| {
                let z = i as f64;
                Triangle::new(
                    Point3::new(0.0, 0.0, z),
                    Point3::new(10.0, 0.0, z),
                    Point3::new(10.0, 0.0, z + 0.5),
                )
            })
            .collect();
        let segments = intersect_triangles(&triangles, &plane, 1e-6);
        // z >= 20 falls outside the anchors.
        assert_eq!(segments.len(), 20);
        for pair in segments.windows(2) {
            assert!(pair[0].start.z < pair[1].start.z);
        }
    }
}
