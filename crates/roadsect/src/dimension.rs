//! Interactive dimensioning against a finished 2D section.
//!
//! Everything here works in view units. World lengths are recovered by
//! dividing by the display rate.

use serde::{Deserialize, Serialize};

use crate::section::SectionLayer;
use crate::slope::upright_angle;
use crate::types::{Point2D, Polyline2D};

/// Default vertex snap radius in view units.
pub const DEFAULT_SNAP_DISTANCE: f64 = 3.0;

/// Below this determinant two lines are parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// View points closer than this are one point.
const SAME_POINT: f64 = 1e-9;

fn same_point(a: &Point2D, b: &Point2D) -> bool {
    a.distance_squared(b) < SAME_POINT * SAME_POINT
}

/// A proper crossing between the dimension line and a polyline edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentCrossing {
    /// Crossing point.
    pub point: Point2D,
    /// Parameter along the dimension line, 0 at `dim0`.
    pub t: f64,
    /// Parameter along the edge, 0 at its first vertex.
    pub u: f64,
}

/// Intersect the dimension line `dim0 → dim1` with the edge `p0 → p1`.
///
/// Returns `None` for parallel lines and when the crossing lies outside
/// either segment.
pub fn segment_intersection(
    dim0: Point2D,
    dim1: Point2D,
    p0: Point2D,
    p1: Point2D,
) -> Option<SegmentCrossing> {
    let (dx, dy) = (dim1.x - dim0.x, dim1.y - dim0.y);
    let (ex, ey) = (p1.x - p0.x, p1.y - p0.y);

    let denom = dx * ey - dy * ex;
    if denom.abs() < PARALLEL_EPS {
        return None;
    }

    let (wx, wy) = (p0.x - dim0.x, p0.y - dim0.y);
    let t = (wx * ey - wy * ex) / denom;
    let u = (wx * dy - wy * dx) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(SegmentCrossing {
        point: Point2D::new(dim0.x + t * dx, dim0.y + t * dy),
        t,
        u,
    })
}

/// Constrain `cursor` to the horizontal or vertical line through `dim0`,
/// whichever axis the cursor is further along.
pub fn ortho_lock(dim0: Point2D, cursor: Point2D) -> Point2D {
    if (dim0.x - cursor.x).abs() > (dim0.y - cursor.y).abs() {
        Point2D::new(cursor.x, dim0.y)
    } else {
        Point2D::new(dim0.x, cursor.y)
    }
}

/// One piece of a dimension chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionMark {
    /// Start of the piece.
    pub start: Point2D,
    /// End of the piece.
    pub end: Point2D,
    /// Text anchor, midway along the piece.
    pub position: Point2D,
    /// Text rotation in degrees.
    pub angle_degrees: f64,
    /// World length with one decimal.
    pub text: String,
}

/// A two-point measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// First point.
    pub start: Point2D,
    /// Second point.
    pub end: Point2D,
    /// World distance between the points.
    pub distance: f64,
    /// Direction of `start → end` in degrees.
    pub angle_degrees: f64,
    /// Upright text rotation in degrees.
    pub text_angle_degrees: f64,
    /// Formatted distance, e.g. `12.345m`.
    pub text: String,
}

/// How a raw cursor position is turned into a dimension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorMode {
    /// Lock to horizontal or vertical through the first point.
    pub ortho: bool,
    /// Snap to the nearest section vertex.
    pub snap: bool,
}

/// Read-only queries over the polylines of a finished section.
#[derive(Debug, Clone)]
pub struct DimensionEngine<'a> {
    polylines: Vec<&'a Polyline2D>,
    vertices: Vec<Point2D>,
    rate: f64,
    snap_distance: f64,
}

impl<'a> DimensionEngine<'a> {
    /// Index the vertices of `polylines`.
    pub fn new(polylines: impl IntoIterator<Item = &'a Polyline2D>, rate: f64) -> Self {
        let polylines: Vec<&'a Polyline2D> = polylines.into_iter().collect();

        let mut vertices: Vec<Point2D> = polylines
            .iter()
            .flat_map(|line| line.points().iter().copied())
            .collect();
        vertices.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        vertices.dedup();

        Self {
            polylines,
            vertices,
            rate,
            snap_distance: DEFAULT_SNAP_DISTANCE,
        }
    }

    /// Set the snap radius used by [`Self::resolve_cursor`].
    pub fn with_snap_distance(mut self, distance: f64) -> Self {
        self.snap_distance = distance;
        self
    }

    /// Distinct vertices of all polylines.
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// The closest vertex strictly within `radius` of `query`.
    pub fn snap(&self, query: Point2D, radius: f64) -> Option<Point2D> {
        let limit = radius * radius;
        self.vertices
            .iter()
            .map(|v| (*v, v.distance_squared(&query)))
            .filter(|(_, d)| *d < limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v)
    }

    /// Every crossing of `dim0 → dim1` with a polyline edge, nearest to
    /// `dim0` first.
    ///
    /// A line through a shared vertex touches both edges there; the
    /// vertex is reported once.
    pub fn crossings(&self, dim0: Point2D, dim1: Point2D) -> Vec<SegmentCrossing> {
        let mut crossings: Vec<SegmentCrossing> = self
            .polylines
            .iter()
            .flat_map(|line| line.edges())
            .filter_map(|(p0, p1)| segment_intersection(dim0, dim1, p0, p1))
            .collect();
        crossings.sort_by(|a, b| {
            a.point
                .distance_squared(&dim0)
                .total_cmp(&b.point.distance_squared(&dim0))
        });
        crossings.dedup_by(|b, a| same_point(&a.point, &b.point));
        crossings
    }

    /// Split `dim0 → dim1` at every crossing and label each piece with its
    /// world length.
    pub fn dimension_chain(&self, dim0: Point2D, dim1: Point2D) -> Vec<DimensionMark> {
        let angle = upright_angle(&dim0, &dim1);

        let mut points = Vec::with_capacity(2);
        points.push(dim0);
        points.extend(self.crossings(dim0, dim1).into_iter().map(|c| c.point));
        points.push(dim1);
        points.dedup_by(|b, a| same_point(a, b));

        points
            .windows(2)
            .map(|w| DimensionMark {
                start: w[0],
                end: w[1],
                position: w[0].midpoint(&w[1]),
                angle_degrees: angle,
                text: format!("{:.1}", w[0].distance(&w[1]) / self.rate),
            })
            .collect()
    }

    /// Measure between two view points.
    pub fn measure(&self, start: Point2D, end: Point2D) -> Measurement {
        let distance = start.distance(&end) / self.rate;
        Measurement {
            start,
            end,
            distance,
            angle_degrees: (end.y - start.y).atan2(end.x - start.x).to_degrees(),
            text_angle_degrees: upright_angle(&start, &end),
            text: format!("{distance:.3}m"),
        }
    }

    /// Turn a raw cursor position into a dimension point.
    ///
    /// Ortho lock applies only once a first point exists and takes
    /// precedence over snapping.
    pub fn resolve_cursor(&self, cursor: Point2D, dim0: Option<Point2D>, mode: CursorMode) -> Point2D {
        match dim0 {
            Some(first) if mode.ortho => ortho_lock(first, cursor),
            _ if mode.snap => self.snap(cursor, self.snap_distance).unwrap_or(cursor),
            _ => cursor,
        }
    }
}

/// Pick the layer under `point`: among layers whose bounds contain it, the
/// one whose bounds centre is nearest.
pub fn pick_layer(layers: &[SectionLayer], point: Point2D) -> Option<&SectionLayer> {
    layers
        .iter()
        .filter(|layer| layer.bounds.is_valid() && layer.bounds.contains(point))
        .min_by(|a, b| {
            a.bounds
                .center()
                .distance_squared(&point)
                .total_cmp(&b.bounds.center().distance_squared(&point))
        })
}
