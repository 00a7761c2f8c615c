//! Core types for cross-section generation.

use roadsect_math::{Point3, Rotation, Tolerance};
use serde::{Deserialize, Serialize};

/// A 2D point in the section view.
///
/// We use a custom type instead of nalgebra::Point2 to enable serde serialization
/// without requiring nalgebra's serde feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal view coordinate.
    pub x: f64,
    /// Vertical view coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance to another point.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<roadsect_math::Point2> for Point2D {
    fn from(p: roadsect_math::Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for roadsect_math::Point2 {
    fn from(p: Point2D) -> Self {
        roadsect_math::Point2::new(p.x, p.y)
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Expand the bounding box to include another box.
    pub fn include_box(&mut self, other: &BoundingBox2D) {
        if other.is_valid() {
            self.include_point(Point2D::new(other.min_x, other.min_y));
            self.include_point(Point2D::new(other.max_x, other.max_y));
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Check if a point lies inside the box (boundary included).
    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// Surface classification of a source mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SurfaceKind {
    /// Original ground.
    #[default]
    Terrain,
    /// Excavated side slope.
    CutSlope,
    /// Embankment side slope.
    FillSlope,
    /// Finished road surface.
    RoadSurface,
    /// Rippable rock boundary.
    RippingSurface,
    /// Blasting rock boundary.
    BlastingSurface,
    /// Bridges, walls and other structures.
    Structure,
    /// Anything else.
    Other,
}

impl SurfaceKind {
    /// Only cut slopes, fill slopes and road surfaces get slope annotations.
    pub fn has_slope_labels(self) -> bool {
        matches!(
            self,
            SurfaceKind::CutSlope | SurfaceKind::FillSlope | SurfaceKind::RoadSurface
        )
    }
}

/// RGBA display colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel, 0 to 1.
    pub r: f32,
    /// Green channel, 0 to 1.
    pub g: f32,
    /// Blue channel, 0 to 1.
    pub b: f32,
    /// Alpha channel, 0 to 1.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque colour from RGB channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A triangle of a source mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
}

impl Triangle {
    /// Create a new triangle.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        Self { v0, v1, v2 }
    }

    /// The three edges in winding order.
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Check whether any two vertices coincide.
    pub fn has_coincident_vertices(&self, tol: &Tolerance) -> bool {
        tol.points_equal(&self.v0, &self.v1)
            || tol.points_equal(&self.v1, &self.v2)
            || tol.points_equal(&self.v2, &self.v0)
    }
}

/// A piece of the cut line contributed by one triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSegment {
    /// First crossing point.
    pub start: Point3,
    /// Second crossing point.
    pub end: Point3,
}

impl RawSegment {
    /// Create a new segment.
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// The same segment with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}

/// An ordered, connected 3D cut line.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline3D {
    points: Vec<Point3>,
}

impl Polyline3D {
    /// Wrap an already cleaned point list.
    pub(crate) fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Ordered vertices.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polyline has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the last vertex returns to the first.
    pub fn is_closed(&self, tol: &Tolerance) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 3 => tol.points_equal(first, last),
            _ => false,
        }
    }

    /// Total length of the polyline.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// A projected cut line as shown in the 2D view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline2D {
    points: Vec<Point2D>,
    kind: SurfaceKind,
    color: Color,
    bounds: BoundingBox2D,
    centroid: Point2D,
}

impl Polyline2D {
    /// Create a polyline and compute its bounds.
    pub fn new(points: Vec<Point2D>, kind: SurfaceKind, color: Color) -> Self {
        let mut bounds = BoundingBox2D::empty();
        for p in &points {
            bounds.include_point(*p);
        }
        let centroid = if bounds.is_valid() {
            bounds.center()
        } else {
            Point2D::ORIGIN
        };
        Self {
            points,
            kind,
            color,
            bounds,
            centroid,
        }
    }

    /// Ordered vertices.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Surface kind of the source mesh.
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Display colour.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Bounding box of the vertices.
    pub fn bounds(&self) -> &BoundingBox2D {
        &self.bounds
    }

    /// Centre of the bounding box.
    pub fn centroid(&self) -> Point2D {
        self.centroid
    }

    /// Consecutive vertex pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// A slope annotation placed in the 3D scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeLabel {
    /// Station of the owning section (0 for free sections).
    pub station: f64,
    /// Midpoint of the slope run.
    pub position: Point3,
    /// Orientation that keeps the text upright along the run.
    pub orientation: Rotation,
    /// Formatted slope text; empty when the slope is undefined.
    pub text: String,
}

/// A slope annotation placed in the 2D view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlopeLabel2D {
    /// Midpoint of the slope run in view coordinates.
    pub position: Point2D,
    /// Text rotation in degrees, always within [-90, 90].
    pub angle_degrees: f64,
    /// Formatted slope text; empty when the slope is undefined.
    pub text: String,
}

/// A point where a road centerline pierces the cut plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentCrossing {
    /// Crossing position.
    pub point: Point3,
    /// Interpolated station at the crossing.
    pub station: f64,
}
