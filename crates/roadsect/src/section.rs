//! Cross-section generation: runs the cut pipeline for one plane.
//!
//! For every mesh the pipeline is:
//! - plane-triangle intersection limited to the anchor span
//! - chaining of the raw segments into polylines
//! - 3D slope annotations and the 2D projection with its slope text
//! - solid fills of closed loops, when a triangulator is available
//!
//! Alignment crossings and the elevation grid are added per section.

use log::{debug, trace};
use rayon::prelude::*;
use roadsect_math::{Point3, Tolerance, Vec3};
use serde::{Deserialize, Serialize};

use crate::alignment::{intersect_alignments, Alignment, AlignmentIntersection, StationFrame};
use crate::assemble::assemble_polylines;
use crate::batch::station_range;
use crate::context::{SectionContext, Triangulator};
use crate::dimension::{pick_layer, DimensionEngine};
use crate::error::{Result, SectionError};
use crate::grid::{elevation_grid, grid_reference, ElevationGrid};
use crate::intersect::intersect_triangles;
use crate::mesh::{meshes_bounds, SurfaceMesh};
use crate::plane::CutPlane;
use crate::project::project_polyline;
use crate::settings::SectionSettings;
use crate::slope::{slope_labels_2d, slope_labels_3d};
use crate::types::{
    BoundingBox2D, Color, Point2D, Polyline2D, Polyline3D, SlopeLabel, SlopeLabel2D, SurfaceKind,
};

/// A triangulated closed loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFill {
    /// Loop vertices as `[x, y, z]`.
    pub points: Vec<[f64; 3]>,
    /// Triangle indices into `points`, three per triangle.
    pub indices: Vec<u32>,
}

/// Everything one mesh contributes to a section.
#[derive(Debug, Clone)]
pub struct SectionLayer {
    /// Name of the source mesh.
    pub name: String,
    /// Surface kind of the source mesh.
    pub kind: SurfaceKind,
    /// Display colour.
    pub color: Color,
    /// Cut lines in world space.
    pub polylines: Vec<Polyline3D>,
    /// Cut lines in the 2D view.
    pub polylines_2d: Vec<Polyline2D>,
    /// Slope text for the 2D view.
    pub slope_labels_2d: Vec<SlopeLabel2D>,
    /// Filled closed loops.
    pub fills: Vec<SectionFill>,
    /// Combined bounds of the 2D lines.
    pub bounds: BoundingBox2D,
}

/// The derived geometry of a built section.
#[derive(Debug, Clone)]
pub struct SectionResult {
    /// One layer per intersected mesh, in mesh order.
    pub layers: Vec<SectionLayer>,
    /// Slope annotations in world space.
    pub slope_labels: Vec<SlopeLabel>,
    /// Centerline crossings.
    pub alignment_intersections: Vec<AlignmentIntersection>,
    /// Elevation grid, present when a selected alignment crosses the section.
    pub grid: Option<ElevationGrid>,
    /// Bounds of every layer in the 2D view.
    pub bounds: BoundingBox2D,
}

impl SectionResult {
    /// All 2D polylines across layers.
    pub fn polylines_2d(&self) -> impl Iterator<Item = &Polyline2D> + '_ {
        self.layers.iter().flat_map(|layer| layer.polylines_2d.iter())
    }

    /// Dimension queries against this section.
    pub fn dimension_engine(&self, settings: &SectionSettings) -> DimensionEngine<'_> {
        DimensionEngine::new(self.polylines_2d(), settings.rate).with_snap_distance(settings.snap_distance)
    }

    /// The layer under a view point.
    pub fn layer_at(&self, point: Point2D) -> Option<&SectionLayer> {
        pick_layer(&self.layers, point)
    }
}

/// A cross-section: a cut plane plus, once built, its derived geometry.
#[derive(Debug, Clone)]
pub struct CrossSection {
    plane: CutPlane,
    station: Option<f64>,
    result: Option<SectionResult>,
}

impl CrossSection {
    /// A free section between two anchors.
    pub fn from_anchors(point0: Point3, point1: Point3) -> Result<Self> {
        Ok(Self::from_plane(CutPlane::new(point0, point1)?))
    }

    /// A free section on an existing plane.
    pub fn from_plane(plane: CutPlane) -> Self {
        Self {
            plane,
            station: None,
            result: None,
        }
    }

    /// A section square to the centerline at a located station.
    ///
    /// The anchors sit half the plane length either side of the centerline.
    pub fn from_station(frame: &StationFrame, plane_length: f64) -> Result<Self> {
        let dir = frame.direction;
        let across = Vec3::new(-dir.z, 0.0, dir.x) * (plane_length / 2.0);
        let plane = CutPlane::new(frame.position + across, frame.position - across)?;
        Ok(Self {
            plane,
            station: Some(frame.station),
            result: None,
        })
    }

    /// Sections every `gap` along an alignment from `start` to `end`.
    ///
    /// The range is clamped to the alignment; stations that cannot be
    /// located are skipped.
    pub fn series(
        alignment: &Alignment,
        start: f64,
        end: f64,
        gap: f64,
        plane_length: f64,
    ) -> Result<Vec<Self>> {
        let (first, last) = alignment.range();
        let start = start.max(first);
        let end = end.min(last);
        if start > end {
            return Err(SectionError::StationOutOfRange(start));
        }

        let mut sections = Vec::new();
        for station in station_range(start, end, gap) {
            if let Some(frame) = alignment.locate(station) {
                sections.push(Self::from_station(&frame, plane_length)?);
            }
        }
        Ok(sections)
    }

    /// The cut plane.
    pub fn plane(&self) -> &CutPlane {
        &self.plane
    }

    /// Station of a station section.
    pub fn station(&self) -> Option<f64> {
        self.station
    }

    /// True once the pipeline has run.
    pub fn is_ready(&self) -> bool {
        self.result.is_some()
    }

    /// The derived geometry, if built.
    pub fn result(&self) -> Option<&SectionResult> {
        self.result.as_ref()
    }

    /// Move the anchors. Derived geometry is discarded.
    pub fn set_anchors(&mut self, point0: Point3, point1: Point3) -> Result<()> {
        self.plane.set_anchors(point0, point1)?;
        self.result = None;
        Ok(())
    }

    /// Drop the derived geometry.
    pub fn discard(&mut self) {
        self.result = None;
    }

    /// Run the pipeline against `meshes` and `alignments`.
    ///
    /// Meshes are processed in parallel; layers keep mesh order. The plane
    /// is re-centred vertically on the meshes' bounds first.
    pub fn build(
        &mut self,
        ctx: &SectionContext<'_>,
        meshes: &[SurfaceMesh],
        alignments: &[Alignment],
    ) -> Result<&SectionResult> {
        let settings = ctx.settings;
        settings.validate()?;

        self.plane = self.plane.clone().centered_on(&meshes_bounds(meshes));
        let plane = &self.plane;
        let station = self.station.unwrap_or(0.0);

        let parts: Vec<(SectionLayer, Vec<SlopeLabel>)> = meshes
            .par_iter()
            .filter_map(|mesh| section_mesh(mesh, plane, ctx, station))
            .collect();

        let mut layers = Vec::with_capacity(parts.len());
        let mut slope_labels = Vec::new();
        let mut bounds = BoundingBox2D::empty();
        for (layer, labels) in parts {
            bounds.include_box(&layer.bounds);
            slope_labels.extend(labels);
            layers.push(layer);
        }

        let alignment_intersections =
            intersect_alignments(alignments, plane, settings, ctx.selected_alignment);

        let grid = grid_reference(&alignment_intersections, &plane.center())
            .and_then(|p| elevation_grid(&bounds, plane.project(&p, settings.rate), settings));

        debug!(
            "section {:?}: {} layers, {} slope labels, {} alignment crossings",
            self.station,
            layers.len(),
            slope_labels.len(),
            alignment_intersections.len()
        );

        Ok(&*self.result.insert(SectionResult {
            layers,
            slope_labels,
            alignment_intersections,
            grid,
            bounds,
        }))
    }
}

/// Cut one mesh. Returns `None` when the mesh contributes no lines.
pub fn section_mesh(
    mesh: &SurfaceMesh,
    plane: &CutPlane,
    ctx: &SectionContext<'_>,
    station: f64,
) -> Option<(SectionLayer, Vec<SlopeLabel>)> {
    let settings = ctx.settings;

    // Step 1: Skip meshes entirely on one side of the plane
    if !plane.straddles(mesh.bounds()) {
        trace!("mesh {} does not reach the plane", mesh.name);
        return None;
    }

    // Step 2: Intersect triangles with the plane
    let segments = intersect_triangles(mesh.triangles(), plane, settings.anchor_tolerance);
    if segments.is_empty() {
        trace!("mesh {} has no cut segments between the anchors", mesh.name);
        return None;
    }

    // Step 3: Chain segments into polylines
    let tol = ctx.tolerance();
    let polylines = assemble_polylines(segments, &tol, settings.merge_collinear);
    if polylines.is_empty() {
        return None;
    }

    // Step 4: Slope annotations in world space
    let epsilon = settings.slope_epsilon_for(mesh.kind);
    let (normal, forward) = (plane.normal(), plane.forward());
    let slope_labels: Vec<SlopeLabel> = polylines
        .iter()
        .flat_map(|p| slope_labels_3d(p.points(), mesh.kind, epsilon, &normal, &forward, station))
        .collect();

    // Step 5: Project to 2D
    let position = plane.position();
    let polylines_2d: Vec<Polyline2D> = polylines
        .iter()
        .map(|p| project_polyline(p, &normal, &position, settings.rate, mesh.kind, mesh.color))
        .collect();
    let labels_2d: Vec<SlopeLabel2D> = polylines_2d
        .iter()
        .flat_map(|p| slope_labels_2d(p.points(), mesh.kind, epsilon))
        .collect();

    // Step 6: Fill closed loops
    let fills: Vec<SectionFill> = match ctx.triangulator {
        Some(triangulator) => polylines
            .iter()
            .filter_map(|p| fill_polyline(p, &tol, settings.fill_area_epsilon, triangulator))
            .collect(),
        None => Vec::new(),
    };

    let mut bounds = BoundingBox2D::empty();
    for line in &polylines_2d {
        bounds.include_box(line.bounds());
    }

    debug!(
        "mesh {}: {} polylines, {} fills",
        mesh.name,
        polylines.len(),
        fills.len()
    );

    let layer = SectionLayer {
        name: mesh.name.clone(),
        kind: mesh.kind,
        color: mesh.color,
        polylines,
        polylines_2d,
        slope_labels_2d: labels_2d,
        fills,
        bounds,
    };
    Some((layer, slope_labels))
}

/// Triangulate a closed loop.
///
/// Open loops, loops under 3 points, zero-area 3-point loops and
/// triangulations with fewer than 3 usable indices produce nothing.
fn fill_polyline(
    polyline: &Polyline3D,
    tol: &Tolerance,
    area_epsilon: f64,
    triangulator: &dyn Triangulator,
) -> Option<SectionFill> {
    let points = polyline.points();
    if points.len() < 3 || !polyline.is_closed(tol) {
        return None;
    }
    if points.len() == 3 {
        let cross = (points[1] - points[0]).cross(&(points[2] - points[0]));
        if !(cross.norm_squared() > area_epsilon) {
            return None;
        }
    }

    let indices = triangulator.triangulate(points);
    if indices.len() < 3 || indices.iter().any(|&i| i as usize >= points.len()) {
        return None;
    }

    Some(SectionFill {
        points: points.iter().map(|p| [p.x, p.y, p.z]).collect(),
        indices,
    })
}
