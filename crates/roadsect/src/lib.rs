#![warn(missing_docs)]

//! Cross-sections of road corridor models.
//!
//! A vertical plane through two anchor points cuts a set of classified
//! triangle meshes (terrain, cut and fill slopes, road surface, ...). This
//! crate turns the cut into:
//!
//! - **Polylines**: continuous, deduplicated cut lines per mesh, in world
//!   space and in a 2D section view
//! - **Slope labels**: one annotation per run of near-constant slope
//! - **Alignment crossings**: where road centerlines pierce the plane, with
//!   interpolated stations
//! - **Dimensions**: snapping, crossing queries and measurement chains over
//!   the finished 2D view
//!
//! # Example
//!
//! ```ignore
//! use roadsect::{CrossSection, SectionContext, SectionSettings, SurfaceMesh};
//!
//! let meshes: Vec<SurfaceMesh> = /* ... */;
//! let settings = SectionSettings::default();
//! let ctx = SectionContext::new(&settings);
//!
//! let mut section = CrossSection::from_anchors(p0, p1)?;
//! let result = section.build(&ctx, &meshes, &[])?;
//! for layer in &result.layers {
//!     println!("{}: {} lines", layer.name, layer.polylines.len());
//! }
//! ```

pub mod alignment;
pub mod assemble;
pub mod batch;
pub mod context;
pub mod dimension;
pub mod error;
pub mod grid;
pub mod intersect;
pub mod mesh;
pub mod plane;
pub mod project;
pub mod section;
pub mod settings;
pub mod slope;
pub mod types;

pub use alignment::{
    format_station, intersect_alignment, intersect_alignments, Alignment, AlignmentIntersection,
    StationFrame, StationPoint,
};
pub use assemble::{assemble_polylines, clean_vertices};
pub use batch::{build_parallel, station_range, BatchStep, CancelToken, SectionBatch};
pub use context::{SectionContext, Triangulator};
pub use dimension::{
    ortho_lock, pick_layer, segment_intersection, CursorMode, DimensionEngine, DimensionMark,
    Measurement, SegmentCrossing,
};
pub use error::{Result, SectionError};
pub use grid::{elevation_grid, ElevationGrid, GridLevel};
pub use intersect::{intersect_triangle, intersect_triangles};
pub use mesh::{meshes_bounds, SurfaceMesh};
pub use plane::CutPlane;
pub use project::{project_point, project_polyline};
pub use section::{section_mesh, CrossSection, SectionFill, SectionLayer, SectionResult};
pub use settings::SectionSettings;
pub use slope::{slope_labels_2d, slope_labels_3d, slope_text, SlopeRun};
pub use types::{
    AlignmentCrossing, BoundingBox2D, Color, Point2D, Polyline2D, Polyline3D, RawSegment,
    SlopeLabel, SlopeLabel2D, SurfaceKind, Triangle,
};

pub use roadsect_math::{Point3, Tolerance, Vec3};
