//! Section parameters: display scale and tolerance constants.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SectionError};
use crate::types::SurfaceKind;

/// Cross-section parameters.
///
/// Every field has a default, so a settings file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSettings {
    /// World units to view units scale used by the 2D view.
    pub rate: f64,
    /// Distance below which two vertices are the same vertex.
    pub vertex_tolerance: f64,
    /// Merge interior vertices that lie on the line through their neighbours.
    pub merge_collinear: bool,
    /// Slack allowed when testing whether a crossing lies between the anchors,
    /// as a fraction of the anchor span.
    pub anchor_tolerance: f64,
    /// Alignment segments whose direction has a smaller component along the
    /// plane normal are treated as parallel.
    pub parallel_tolerance: f64,
    /// Crossings of one alignment closer than this are the same crossing.
    pub alignment_dedup_distance: f64,
    /// Slope tolerance for cut slopes, fill slopes and road surfaces.
    pub slope_epsilon: f64,
    /// Slope tolerance for every other surface kind.
    pub fallback_slope_epsilon: f64,
    /// Width of a station section plane (world units).
    pub plane_length: f64,
    /// Distance between stations when generating a series.
    pub station_gap: f64,
    /// Vertex snap radius in view units.
    pub snap_distance: f64,
    /// Elevation grid spacing (world units).
    pub grid_spacing: f64,
    /// Horizontal and vertical margin around the section for the grid (world units).
    pub grid_margin: [f64; 2],
    /// Minimum squared cross product for a 3-point loop to be filled.
    pub fill_area_epsilon: f64,
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            rate: 10.0,
            vertex_tolerance: 1e-3,
            merge_collinear: true,
            anchor_tolerance: 1e-6,
            parallel_tolerance: 1e-4,
            alignment_dedup_distance: 1.0,
            slope_epsilon: 0.01,
            fallback_slope_epsilon: 0.001,
            plane_length: 50.0,
            station_gap: 20.0,
            snap_distance: 3.0,
            grid_spacing: 5.0,
            grid_margin: [5.0, 15.0],
            fill_area_epsilon: 1e-4,
        }
    }
}

impl SectionSettings {
    /// Parse settings from TOML and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.rate > 0.0) {
            return Err(SectionError::InvalidSettings("rate must be positive".into()));
        }
        if !(self.vertex_tolerance > 0.0) {
            return Err(SectionError::InvalidSettings(
                "vertex_tolerance must be positive".into(),
            ));
        }
        if self.anchor_tolerance < 0.0 || self.parallel_tolerance < 0.0 {
            return Err(SectionError::InvalidSettings(
                "tolerances must not be negative".into(),
            ));
        }
        if !(self.slope_epsilon > 0.0) || !(self.fallback_slope_epsilon > 0.0) {
            return Err(SectionError::InvalidSettings(
                "slope tolerances must be positive".into(),
            ));
        }
        if !(self.plane_length > 0.0) {
            return Err(SectionError::InvalidSettings(
                "plane_length must be positive".into(),
            ));
        }
        if !(self.station_gap > 0.0) {
            return Err(SectionError::InvalidSettings(
                "station_gap must be positive".into(),
            ));
        }
        if !(self.grid_spacing > 0.0) {
            return Err(SectionError::InvalidSettings(
                "grid_spacing must be positive".into(),
            ));
        }
        if self.snap_distance < 0.0 || self.alignment_dedup_distance < 0.0 {
            return Err(SectionError::InvalidSettings(
                "distances must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Slope tolerance used when segmenting polylines of `kind`.
    pub fn slope_epsilon_for(&self, kind: SurfaceKind) -> f64 {
        if kind.has_slope_labels() {
            self.slope_epsilon
        } else {
            self.fallback_slope_epsilon
        }
    }
}
