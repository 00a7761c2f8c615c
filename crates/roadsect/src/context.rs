//! Explicit context passed to every pipeline call.

use roadsect_math::{Point3, Tolerance};

use crate::settings::SectionSettings;

/// Polygon triangulation supplied by the caller.
///
/// Receives a closed loop of points on the cut plane and returns triangle
/// indices into it, three per triangle.
pub trait Triangulator: Send + Sync {
    /// Triangulate a planar polygon.
    fn triangulate(&self, polygon: &[Point3]) -> Vec<u32>;
}

/// Settings, collaborators and selection state for building sections.
#[derive(Clone, Copy)]
pub struct SectionContext<'a> {
    /// Section parameters.
    pub settings: &'a SectionSettings,
    /// Fills closed loops when present.
    pub triangulator: Option<&'a dyn Triangulator>,
    /// Highlighted alignment; `None` highlights every alignment.
    pub selected_alignment: Option<u32>,
}

impl<'a> SectionContext<'a> {
    /// Context with no triangulator and no selected alignment.
    pub fn new(settings: &'a SectionSettings) -> Self {
        Self {
            settings,
            triangulator: None,
            selected_alignment: None,
        }
    }

    /// Use `triangulator` for solid fills.
    pub fn with_triangulator(mut self, triangulator: &'a dyn Triangulator) -> Self {
        self.triangulator = Some(triangulator);
        self
    }

    /// Highlight the alignment with id `id`.
    pub fn with_selected_alignment(mut self, id: u32) -> Self {
        self.selected_alignment = Some(id);
        self
    }

    /// Vertex equality tolerance.
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.settings.vertex_tolerance)
    }
}

impl std::fmt::Debug for SectionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionContext")
            .field("settings", self.settings)
            .field("triangulator", &self.triangulator.is_some())
            .field("selected_alignment", &self.selected_alignment)
            .finish()
    }
}
