//! Elevation grid for the 2D view.
//!
//! Levels are measured from a reference point, normally where the selected
//! centerline crosses the section, and labelled with their height above it.

use roadsect_math::Point3;
use serde::{Deserialize, Serialize};

use crate::alignment::AlignmentIntersection;
use crate::settings::SectionSettings;
use crate::types::{BoundingBox2D, Point2D};

/// One horizontal grid line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLevel {
    /// View height of the line.
    pub y: f64,
    /// Height relative to the reference in world units, e.g. `-5`.
    pub label: String,
}

/// Horizontal grid lines spanning the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    /// Reference point in view coordinates.
    pub reference: Point2D,
    /// Left end of every line.
    pub min_x: f64,
    /// Right end of every line.
    pub max_x: f64,
    /// Lines from lowest to highest.
    pub levels: Vec<GridLevel>,
}

/// The crossing the grid hangs from: of the selected alignment's crossings,
/// the one closest to `center`.
pub fn grid_reference(intersections: &[AlignmentIntersection], center: &Point3) -> Option<Point3> {
    intersections
        .iter()
        .find(|i| i.is_selected)?
        .crossings
        .iter()
        .map(|c| c.point)
        .min_by(|a, b| (a - center).norm().total_cmp(&(b - center).norm()))
}

/// Build grid levels around `reference` until they pass `bounds` by the
/// vertical margin. Returns `None` for an empty section.
pub fn elevation_grid(
    bounds: &BoundingBox2D,
    reference: Point2D,
    settings: &SectionSettings,
) -> Option<ElevationGrid> {
    let rate = settings.rate;
    let step = settings.grid_spacing * rate;
    if !bounds.is_valid() || !(step > 0.0) {
        return None;
    }
    let [margin_x, margin_y] = settings.grid_margin;

    let mut heights = vec![reference.y];

    let mut current = reference.y;
    while current <= bounds.max_y + margin_y * rate {
        current += step;
        heights.push(current);
    }

    current = reference.y;
    while current >= bounds.min_y - margin_y * rate {
        current -= step;
        heights.push(current);
    }

    heights.sort_by(f64::total_cmp);

    let levels = heights
        .into_iter()
        .map(|y| GridLevel {
            y,
            label: format!("{:.0}", (y - reference.y) / rate),
        })
        .collect();

    Some(ElevationGrid {
        reference,
        min_x: bounds.min_x - margin_x * rate,
        max_x: bounds.max_x + margin_x * rate,
        levels,
    })
}
