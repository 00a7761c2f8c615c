//! Road centerlines and their crossings with the cut plane.

use std::fmt;

use roadsect_math::{horizontal, Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SectionError};
use crate::plane::CutPlane;
use crate::settings::SectionSettings;
use crate::types::AlignmentCrossing;

/// A centerline vertex with its station value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationPoint {
    /// World position.
    pub position: [f64; 3],
    /// Station (chainage) along the centerline.
    pub station: f64,
}

impl StationPoint {
    /// Create a station point.
    pub fn new(position: Point3, station: f64) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            station,
        }
    }

    /// World position as a point.
    pub fn point(&self) -> Point3 {
        Point3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Position and travel direction at a station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationFrame {
    /// Interpolated centerline position.
    pub position: Point3,
    /// Unit horizontal direction of travel.
    pub direction: Vec3,
    /// The located station.
    pub station: f64,
}

/// A road centerline: station points with strictly increasing stations.
///
/// Deserialization goes through [`Alignment::new`], so loaded data is
/// checked the same way as constructed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AlignmentData")]
pub struct Alignment {
    /// Caller-assigned identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    points: Vec<StationPoint>,
}

/// Unchecked alignment fields as read from serialized input.
#[derive(Deserialize)]
struct AlignmentData {
    id: u32,
    name: String,
    points: Vec<StationPoint>,
}

impl TryFrom<AlignmentData> for Alignment {
    type Error = SectionError;

    fn try_from(data: AlignmentData) -> Result<Self> {
        Alignment::new(data.id, data.name, data.points)
    }
}

impl Alignment {
    /// Create an alignment.
    ///
    /// Requires at least two points and strictly increasing stations.
    pub fn new(id: u32, name: impl Into<String>, points: Vec<StationPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SectionError::InvalidAlignment(format!(
                "need at least 2 station points, got {}",
                points.len()
            )));
        }
        if let Some(w) = points.windows(2).find(|w| !(w[1].station > w[0].station)) {
            return Err(SectionError::InvalidAlignment(format!(
                "station {} does not follow {}",
                w[1].station, w[0].station
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            points,
        })
    }

    /// Station points in order.
    pub fn points(&self) -> &[StationPoint] {
        &self.points
    }

    /// First and last station.
    pub fn range(&self) -> (f64, f64) {
        let first = self.points.first().map_or(0.0, |p| p.station);
        let last = self.points.last().map_or(0.0, |p| p.station);
        (first, last)
    }

    /// Interpolate position and direction at `station`.
    ///
    /// Returns `None` outside the alignment range or on a segment without
    /// horizontal extent.
    pub fn locate(&self, station: f64) -> Option<StationFrame> {
        let w = self
            .points
            .windows(2)
            .find(|w| station >= w[0].station && station <= w[1].station)?;
        let (a, b) = (w[0].point(), w[1].point());
        let t = (station - w[0].station) / (w[1].station - w[0].station);
        let direction = horizontal(&(b - a)).try_normalize(1e-12)?;
        Some(StationFrame {
            position: a + (b - a) * t,
            direction,
            station,
        })
    }

    /// Station at which this alignment crosses the plane, for each crossing.
    pub fn crossings(&self, plane: &CutPlane, settings: &SectionSettings) -> Vec<AlignmentCrossing> {
        intersect_alignment(self, plane, settings)
    }
}

/// All crossings of one alignment with a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentIntersection {
    /// Identifier of the alignment.
    pub alignment_id: u32,
    /// Name of the alignment.
    pub name: String,
    /// Crossings in centerline order.
    pub crossings: Vec<AlignmentCrossing>,
    /// Whether the alignment is highlighted.
    pub is_selected: bool,
}

impl fmt::Display for AlignmentIntersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : STA.", self.name)?;
        for (i, crossing) in self.crossings.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{}", format_station(crossing.station))?;
        }
        Ok(())
    }
}

/// Intersect one alignment with the plane.
///
/// Near-parallel segments are skipped, as are crossings within
/// `alignment_dedup_distance` of an earlier one and crossings outside the
/// anchors horizontally.
pub fn intersect_alignment(
    alignment: &Alignment,
    plane: &CutPlane,
    settings: &SectionSettings,
) -> Vec<AlignmentCrossing> {
    let normal = plane.normal();
    let mut crossings: Vec<AlignmentCrossing> = Vec::new();

    for w in alignment.points.windows(2) {
        let (a, b) = (w[0].point(), w[1].point());
        let seg = b - a;
        let Some(dir) = seg.try_normalize(1e-12) else {
            continue;
        };
        if normal.dot(&dir).abs() <= settings.parallel_tolerance {
            continue;
        }

        let t = -plane.signed_distance(&a) / normal.dot(&seg);
        if !(0.0..=1.0).contains(&t) {
            continue;
        }

        let point = a + seg * t;
        if crossings
            .iter()
            .any(|c| (c.point - point).norm() < settings.alignment_dedup_distance)
        {
            continue;
        }

        let to0 = horizontal(&(plane.point0() - point));
        let to1 = horizontal(&(plane.point1() - point));
        if to0.dot(&to1) > 0.0 {
            continue;
        }

        crossings.push(AlignmentCrossing {
            point,
            station: w[0].station + (w[1].station - w[0].station) * t,
        });
    }

    crossings
}

/// Intersect every alignment with the plane, omitting alignments that do
/// not cross it.
///
/// With a `selected` id only that alignment is marked selected; without one
/// every alignment is.
pub fn intersect_alignments(
    alignments: &[Alignment],
    plane: &CutPlane,
    settings: &SectionSettings,
    selected: Option<u32>,
) -> Vec<AlignmentIntersection> {
    alignments
        .iter()
        .filter_map(|alignment| {
            let crossings = intersect_alignment(alignment, plane, settings);
            if crossings.is_empty() {
                return None;
            }
            Some(AlignmentIntersection {
                alignment_id: alignment.id,
                name: alignment.name.clone(),
                crossings,
                is_selected: selected.map_or(true, |id| id == alignment.id),
            })
        })
        .collect()
}

/// Render a station as kilometres and metres: `1234.5` → `1+234.500`.
pub fn format_station(station: f64) -> String {
    let milli = (station * 1000.0).round() as i64;
    let sign = if milli < 0 { "-" } else { "" };
    let milli = milli.unsigned_abs();
    let km = milli / 1_000_000;
    let metres = (milli % 1_000_000) / 1000;
    let frac = milli % 1000;
    format!("{sign}{km}+{metres:03}.{frac:03}")
}
