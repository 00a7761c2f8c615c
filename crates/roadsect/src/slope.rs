//! Slope runs and slope annotations.
//!
//! A polyline is split into runs of near-constant slope. Each run keeps the
//! slope of its first edge as its representative; an edge whose slope
//! differs from it by at least `epsilon` starts a new run.

use roadsect_math::{horizontal_norm, Point3, Rotation, Vec3};

use crate::types::{Point2D, SlopeLabel, SlopeLabel2D, SurfaceKind};

/// Below this a slope denominator counts as zero.
const ZERO_RUN: f64 = 1e-9;

/// A maximal stretch of near-constant slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeRun<P> {
    /// Representative slope (the run's first edge).
    pub slope: f64,
    /// First vertex of the run.
    pub first: P,
    /// Last vertex of the run.
    pub last: P,
}

fn same_slope(a: f64, b: f64, epsilon: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return true;
    }
    (a - b).abs() < epsilon
}

fn ratio(num: f64, den: f64) -> f64 {
    if den.abs() < ZERO_RUN {
        f64::INFINITY
    } else {
        (num / den).abs()
    }
}

fn split_runs<P: Copy>(points: &[P], epsilon: f64, slope: impl Fn(&P, &P) -> f64) -> Vec<SlopeRun<P>> {
    let mut runs: Vec<SlopeRun<P>> = Vec::new();
    for w in points.windows(2) {
        let current = slope(&w[0], &w[1]);
        match runs.last_mut() {
            Some(run) if same_slope(run.slope, current, epsilon) => run.last = w[1],
            _ => runs.push(SlopeRun {
                slope: current,
                first: w[0],
                last: w[1],
            }),
        }
    }
    runs
}

/// Split a 3D polyline into slope runs.
///
/// Edge slope is `|Δy| / |horizontal Δ|`; vertical edges have infinite
/// slope and form one run together.
pub fn slope_runs_3d(points: &[Point3], epsilon: f64) -> Vec<SlopeRun<Point3>> {
    split_runs(points, epsilon, |a, b| {
        let d = b - a;
        ratio(d.y, horizontal_norm(&d))
    })
}

/// Split a 2D view polyline into slope runs.
///
/// Uses the dimension-display convention `|Δx / Δy|`.
pub fn slope_runs_2d(points: &[Point2D], epsilon: f64) -> Vec<SlopeRun<Point2D>> {
    split_runs(points, epsilon, |a, b| ratio(b.x - a.x, b.y - a.y))
}

/// Format a slope from its horizontal and vertical extent.
///
/// Cut and fill slopes read `1:N` (horizontal per unit rise), road
/// surfaces read as a percentage grade, anything else as a bare ratio.
/// Returns an empty string when the needed denominator is zero.
pub fn slope_text(kind: SurfaceKind, horizontal: f64, vertical: f64) -> String {
    let h = horizontal.abs();
    let v = vertical.abs();
    match kind {
        SurfaceKind::CutSlope | SurfaceKind::FillSlope => {
            if v < ZERO_RUN {
                String::new()
            } else {
                format!("1:{:.1}", h / v)
            }
        }
        SurfaceKind::RoadSurface => {
            if h < ZERO_RUN {
                String::new()
            } else {
                format!("{:.2}%", v / h * 100.0)
            }
        }
        _ => {
            if h < ZERO_RUN || v < ZERO_RUN {
                String::new()
            } else {
                format!("{:.1}", h / v)
            }
        }
    }
}

/// Slope text for a 3D run.
pub fn slope_text_3d(kind: SurfaceKind, first: &Point3, last: &Point3) -> String {
    let d = last - first;
    slope_text(kind, horizontal_norm(&d), d.y)
}

/// Slope text for a 2D run.
pub fn slope_text_2d(kind: SurfaceKind, first: &Point2D, last: &Point2D) -> String {
    slope_text(kind, last.x - first.x, last.y - first.y)
}

/// Text rotation in degrees that keeps text upright along `v0 → v1`.
pub fn upright_angle(v0: &Point2D, v1: &Point2D) -> f64 {
    let mut angle = (v1.y - v0.y).atan2(v1.x - v0.x).to_degrees();
    if angle > 90.0 {
        angle -= 180.0;
    } else if angle < -90.0 {
        angle += 180.0;
    }
    angle
}

/// Build the 3D slope labels for one polyline.
///
/// Labels sit at the midpoint of each run on the plane, with the text
/// baseline along the run (read in the plane's forward direction) and the
/// text up axis pointing up. Kinds without slope annotations produce
/// nothing.
pub fn slope_labels_3d(
    points: &[Point3],
    kind: SurfaceKind,
    epsilon: f64,
    normal: &Vec3,
    forward: &Vec3,
    station: f64,
) -> Vec<SlopeLabel> {
    if !kind.has_slope_labels() {
        return Vec::new();
    }

    slope_runs_3d(points, epsilon)
        .into_iter()
        .map(|run| {
            let mut direction = (run.first - run.last)
                .try_normalize(ZERO_RUN)
                .unwrap_or(*forward);
            if forward.dot(&direction) < 0.0 {
                direction = -direction;
            }
            let text_up = direction.cross(normal);
            SlopeLabel {
                station,
                position: Point3::from((run.first.coords + run.last.coords) * 0.5),
                orientation: Rotation::face_towards(&-normal, &text_up),
                text: slope_text_3d(kind, &run.first, &run.last),
            }
        })
        .collect()
}

/// Build the 2D slope labels for one view polyline.
pub fn slope_labels_2d(points: &[Point2D], kind: SurfaceKind, epsilon: f64) -> Vec<SlopeLabel2D> {
    if !kind.has_slope_labels() {
        return Vec::new();
    }

    slope_runs_2d(points, epsilon)
        .into_iter()
        .map(|run| SlopeLabel2D {
            position: run.first.midpoint(&run.last),
            angle_degrees: upright_angle(&run.first, &run.last),
            text: slope_text_2d(kind, &run.first, &run.last),
        })
        .collect()
}
