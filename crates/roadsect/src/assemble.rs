//! Segment chaining: unordered cut segments to continuous polylines.

use std::collections::VecDeque;

use roadsect_math::{Point3, Tolerance};

use crate::types::{Polyline3D, RawSegment};

/// Chain unordered segments into maximal polylines by endpoint adjacency.
///
/// A chain is seeded from the first remaining segment and grown by
/// scanning the pool in order; the first segment touching either chain end
/// is merged (reversed when needed) and the scan restarts. When no segment
/// touches the chain it is closed out. Finished chains are cleaned with
/// [`clean_vertices`] and dropped when fewer than 2 points remain.
pub fn assemble_polylines(
    segments: Vec<RawSegment>,
    tol: &Tolerance,
    merge_collinear: bool,
) -> Vec<Polyline3D> {
    let mut pool = segments;
    let mut polylines = Vec::new();

    while !pool.is_empty() {
        let seed = pool.remove(0);
        let mut chain: VecDeque<Point3> = VecDeque::from([seed.start, seed.end]);

        while let Some(i) = extend_chain(&mut chain, &pool, tol) {
            pool.remove(i);
        }

        let points = clean_vertices(chain.into(), tol, merge_collinear);
        if points.len() >= 2 {
            polylines.push(Polyline3D::new(points));
        }
    }

    polylines
}

/// Merge the first pool segment touching a chain end into the chain.
///
/// Returns the index of the merged segment.
fn extend_chain(chain: &mut VecDeque<Point3>, pool: &[RawSegment], tol: &Tolerance) -> Option<usize> {
    let (Some(&head), Some(&tail)) = (chain.front(), chain.back()) else {
        return None;
    };

    for (i, seg) in pool.iter().enumerate() {
        if tol.points_equal(&tail, &seg.start) {
            chain.push_back(seg.start);
            chain.push_back(seg.end);
        } else if tol.points_equal(&tail, &seg.end) {
            chain.push_back(seg.end);
            chain.push_back(seg.start);
        } else if tol.points_equal(&head, &seg.end) {
            chain.push_front(seg.end);
            chain.push_front(seg.start);
        } else if tol.points_equal(&head, &seg.start) {
            chain.push_front(seg.start);
            chain.push_front(seg.end);
        } else {
            continue;
        }
        return Some(i);
    }

    None
}

/// Collapse consecutive near-duplicate vertices and, optionally, interior
/// vertices lying on the line through their neighbours.
///
/// Of two coincident consecutive vertices the later one survives.
pub fn clean_vertices(mut points: Vec<Point3>, tol: &Tolerance, merge_collinear: bool) -> Vec<Point3> {
    for i in (1..points.len()).rev() {
        if tol.points_equal(&points[i], &points[i - 1]) {
            points.remove(i - 1);
        }
    }

    if merge_collinear && points.len() > 2 {
        let mut kept: Vec<Point3> = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            let is_interior = i > 0 && i + 1 < points.len();
            if is_interior {
                if let Some(prev) = kept.last() {
                    if tol.is_between_collinear(prev, p, &points[i + 1]) {
                        continue;
                    }
                }
            }
            kept.push(*p);
        }
        points = kept;
    }

    points
}
