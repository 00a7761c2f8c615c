//! Building many sections: station ranges, cancellation and batching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use rayon::prelude::*;

use crate::alignment::Alignment;
use crate::context::SectionContext;
use crate::error::Result;
use crate::mesh::SurfaceMesh;
use crate::section::CrossSection;

/// Stations from `start` every `gap`, ending exactly on `end`.
///
/// Returns just `start` when `gap` is not positive.
pub fn station_range(start: f64, end: f64, gap: f64) -> Vec<f64> {
    if !(gap > 0.0) || start >= end {
        return vec![start];
    }

    let mut stations = Vec::new();
    let mut i = 0u32;
    loop {
        let station = start + gap * i as f64;
        if station >= end {
            break;
        }
        stations.push(station);
        i += 1;
    }
    stations.push(end);
    stations
}

/// Cooperative cancellation flag shared between a caller and a batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress after one section of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStep {
    /// Index of the section just built.
    pub index: usize,
    /// Number of sections in the batch.
    pub total: usize,
    /// Station of that section, if any.
    pub station: Option<f64>,
}

/// Builds sections one per `next()`.
///
/// The token is checked before each section; after cancellation the
/// iterator ends and sections already built stay intact.
pub struct SectionBatch<'a> {
    sections: &'a mut [CrossSection],
    ctx: SectionContext<'a>,
    meshes: &'a [SurfaceMesh],
    alignments: &'a [Alignment],
    token: CancelToken,
    index: usize,
    cancelled: bool,
}

impl<'a> SectionBatch<'a> {
    /// Create a batch over `sections`.
    pub fn new(
        sections: &'a mut [CrossSection],
        ctx: SectionContext<'a>,
        meshes: &'a [SurfaceMesh],
        alignments: &'a [Alignment],
        token: CancelToken,
    ) -> Self {
        Self {
            sections,
            ctx,
            meshes,
            alignments,
            token,
            index: 0,
            cancelled: false,
        }
    }

    /// Number of sections built so far.
    pub fn built(&self) -> usize {
        self.index
    }
}

impl Iterator for SectionBatch<'_> {
    type Item = Result<BatchStep>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.sections.len();
        if self.cancelled || self.index >= total {
            return None;
        }
        if self.token.is_cancelled() {
            info!("section batch cancelled after {} of {}", self.index, total);
            self.cancelled = true;
            return None;
        }

        let index = self.index;
        self.index += 1;

        let section = &mut self.sections[index];
        let station = section.station();
        let step = section
            .build(&self.ctx, self.meshes, self.alignments)
            .map(|_| BatchStep {
                index,
                total,
                station,
            });

        if index + 1 == total {
            info!("section batch finished: {total} sections");
        }
        Some(step)
    }
}

/// Build sections concurrently.
///
/// Each section checks the token before it starts. Returns the number of
/// sections built.
pub fn build_parallel(
    sections: &mut [CrossSection],
    ctx: &SectionContext<'_>,
    meshes: &[SurfaceMesh],
    alignments: &[Alignment],
    token: &CancelToken,
) -> usize {
    let built = sections
        .par_iter_mut()
        .map(|section| {
            if token.is_cancelled() {
                return false;
            }
            let station = section.station();
            match section.build(ctx, meshes, alignments) {
                Ok(_) => true,
                Err(err) => {
                    warn!("section {station:?} failed: {err}");
                    false
                }
            }
        })
        .filter(|built| *built)
        .count();

    if token.is_cancelled() {
        info!("parallel build cancelled: {built} of {} sections built", sections.len());
    } else {
        info!("parallel build finished: {built} sections");
    }
    built
}
