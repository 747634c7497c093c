//! Build progress side channel.
//!
//! World builds can take a while at fine raster steps, so the builder can run
//! on a worker thread and report through a shared [`BuildProgress`] that a
//! loading screen polls. There is no cancellation; the caller keeps the
//! simulation paused until `is_finished` flips.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::world::{build_world, BuiltWorld, WorldConfig};
use crate::noise::NoiseField;

/// Shared, lock-free progress state of a world build
#[derive(Debug, Default)]
pub struct BuildProgress {
    /// f32 completed fraction, stored as bits
    fraction: AtomicU32,
    finished: AtomicBool,
}

impl BuildProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed fraction in [0, 1]
    pub fn fraction(&self) -> f32 {
        f32::from_bits(self.fraction.load(Ordering::Relaxed))
    }

    pub fn set_fraction(&self, fraction: f32) {
        self.fraction
            .store(fraction.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }
}

/// Run a world build on a worker thread.
///
/// Returns the progress handle to poll and the join handle yielding the
/// built world. The progress `finished` flag is set before the thread exits.
pub fn spawn_build(
    noise: NoiseField,
    config: WorldConfig,
) -> (Arc<BuildProgress>, JoinHandle<BuiltWorld>) {
    let progress = Arc::new(BuildProgress::new());
    let worker = Arc::clone(&progress);
    let handle = std::thread::spawn(move || {
        let built = build_world(&noise, &config, Some(&worker));
        worker.finish();
        built
    });
    (progress, handle)
}
