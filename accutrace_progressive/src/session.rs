//! The per-tick accumulation loop, independent of any GPU backend.

use crate::{
    accumulation::BufferIndices,
    camera::{SamplingSettings, TraceUniforms},
};
use accutrace_scene::{Camera, CameraController, MovementInput, SceneCounts};
use std::time::Instant;

/// The two passes a tick drives. Implementations record GPU work; tests
/// record the calls.
pub trait FramePipeline {
    /// Renders into `indices.write`, blending with `indices.read`.
    fn trace(&mut self, indices: BufferIndices, uniforms: &TraceUniforms);

    /// Shows `indices.write` on the presentation target.
    fn present(&mut self, indices: BufferIndices);
}

/// Number of samples accumulated into the current image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameCounter(u32);

impl FrameCounter {
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    pub fn indices(self) -> BufferIndices {
        BufferIndices::for_frame(self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Counter value the tick rendered with.
    pub frame:      u32,
    pub indices:    BufferIndices,
    pub moved:      bool,
    pub accumulate: bool,
}

#[derive(Debug)]
pub struct RenderSession {
    camera:     Camera,
    controller: CameraController,
    counter:    FrameCounter,
    sampling:   SamplingSettings,
    resolution: [u32; 2],
    counts:     SceneCounts,
}

impl RenderSession {
    pub fn new(
        camera: Camera,
        controller: CameraController,
        sampling: SamplingSettings,
        resolution: [u32; 2],
        counts: SceneCounts,
    ) -> Self {
        Self {
            camera,
            controller,
            counter: FrameCounter::default(),
            sampling,
            resolution,
            counts,
        }
    }

    /// Runs one frame: camera update and reset decision, buffer selection,
    /// trace, present, then the counter advances.
    pub fn tick<P>(&mut self, input: &MovementInput, dt: f32, pipeline: &mut P) -> TickReport
    where
        P: FramePipeline + ?Sized,
    {
        let update = self.controller.update(&mut self.camera, input, dt);
        if update.moved {
            self.counter.reset();
        }

        let frame = self.counter.value();
        let indices = self.counter.indices();
        let accumulate = !update.moved;
        let uniforms = TraceUniforms::new(
            &self.camera,
            self.resolution,
            frame,
            accumulate,
            &self.sampling,
            &self.counts,
        );

        pipeline.trace(indices, &uniforms);
        pipeline.present(indices);
        self.counter.advance();

        log::trace!(
            "frame {} read {} write {} moved {}",
            frame,
            indices.read,
            indices.write,
            update.moved
        );
        TickReport {
            frame,
            indices,
            moved: update.moved,
            accumulate,
        }
    }

    pub fn reset_accumulation(&mut self) {
        self.counter.reset();
    }

    /// New target size. Previous samples no longer line up, so accumulation restarts.
    pub fn resize(&mut self, resolution: [u32; 2]) {
        self.resolution = resolution;
        self.counter.reset();
    }

    pub fn set_scene_counts(&mut self, counts: SceneCounts) {
        self.counts = counts;
        self.counter.reset();
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.counter.reset();
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frame(&self) -> u32 {
        self.counter.value()
    }

    pub fn resolution(&self) -> [u32; 2] {
        self.resolution
    }

    pub fn counts(&self) -> SceneCounts {
        self.counts
    }
}

/// Measures wall-clock time between ticks.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self { last: Instant::now() }
    }
}

impl FrameClock {
    /// Seconds since the previous call, or since construction.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_wraps_instead_of_overflowing() {
        let mut counter = FrameCounter(u32::MAX);
        counter.advance();
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.indices(), BufferIndices { read: 0, write: 1 });
    }

    #[test]
    fn clock_measures_elapsed_time() {
        let mut clock = FrameClock::default();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let dt = clock.tick();
        assert!(dt >= 0.005);
        assert!(clock.tick() < dt + 1.0);
    }
}
