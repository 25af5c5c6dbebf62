use accutrace_gpu::{lanes::vec3_array, AllocatedBuffer, GpuContext};
use accutrace_scene::{camera::Camera, SceneCounts};
use bytemuck::{Pod, Zeroable};

/// Half of the vertical field of view, in degrees.
pub const HALF_FOV_DEGREES: f32 = 45.0;

/// Distance from the eye to the image plane, in pixels.
pub fn focal_length(height: u32) -> f32 {
    HALF_FOV_DEGREES.to_radians().tan() * 0.5 * height as f32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SamplingSettings {
    pub max_bounces: i32,
    pub max_bounces_reflection: i32,
    pub max_bounces_transmission: i32,
    pub samples_per_pixel: i32,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            max_bounces: 4,
            max_bounces_reflection: 4,
            max_bounces_transmission: 4,
            samples_per_pixel: 3,
        }
    }
}

/// Names of the trace program's uniform fields, in block order.
pub const UNIFORM_NAMES: [&str; 15] = [
    "uResolution",
    "uFocalLength",
    "renderedFrames",
    "cameraPosition",
    "maxBounces",
    "cameraForward",
    "maxBouncesReflection",
    "cameraUp",
    "maxBouncesTransmission",
    "cameraRight",
    "samplesPerPixel",
    "accumulate",
    "numSpheres",
    "numTriangles",
    "numModels",
];

/// Host side of the `TraceUniforms` block. Each `vec3` shares its 16-byte
/// lane with the scalar that follows it.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TraceUniforms {
    pub resolution: [u32; 2],
    pub focal_length: f32,
    pub rendered_frames: u32,
    pub camera_position: [f32; 3],
    pub max_bounces: i32,
    pub camera_forward: [f32; 3],
    pub max_bounces_reflection: i32,
    pub camera_up: [f32; 3],
    pub max_bounces_transmission: i32,
    pub camera_right: [f32; 3],
    pub samples_per_pixel: i32,
    pub accumulate: u32,
    pub num_spheres: u32,
    pub num_triangles: u32,
    pub num_models: u32,
}

impl TraceUniforms {
    pub fn new(
        camera: &Camera,
        resolution: [u32; 2],
        rendered_frames: u32,
        accumulate: bool,
        sampling: &SamplingSettings,
        counts: &SceneCounts,
    ) -> Self {
        Self {
            resolution,
            focal_length: focal_length(resolution[1]),
            rendered_frames,
            camera_position: vec3_array(&camera.position),
            max_bounces: sampling.max_bounces,
            camera_forward: vec3_array(&camera.forward),
            max_bounces_reflection: sampling.max_bounces_reflection,
            camera_up: vec3_array(&camera.up),
            max_bounces_transmission: sampling.max_bounces_transmission,
            camera_right: vec3_array(&camera.right),
            samples_per_pixel: sampling.samples_per_pixel,
            accumulate: accumulate as u32,
            num_spheres: counts.spheres,
            num_triangles: counts.triangles,
            num_models: counts.instances,
        }
    }

    pub fn create_buffer(self, ctx: &GpuContext) -> AllocatedBuffer<Self> {
        AllocatedBuffer::with_data(ctx, "Trace uniforms", wgpu::BufferUsages::UNIFORM, &[self])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;
    use std::mem::{offset_of, size_of};

    #[test]
    fn layout_matches_wgsl_block() {
        assert_eq!(size_of::<TraceUniforms>(), 96);
        assert_eq!(offset_of!(TraceUniforms, rendered_frames), 12);
        assert_eq!(offset_of!(TraceUniforms, camera_position), 16);
        assert_eq!(offset_of!(TraceUniforms, max_bounces), 28);
        assert_eq!(offset_of!(TraceUniforms, camera_forward), 32);
        assert_eq!(offset_of!(TraceUniforms, camera_up), 48);
        assert_eq!(offset_of!(TraceUniforms, camera_right), 64);
        assert_eq!(offset_of!(TraceUniforms, samples_per_pixel), 76);
        assert_eq!(offset_of!(TraceUniforms, accumulate), 80);
        assert_eq!(offset_of!(TraceUniforms, num_models), 92);
    }

    #[test]
    fn focal_length_follows_height() {
        assert!((focal_length(720) - 360.0).abs() < 1e-3);
        assert!((focal_length(1080) - 540.0).abs() < 1e-3);
    }

    #[test]
    fn uniforms_carry_camera_and_counts() {
        let camera = Camera::new(glm::vec3(1.0, 2.0, 3.0));
        let counts = SceneCounts {
            spheres: 2,
            triangles: 12,
            instances: 1,
        };
        let sampling = SamplingSettings::default();
        let uniforms = TraceUniforms::new(&camera, [640, 480], 7, true, &sampling, &counts);
        assert_eq!(uniforms.resolution, [640, 480]);
        assert_eq!(uniforms.rendered_frames, 7);
        assert_eq!(uniforms.accumulate, 1);
        assert_eq!(uniforms.camera_position, [1.0, 2.0, 3.0]);
        assert_eq!(uniforms.camera_forward, [0.0, 0.0, 1.0]);
        assert_eq!(uniforms.samples_per_pixel, 3);
        assert_eq!(uniforms.num_spheres, 2);
        assert_eq!(uniforms.num_triangles, 12);
        assert_eq!(uniforms.num_models, 1);
    }
}
