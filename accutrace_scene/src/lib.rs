pub mod bounds;
pub mod builder;
pub mod camera;
pub mod example_scenes;
pub mod instance;
pub mod materials;
pub mod mesh;
pub mod primitives;
pub mod transform;

pub use builder::{SceneBuilder, SceneError};
pub use camera::{Camera, CameraController, MovementInput, StillnessPolicy};

use crate::{instance::Instance, mesh::Triangle, primitives::Sphere};

/// Object totals as the tracer sees them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneCounts {
    pub spheres: u32,
    pub triangles: u32,
    pub instances: u32,
}

/// A finished scene. Nothing can be added or changed after building; a new
/// scene is made by running a [`SceneBuilder`] again.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub(crate) spheres: Vec<Sphere>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) instances: Vec<Instance>,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn counts(&self) -> SceneCounts {
        SceneCounts {
            spheres: self.spheres.len() as u32,
            triangles: self.triangles.len() as u32,
            instances: self.instances.len() as u32,
        }
    }
}
