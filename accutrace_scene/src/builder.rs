use crate::{
    bounds::BoundingBox,
    instance::{BoundsSource, Instance, InstanceId, TriangleRange},
    materials::Material,
    mesh::{self, MeshError, Triangle},
    primitives::Sphere,
    transform::Transform,
    Scene,
};
use std::path::Path;
use thiserror::Error;

const ORTHONORMAL_EPSILON: f32 = 1e-4;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("triangle range {start}..{end} is outside the {available} stored triangles")]
    RangeOutOfBounds { start: u32, end: u64, available: usize },
    #[error("triangle storage cannot address more than {} triangles", u32::MAX)]
    StorageFull,
    #[error("instance '{0}' references no triangles")]
    EmptyRange(String),
    #[error("no instance with index {0}")]
    UnknownInstance(usize),
    #[error("unknown scene '{0}'")]
    UnknownScene(String),
}

/// Collects scene objects and hands out an immutable [`Scene`].
///
/// Triangle storage only grows: ranges handed out earlier stay valid for the
/// lifetime of the builder and of the scene it builds.
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    spheres: Vec<Sphere>,
    triangles: Vec<Triangle>,
    instances: Vec<Instance>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sphere(&mut self, sphere: Sphere) -> &mut Self {
        self.spheres.push(sphere);
        self
    }

    /// Appends triangles and returns where they landed. Storage that would
    /// outgrow 32-bit indices is left as it was.
    pub fn push_triangles<I>(&mut self, triangles: I) -> Result<TriangleRange, SceneError>
    where
        I: IntoIterator<Item = Triangle>,
    {
        let start = self.triangles.len();
        self.triangles.extend(triangles);
        match (u32::try_from(start), u32::try_from(self.triangles.len())) {
            (Ok(first), Ok(end)) => Ok(TriangleRange {
                start: first,
                count: end - first,
            }),
            _ => {
                self.triangles.truncate(start);
                Err(SceneError::StorageFull)
            }
        }
    }

    /// Appends the triangles of a mesh file. A missing file gives an empty range.
    pub fn load_triangles<P: AsRef<Path>>(&mut self, path: P) -> Result<TriangleRange, SceneError> {
        let triangles = mesh::load_obj_or_empty(path)?;
        self.push_triangles(triangles)
    }

    /// Adds an instance over already stored triangles, scanning them for its bounds.
    pub fn add_instance(
        &mut self,
        name: impl Into<String>,
        range: TriangleRange,
        material: Material,
        transform: Transform,
    ) -> Result<InstanceId, SceneError> {
        let name = name.into();
        let bounds = self.scan_bounds(&name, range)?;
        Ok(self.push_instance(Instance {
            name,
            range,
            bounds,
            bounds_source: BoundsSource::Scanned,
            material,
            transform,
        }))
    }

    /// Adds an instance with caller-supplied bounds. The range is still
    /// validated, but the bounds are trusted as given.
    pub fn add_instance_with_bounds(
        &mut self,
        name: impl Into<String>,
        range: TriangleRange,
        bounds: BoundingBox,
        material: Material,
        transform: Transform,
    ) -> Result<InstanceId, SceneError> {
        let name = name.into();
        self.check_range(range)?;
        Ok(self.push_instance(Instance {
            name,
            range,
            bounds,
            bounds_source: BoundsSource::Supplied,
            material,
            transform,
        }))
    }

    /// Loads a mesh file and places it. Returns `None` when the file is
    /// missing or holds no faces.
    pub fn add_model_from_file<P: AsRef<Path>>(
        &mut self,
        name: impl Into<String>,
        path: P,
        material: Material,
        transform: Transform,
    ) -> Result<Option<InstanceId>, SceneError> {
        let name = name.into();
        let range = self.load_triangles(path.as_ref())?;
        if range.is_empty() {
            log::warn!("Model '{}' has no triangles and was not added", name);
            return Ok(None);
        }
        self.add_instance(name, range, material, transform).map(Some)
    }

    pub fn set_instance_transform(
        &mut self,
        id: InstanceId,
        transform: Transform,
    ) -> Result<(), SceneError> {
        let (name, range, source) = match self.instances.get(id.0) {
            Some(instance) => (instance.name.clone(), instance.range, instance.bounds_source),
            None => return Err(SceneError::UnknownInstance(id.0)),
        };
        let bounds = match source {
            BoundsSource::Scanned => Some(self.scan_bounds(&name, range)?),
            BoundsSource::Supplied => None,
        };
        warn_if_skewed(&name, &transform);
        let instance = &mut self.instances[id.0];
        instance.transform = transform;
        if let Some(bounds) = bounds {
            instance.bounds = bounds;
        }
        Ok(())
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn build(self) -> Scene {
        log::info!(
            "Built scene with {} spheres, {} triangles and {} instances",
            self.spheres.len(),
            self.triangles.len(),
            self.instances.len()
        );
        Scene {
            spheres: self.spheres,
            triangles: self.triangles,
            instances: self.instances,
        }
    }

    fn push_instance(&mut self, instance: Instance) -> InstanceId {
        warn_if_skewed(&instance.name, &instance.transform);
        self.instances.push(instance);
        InstanceId(self.instances.len() - 1)
    }

    fn check_range(&self, range: TriangleRange) -> Result<(), SceneError> {
        let end = range.end();
        if end > self.triangles.len() as u64 {
            return Err(SceneError::RangeOutOfBounds {
                start: range.start,
                end,
                available: self.triangles.len(),
            });
        }
        Ok(())
    }

    fn scan_bounds(&self, name: &str, range: TriangleRange) -> Result<BoundingBox, SceneError> {
        self.check_range(range)?;
        if range.is_empty() {
            return Err(SceneError::EmptyRange(name.to_owned()));
        }
        let triangles = &self.triangles[range.start as usize..range.end() as usize];
        Ok(BoundingBox::of_triangles(triangles))
    }
}

fn warn_if_skewed(name: &str, transform: &Transform) {
    if !transform.is_orthonormal(ORTHONORMAL_EPSILON) {
        log::warn!("Instance '{}' has a rotation that is not orthonormal", name);
    }
}
