use crate::{bounds::BoundingBox, materials::Material, transform::Transform};

/// A contiguous run of the scene's triangle storage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangleRange {
    pub start: u32,
    pub count: u32,
}

impl TriangleRange {
    /// One past the last triangle. Wide enough that no range overflows it.
    pub fn end(&self) -> u64 {
        self.start as u64 + self.count as u64
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(pub(crate) usize);

impl InstanceId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BoundsSource {
    Scanned,
    Supplied,
}

/// A placed reference to triangles owned by the scene. Its bounds are in the
/// triangles' local space and can only be set by the scene builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub(crate) name: String,
    pub(crate) range: TriangleRange,
    pub(crate) bounds: BoundingBox,
    pub(crate) bounds_source: BoundsSource,
    pub(crate) material: Material,
    pub(crate) transform: Transform,
}

impl Instance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> TriangleRange {
        self.range
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}
