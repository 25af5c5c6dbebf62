use crate::mesh::Triangle;
use nalgebra_glm as glm;

/// Axis-aligned box in the local space of the triangles it was computed from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: glm::Vec3,
    pub max: glm::Vec3,
}

impl BoundingBox {
    /// The identity of `union`: contains nothing and has `min > max` on every axis.
    pub fn empty() -> Self {
        Self {
            min: glm::vec3(f32::MAX, f32::MAX, f32::MAX),
            max: glm::vec3(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn union(self, other: &Self) -> Self {
        Self {
            min: glm::min2(&self.min, &other.min),
            max: glm::max2(&self.max, &other.max),
        }
    }

    /// Scans every vertex of `triangles` in order. The result only depends
    /// on the vertex values, so rescanning unchanged data is bit-identical.
    pub fn of_triangles(triangles: &[Triangle]) -> Self {
        triangles
            .iter()
            .fold(Self::empty(), |bounds, triangle| bounds.union(&triangle.bounds()))
    }

    pub fn contains(&self, point: &glm::Vec3) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }
}
