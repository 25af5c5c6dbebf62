use crate::materials::Material;
use nalgebra_glm as glm;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub position: glm::Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(position: glm::Vec3, radius: f32, material: Material) -> Self {
        Self {
            position,
            radius,
            material,
        }
    }
}
