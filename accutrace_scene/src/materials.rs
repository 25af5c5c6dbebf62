use nalgebra_glm as glm;

/// Surface description shared by spheres and instances.
///
/// Values are passed to the GPU untouched; nothing here clamps or validates
/// them. An emission strength of zero means the surface does not emit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub colour: glm::Vec3,
    pub roughness: f32,
    pub emission_colour: glm::Vec3,
    pub emission_strength: f32,
    pub alpha: f32,
    pub transmission: f32,
    pub refractive_index: f32,
    pub metalness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            colour: glm::vec3(1.0, 1.0, 1.0),
            roughness: 1.0,
            emission_colour: glm::vec3(0.0, 0.0, 0.0),
            emission_strength: 0.0,
            alpha: 1.0,
            transmission: 0.0,
            refractive_index: 1.0,
            metalness: 0.0,
        }
    }
}

impl Material {
    pub fn diffuse(colour: glm::Vec3) -> Self {
        Self {
            colour,
            ..Default::default()
        }
    }

    pub fn emissive(colour: glm::Vec3, strength: f32) -> Self {
        Self {
            colour: glm::vec3(0.0, 0.0, 0.0),
            emission_colour: colour,
            emission_strength: strength,
            ..Default::default()
        }
    }

    pub fn metal(colour: glm::Vec3, roughness: f32) -> Self {
        Self {
            colour,
            roughness,
            metalness: 1.0,
            ..Default::default()
        }
    }

    pub fn glass(colour: glm::Vec3, refractive_index: f32) -> Self {
        Self {
            colour,
            roughness: 0.0,
            transmission: 1.0,
            refractive_index,
            ..Default::default()
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }
}
