use nalgebra_glm as glm;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: glm::Vec3,
    /// Must stay orthonormal; the tracer inverts it by transposition.
    pub rotation: glm::Mat3,
    /// Carried with the instance but not applied when tracing.
    pub scale: glm::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: glm::vec3(0.0, 0.0, 0.0),
            rotation: glm::Mat3::identity(),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: glm::Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Rotation of `degrees` about `axis`.
    pub fn with_axis_angle(mut self, axis: &glm::Vec3, degrees: f32) -> Self {
        let rotation = glm::mat4_to_mat3(&glm::rotation(degrees.to_radians(), axis));
        self.rotation = rotation * self.rotation;
        self
    }

    /// Applies roll about Z, then pitch about X, then yaw about world Y, all in
    /// degrees. Pitch and yaw follow [`Camera`](crate::camera::Camera): positive
    /// pitch tips +Z down, positive yaw turns +Z towards -X.
    pub fn with_euler(self, pitch: f32, yaw: f32, roll: f32) -> Self {
        self.with_axis_angle(&glm::Vec3::z(), roll)
            .with_axis_angle(&glm::Vec3::x(), pitch)
            .with_axis_angle(&glm::Vec3::y(), -yaw)
    }

    pub fn is_orthonormal(&self, epsilon: f32) -> bool {
        let product = self.rotation.transpose() * self.rotation;
        (product - glm::Mat3::identity()).abs().max() <= epsilon
    }

    pub fn rotation_matrix(&self) -> glm::Mat4 {
        glm::mat3_to_mat4(&self.rotation)
    }

    pub fn inverse_rotation_matrix(&self) -> glm::Mat4 {
        glm::mat3_to_mat4(&self.rotation.transpose())
    }
}
