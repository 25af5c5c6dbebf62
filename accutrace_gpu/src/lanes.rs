//! Conversions from glm types into the 16-byte lanes used by WGSL storage
//! and uniform structs.

use nalgebra_glm as glm;

pub fn vec3_lane(v: &glm::Vec3, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

pub fn vec3_array(v: &glm::Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Column-major, matching `mat4x4<f32>`.
pub fn mat4_columns(m: &glm::Mat4) -> [[f32; 4]; 4] {
    [
        [m[(0, 0)], m[(1, 0)], m[(2, 0)], m[(3, 0)]],
        [m[(0, 1)], m[(1, 1)], m[(2, 1)], m[(3, 1)]],
        [m[(0, 2)], m[(1, 2)], m[(2, 2)], m[(3, 2)]],
        [m[(0, 3)], m[(1, 3)], m[(2, 3)], m[(3, 3)]],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_hold_translation_last() {
        let m = glm::translation(&glm::vec3(1.0, 2.0, 3.0));
        let columns = mat4_columns(&m);
        assert_eq!(columns[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(columns[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
