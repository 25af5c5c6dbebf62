use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MOVE_SPEED: f32 = 8.0;
/// Degrees per second.
pub const ROTATE_SPEED: f32 = 60.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: glm::Vec3,
    /// Degrees about the camera's X axis; positive looks down.
    pub pitch: f32,
    /// Degrees about world Y; positive turns left.
    pub yaw: f32,
    pub forward: glm::Vec3,
    pub up: glm::Vec3,
    pub right: glm::Vec3,
}

impl Camera {
    pub fn new(position: glm::Vec3) -> Self {
        Self::with_angles(position, 0.0, 0.0)
    }

    pub fn with_angles(position: glm::Vec3, pitch: f32, yaw: f32) -> Self {
        let mut camera = Self {
            position,
            pitch,
            yaw,
            forward: glm::vec3(0.0, 0.0, 1.0),
            up: glm::vec3(0.0, 1.0, 0.0),
            right: glm::vec3(1.0, 0.0, 0.0),
        };
        camera.orient();
        camera
    }

    /// Rebuilds the basis from the canonical axes: pitch about X, then yaw about Y.
    pub fn orient(&mut self) {
        let (pitch, yaw) = (self.pitch, self.yaw);
        let basis = |v: glm::Vec3| rotate_y(&rotate_x(&v, pitch), yaw);
        self.forward = basis(glm::vec3(0.0, 0.0, 1.0));
        self.up = basis(glm::vec3(0.0, 1.0, 0.0));
        self.right = basis(glm::vec3(1.0, 0.0, 0.0));
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position ({:.3}, {:.3}, {:.3}) pitch {:.2} yaw {:.2} forward ({:.3}, {:.3}, {:.3})",
            self.position.x,
            self.position.y,
            self.position.z,
            self.pitch,
            self.yaw,
            self.forward.x,
            self.forward.y,
            self.forward.z
        )
    }
}

pub fn rotate_x(v: &glm::Vec3, degrees: f32) -> glm::Vec3 {
    if degrees == 0.0 {
        return *v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    glm::vec3(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
}

pub fn rotate_y(v: &glm::Vec3, degrees: f32) -> glm::Vec3 {
    if degrees == 0.0 {
        return *v;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    glm::vec3(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

/// Which movement keys are held during a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

impl MovementInput {
    pub fn any(&self) -> bool {
        self.forward
            || self.back
            || self.left
            || self.right
            || self.up
            || self.down
            || self.pitch_up
            || self.pitch_down
            || self.yaw_left
            || self.yaw_right
    }
}

/// How a tick decides that the camera moved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StillnessPolicy {
    /// Moved unless the summed translation and both angle changes are exactly
    /// zero. Opposing keys that cancel out leave the camera still.
    #[default]
    ExactCancellation,
    /// Moved whenever any movement or rotation key is held.
    AnyKeyHeld,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraUpdate {
    pub moved: bool,
    pub translation: glm::Vec3,
    pub pitch_delta: f32,
    pub yaw_delta: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraController {
    pub move_speed: f32,
    pub rotate_speed: f32,
    pub stillness: StillnessPolicy,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            rotate_speed: ROTATE_SPEED,
            stillness: StillnessPolicy::default(),
        }
    }
}

impl CameraController {
    /// Integrates one tick of input over `dt` seconds. The basis is rebuilt
    /// from the new angles whether or not anything changed.
    pub fn update(&self, camera: &mut Camera, input: &MovementInput, dt: f32) -> CameraUpdate {
        let step = self.move_speed * dt;
        let turn = self.rotate_speed * dt;

        let mut translation = glm::vec3(0.0, 0.0, 0.0);
        let flat_forward = flatten(&camera.forward);
        let flat_right = flatten(&camera.right);
        if let Some(forward) = flat_forward {
            if input.forward {
                translation += forward * step;
            }
            if input.back {
                translation -= forward * step;
            }
        }
        if let Some(right) = flat_right {
            if input.right {
                translation += right * step;
            }
            if input.left {
                translation -= right * step;
            }
        }
        let world_up = glm::vec3(0.0, 1.0, 0.0);
        if input.up {
            translation += world_up * step;
        }
        if input.down {
            translation -= world_up * step;
        }

        let mut pitch_delta = 0.0;
        if input.pitch_up {
            pitch_delta -= turn;
        }
        if input.pitch_down {
            pitch_delta += turn;
        }
        let mut yaw_delta = 0.0;
        if input.yaw_left {
            yaw_delta += turn;
        }
        if input.yaw_right {
            yaw_delta -= turn;
        }

        camera.position += translation;
        camera.pitch += pitch_delta;
        camera.yaw += yaw_delta;
        camera.orient();

        // Exact comparison: only a perfectly cancelled tick counts as still.
        let moved = match self.stillness {
            StillnessPolicy::ExactCancellation => {
                translation != glm::vec3(0.0, 0.0, 0.0) || pitch_delta != 0.0 || yaw_delta != 0.0
            }
            StillnessPolicy::AnyKeyHeld => input.any(),
        };

        CameraUpdate {
            moved,
            translation,
            pitch_delta,
            yaw_delta,
        }
    }
}

/// Projects onto the horizontal plane. `None` when looking straight up or down.
fn flatten(v: &glm::Vec3) -> Option<glm::Vec3> {
    let flat = glm::vec3(v.x, 0.0, v.z);
    let length = flat.norm();
    if length > f32::EPSILON {
        Some(flat / length)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn close(a: &glm::Vec3, b: &glm::Vec3) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn zero_angles_give_canonical_basis() {
        let camera = Camera::new(glm::vec3(1.0, 2.0, 3.0));
        assert_eq!(camera.forward, glm::vec3(0.0, 0.0, 1.0));
        assert_eq!(camera.up, glm::vec3(0.0, 1.0, 0.0));
        assert_eq!(camera.right, glm::vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn basis_stays_orthonormal() {
        let camera = Camera::with_angles(glm::vec3(0.0, 0.0, 0.0), 37.0, -123.0);
        for v in [&camera.forward, &camera.up, &camera.right] {
            assert!((v.norm() - 1.0).abs() < 1e-5);
        }
        assert!(glm::dot(&camera.forward, &camera.up).abs() < 1e-5);
        assert!(glm::dot(&camera.forward, &camera.right).abs() < 1e-5);
        assert!(glm::dot(&camera.up, &camera.right).abs() < 1e-5);
    }

    #[test]
    fn positive_yaw_turns_left() {
        let camera = Camera::with_angles(glm::vec3(0.0, 0.0, 0.0), 0.0, 90.0);
        assert!(close(&camera.forward, &glm::vec3(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn positive_pitch_looks_down() {
        let camera = Camera::with_angles(glm::vec3(0.0, 0.0, 0.0), 90.0, 0.0);
        assert!(close(&camera.forward, &glm::vec3(0.0, -1.0, 0.0)));
    }

    #[test]
    fn no_input_is_still() {
        let mut camera = Camera::new(glm::vec3(0.0, 0.0, 0.0));
        let update = CameraController::default().update(&mut camera, &MovementInput::default(), DT);
        assert!(!update.moved);
        assert_eq!(camera.position, glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn forward_moves_along_flattened_forward() {
        let mut camera = Camera::with_angles(glm::vec3(0.0, 0.0, 0.0), 45.0, 0.0);
        let input = MovementInput {
            forward: true,
            ..Default::default()
        };
        let update = CameraController::default().update(&mut camera, &input, 0.5);
        assert!(update.moved);
        assert!(close(&camera.position, &glm::vec3(0.0, 0.0, 4.0)));
    }

    #[test]
    fn vertical_movement_uses_world_up() {
        let mut camera = Camera::with_angles(glm::vec3(0.0, 0.0, 0.0), 30.0, 70.0);
        let input = MovementInput {
            up: true,
            ..Default::default()
        };
        CameraController::default().update(&mut camera, &input, 0.25);
        assert!(close(&camera.position, &glm::vec3(0.0, 2.0, 0.0)));
    }

    #[test]
    fn looking_straight_down_skips_horizontal_forward() {
        let mut camera = Camera::with_angles(glm::vec3(0.0, 0.0, 0.0), 90.0, 0.0);
        assert!(flatten(&camera.forward).is_none());
        let input = MovementInput {
            forward: true,
            ..Default::default()
        };
        let update = CameraController::default().update(&mut camera, &input, DT);
        assert!(!update.moved);
        assert_eq!(camera.position, glm::vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn opposing_keys_cancel_exactly() {
        let mut camera = Camera::new(glm::vec3(0.0, 0.0, 0.0));
        let input = MovementInput {
            forward: true,
            back: true,
            left: true,
            right: true,
            yaw_left: true,
            yaw_right: true,
            ..Default::default()
        };
        let update = CameraController::default().update(&mut camera, &input, DT);
        assert!(!update.moved);

        let any_key = CameraController {
            stillness: StillnessPolicy::AnyKeyHeld,
            ..Default::default()
        };
        assert!(any_key.update(&mut camera, &input, DT).moved);
    }

    #[test]
    fn rotation_keys_change_angles() {
        let mut camera = Camera::new(glm::vec3(0.0, 0.0, 0.0));
        let input = MovementInput {
            pitch_up: true,
            yaw_right: true,
            ..Default::default()
        };
        let update = CameraController::default().update(&mut camera, &input, 0.5);
        assert!(update.moved);
        assert_eq!(camera.pitch, -30.0);
        assert_eq!(camera.yaw, -30.0);
    }
}
