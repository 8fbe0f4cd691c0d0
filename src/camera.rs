//! Free-fly camera with a lazily cached view matrix.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::Controller;

/// Camera projection and control parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Fly speed in units per second.
    pub move_speed: f32,
    /// Yaw/pitch speed in radians per second per unit of look input.
    pub look_speed: Vec2,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov: PI / 2.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            move_speed: 10.0,
            look_speed: Vec2::new(1.0, 0.5),
        }
    }
}

/// View/projection transform source.
///
/// The view matrix is cached and recomputed only when the pose changed since
/// the last [`xform`](Self::xform) call. Projection changes apply
/// immediately through [`set_params`](Self::set_params).
pub struct Camera {
    params: CameraParams,
    projection: Mat4,
    cached_xform: Mat4,
    xform_dirty: bool,
    pos: Vec3,
    look: Vec2,
}

impl Camera {
    /// Create a camera at the origin looking down -Z.
    #[must_use]
    pub fn new(params: CameraParams) -> Self {
        let mut camera = Self {
            params,
            projection: Mat4::IDENTITY,
            cached_xform: Mat4::IDENTITY,
            xform_dirty: true,
            pos: Vec3::ZERO,
            look: Vec2::ZERO,
        };
        camera.set_params(params);
        camera
    }

    /// The view matrix: the camera's world transform
    /// (translate · yaw · pitch), inverted. Recomputed only when dirty.
    pub fn xform(&mut self) -> Mat4 {
        if self.xform_dirty {
            let world = Mat4::from_translation(self.pos)
                * Mat4::from_rotation_y(-self.look.x)
                * Mat4::from_rotation_x(self.look.y);
            self.cached_xform = world.inverse();
            self.xform_dirty = false;
        }
        self.cached_xform
    }

    /// The current projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Current parameters.
    #[must_use]
    pub fn params(&self) -> CameraParams {
        self.params
    }

    /// Replace the parameters and rebuild the projection immediately.
    ///
    /// The stored fov is horizontal; the perspective construction takes the
    /// derived vertical half-angle, hence the halving.
    pub fn set_params(&mut self, params: CameraParams) {
        self.params = params;
        self.projection = Mat4::perspective_rh(
            params.fov / 2.0,
            params.aspect,
            params.near,
            params.far,
        );
    }

    /// Update the aspect ratio (window resize) and reproject.
    pub fn set_aspect(&mut self, aspect: f32) {
        let mut params = self.params;
        params.aspect = aspect;
        self.set_params(params);
    }

    /// World-space position.
    #[must_use]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    /// Yaw/pitch look angles in radians.
    #[must_use]
    pub fn look(&self) -> Vec2 {
        self.look
    }

    /// Move the camera and invalidate the cached view matrix.
    pub fn set_pose(&mut self, pos: Vec3, look: Vec2) {
        self.pos = pos;
        self.look = look;
        self.xform_dirty = true;
    }

    /// Integrate one frame of controller input: turn at look speed, fly at
    /// move speed along the yawed movement vector, clamp pitch short of the
    /// poles.
    pub(crate) fn update(&mut self, controller: &Controller, dt: f32) {
        self.look += dt * self.params.look_speed * controller.look;
        let movement =
            Quat::from_rotation_y(-self.look.x) * controller.movement;
        self.pos += dt * self.params.move_speed * movement;
        self.look.y = self.look.y.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.xform_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn pitch_is_clamped_after_any_input() {
        let mut camera = Camera::new(CameraParams::default());
        let up = Controller {
            look: Vec2::new(0.0, 1.0),
            ..Controller::default()
        };
        for _ in 0..100 {
            camera.update(&up, 1.0);
            assert!(camera.look().y <= FRAC_PI_2);
        }
        let down = Controller {
            look: Vec2::new(0.0, -1.0),
            ..Controller::default()
        };
        for _ in 0..100 {
            camera.update(&down, 1.0);
            assert!(camera.look().y >= -FRAC_PI_2);
        }
    }

    #[test]
    fn xform_is_inverse_of_world_transform() {
        let mut camera = Camera::new(CameraParams::default());
        camera.set_pose(Vec3::new(0.0, 0.0, 2.0), Vec2::ZERO);
        // With no rotation the view matrix is a pure back-translation.
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0));
        assert!(camera.xform().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn xform_cache_tracks_pose_changes() {
        let mut camera = Camera::new(CameraParams::default());
        let first = camera.xform();
        // Clean camera returns the identical cached matrix.
        assert_eq!(first, camera.xform());

        camera.set_pose(Vec3::new(3.0, 1.0, 0.0), Vec2::new(0.4, 0.2));
        assert!(!camera.xform().abs_diff_eq(first, EPS));
    }

    #[test]
    fn projection_halves_the_stored_fov() {
        let params = CameraParams::default();
        let camera = Camera::new(params);
        let expected = Mat4::perspective_rh(
            params.fov / 2.0,
            params.aspect,
            params.near,
            params.far,
        );
        assert!(camera.projection().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn movement_follows_yaw() {
        let mut camera = Camera::new(CameraParams::default());
        // Yaw a quarter turn, then push "forward": world motion is along +X.
        camera.set_pose(Vec3::ZERO, Vec2::new(FRAC_PI_2, 0.0));
        let forward = Controller {
            movement: Vec3::new(0.0, 0.0, -1.0),
            look: Vec2::ZERO,
        };
        let mut still = camera.params();
        still.look_speed = Vec2::ZERO;
        camera.set_params(still);
        camera.update(&forward, 0.1);

        let pos = camera.pos();
        assert!(pos.x > EPS);
        assert!(pos.z.abs() < 1e-4);
    }
}
