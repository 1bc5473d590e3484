//! Camera motion and the combined projection · view · model transform.

use super::math::{self, IDENTITY, Mat4, Vec3};
use super::scene::{SceneConfig, SceneKind};

const UP: Vec3 = [0.0, 1.0, 0.0];

/// How the rotation accumulator advances and what it drives.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraMotion {
    /// Eye circles `target` at `radius` and `height`; the model stays fixed.
    /// The angle advances by `step` radians per frame.
    Orbit { target: Vec3, radius: f32, height: f32, step: f32 },
    /// Eye is fixed and looks at the origin; the model spins about `axis`
    /// at `rate` radians per second of wall time.
    Spin { eye: Vec3, axis: Vec3, rate: f32 },
}

/// Camera state owned by the frame scheduler.
#[derive(Debug, Clone)]
pub struct CameraRig {
    rotation: f32,
    motion: CameraMotion,
    fov_y: f32,
    near: f32,
    far: f32,
}

impl CameraRig {
    pub fn new(motion: CameraMotion, fov_y: f32, near: f32, far: f32) -> Self {
        Self { rotation: 0.0, motion, fov_y, near, far }
    }

    pub fn for_scene(kind: SceneKind, config: &SceneConfig) -> Self {
        let motion = match kind {
            SceneKind::Bars => CameraMotion::Orbit {
                target: config.orbit_target,
                radius: config.orbit_radius,
                height: config.orbit_height,
                step: config.orbit_step,
            },
            SceneKind::Cube => CameraMotion::Spin {
                eye: config.spin_eye,
                axis: config.spin_axis,
                rate: config.spin_rate,
            },
        };
        Self::new(motion, config.fov_y_radians(), config.near, config.far)
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advances the accumulator by one frame that took `elapsed_secs`.
    ///
    /// The value only ever grows; trigonometric periodicity wraps it.
    pub fn advance(&mut self, elapsed_secs: f32) {
        let delta = match self.motion {
            CameraMotion::Orbit { step, .. } => step,
            CameraMotion::Spin { rate, .. } => rate * elapsed_secs.max(0.0),
        };
        self.rotation += delta.abs();
    }

    pub fn eye(&self) -> Vec3 {
        match self.motion {
            CameraMotion::Orbit { target, radius, height, .. } => {
                let (s, c) = self.rotation.sin_cos();
                [target[0] + radius * c, height, target[2] + radius * s]
            }
            CameraMotion::Spin { eye, .. } => eye,
        }
    }

    fn center(&self) -> Vec3 {
        match self.motion {
            CameraMotion::Orbit { target, .. } => target,
            CameraMotion::Spin { .. } => [0.0; 3],
        }
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        math::perspective(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        math::look_at(self.eye(), self.center(), UP)
    }

    pub fn model(&self) -> Mat4 {
        match self.motion {
            CameraMotion::Orbit { .. } => IDENTITY,
            CameraMotion::Spin { axis, .. } => math::rotate_axis(&IDENTITY, self.rotation, axis),
        }
    }

    /// `projection · view · model` for a surface with the given aspect ratio.
    pub fn transform(&self, aspect: f32) -> Mat4 {
        let view_model = math::multiply(&self.view(), &self.model());
        math::multiply(&self.projection(aspect), &view_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_advances_by_fixed_step_regardless_of_elapsed_time() {
        let mut rig = CameraRig::for_scene(SceneKind::Bars, &SceneConfig::default());
        rig.advance(10.0);
        rig.advance(0.0);
        assert!((rig.rotation() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn spin_advances_with_wall_time() {
        let mut rig = CameraRig::for_scene(SceneKind::Cube, &SceneConfig::default());
        rig.advance(0.5);
        assert!((rig.rotation() - 0.5).abs() < 1e-6);
        rig.advance(-3.0);
        assert!((rig.rotation() - 0.5).abs() < 1e-6);
    }
}
