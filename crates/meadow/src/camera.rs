//! # First-Person Camera
//!
//! Input is sampled once per tick into an [`InputSnapshot`]; the camera
//! update is a pure function of the previous camera, that snapshot and the
//! tuning. Movement is in world units per tick.
//!
//! Yaw is measured from +x towards +z, so yaw 0 walks along +x.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::config::{AppError, AppResult};

/// Movement and look tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Walk speed, units per tick.
    pub base_speed: f64,
    /// Sprint speed, units per tick.
    pub sprint_speed: f64,
    /// Strafe speed as a fraction of walk speed.
    pub strafe_factor: f64,
    /// Radians per pixel of mouse motion.
    pub sensitivity: f64,
    /// Largest pitch magnitude, radians.
    pub pitch_limit: f64,
    /// Eye height above the ground.
    pub eye_height: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_speed: 8.0,
            sprint_speed: 16.0,
            strafe_factor: 0.8,
            sensitivity: 0.003,
            pitch_limit: PI / 2.2,
            eye_height: 90.0,
        }
    }
}

impl CameraConfig {
    /// Rejects tuning that would break the camera.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCamera`] naming the first bad field.
    pub fn validate(&self) -> AppResult<()> {
        let checks = [
            ("base_speed", self.base_speed, self.base_speed >= 0.0),
            ("sprint_speed", self.sprint_speed, self.sprint_speed >= 0.0),
            ("strafe_factor", self.strafe_factor, self.strafe_factor >= 0.0),
            ("sensitivity", self.sensitivity, self.sensitivity > 0.0),
            (
                "pitch_limit",
                self.pitch_limit,
                self.pitch_limit > 0.0 && self.pitch_limit < FRAC_PI_2,
            ),
            ("eye_height", self.eye_height, self.eye_height >= 0.0),
        ];

        for (field, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(AppError::InvalidCamera {
                    field: field.to_owned(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Everything the camera reads from the input devices in one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// W / up arrow held.
    pub forward: bool,
    /// S / down arrow held.
    pub backward: bool,
    /// A / left arrow held.
    pub left: bool,
    /// D / right arrow held.
    pub right: bool,
    /// Shift held.
    pub sprint: bool,
    /// Horizontal mouse motion since the last tick, pixels.
    pub mouse_dx: f64,
    /// Vertical mouse motion since the last tick, pixels.
    pub mouse_dy: f64,
    /// Click or space this tick.
    pub capture_requested: bool,
    /// Escape released this tick.
    pub release_requested: bool,
    /// Mouse-up looks down.
    pub invert_y: bool,
}

/// Whether the mouse drives the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerLock {
    /// Mouse moves freely; look is ignored.
    #[default]
    Free,
    /// Mouse is captured; motion turns the camera.
    Captured,
}

impl PointerLock {
    /// Next state after `input`. Release wins over capture in the same tick.
    #[must_use]
    pub const fn update(self, input: &InputSnapshot) -> Self {
        if input.release_requested {
            Self::Free
        } else if input.capture_requested {
            Self::Captured
        } else {
            self
        }
    }

    /// True while captured.
    #[must_use]
    pub const fn is_captured(self) -> bool {
        matches!(self, Self::Captured)
    }
}

/// Camera state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World X.
    pub x: f64,
    /// Eye height.
    pub y: f64,
    /// World Z.
    pub z: f64,
    /// Heading, radians.
    pub yaw: f64,
    /// Elevation, radians.
    pub pitch: f64,
    /// Pointer lock state.
    pub lock: PointerLock,
}

impl Camera {
    /// Camera standing at `(x, z)`, looking along +x, pointer free.
    #[must_use]
    pub fn new(x: f64, z: f64, config: &CameraConfig) -> Self {
        Self {
            x,
            y: config.eye_height,
            z,
            yaw: 0.0,
            pitch: 0.0,
            lock: PointerLock::Free,
        }
    }

    /// Point one unit ahead along the view direction.
    #[must_use]
    pub fn look_target(&self) -> (f64, f64, f64) {
        (
            self.x + self.yaw.cos() * self.pitch.cos(),
            self.y + self.pitch.sin(),
            self.z + self.yaw.sin() * self.pitch.cos(),
        )
    }

    /// The camera one tick later.
    #[must_use]
    pub fn step(&self, input: &InputSnapshot, config: &CameraConfig) -> Self {
        let mut next = *self;
        next.lock = self.lock.update(input);

        let speed = if input.sprint {
            config.sprint_speed
        } else {
            config.base_speed
        };
        let strafe = speed * config.strafe_factor;

        let mut walk = |angle: f64, distance: f64| {
            next.x += angle.cos() * distance;
            next.z += angle.sin() * distance;
        };
        if input.forward {
            walk(self.yaw, speed);
        }
        if input.backward {
            walk(self.yaw, -speed);
        }
        if input.left {
            walk(self.yaw + FRAC_PI_2, strafe);
        }
        if input.right {
            walk(self.yaw - FRAC_PI_2, strafe);
        }

        if next.lock.is_captured() {
            let factor = if input.invert_y { -1.0 } else { 1.0 };
            next.yaw += input.mouse_dx * config.sensitivity;
            next.pitch = (next.pitch - input.mouse_dy * config.sensitivity * factor)
                .clamp(-config.pitch_limit, config.pitch_limit);
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn captured() -> Camera {
        let config = CameraConfig::default();
        let camera = Camera::new(0.0, 0.0, &config);
        camera.step(
            &InputSnapshot {
                capture_requested: true,
                ..InputSnapshot::default()
            },
            &config,
        )
    }

    #[test]
    fn test_idle_input_changes_nothing() {
        let config = CameraConfig::default();
        let camera = Camera::new(12.0, -4.0, &config);
        assert_eq!(camera.step(&InputSnapshot::default(), &config), camera);
    }

    #[test]
    fn test_forward_walks_along_yaw() {
        let config = CameraConfig::default();
        let camera = Camera::new(0.0, 0.0, &config);
        let input = InputSnapshot {
            forward: true,
            ..InputSnapshot::default()
        };
        let next = camera.step(&input, &config);
        assert!((next.x - 8.0).abs() < EPS);
        assert!(next.z.abs() < EPS);

        let sprint = camera.step(&InputSnapshot { sprint: true, ..input }, &config);
        assert!((sprint.x - 16.0).abs() < EPS);
    }

    #[test]
    fn test_strafe_is_slower() {
        let config = CameraConfig::default();
        let camera = Camera::new(0.0, 0.0, &config);
        let left = camera.step(
            &InputSnapshot {
                left: true,
                ..InputSnapshot::default()
            },
            &config,
        );
        assert!(left.x.abs() < EPS);
        assert!((left.z - 6.4).abs() < EPS);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let config = CameraConfig::default();
        let camera = Camera::new(5.0, 5.0, &config);
        let input = InputSnapshot {
            forward: true,
            backward: true,
            left: true,
            right: true,
            ..InputSnapshot::default()
        };
        let next = camera.step(&input, &config);
        assert!((next.x - 5.0).abs() < EPS);
        assert!((next.z - 5.0).abs() < EPS);
    }

    #[test]
    fn test_look_requires_capture() {
        let config = CameraConfig::default();
        let camera = Camera::new(0.0, 0.0, &config);
        let input = InputSnapshot {
            mouse_dx: 100.0,
            mouse_dy: 50.0,
            ..InputSnapshot::default()
        };
        let free = camera.step(&input, &config);
        assert!(free.yaw.abs() < EPS);
        assert!(free.pitch.abs() < EPS);

        let looked = captured().step(&input, &config);
        assert!((looked.yaw - 0.3).abs() < EPS);
        assert!((looked.pitch + 0.15).abs() < EPS);
    }

    #[test]
    fn test_invert_y_flips_pitch() {
        let config = CameraConfig::default();
        let input = InputSnapshot {
            mouse_dy: 50.0,
            invert_y: true,
            ..InputSnapshot::default()
        };
        let looked = captured().step(&input, &config);
        assert!((looked.pitch - 0.15).abs() < EPS);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let config = CameraConfig::default();
        let input = InputSnapshot {
            mouse_dy: -1.0e6,
            ..InputSnapshot::default()
        };
        let looked = captured().step(&input, &config);
        assert!((looked.pitch - config.pitch_limit).abs() < EPS);
    }

    #[test]
    fn test_pointer_lock_transitions() {
        let capture = InputSnapshot {
            capture_requested: true,
            ..InputSnapshot::default()
        };
        let release = InputSnapshot {
            release_requested: true,
            ..InputSnapshot::default()
        };
        let both = InputSnapshot {
            capture_requested: true,
            release_requested: true,
            ..InputSnapshot::default()
        };

        assert_eq!(PointerLock::Free.update(&capture), PointerLock::Captured);
        assert_eq!(PointerLock::Captured.update(&release), PointerLock::Free);
        assert_eq!(PointerLock::Captured.update(&InputSnapshot::default()), PointerLock::Captured);
        assert_eq!(PointerLock::Captured.update(&both), PointerLock::Free);
    }

    #[test]
    fn test_look_target_is_unit_distance() {
        let mut camera = captured();
        camera.yaw = 1.1;
        camera.pitch = -0.4;
        let (tx, ty, tz) = camera.look_target();
        let d = ((tx - camera.x).powi(2) + (ty - camera.y).powi(2) + (tz - camera.z).powi(2)).sqrt();
        assert!((d - 1.0).abs() < EPS);
    }

    #[test]
    fn test_validate_rejects_bad_pitch_limit() {
        let config = CameraConfig {
            pitch_limit: 2.0,
            ..CameraConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::InvalidCamera { .. })));
        assert!(CameraConfig::default().validate().is_ok());
    }
}
