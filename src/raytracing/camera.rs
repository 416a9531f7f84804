use super::math::{Ray, Vec3};

/// Pinhole camera looking down the negative z axis through an axis aligned
/// virtual screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    screen_z: f64,
}

impl Camera {
    /// The screen is the `z = 0` plane, unless the camera is closer than one
    /// unit to it, in which case it is moved to one unit in front of the camera.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            screen_z: (position.z - 1.0).min(0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[cfg(test)]
    pub fn screen_z(&self) -> f64 {
        self.screen_z
    }

    /// Create a primary ray from the camera position through the screen point `(x, y)`.
    pub fn shoot_to(&self, x: f64, y: f64) -> Ray {
        let pixel = Vec3::new(x, y, self.screen_z);
        Ray::new(self.position, pixel - self.position)
    }
}

impl Default for Camera {
    /// Camera at `(0, 0, 1)`, one unit behind the screen.
    fn default() -> Self {
        Self::new(Vec3::z_axis())
    }
}
