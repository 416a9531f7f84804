use super::Vec3;

/// Row-major 4x4 affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    value: [f64; 16],
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4 {
            value: [
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn scale(factor: f64) -> Mat4 {
        Mat4 {
            value: [
                factor, 0.0, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, 0.0,
                1.0,
            ],
        }
    }

    pub fn translate(offset: Vec3) -> Mat4 {
        Mat4 {
            value: [
                1.0, 0.0, 0.0, offset.x, 0.0, 1.0, 0.0, offset.y, 0.0, 0.0, 1.0, offset.z, 0.0,
                0.0, 0.0, 1.0,
            ],
        }
    }

    /// Counter-clockwise rotation of `angle` radians around `axis`.
    pub fn rotate(axis: Vec3, angle: f64) -> Mat4 {
        // https://en.wikipedia.org/wiki/Rotation_matrix#Rotation_matrix_from_axis_and_angle
        let u = axis.normalize();
        let c = angle.cos();
        let s = angle.sin();
        let k = 1.0 - c;
        Mat4 {
            value: [
                c + u.x * u.x * k,
                u.x * u.y * k - u.z * s,
                u.x * u.z * k + u.y * s,
                0.0,
                u.y * u.x * k + u.z * s,
                c + u.y * u.y * k,
                u.y * u.z * k - u.x * s,
                0.0,
                u.z * u.x * k - u.y * s,
                u.z * u.y * k + u.x * s,
                c + u.z * u.z * k,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    /// Composes the transforms so that `self` is applied first, then `other`.
    pub fn then(&self, other: &Mat4) -> Mat4 {
        // other * self
        let mut value = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                value[row * 4 + col] = (0..4)
                    .map(|k| other.value[row * 4 + k] * self.value[k * 4 + col])
                    .sum();
            }
        }
        Mat4 { value }
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.value;
        let x = m[0] * v.x + m[1] * v.y + m[2] * v.z + m[3];
        let y = m[4] * v.x + m[5] * v.y + m[6] * v.z + m[7];
        let z = m[8] * v.x + m[9] * v.y + m[10] * v.z + m[11];
        let w = m[12] * v.x + m[13] * v.y + m[14] * v.z + m[15];
        Vec3::new(x / w, y / w, z / w)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::math::vec3::assert_vec_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn_around_z() {
        let m = Mat4::rotate(Vec3::z_axis(), FRAC_PI_2);
        assert_vec_eq(m.apply(Vec3::x_axis()), Vec3::y_axis());
        assert_vec_eq(m.apply(Vec3::y_axis()), -Vec3::x_axis());
    }

    #[test]
    fn rotate_quarter_turn_around_x() {
        let m = Mat4::rotate(Vec3::x_axis(), FRAC_PI_2);
        assert_vec_eq(m.apply(Vec3::y_axis()), Vec3::z_axis());
    }

    #[test]
    fn then_applies_left_transform_first() {
        let m = Mat4::scale(2.0).then(&Mat4::translate(Vec3::new(1.0, 0.0, 0.0)));
        assert_vec_eq(m.apply(Vec3::one()), Vec3::new(3.0, 2.0, 2.0));
        let m = Mat4::translate(Vec3::new(1.0, 0.0, 0.0)).then(&Mat4::scale(2.0));
        assert_vec_eq(m.apply(Vec3::one()), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn identity_leaves_points_untouched() {
        let p = Vec3::new(0.3, -2.0, 7.5);
        assert_vec_eq(Mat4::default().apply(p), p);
    }
}
