use super::{Vec3, EPSILON};
use crate::raytracing::core::{Hit, Material, Surface};

/// Refractive index of the medium surrounding every object.
pub const AIR_REFRACTION_INDEX: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Always unit length.
    pub direction: Vec3,
    /// Refractive index of the medium the ray currently travels through.
    pub refraction_index: f64,
}

impl Ray {
    /// Creates a ray travelling through air, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::in_medium(origin, direction, AIR_REFRACTION_INDEX)
    }

    pub fn in_medium(origin: Vec3, direction: Vec3, refraction_index: f64) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
            refraction_index,
        }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Scans all the surfaces and returns the closest hit in front of the origin.
    /// Hits at `t <= EPSILON` are discarded, and on equal distances the surface
    /// that comes first in the slice wins.
    pub fn nearest_intersected_object<'a, S: Surface>(&self, surfaces: &'a [S]) -> Option<Hit<'a>> {
        let mut nearest: Option<Hit<'a>> = None;
        for surface in surfaces {
            let Some(hit) = surface.intersect(self) else {
                continue;
            };
            // also rejects NaN distances
            if !(hit.t > EPSILON) {
                continue;
            }
            if nearest.as_ref().map_or(true, |closest| hit.t < closest.t) {
                nearest = Some(hit);
            }
        }
        nearest
    }

    /// Builds the ray transmitted through a surface hit at `point`, where
    /// `normal` faces the incoming ray.
    ///
    /// The new medium is the material's index when the ray arrives from
    /// air, and air when it is already travelling inside the material.
    /// On total internal reflection the mirrored ray is returned instead.
    pub fn refract(&self, material: &Material, point: Vec3, normal: Vec3) -> Ray {
        let n1 = self.refraction_index;
        let n2 = if (n1 - material.refraction_index).abs() < EPSILON {
            AIR_REFRACTION_INDEX
        } else {
            material.refraction_index
        };
        let eta = n1 / n2;
        let cos_incident = -normal.dot(self.direction);
        let sin_transmitted = eta * (1.0 - cos_incident * cos_incident).max(0.0).sqrt();
        if sin_transmitted > 1.0 {
            return Ray::in_medium(
                point + normal * EPSILON,
                self.direction.reflect(normal),
                n1,
            );
        }
        let cos_transmitted = (1.0 - sin_transmitted * sin_transmitted).sqrt();
        let direction =
            self.direction * eta + normal * (eta * cos_incident - cos_transmitted);
        Ray::in_medium(point - normal * EPSILON, direction, n2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::core::Solid;
    use crate::raytracing::math::vec3::assert_vec_eq;
    use crate::raytracing::surface::{Plane, Sphere};

    fn glass() -> Material {
        Material::default().with_refraction(1.0, 1.5)
    }

    #[test]
    fn new_normalizes_direction() {
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.len() - 1.0).abs() < 1e-12);
        assert_eq!(ray.refraction_index, AIR_REFRACTION_INDEX);
    }

    #[test]
    fn nearest_picks_closest_surface() {
        let surfaces = vec![
            Solid::from(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)),
            Solid::from(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0)),
        ];
        let ray = Ray::new(Vec3::zero(), -Vec3::z_axis());
        let hit = ray.nearest_intersected_object(&surfaces).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_tie_goes_to_first_surface() {
        let first = Material {
            reflection: 0.25,
            ..Material::default()
        };
        let second = Material {
            reflection: 0.75,
            ..Material::default()
        };
        let center = Vec3::new(0.0, 0.0, -3.0);
        let surfaces = vec![
            Solid::from(Sphere::new(center, 1.0).with_material(first)),
            Solid::from(Sphere::new(center, 1.0).with_material(second)),
        ];
        let ray = Ray::new(Vec3::zero(), -Vec3::z_axis());
        let hit = ray.nearest_intersected_object(&surfaces).unwrap();
        assert_eq!(hit.surface.material().reflection, 0.25);
    }

    #[test]
    fn nearest_returns_none_on_empty_scene() {
        let surfaces: Vec<Solid> = Vec::new();
        let ray = Ray::new(Vec3::zero(), Vec3::x_axis());
        assert!(ray.nearest_intersected_object(&surfaces).is_none());
    }

    #[test]
    fn nearest_ignores_surface_at_origin() {
        // a plane passing through the origin of the ray must not count as a hit
        let surfaces = vec![Solid::from(Plane::new(Vec3::y_axis(), Vec3::zero()))];
        let ray = Ray::new(Vec3::new(0.0, 1e-7, 0.0), -Vec3::y_axis());
        assert!(ray.nearest_intersected_object(&surfaces).is_none());
    }

    #[test]
    fn refract_along_normal_keeps_direction() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::y_axis());
        let refracted = ray.refract(&glass(), Vec3::zero(), Vec3::y_axis());
        assert_vec_eq(refracted.direction, -Vec3::y_axis());
        assert_eq!(refracted.refraction_index, 1.5);
        // starts just below the surface
        assert!(refracted.origin.y < 0.0);
    }

    #[test]
    fn refract_bends_towards_normal_entering_denser_medium() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), incoming);
        let refracted = ray.refract(&glass(), Vec3::zero(), Vec3::y_axis());
        let sin_incident = incoming.x;
        let sin_transmitted = refracted.direction.x;
        assert!((sin_incident - 1.5 * sin_transmitted).abs() < 1e-9);
        assert!(refracted.direction.y < 0.0);
    }

    #[test]
    fn refract_leaving_medium_returns_to_air() {
        let ray = Ray::in_medium(Vec3::new(0.0, 1.0, 0.0), -Vec3::y_axis(), 1.5);
        let refracted = ray.refract(&glass(), Vec3::zero(), Vec3::y_axis());
        assert_eq!(refracted.refraction_index, AIR_REFRACTION_INDEX);
    }

    #[test]
    fn total_internal_reflection_falls_back_to_mirror_ray() {
        // 60 degrees inside glass is past the critical angle (~41.8 degrees)
        let incoming = Vec3::new(60f64.to_radians().sin(), -60f64.to_radians().cos(), 0.0);
        let ray = Ray::in_medium(Vec3::new(-1.0, 1.0, 0.0), incoming, 1.5);
        let refracted = ray.refract(&glass(), Vec3::zero(), Vec3::y_axis());
        assert_vec_eq(refracted.direction, incoming.reflect(Vec3::y_axis()));
        assert_eq!(refracted.refraction_index, 1.5);
        assert!(refracted.origin.y > 0.0);
    }
}
