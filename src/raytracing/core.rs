use std::fmt;

use super::light::Light;
use super::math::{Ray, Vec3, AIR_REFRACTION_INDEX};
use super::surface::{Mesh, Plane, Sphere, Triangle};

/// Reflectance coefficients of a surface. Colors are per channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Phong exponent.
    pub shininess: f64,
    /// Fraction of the energy sent to the mirror bounce.
    pub reflection: f64,
    /// Fraction of the energy sent to the transmitted bounce.
    pub refraction: f64,
    pub refraction_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: Vec3::zero(),
            diffuse: Vec3::zero(),
            specular: Vec3::zero(),
            shininess: 0.0,
            reflection: 0.0,
            refraction: 0.0,
            refraction_index: AIR_REFRACTION_INDEX,
        }
    }
}

impl Material {
    pub fn new(
        ambient: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        shininess: f64,
        reflection: f64,
    ) -> Self {
        Material {
            ambient,
            diffuse,
            specular,
            shininess,
            reflection,
            ..Material::default()
        }
    }

    pub fn with_refraction(self, refraction: f64, refraction_index: f64) -> Self {
        Material {
            refraction,
            refraction_index,
            ..self
        }
    }
}

/// Something a ray can hit.
pub trait Surface {
    /// Distance along the ray to the first intersection and the surface that
    /// was actually hit, which for composite surfaces is one of their parts.
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>>;

    /// Unit normal at a point lying on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    fn material(&self) -> &Material;
}

#[derive(Clone, Copy)]
pub struct Hit<'a> {
    pub t: f64,
    pub surface: &'a dyn Surface,
}

impl fmt::Debug for Hit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hit")
            .field("t", &self.t)
            .field("material", self.surface.material())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Solid {
    Plane(Plane),
    Triangle(Triangle),
    Sphere(Sphere),
    Mesh(Mesh),
}

impl Surface for Solid {
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        match self {
            Solid::Plane(plane) => plane.intersect(ray),
            Solid::Triangle(triangle) => triangle.intersect(ray),
            Solid::Sphere(sphere) => sphere.intersect(ray),
            Solid::Mesh(mesh) => mesh.intersect(ray),
        }
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Solid::Plane(plane) => plane.normal(point),
            Solid::Triangle(triangle) => triangle.normal(point),
            Solid::Sphere(sphere) => sphere.normal(point),
            Solid::Mesh(mesh) => mesh.normal(point),
        }
    }

    fn material(&self) -> &Material {
        match self {
            Solid::Plane(plane) => plane.material(),
            Solid::Triangle(triangle) => triangle.material(),
            Solid::Sphere(sphere) => sphere.material(),
            Solid::Mesh(mesh) => mesh.material(),
        }
    }
}

impl From<Plane> for Solid {
    fn from(value: Plane) -> Self {
        Solid::Plane(value)
    }
}

impl From<Triangle> for Solid {
    fn from(value: Triangle) -> Self {
        Solid::Triangle(value)
    }
}

impl From<Sphere> for Solid {
    fn from(value: Sphere) -> Self {
        Solid::Sphere(value)
    }
}

impl From<Mesh> for Solid {
    fn from(value: Mesh) -> Self {
        Solid::Mesh(value)
    }
}

/// Immutable description of everything that gets rendered.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<Solid>,
    pub lights: Vec<Light>,
    pub ambient: Vec3,
}

impl Scene {
    pub fn new(ambient: Vec3) -> Self {
        Scene {
            objects: Vec::new(),
            lights: Vec::new(),
            ambient,
        }
    }

    pub fn add_object(&mut self, object: impl Into<Solid>) -> &mut Self {
        self.objects.push(object.into());
        self
    }

    pub fn add_light(&mut self, light: impl Into<Light>) -> &mut Self {
        self.lights.push(light.into());
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.objects
            .iter()
            .map(|object| match object {
                Solid::Triangle(_) => 1,
                Solid::Mesh(mesh) => mesh.triangles().len(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::light::DirectionalLight;

    #[test]
    fn refraction_builder_keeps_other_coefficients() {
        let material = Material::new(Vec3::one(), Vec3::one(), Vec3::zero(), 10.0, 0.5)
            .with_refraction(0.3, 1.33);
        assert_eq!(material.reflection, 0.5);
        assert_eq!(material.shininess, 10.0);
        assert_eq!(material.refraction, 0.3);
        assert_eq!(material.refraction_index, 1.33);
    }

    #[test]
    fn default_material_is_opaque_black() {
        let material = Material::default();
        assert!(material.ambient.is_zero() && material.diffuse.is_zero());
        assert_eq!(material.refraction, 0.0);
        assert_eq!(material.refraction_index, AIR_REFRACTION_INDEX);
    }

    #[test]
    fn solid_delegates_to_its_variant() {
        let material = Material {
            reflection: 0.4,
            ..Material::default()
        };
        let solid =
            Solid::from(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0).with_material(material));
        let hit = solid
            .intersect(&Ray::new(Vec3::zero(), -Vec3::z_axis()))
            .unwrap();
        assert!((hit.t - 1.0).abs() < 1e-9);
        assert_eq!(hit.surface.material().reflection, 0.4);
        assert_eq!(solid.material().reflection, 0.4);
    }

    #[test]
    fn scene_counts_triangles() {
        let mut scene = Scene::new(Vec3::zero());
        scene
            .add_object(Triangle::new(Vec3::zero(), Vec3::x_axis(), Vec3::y_axis()))
            .add_object(Sphere::new(Vec3::zero(), 1.0))
            .add_light(DirectionalLight::new(Vec3::one(), -Vec3::z_axis()));
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.lights.len(), 1);
    }
}
