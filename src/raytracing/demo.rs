use super::camera::Camera;
use super::core::{Material, Scene};
use super::error::Result;
use super::light::{Attenuation, DirectionalLight, PointLight};
use super::math::{Mat4, Vec3};
use super::surface::{Mesh, Plane, Sphere};

fn rotate_z(point: Vec3, degrees: f64) -> Vec3 {
    Mat4::rotate(Vec3::z_axis(), degrees.to_radians()).apply(point)
}

/// Five-pointed star fan around the origin, in the `z = 0` plane apart from
/// the inner vertices which are pushed back.
fn star() -> Result<Mesh> {
    let inner = Vec3::new(0.2, 0.175, -0.5);
    let outer = Vec3::new(0.0, 0.6, 0.0);
    let vertices = vec![
        Vec3::zero(),
        inner,
        outer,
        rotate_z(inner, -72.0),
        rotate_z(outer, 72.0),
        rotate_z(inner, 72.0),
        rotate_z(outer, 144.0),
        rotate_z(inner, 144.0),
        rotate_z(outer, -72.0),
        rotate_z(inner, -144.0),
        rotate_z(outer, -144.0),
    ];
    let faces = [
        [0, 1, 2],
        [0, 1, 4],
        [0, 4, 5],
        [0, 5, 6],
        [0, 6, 7],
        [0, 2, 3],
        [0, 3, 8],
        [0, 8, 9],
        [0, 9, 10],
        [0, 10, 7],
    ];
    let material = Material::new(
        Vec3::new(1.0, 1.0, 0.22),
        Vec3::new(1.0, 1.0, 0.21),
        Vec3::one(),
        10.0,
        0.5,
    );
    Ok(Mesh::new(&vertices, &faces)?.with_material(material))
}

/// Star mesh circled by glass beads, over a mirror-like floor.
pub fn demo_scene() -> Result<(Camera, Scene)> {
    let mut scene = Scene::new(Vec3::new(0.1, 0.2, 0.3));

    scene.add_object(star()?);

    let bead = Material::new(
        Vec3::new(0.93, 1.0, 0.54),
        Vec3::new(0.93, 1.0, 0.54),
        Vec3::new(0.3, 0.3, 0.3),
        100.0,
        0.3,
    )
    .with_refraction(0.5, 1.333);
    for i in 0..5 {
        let center = rotate_z(Vec3::new(0.0, 0.6, 0.0), i as f64 * 72.0);
        scene.add_object(Sphere::new(center, 0.1).with_material(bead));
    }

    let floor = Material::new(
        Vec3::new(0.2, 0.2, 0.2),
        Vec3::new(0.2, 0.2, 0.2),
        Vec3::one(),
        1000.0,
        0.5,
    );
    scene.add_object(Plane::new(Vec3::y_axis(), Vec3::new(0.0, -1.0, 0.0)).with_material(floor));

    let background = Material::new(
        Vec3::new(0.4, 1.0, 0.9),
        Vec3::new(0.5, 1.0, 1.0),
        Vec3::zero(),
        1000.0,
        0.5,
    );
    scene.add_object(
        Plane::new(Vec3::z_axis(), Vec3::new(0.0, 0.0, -10.0)).with_material(background),
    );

    scene
        .add_light(PointLight::new(
            Vec3::one(),
            Vec3::new(0.6, 0.5, -5.0),
            Attenuation::new(0.1, 0.1, 0.1),
        ))
        .add_light(DirectionalLight::new(
            Vec3::new(0.8, 0.8, 0.8),
            Vec3::new(-1.0, -1.0, -1.0),
        ));

    Ok((Camera::default(), scene))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::light::LightSource;
    use crate::raytracing::math::vec3::assert_vec_eq;
    use crate::raytracing::render::{render, RenderSettings};

    #[test]
    fn demo_scene_builds() {
        let (camera, scene) = demo_scene().unwrap();
        assert_eq!(camera, Camera::default());
        assert_eq!(scene.objects.len(), 8);
        assert_eq!(scene.triangle_count(), 10);
        assert_eq!(scene.lights.len(), 2);
    }

    #[test]
    fn sun_shines_from_upper_right_front() {
        let (_, scene) = demo_scene().unwrap();
        let sun = &scene.lights[1];
        assert_eq!(sun.distance_from_light(Vec3::zero()), f64::INFINITY);
        assert_vec_eq(
            sun.light_ray(Vec3::zero()).direction,
            Vec3::new(1.0, 1.0, 1.0).normalize(),
        );
    }

    #[test]
    fn demo_scene_renders_something() {
        let (camera, scene) = demo_scene().unwrap();
        let settings = RenderSettings {
            width: 16,
            height: 12,
            max_depth: 3,
            ..RenderSettings::default()
        };
        let frame = render(&camera, &scene, &settings);
        assert!(frame.pixels().iter().any(|p| !p.is_zero()));
    }
}
