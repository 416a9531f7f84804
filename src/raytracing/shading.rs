use super::core::Scene;
use super::light::LightSource;
use super::math::{Ray, Vec3, EPSILON};

/// Local reflectance model used for the specular highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShadingModel {
    #[default]
    Phong,
    BlinnPhong,
}

impl ShadingModel {
    /// Specular weight for a light along `to_light`, where `reflected` is the
    /// incoming `direction` mirrored about `normal`. Negative bases count as 0.
    pub fn specular(
        &self,
        normal: Vec3,
        direction: Vec3,
        to_light: Vec3,
        reflected: Vec3,
        shininess: f64,
    ) -> f64 {
        let base = match self {
            ShadingModel::Phong => to_light.dot(reflected),
            ShadingModel::BlinnPhong => {
                let halfway = (to_light - direction).normalize();
                halfway.dot(normal)
            }
        };
        base.max(0.0).powf(shininess)
    }
}

/// Color seen along `ray`, following mirror and transmitted bounces until
/// `max_depth` runs out. The result is not clamped.
pub fn ray_trace(ray: &Ray, scene: &Scene, max_depth: i32, model: ShadingModel) -> Vec3 {
    if max_depth <= 0 {
        return Vec3::zero();
    }
    let Some(hit) = ray.nearest_intersected_object(&scene.objects) else {
        return Vec3::zero();
    };
    let surface = hit.surface;
    let material = surface.material();

    let point = ray.at(hit.t);
    let mut normal = surface.normal(point);
    // the normal always faces the side the ray arrives from
    if normal.dot(ray.direction) > 0.0 {
        normal = -normal;
    }
    let shading_point = point + normal * EPSILON;
    let reflected = ray.direction.reflect(normal);

    let mut color = scene.ambient * material.ambient;
    for light in &scene.lights {
        let light_ray = light.light_ray(shading_point);
        if let Some(occluder) = light_ray.nearest_intersected_object(&scene.objects) {
            if occluder.t < light.distance_from_light(shading_point) {
                continue;
            }
        }
        let to_light = light_ray.direction;
        let diffuse = to_light.dot(normal);
        if diffuse <= 0.0 {
            continue;
        }
        let specular = model.specular(
            normal,
            ray.direction,
            to_light,
            reflected,
            material.shininess,
        );
        color += light.intensity(point)
            * (material.diffuse * diffuse + material.specular * specular);
    }

    if material.reflection > 0.0 {
        let bounce = Ray::in_medium(shading_point, reflected, ray.refraction_index);
        color += ray_trace(&bounce, scene, max_depth - 1, model) * material.reflection;
    }
    if material.refraction > 0.0 {
        let transmitted = ray.refract(material, point, normal);
        color += ray_trace(&transmitted, scene, max_depth - 1, model) * material.refraction;
    }
    color
}
