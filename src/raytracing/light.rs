use super::math::{Ray, Vec3};

pub trait LightSource {
    /// Ray leaving `point` towards the light.
    fn light_ray(&self, point: Vec3) -> Ray;

    fn distance_from_light(&self, point: Vec3) -> f64;

    /// Light color reaching `point`, before any occlusion test.
    fn intensity(&self, point: Vec3) -> Vec3;
}

/// Constant, linear and quadratic falloff coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f64,
    pub linear: f64,
    pub quadratic: f64,
}

impl Attenuation {
    pub const NONE: Attenuation = Attenuation::new(1.0, 0.0, 0.0);

    pub const fn new(constant: f64, linear: f64, quadratic: f64) -> Self {
        Attenuation {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn factor(&self, distance: f64) -> f64 {
        self.constant + self.linear * distance + self.quadratic * distance * distance
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Attenuation::NONE
    }
}

fn ray_towards(point: Vec3, position: Vec3) -> Ray {
    Ray::new(point, position - point)
}

fn attenuated(intensity: Vec3, attenuation: &Attenuation, distance: f64) -> Vec3 {
    intensity / attenuation.factor(distance)
}

/// Light coming from infinitely far away along `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    intensity: Vec3,
    direction: Vec3,
}

impl DirectionalLight {
    /// `direction` is where the light travels to, not where it comes from.
    pub fn new(intensity: Vec3, direction: Vec3) -> Self {
        DirectionalLight {
            intensity,
            direction: direction.normalize(),
        }
    }
}

impl LightSource for DirectionalLight {
    fn light_ray(&self, point: Vec3) -> Ray {
        Ray::new(point, -self.direction)
    }

    fn distance_from_light(&self, _point: Vec3) -> f64 {
        f64::INFINITY
    }

    fn intensity(&self, _point: Vec3) -> Vec3 {
        self.intensity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    intensity: Vec3,
    position: Vec3,
    attenuation: Attenuation,
}

impl PointLight {
    pub fn new(intensity: Vec3, position: Vec3, attenuation: Attenuation) -> Self {
        PointLight {
            intensity,
            position,
            attenuation,
        }
    }
}

impl LightSource for PointLight {
    fn light_ray(&self, point: Vec3) -> Ray {
        ray_towards(point, self.position)
    }

    fn distance_from_light(&self, point: Vec3) -> f64 {
        point.distance(self.position)
    }

    fn intensity(&self, point: Vec3) -> Vec3 {
        attenuated(
            self.intensity,
            &self.attenuation,
            self.distance_from_light(point),
        )
    }
}

/// Point light whose intensity falls off with the cosine to the cone axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    intensity: Vec3,
    position: Vec3,
    direction: Vec3,
    attenuation: Attenuation,
}

impl SpotLight {
    pub fn new(intensity: Vec3, position: Vec3, direction: Vec3, attenuation: Attenuation) -> Self {
        SpotLight {
            intensity,
            position,
            direction: direction.normalize(),
            attenuation,
        }
    }
}

impl LightSource for SpotLight {
    fn light_ray(&self, point: Vec3) -> Ray {
        ray_towards(point, self.position)
    }

    fn distance_from_light(&self, point: Vec3) -> f64 {
        point.distance(self.position)
    }

    fn intensity(&self, point: Vec3) -> Vec3 {
        let cos = (point - self.position).normalize().dot(self.direction);
        // points behind the cone receive nothing
        if !(cos > 0.0) {
            return Vec3::zero();
        }
        attenuated(
            self.intensity,
            &self.attenuation,
            self.distance_from_light(point),
        ) * cos
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

impl LightSource for Light {
    fn light_ray(&self, point: Vec3) -> Ray {
        match self {
            Light::Directional(light) => light.light_ray(point),
            Light::Point(light) => light.light_ray(point),
            Light::Spot(light) => light.light_ray(point),
        }
    }

    fn distance_from_light(&self, point: Vec3) -> f64 {
        match self {
            Light::Directional(light) => light.distance_from_light(point),
            Light::Point(light) => light.distance_from_light(point),
            Light::Spot(light) => light.distance_from_light(point),
        }
    }

    fn intensity(&self, point: Vec3) -> Vec3 {
        match self {
            Light::Directional(light) => light.intensity(point),
            Light::Point(light) => light.intensity(point),
            Light::Spot(light) => light.intensity(point),
        }
    }
}

impl From<DirectionalLight> for Light {
    fn from(value: DirectionalLight) -> Self {
        Light::Directional(value)
    }
}

impl From<PointLight> for Light {
    fn from(value: PointLight) -> Self {
        Light::Point(value)
    }
}

impl From<SpotLight> for Light {
    fn from(value: SpotLight) -> Self {
        Light::Spot(value)
    }
}
