use super::core::{Hit, Material, Surface};
use super::error::{Result, SceneError};
use super::math::{Ray, Vec3, EPSILON};

/// Infinite plane through `point`.
#[derive(Debug, Clone)]
pub struct Plane {
    normal: Vec3,
    point: Vec3,
    material: Material,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Plane {
            normal: normal.normalize(),
            point,
            material: Material::default(),
        }
    }

    pub fn with_material(self, material: Material) -> Self {
        Plane { material, ..self }
    }
}

impl Surface for Plane {
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let denominator = ray.direction.dot(self.normal);
        // the ray is parallel to the plane
        if denominator.abs() < EPSILON {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denominator;
        if t <= 0.0 {
            return None;
        }
        Some(Hit { t, surface: self })
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    a: Vec3,
    v_ab: Vec3,
    v_ac: Vec3,
    normal: Vec3,
    material: Material,
}

impl Triangle {
    /// The normal follows the winding `a -> b -> c` (right hand rule).
    /// Zero-area triangles get a NaN normal, see [`Triangle::is_degenerate`].
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let v_ab = b - a;
        let v_ac = c - a;
        Triangle {
            a,
            v_ab,
            v_ac,
            normal: v_ab.cross(v_ac).normalize(),
            material: Material::default(),
        }
    }

    pub fn with_material(self, material: Material) -> Self {
        Triangle { material, ..self }
    }

    pub fn is_degenerate(&self) -> bool {
        self.v_ab.cross(self.v_ac).len() < EPSILON
    }

    fn plane_distance(&self, point: Vec3) -> f64 {
        (point - self.a).dot(self.normal).abs()
    }
}

impl Surface for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        // https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm
        let ray_cross_ac = ray.direction.cross(self.v_ac);
        let determinant = self.v_ab.dot(ray_cross_ac);
        // ray and triangle are parallel if det is close to 0
        if determinant.abs() < EPSILON {
            return None;
        }
        let inverse_determinant = 1.0 / determinant;
        let tvec = ray.origin - self.a;
        let u = tvec.dot(ray_cross_ac) * inverse_determinant;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(self.v_ab);
        let v = ray.direction.dot(qvec) * inverse_determinant;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = self.v_ac.dot(qvec) * inverse_determinant;
        if t <= EPSILON {
            return None;
        }
        Some(Hit { t, surface: self })
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Material,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Sphere {
            center,
            radius,
            material: Material::default(),
        }
    }

    pub fn with_material(self, material: Material) -> Self {
        Sphere { material, ..self }
    }
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let to_center = self.center - ray.origin;
        let t_ca = to_center.dot(ray.direction);
        let radius_squared = self.radius * self.radius;
        let origin_inside = to_center.squared_len() < radius_squared;
        if t_ca < 0.0 && !origin_inside {
            return None;
        }
        let d_squared = to_center.squared_len() - t_ca * t_ca;
        if d_squared > radius_squared {
            return None;
        }
        let t_hc = (radius_squared - d_squared).sqrt();
        // a ray leaving the sphere from the inside exits through the far root
        let t = if origin_inside { t_ca + t_hc } else { t_ca - t_hc };
        Some(Hit { t, surface: self })
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }
}

/// Collection of triangles sharing one material.
///
/// Every triangle holds its own copy of the material, written by
/// [`Mesh::bake_material`] after construction.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    material: Material,
}

impl Mesh {
    /// Builds the triangles from a vertex list and faces given as triplets of
    /// vertex indices. Faces must stay in range and must not be degenerate.
    pub fn new(vertices: &[Vec3], faces: &[[usize; 3]]) -> Result<Mesh> {
        let mut triangles = Vec::with_capacity(faces.len());
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&index| index >= vertices.len()) {
                return Err(SceneError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertices: vertices.len(),
                });
            }
            let [a, b, c] = *indices;
            let triangle = Triangle::new(vertices[a], vertices[b], vertices[c]);
            if triangle.is_degenerate() {
                return Err(SceneError::DegenerateTriangle { face });
            }
            triangles.push(triangle);
        }
        Ok(Mesh {
            triangles,
            material: Material::default(),
        })
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Mesh {
        Mesh {
            triangles,
            material: Material::default(),
        }
    }

    /// Sets the mesh material and bakes it onto every triangle.
    pub fn with_material(mut self, material: Material) -> Self {
        self.set_material(material);
        self.bake_material();
        self
    }

    /// Only changes the mesh-level material; call [`Mesh::bake_material`] to
    /// propagate it to the triangles.
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn bake_material(&mut self) {
        for triangle in &mut self.triangles {
            triangle.material = self.material;
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

impl Surface for Mesh {
    /// The hit surface is the triangle, so shading reads its baked material.
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        ray.nearest_intersected_object(&self.triangles)
    }

    /// Normal of the triangle whose plane passes closest to `point`.
    fn normal(&self, point: Vec3) -> Vec3 {
        self.triangles
            .iter()
            .min_by(|a, b| a.plane_distance(point).total_cmp(&b.plane_distance(point)))
            .map(|triangle| triangle.normal)
            .unwrap_or_else(Vec3::zero)
    }

    fn material(&self) -> &Material {
        &self.material
    }
}
