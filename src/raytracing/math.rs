pub mod mat4;
pub mod ray;
pub mod vec3;

pub use mat4::*;
pub use ray::*;
pub use vec3::*;

/// Tolerance shared by the intersection tests and the shading point offset.
pub const EPSILON: f64 = 1e-5;
