pub mod camera;
pub mod core;
pub mod demo;
pub mod error;
pub mod light;
pub mod math;
pub mod model;
pub mod parser;
pub mod render;
pub mod shading;
pub mod surface;

pub use math::*;
