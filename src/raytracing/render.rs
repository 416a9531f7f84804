use log::debug;
use rayon::prelude::*;

use super::camera::Camera;
use super::core::Scene;
use super::math::Vec3;
use super::shading::{ray_trace, ShadingModel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub max_depth: i32,
    pub shading: ShadingModel,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 640,
            height: 480,
            max_depth: 3,
            shading: ShadingModel::Phong,
        }
    }
}

/// Rendered image, row-major with the top row first. Channels are in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at column `x` of row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }
}

/// `count` evenly spaced values from `start` to `end`, both included.
fn linspace(start: f64, end: f64, count: u32) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Traces one primary ray per pixel and clamps the results.
///
/// The screen spans `[-1, 1]` horizontally and keeps the aspect ratio
/// vertically. Rows are rendered in parallel; every pixel is independent.
pub fn render(camera: &Camera, scene: &Scene, settings: &RenderSettings) -> Frame {
    let RenderSettings {
        width,
        height,
        max_depth,
        shading,
    } = *settings;
    debug!(
        "rendering {} objects ({} triangles) and {} lights",
        scene.objects.len(),
        scene.triangle_count(),
        scene.lights.len()
    );

    let mut pixels = vec![Vec3::zero(); width as usize * height as usize];
    if pixels.is_empty() {
        return Frame {
            width,
            height,
            pixels,
        };
    }

    let ratio = width as f64 / height as f64;
    // left, top, right, bottom
    let screen = (-1.0, 1.0 / ratio, 1.0, -1.0 / ratio);
    let xs = linspace(screen.0, screen.2, width);
    let ys = linspace(screen.1, screen.3, height);

    pixels
        .par_chunks_mut(width as usize)
        .zip(ys.par_iter())
        .for_each(|(row, &y)| {
            for (pixel, &x) in row.iter_mut().zip(xs.iter()) {
                let ray = camera.shoot_to(x, y);
                *pixel = ray_trace(&ray, scene, max_depth, shading).clamp(0.0, 1.0);
            }
        });

    Frame {
        width,
        height,
        pixels,
    }
}
