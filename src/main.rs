use std::error::Error;
use std::fs;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use image::{ImageBuffer, Rgb};
use log::{info, LevelFilter};

mod raytracing;
use raytracing::demo::demo_scene;
use raytracing::parser::{ImageData, SceneParser};
use raytracing::render::{render, Frame, RenderSettings};
use raytracing::shading::ShadingModel;
use raytracing::Vec3;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shading {
    Phong,
    BlinnPhong,
}

impl From<Shading> for ShadingModel {
    fn from(value: Shading) -> Self {
        match value {
            Shading::Phong => ShadingModel::Phong,
            Shading::BlinnPhong => ShadingModel::BlinnPhong,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// the input path to the scene file, the built-in demo scene is rendered when missing
    scene: Option<String>,
    /// the path where is saved the rendered image, the extension selects the format
    #[arg(short, long, default_value = "output.bmp")]
    output: String,
    /// the maximum number of reflection and refraction bounces
    #[arg(short = 'd', long, default_value_t = 3)]
    max_depth: i32,
    /// the local reflectance model
    #[arg(short, long, value_enum, default_value_t = Shading::Phong)]
    shading: Shading,
    /// override the image width of the scene file
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,
    /// override the image height of the scene file
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,
    /// apply gamma correction to the final image
    #[arg(long, default_value = "false")]
    gamma_correction: bool,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn to_rgb(value: Vec3) -> Rgb<u8> {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb([channel(value.x), channel(value.y), channel(value.z)])
}

fn gamma_correction(value: f64) -> f64 {
    if value > 0.0 {
        value.powf(1.0 / 2.2)
    } else {
        0.0
    }
}

fn to_image(frame: &Frame, gamma: bool) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let pixel = frame.pixel(x, y);
        if gamma {
            to_rgb(pixel.map(gamma_correction))
        } else {
            to_rgb(pixel)
        }
    })
}

fn load_scene(path: &str) -> Result<ImageData, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let mut parser = SceneParser::new(&content);
    match parser.parse_scene() {
        Ok(data) => Ok(data),
        Err(parser_error) => {
            parser_error.print_error_location(&content);
            Err(Box::new(parser_error))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let ImageData {
        width,
        height,
        camera,
        scene,
    } = match &args.scene {
        Some(path) => {
            info!("loading scene {}", path);
            load_scene(path)?
        }
        None => {
            info!("no scene file given, rendering the demo scene");
            let (camera, scene) = demo_scene()?;
            let defaults = RenderSettings::default();
            ImageData {
                width: defaults.width,
                height: defaults.height,
                camera,
                scene,
            }
        }
    };

    let settings = RenderSettings {
        width: args.width.unwrap_or(width),
        height: args.height.unwrap_or(height),
        max_depth: args.max_depth,
        shading: args.shading.into(),
    };
    info!(
        "rendering {}x{} with max depth {} and {:?} shading",
        settings.width, settings.height, settings.max_depth, settings.shading
    );
    info!("camera at {:?}", camera.position());

    // measure time
    let start = Instant::now();
    let frame = render(&camera, &scene, &settings);
    info!("rendered in {:?}", start.elapsed());

    to_image(&frame, args.gamma_correction).save(&args.output)?;
    info!("saved {}", args.output);
    Ok(())
}
