//! Procedural and image-backed textures feeding material albedo/emission.

use std::path::Path;
use std::sync::Arc;

use crate::{perlin::Perlin, Color};
use ember_math::Vec3;
use rand::RngCore;
use thiserror::Error;

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Trait for textures sampled by UV coordinates and world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern alternating between two sub-textures.
pub struct Checker {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl Checker {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    /// Checker over two solid colors.
    pub fn solid(even: Color, odd: Color) -> Self {
        Self {
            even: Arc::new(SolidColor::new(even)),
            odd: Arc::new(SolidColor::new(odd)),
        }
    }
}

impl Texture for Checker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like texture driven by turbulent gradient noise.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let marble = 0.5 * (1.0 + (self.scale * p.x + 10.0 * self.noise.turbulence(p, 7)).sin());
        Color::splat(marble)
    }
}

/// Image lookup texture over packed 8-bit RGB pixel data.
pub struct ImageTexture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageTexture {
    /// Wrap already-decoded pixel data (row-major, 3 bytes per pixel).
    pub fn from_bytes(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode an image file into an RGB texture.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let image = image::open(path)?.into_rgb8();
        let (width, height) = image.dimensions();
        Ok(Self::from_bytes(width, height, image.into_raw()))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        // Nearest lookup with clamped indices; v flipped to image rows.
        let i = ((u * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as usize;
        let j = (((1.0 - v) * self.height as f32 - 0.001) as i64).clamp(0, self.height as i64 - 1)
            as usize;

        let idx = 3 * (i + self.width as usize * j);
        Color::new(
            self.data[idx] as f32 / 255.0,
            self.data[idx + 1] as f32 / 255.0,
            self.data[idx + 2] as f32 / 255.0,
        )
    }
}
