//! Ember renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer for physically-based rendering: BVH-
//! accelerated geometry, textured materials, participating media, and
//! bucketed parallel rendering on rayon.

pub mod aa_rect;
pub mod bucket;
pub mod bvh;
pub mod camera;
pub mod cuboid;
pub mod hittable;
pub mod material;
pub mod medium;
pub mod perlin;
pub mod renderer;
pub mod sampling;
pub mod scenes;
pub mod sphere;
pub mod texture;
pub mod transform;

pub use aa_rect::{XyRect, XzRect, YzRect};
pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::{BvhError, BvhNode};
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use renderer::{
    color_to_rgba, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer, RenderConfig,
};
pub use scenes::Scene;
pub use sphere::{MovingSphere, Sphere};
pub use texture::{Checker, ImageTexture, NoiseTexture, SolidColor, Texture, TextureError};
pub use transform::{FlipNormals, RotateY, Translate};

/// Re-export the math types used throughout the public API.
pub use ember_math::{Aabb, Interval, Ray, Vec3};
