//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a fixed depth cap
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{Camera, Color, HitRecord, Hittable, Ray};
use ember_math::Interval;
use rand::RngCore;

/// Lower bound of every hit query, biasing away from self-intersection at
/// the scattering origin.
const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: false,
        }
    }
}

/// Estimate the radiance seen along a ray.
///
/// One-sample path tracing of the rendering equation: emission at the hit
/// plus attenuated radiance along the scattered ray, recursing until no
/// hit, absorption, or depth exhaustion.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Depth cap: terminate with no further contribution. Biased compared
    // to Russian roulette, but bounds both variance and recursion.
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec) {
        // Scenes light themselves; the default background is black.
        if config.use_sky_gradient {
            return sky_gradient(ray);
        }
        return config.background;
    }

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, config, rng);
            emitted + result.attenuation * scattered_color
        }
        // Absorbed: only the emission survives.
        None => emitted,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Render the entire scene to an image buffer, single-threaded.
///
/// Kept for tests and debugging; production rendering goes through the
/// bucketed parallel path in `bucket`.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{DiffuseLight, Lambertian, Metal};
    use crate::sphere::Sphere;
    use crate::{BvhNode, FlipNormals, XyRect};
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_sky_gradient() {
        // Ray pointing up blends towards blue, down towards white.
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y, 0.0));
        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::NEG_Y, 0.0));

        assert!(up.x < down.x, "up {} should be bluer than down {}", up.x, down.x);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-4);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::solid(Vec3::splat(0.5))),
        );
        let config = RenderConfig {
            background: Color::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let color = ray_color(&ray, &world, config.max_depth, &config, &mut rng);
        assert_eq!(color, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_emissive_surface_dominates() {
        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -2.0),
            0.5,
            Arc::new(DiffuseLight::solid(Color::new(4.0, 4.0, 4.0))),
        );
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let color = ray_color(&ray, &world, config.max_depth, &config, &mut rng);
        assert_eq!(color, Color::new(4.0, 4.0, 4.0));
    }

    /// Two parallel perfect mirrors at z = 0 and z = 5, normals facing
    /// each other.
    fn facing_mirrors() -> BvhNode {
        let mirror: Arc<dyn crate::Material> = Arc::new(Metal::new(Color::ONE, 0.0));
        let mut objects: Vec<Box<dyn Hittable>> = Vec::new();
        objects.push(Box::new(XyRect::new(
            -10.0,
            10.0,
            -10.0,
            10.0,
            0.0,
            Arc::clone(&mirror),
        )));
        objects.push(Box::new(FlipNormals::new(Box::new(XyRect::new(
            -10.0, 10.0, -10.0, 10.0, 5.0, mirror,
        )))));
        BvhNode::new(objects).unwrap()
    }

    #[test]
    fn test_facing_mirrors_exhaust_depth_to_black() {
        // A nearly perpendicular ray stays trapped between the mirrors,
        // scattering every bounce; the only way out is the depth cap, which
        // must terminate with a finite zero color (nothing emits).
        let world = facing_mirrors();
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.5), Vec3::new(0.01, 0.0, 1.0), 0.0);
        let color = ray_color(&ray, &world, config.max_depth, &config, &mut rng);

        assert!(color.is_finite());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_mirror_bounces_survive_until_escape() {
        // A 45 degree ray reflects off each mirror once and then leaves
        // past the rectangle edge. With the sky behind it the escaped ray
        // carries light, proving both reflections really scattered; one
        // less bounce of depth and the same path dies at the cap instead.
        let world = facing_mirrors();
        let config = RenderConfig {
            use_sky_gradient: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.5), Vec3::new(1.0, 0.0, 1.0), 0.0);

        let escaped = ray_color(&ray, &world, 3, &config, &mut rng);
        assert!(escaped.length() > 0.0);

        let capped = ray_color(&ray, &world, 2, &config, &mut rng);
        assert_eq!(capped, Color::ZERO);
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::solid(Vec3::splat(0.9))),
        );
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert_eq!(ray_color(&ray, &world, 0, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let world = BvhNode::new(vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::solid(Vec3::splat(0.5))),
        )) as Box<dyn Hittable>])
        .unwrap();

        let mut camera = Camera::new().with_resolution(10, 10);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            background: Color::new(0.5, 0.7, 1.0),
            use_sky_gradient: false,
        };

        let mut rng = StdRng::seed_from_u64(42);
        let color = render_pixel(&camera, &world, 5, 5, &config, &mut rng);

        // The center pixel sees the sphere, so it is darker than the
        // background but not black (it still catches background light).
        assert!(color.length() > 0.0);
        assert!(color != config.background);
    }

    #[test]
    fn test_image_buffer_roundtrip() {
        let mut image = ImageBuffer::new(4, 2);
        image.set(3, 1, Color::ONE);
        assert_eq!(image.get(3, 1), Color::ONE);

        let rgba = image.to_rgba();
        assert_eq!(rgba.len(), 4 * 2 * 4);
        assert_eq!(&rgba[(1 * 4 + 3) * 4..], &[255, 255, 255, 255]);
    }
}
