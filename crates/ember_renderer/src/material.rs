//! Material trait for surface scattering and emission.

use std::sync::Arc;

use crate::{
    hittable::HitRecord,
    sampling::{gen_f32, random_in_unit_sphere},
    texture::Texture,
    Ray,
};
use ember_math::Vec3;
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scatter event: the surviving ray and its color weight.
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `Some(ScatterResult)` if the ray scatters, or `None` if the
    /// ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission); only `DiffuseLight`
    /// overrides this.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material with texture-driven albedo.
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo texture.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Create a Lambertian material with a solid albedo color.
    pub fn solid(color: Color) -> Self {
        Self {
            albedo: Arc::new(crate::texture::SolidColor::new(color)),
        }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Scatter towards a random point in the unit sphere around the
        // normal tip (cosine-weighted approximation).
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Only scatter if the fuzzed ray stays in the normal's hemisphere
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let dir = ray_in.direction();
        let d_dot_n = dir.dot(rec.normal);

        // The stored normal keeps the primitive's own orientation, so the
        // sign of d.n says whether we are entering or exiting the medium.
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (-rec.normal, self.ior, self.ior * d_dot_n / dir.length())
        } else {
            (rec.normal, 1.0 / self.ior, -d_dot_n / dir.length())
        };

        let refracted = refract(dir, outward_normal, ni_over_nt);
        let reflect_prob = match refracted {
            Some(_) => schlick(cosine, self.ior),
            // Total internal reflection
            None => 1.0,
        };

        let direction = if gen_f32(rng) < reflect_prob {
            reflect(dir, rec.normal)
        } else {
            // Probability is 1.0 whenever refraction failed, so this
            // branch always has a refracted direction.
            refracted.unwrap_or_else(|| reflect(dir, rec.normal))
        };

        Some(ScatterResult {
            // Glass absorbs nothing
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter. Absorbs every incoming ray.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission texture.
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    /// Create a diffuse light with a solid emission color.
    pub fn solid(color: Color) -> Self {
        Self {
            emit: Arc::new(crate::texture::SolidColor::new(color)),
        }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Isotropic phase function for participating media.
///
/// Scatters uniformly in all directions, ignoring the (don't-care) normal
/// a medium records at its scattering events.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface, or `None` on total internal
/// reflection.
#[inline]
fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for Fresnel reflectance.
#[inline]
fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record_at(p: Vec3, normal: Vec3) -> HitRecord<'static> {
        HitRecord {
            t: 1.0,
            p,
            normal,
            u: 0.0,
            v: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let mat = Lambertian::solid(Color::new(0.4, 0.5, 0.6));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), 0.0);
        let rec = record_at(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.4, 0.5, 0.6));
        }
    }

    #[test]
    fn test_metal_scatter_stays_in_hemisphere() {
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 0.7);
        let ray = Ray::new(Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, -1.0, 1.0), 0.0);
        let rec = record_at(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            if let Some(result) = mat.scatter(&ray, &rec, &mut rng) {
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::ONE, 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.0);
        let rec = record_at(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(11);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction().normalize() - expected).length() < 1e-5);
    }

    #[test]
    fn test_dielectric_attenuation_is_unit() {
        let mat = Dielectric::new(1.5);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.0), 0.0);
        let rec = record_at(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..200 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            assert!(result.scattered.direction().is_finite());
        }
    }

    #[test]
    fn test_dielectric_grazing_ray_reflects() {
        // Exiting glass at a grazing angle triggers total internal
        // reflection: the outgoing ray must stay on the glass side.
        let mat = Dielectric::new(1.5);
        let ray = Ray::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.1, 0.0).normalize(),
            0.0,
        );
        let rec = record_at(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(5);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert!(result.scattered.direction().y < 0.0);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mat = DiffuseLight::solid(Color::new(4.0, 4.0, 4.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y, 0.0);
        let rec = record_at(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(2);

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(mat.emitted(0.0, 0.0, Vec3::ZERO), Color::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_isotropic_ignores_normal() {
        let mat = Isotropic::new(Arc::new(crate::texture::SolidColor::new(Color::ONE)));
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.5);
        let rec = record_at(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(17);

        // Over many samples the scattered directions cover both hemispheres.
        let mut behind = 0;
        for _ in 0..500 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.scattered.time(), 0.5);
            if result.scattered.direction().dot(rec.normal) < 0.0 {
                behind += 1;
            }
        }
        assert!(behind > 100);
    }
}
