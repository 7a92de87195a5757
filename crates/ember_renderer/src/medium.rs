//! Constant-density participating medium (fog, smoke).

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    material::Isotropic,
    texture::Texture,
    Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

use crate::sampling::gen_f32;

/// Wraps a boundary shape and scatters rays probabilistically inside it.
///
/// A ray entering the boundary travels an exponentially distributed
/// free-flight distance (mean `1/density`); if that distance fits inside
/// the boundary the ray scatters isotropically there, otherwise it passes
/// through untouched.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Box<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }
}

/// Sample a free-flight distance through a medium from the exponential
/// (Beer-Lambert) distribution with mean `-neg_inv_density`.
///
/// A zero draw maps to an infinite distance, which simply never scatters;
/// no NaN can escape.
pub fn sample_hit_distance(neg_inv_density: f32, rng: &mut dyn RngCore) -> f32 {
    neg_inv_density * gen_f32(rng).ln()
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Entry and exit through the boundary: the second query starts
        // just past the first hit to skip the entry surface.
        let mut rec1 = HitRecord::default();
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1) {
            return false;
        }

        let mut rec2 = HitRecord::default();
        if !self
            .boundary
            .hit(ray, Interval::new(rec1.t + 0.0001, f32::INFINITY), &mut rec2)
        {
            return false;
        }

        // Clamp the inside interval to the caller's range.
        let mut t_enter = rec1.t.max(ray_t.min);
        let t_exit = rec2.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = sample_hit_distance(self.neg_inv_density, &mut rand::thread_rng());

        if hit_distance >= distance_inside {
            // No scattering event; outer geometry gets its chance.
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Scattering events have no preferred orientation; the isotropic
        // phase function ignores this.
        rec.normal = Vec3::X;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase_function;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::sphere::Sphere;
    use crate::texture::SolidColor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn smoke_ball(density: f32) -> ConstantMedium {
        let boundary = Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            2.0,
            Arc::new(Lambertian::solid(Vec3::splat(0.5))),
        ));
        ConstantMedium::new(boundary, density, Arc::new(SolidColor::new(Vec3::ONE)))
    }

    #[test]
    fn test_free_flight_mean_converges() {
        let density = 2.0;
        let neg_inv_density = -1.0 / density;
        let mut rng = StdRng::seed_from_u64(101);

        let n = 100_000;
        let mean: f32 = (0..n)
            .map(|_| sample_hit_distance(neg_inv_density, &mut rng))
            .sum::<f32>()
            / n as f32;

        // Exponential mean is 1/density.
        assert!((mean - 0.5).abs() < 0.02, "mean {} too far from 0.5", mean);
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        // Density high enough that a 4-unit chord practically always
        // scatters.
        let medium = smoke_ball(1000.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let mut rec = HitRecord::default();
        assert!(medium.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        // Scattering point lies inside the boundary chord [3, 7].
        assert!(rec.t >= 3.0 && rec.t <= 7.0, "t = {}", rec.t);
        assert_eq!(rec.normal, Vec3::X);
    }

    #[test]
    fn test_thin_medium_mostly_passes_through() {
        let medium = smoke_ball(1e-6);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let mut scatters = 0;
        for _ in 0..100 {
            let mut rec = HitRecord::default();
            if medium.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec) {
                scatters += 1;
            }
        }
        assert!(scatters < 5);
    }

    #[test]
    fn test_medium_miss_outside_boundary() {
        let medium = smoke_ball(10.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);

        let mut rec = HitRecord::default();
        assert!(!medium.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_medium_respects_clamped_interval() {
        // Caller interval ends before the boundary is reached: no hit.
        let medium = smoke_ball(1000.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let mut rec = HitRecord::default();
        assert!(!medium.hit(&ray, Interval::new(0.001, 2.0), &mut rec));
    }
}
