//! Sphere primitives, static and time-interpolated.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let rvec = Vec3::splat(radius.abs());
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }
}

/// Get the UV coordinates for a point on the unit sphere.
///
/// theta: angle down from +Y; phi: angle around Y axis from +X.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

/// Quadratic hit test against a sphere at `center`, shared by the static
/// and moving variants. Returns the nearest root in range.
fn sphere_hit_root(ray: &Ray, center: Vec3, radius: f32, ray_t: Interval) -> Option<f32> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    Some(root)
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(root) = sphere_hit_root(ray, self.center, self.radius, ray_t) else {
            return false;
        };

        rec.t = root;
        rec.p = ray.at(root);
        rec.normal = (rec.p - self.center) / self.radius;
        (rec.u, rec.v) = sphere_uv(rec.normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`, evaluated at each ray's time.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        // Conservative bounds: union of the endpoint boxes covers the
        // whole linear sweep.
        let rvec = Vec3::splat(radius.abs());
        let bbox = Aabb::surrounding(
            &Aabb::from_points(center0 - rvec, center0 + rvec),
            &Aabb::from_points(center1 - rvec, center1 + rvec),
        );

        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
            bbox,
        }
    }

    /// Center position at a given time, linearly interpolated.
    fn center(&self, time: f32) -> Vec3 {
        self.center0
            + ((time - self.time0) / (self.time1 - self.time0)) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let center = self.center(ray.time());
        let Some(root) = sphere_hit_root(ray, center, self.radius, ray_t) else {
            return false;
        };

        rec.t = root;
        rec.p = ray.at(root);
        rec.normal = (rec.p - center) / self.radius;
        (rec.u, rec.v) = sphere_uv(rec.normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::Vec3;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::solid(Vec3::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit_nearest_root() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        // Front surface at z = -0.5, not the back one at z = -1.5.
        assert!((rec.t - 0.5).abs() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_sphere_both_roots_visible() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        // Restricting the interval past the first root exposes the second.
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(1.0, f32::INFINITY), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_surface_ray_outward_never_rehits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Start on the surface, aim along the outward normal.
        let surface = Vec3::new(0.0, 0.0, -0.5);
        let normal = Vec3::Z;
        let ray = Ray::new(surface, normal, 0.0);

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);

        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = MovingSphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            0.0,
            1.0,
            0.25,
            gray(),
        );

        // At t=0 the sphere is on the z axis.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // At t=1 it has moved up a full unit and the same ray misses.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0);
        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // An upward-offset ray at t=1 hits it instead.
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_moving_sphere_bbox_covers_sweep() {
        let sphere = MovingSphere::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            0.0,
            1.0,
            0.5,
            gray(),
        );

        let bbox = sphere.bounding_box();
        assert!(bbox.x.min <= -1.5);
        assert!(bbox.x.max >= 1.5);
        assert!(bbox.y.min <= -0.5);
        assert!(bbox.y.max >= 0.5);
    }

    #[test]
    fn test_sphere_uv_poles_and_equator() {
        // +X on the equator maps to u = 0.5.
        let (u, v) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        // North pole maps to v = 1.
        let (_, v) = sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);
    }
}
