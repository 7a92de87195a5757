//! Axis-aligned rectangles, one per coordinate plane.
//!
//! Each rectangle lives in the plane where its fixed axis equals `k` and
//! reports that axis's unit vector as the normal; interior-facing walls are
//! oriented with `FlipNormals`.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// Rectangle in the z = k plane spanning [x0, x1] x [y0, y1].
pub struct XyRect {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl XyRect {
    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self {
            x0,
            x1,
            y0,
            y1,
            k,
            material,
        }
    }
}

impl Hittable for XyRect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Rays parallel to the plane give t = +-inf here, which the
        // interval check rejects.
        let t = (self.k - ray.origin.z) / ray.direction.z;
        if !ray_t.surrounds(t) {
            return false;
        }

        let x = ray.origin.x + t * ray.direction.x;
        let y = ray.origin.y + t * ray.direction.y;
        if x < self.x0 || x > self.x1 || y < self.y0 || y > self.y1 {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.normal = Vec3::Z;
        rec.u = (x - self.x0) / (self.x1 - self.x0);
        rec.v = (y - self.y0) / (self.y1 - self.y0);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        // Aabb padding gives the flat axis its sliver of thickness.
        Aabb::from_points(
            Vec3::new(self.x0, self.y0, self.k),
            Vec3::new(self.x1, self.y1, self.k),
        )
    }
}

/// Rectangle in the y = k plane spanning [x0, x1] x [z0, z1].
pub struct XzRect {
    x0: f32,
    x1: f32,
    z0: f32,
    z1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl XzRect {
    pub fn new(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self {
            x0,
            x1,
            z0,
            z1,
            k,
            material,
        }
    }
}

impl Hittable for XzRect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let t = (self.k - ray.origin.y) / ray.direction.y;
        if !ray_t.surrounds(t) {
            return false;
        }

        let x = ray.origin.x + t * ray.direction.x;
        let z = ray.origin.z + t * ray.direction.z;
        if x < self.x0 || x > self.x1 || z < self.z0 || z > self.z1 {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.normal = Vec3::Y;
        rec.u = (x - self.x0) / (self.x1 - self.x0);
        rec.v = (z - self.z0) / (self.z1 - self.z0);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(
            Vec3::new(self.x0, self.k, self.z0),
            Vec3::new(self.x1, self.k, self.z1),
        )
    }
}

/// Rectangle in the x = k plane spanning [y0, y1] x [z0, z1].
pub struct YzRect {
    y0: f32,
    y1: f32,
    z0: f32,
    z1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl YzRect {
    pub fn new(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self {
            y0,
            y1,
            z0,
            z1,
            k,
            material,
        }
    }
}

impl Hittable for YzRect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let t = (self.k - ray.origin.x) / ray.direction.x;
        if !ray_t.surrounds(t) {
            return false;
        }

        let y = ray.origin.y + t * ray.direction.y;
        let z = ray.origin.z + t * ray.direction.z;
        if y < self.y0 || y > self.y1 || z < self.z0 || z > self.z1 {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.normal = Vec3::X;
        rec.u = (y - self.y0) / (self.y1 - self.y0);
        rec.v = (z - self.z0) / (self.z1 - self.z0);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(
            Vec3::new(self.k, self.y0, self.z0),
            Vec3::new(self.k, self.y1, self.z1),
        )
    }
}
