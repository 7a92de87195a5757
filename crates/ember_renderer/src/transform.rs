//! Spatial-transform and orientation wrappers.
//!
//! Each wrapper exclusively owns its inner object, forming single-owner
//! decorator chains (translate of rotate of box, etc).

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// Negates the inner object's normals, turning outward faces inward.
pub struct FlipNormals {
    inner: Box<dyn Hittable>,
}

impl FlipNormals {
    pub fn new(inner: Box<dyn Hittable>) -> Self {
        Self { inner }
    }
}

impl Hittable for FlipNormals {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if self.inner.hit(ray, ray_t, rec) {
            rec.normal = -rec.normal;
            true
        } else {
            false
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.inner.bounding_box()
    }
}

/// Moves the inner object by an offset without touching its geometry:
/// rays are tested in the inner frame and hit points shifted back out.
pub struct Translate {
    inner: Box<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(inner: Box<dyn Hittable>, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());
        if self.inner.hit(&moved, ray_t, rec) {
            rec.p += self.offset;
            true
        } else {
            false
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.inner.bounding_box().translate(self.offset)
    }
}

/// Rotation about the Y axis, fixed at construction.
pub struct RotateY {
    inner: Box<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(inner: Box<dyn Hittable>, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Rotating a box breaks its axis alignment, so rebuild the bounds
        // from the eight rotated corners.
        let inner_box = inner.bounding_box();
        let corners = [inner_box.min_corner(), inner_box.max_corner()];
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let corner = Vec3::new(corners[i].x, corners[j].y, corners[k].z);
                    let rotated = rotate_y(corner, sin_theta, cos_theta);
                    min = min.min(rotated);
                    max = max.max(rotated);
                }
            }
        }

        Self {
            inner,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }
}

/// Rotate a vector about the Y axis by the angle encoded in (sin, cos).
#[inline]
fn rotate_y(v: Vec3, sin_theta: f32, cos_theta: f32) -> Vec3 {
    Vec3::new(
        cos_theta * v.x + sin_theta * v.z,
        v.y,
        -sin_theta * v.x + cos_theta * v.z,
    )
}

/// The inverse rotation (negated angle).
#[inline]
fn inverse_rotate_y(v: Vec3, sin_theta: f32, cos_theta: f32) -> Vec3 {
    Vec3::new(
        cos_theta * v.x - sin_theta * v.z,
        v.y,
        sin_theta * v.x + cos_theta * v.z,
    )
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Rotate the ray into the inner object's local frame.
        let local = Ray::new(
            inverse_rotate_y(ray.origin(), self.sin_theta, self.cos_theta),
            inverse_rotate_y(ray.direction(), self.sin_theta, self.cos_theta),
            ray.time(),
        );

        if self.inner.hit(&local, ray_t, rec) {
            // Rotate the hit back into world space.
            rec.p = rotate_y(rec.p, self.sin_theta, self.cos_theta);
            rec.normal = rotate_y(rec.normal, self.sin_theta, self.cos_theta);
            true
        } else {
            false
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
