//! Axis-aligned box assembled from six rectangles.

use std::sync::Arc;

use crate::{
    aa_rect::{XyRect, XzRect, YzRect},
    hittable::{HitRecord, Hittable, HittableList},
    transform::FlipNormals,
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};

/// Axis-aligned box between two corner points, one material on all faces.
pub struct Cuboid {
    p_min: Vec3,
    p_max: Vec3,
    faces: HittableList,
}

impl Cuboid {
    pub fn new(p_min: Vec3, p_max: Vec3, material: Arc<dyn Material>) -> Self {
        let mut faces = HittableList::new();

        faces.add(Box::new(XyRect::new(
            p_min.x,
            p_max.x,
            p_min.y,
            p_max.y,
            p_max.z,
            Arc::clone(&material),
        )));
        faces.add(Box::new(FlipNormals::new(Box::new(XyRect::new(
            p_min.x,
            p_max.x,
            p_min.y,
            p_max.y,
            p_min.z,
            Arc::clone(&material),
        )))));

        faces.add(Box::new(XzRect::new(
            p_min.x,
            p_max.x,
            p_min.z,
            p_max.z,
            p_max.y,
            Arc::clone(&material),
        )));
        faces.add(Box::new(FlipNormals::new(Box::new(XzRect::new(
            p_min.x,
            p_max.x,
            p_min.z,
            p_max.z,
            p_min.y,
            Arc::clone(&material),
        )))));

        faces.add(Box::new(YzRect::new(
            p_min.y,
            p_max.y,
            p_min.z,
            p_max.z,
            p_max.x,
            Arc::clone(&material),
        )));
        faces.add(Box::new(FlipNormals::new(Box::new(YzRect::new(
            p_min.y,
            p_max.y,
            p_min.z,
            p_max.z,
            p_min.x,
            material,
        )))));

        Self { p_min, p_max, faces }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        self.faces.hit(ray, ray_t, rec)
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.p_min, self.p_max)
    }
}
