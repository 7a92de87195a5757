//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's primitives built once up front; queries
//! prune whole subtrees with the slab test and narrow the search interval
//! to the closest confirmed hit.

use crate::{HitRecord, Hittable, Ray};
use ember_math::{Aabb, Interval};
use thiserror::Error;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// Errors raised while building a BVH.
#[derive(Error, Debug)]
pub enum BvhError {
    #[error("cannot build a BVH from an empty object list")]
    EmptyScene,
}

/// BVH node - either a branch with two children or a small leaf.
///
/// Using an enum keeps traversal free of dynamic dispatch at the tree
/// level; only leaves touch trait objects.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with one or two primitives.
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    ///
    /// Every primitive ends up in exactly one leaf; an empty input is a
    /// caller contract violation reported as a recoverable error.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Result<Self, BvhError> {
        if objects.is_empty() {
            return Err(BvhError::EmptyScene);
        }
        Ok(Self::build(objects))
    }

    /// Recursive BVH construction.
    ///
    /// Median split: sort objects by bounding-box centroid along the axis
    /// with the widest centroid spread, halve, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            Aabb::surrounding(&acc, &obj.bounding_box())
        });

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        // Centroid bounds decide the split axis.
        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Split at midpoint
        let right_objects = objects.split_off(n / 2);
        let left_objects = objects;

        BvhNode::Branch {
            left: Box::new(Self::build(left_objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }

    #[cfg(test)]
    fn check_containment(&self) -> bool {
        match self {
            BvhNode::Leaf { objects, bbox } => objects
                .iter()
                .all(|o| bbox.contains_box(&o.bounding_box())),
            BvhNode::Branch { left, right, bbox } => {
                bbox.contains_box(&left.bounding_box())
                    && bbox.contains_box(&right.bounding_box())
                    && left.check_containment()
                    && right.check_containment()
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    if obj.hit(ray, Interval::new(ray_t.min, closest), rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to the closest hit so far
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::HittableList;
    use crate::material::Lambertian;
    use crate::sampling::gen_range_f32;
    use crate::sphere::Sphere;
    use ember_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn random_spheres(rng: &mut StdRng, count: usize) -> Vec<(Vec3, f32)> {
        (0..count)
            .map(|_| {
                let center = Vec3::new(
                    gen_range_f32(rng, -20.0, 20.0),
                    gen_range_f32(rng, -20.0, 20.0),
                    gen_range_f32(rng, -20.0, 20.0),
                );
                (center, gen_range_f32(rng, 0.2, 2.0))
            })
            .collect()
    }

    fn build_world(spheres: &[(Vec3, f32)]) -> Vec<Box<dyn Hittable>> {
        spheres
            .iter()
            .map(|&(center, radius)| {
                Box::new(Sphere::new(
                    center,
                    radius,
                    Arc::new(Lambertian::solid(Vec3::splat(0.5))),
                )) as Box<dyn Hittable>
            })
            .collect()
    }

    #[test]
    fn test_bvh_empty_is_error() {
        assert!(matches!(BvhNode::new(vec![]), Err(BvhError::EmptyScene)));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let objects = build_world(&[(Vec3::new(0.0, 0.0, -1.0), 0.5)]);
        let bvh = BvhNode::new(objects).unwrap();

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_matches_linear_search() {
        let mut rng = StdRng::seed_from_u64(42);
        let spheres = random_spheres(&mut rng, 100);

        // Share one material Arc per sphere across both worlds so material
        // identity can be compared by address.
        let materials: Vec<Arc<Lambertian>> = spheres
            .iter()
            .map(|_| Arc::new(Lambertian::solid(Vec3::splat(0.5))))
            .collect();
        let make_world = |spheres: &[(Vec3, f32)]| -> Vec<Box<dyn Hittable>> {
            spheres
                .iter()
                .zip(&materials)
                .map(|(&(center, radius), mat)| {
                    let material = Arc::clone(mat) as Arc<dyn crate::Material>;
                    Box::new(Sphere::new(center, radius, material)) as Box<dyn Hittable>
                })
                .collect()
        };

        let bvh = BvhNode::new(make_world(&spheres)).unwrap();
        let mut list = HittableList::new();
        for obj in make_world(&spheres) {
            list.add(obj);
        }

        for _ in 0..500 {
            let origin = Vec3::new(
                gen_range_f32(&mut rng, -30.0, 30.0),
                gen_range_f32(&mut rng, -30.0, 30.0),
                gen_range_f32(&mut rng, -30.0, 30.0),
            );
            let direction = Vec3::new(
                gen_range_f32(&mut rng, -1.0, 1.0),
                gen_range_f32(&mut rng, -1.0, 1.0),
                gen_range_f32(&mut rng, -1.0, 1.0),
            );
            if direction.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(origin, direction, 0.0);

            let mut rec_bvh = HitRecord::default();
            let mut rec_list = HitRecord::default();
            let hit_bvh = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec_bvh);
            let hit_list = list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec_list);

            assert_eq!(hit_bvh, hit_list);
            if hit_bvh {
                assert!(
                    (rec_bvh.t - rec_list.t).abs() < 1e-4,
                    "bvh t {} vs linear t {}",
                    rec_bvh.t,
                    rec_list.t
                );
                assert!(std::ptr::eq(
                    rec_bvh.material as *const _ as *const (),
                    rec_list.material as *const _ as *const ()
                ));
            }
        }
    }

    #[test]
    fn test_bvh_box_containment_invariant() {
        let mut rng = StdRng::seed_from_u64(7);
        let spheres = random_spheres(&mut rng, 64);
        let bvh = BvhNode::new(build_world(&spheres)).unwrap();

        assert!(bvh.check_containment());
    }

    #[test]
    fn test_bvh_narrows_to_nearest() {
        // Several spheres along one ray: the nearest one wins.
        let spheres: Vec<(Vec3, f32)> = (1..10)
            .map(|i| (Vec3::new(0.0, 0.0, -3.0 * i as f32), 0.5))
            .collect();
        let bvh = BvhNode::new(build_world(&spheres)).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 2.5).abs() < 1e-4);
    }
}
