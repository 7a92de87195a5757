//! Built-in demonstration scenes.
//!
//! Each builder returns a fully assembled `Scene`: geometry under a BVH,
//! an initialized camera for the requested resolution, and the background
//! the scene was authored against.

use std::sync::Arc;

use crate::aa_rect::{XyRect, XzRect, YzRect};
use crate::bvh::{BvhError, BvhNode};
use crate::cuboid::Cuboid;
use crate::hittable::{Hittable, HittableList};
use crate::material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal};
use crate::medium::ConstantMedium;
use crate::sampling::{gen_f32, gen_range_f32};
use crate::sphere::{MovingSphere, Sphere};
use crate::texture::{Checker, ImageTexture, NoiseTexture, SolidColor, Texture};
use crate::transform::{FlipNormals, RotateY, Translate};
use crate::Camera;
use ember_math::Vec3;
use rand::RngCore;

/// A renderable scene: world geometry plus the camera and background it
/// was authored for.
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub background: Color,
    pub use_sky_gradient: bool,
}

fn finish(
    objects: Vec<Box<dyn Hittable>>,
    camera: Camera,
    background: Color,
    use_sky_gradient: bool,
) -> Result<Scene, BvhError> {
    let mut camera = camera;
    camera.initialize();
    Ok(Scene {
        world: BvhNode::new(objects)?,
        camera,
        background,
        use_sky_gradient,
    })
}

/// Field of random small spheres around three feature spheres, with
/// motion-blurred diffuse spheres and a checkered ground.
pub fn random_spheres(width: u32, height: u32, rng: &mut dyn RngCore) -> Result<Scene, BvhError> {
    let mut list = HittableList::new();

    let ground: Arc<dyn Texture> = Arc::new(Checker::solid(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(ground)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse spheres drift upward over the shutter interval.
                let albedo = Color::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
                    * Color::new(gen_f32(rng), gen_f32(rng), gen_f32(rng));
                let center1 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                list.add(Box::new(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    Arc::new(Lambertian::solid(albedo)),
                )));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    gen_range_f32(rng, 0.5, 1.0),
                    gen_range_f32(rng, 0.5, 1.0),
                    gen_range_f32(rng, 0.5, 1.0),
                );
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                list.add(Box::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                list.add(Box::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::new(1.5)),
                )));
            }
        }
    }

    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    list.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::solid(Color::new(0.4, 0.2, 0.1))),
    )));
    list.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_shutter(0.0, 1.0);

    finish(list.into_objects(), camera, Color::ZERO, true)
}

/// Two marble-textured spheres under the sky gradient.
pub fn perlin_spheres(width: u32, height: u32, rng: &mut dyn RngCore) -> Result<Scene, BvhError> {
    let mut list = HittableList::new();

    let marble: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(4.0, rng))));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::clone(&marble),
    )));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        marble,
    )));

    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    finish(list.into_objects(), camera, Color::ZERO, true)
}

/// Marble spheres lit only by a rectangle and a sphere light, against a
/// black background.
pub fn simple_light(width: u32, height: u32, rng: &mut dyn RngCore) -> Result<Scene, BvhError> {
    let mut list = HittableList::new();

    let marble: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(4.0, rng))));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::clone(&marble),
    )));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        marble,
    )));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::solid(Color::splat(4.0)));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, 7.0, 0.0),
        2.0,
        Arc::clone(&light),
    )));
    list.add(Box::new(XyRect::new(3.0, 5.0, 1.0, 3.0, -2.0, light)));

    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    finish(list.into_objects(), camera, Color::ZERO, false)
}

/// The five Cornell box walls plus a ceiling light, without the boxes.
fn cornell_walls(list: &mut HittableList, light_rect: XzRect) {
    let red: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::new(0.12, 0.45, 0.15)));

    list.add(Box::new(FlipNormals::new(Box::new(YzRect::new(
        0.0, 555.0, 0.0, 555.0, 555.0, green,
    )))));
    list.add(Box::new(YzRect::new(0.0, 555.0, 0.0, 555.0, 0.0, red)));
    list.add(Box::new(light_rect));
    list.add(Box::new(XzRect::new(
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        Arc::clone(&white),
    )));
    list.add(Box::new(FlipNormals::new(Box::new(XzRect::new(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        Arc::clone(&white),
    )))));
    list.add(Box::new(FlipNormals::new(Box::new(XyRect::new(
        0.0, 555.0, 0.0, 555.0, 555.0, white,
    )))));
}

fn cornell_camera(width: u32, height: u32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

/// The classic Cornell box with two rotated boxes.
pub fn cornell_box(width: u32, height: u32) -> Result<Scene, BvhError> {
    let mut list = HittableList::new();

    let light = Arc::new(DiffuseLight::solid(Color::splat(15.0)));
    cornell_walls(
        &mut list,
        XzRect::new(213.0, 343.0, 227.0, 332.0, 554.0, light),
    );

    let white: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::splat(0.73)));

    let tall = Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), Arc::clone(&white));
    list.add(Box::new(Translate::new(
        Box::new(RotateY::new(Box::new(tall), 15.0)),
        Vec3::new(265.0, 0.0, 295.0),
    )));

    let short = Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white);
    list.add(Box::new(Translate::new(
        Box::new(RotateY::new(Box::new(short), -18.0)),
        Vec3::new(130.0, 0.0, 65.0),
    )));

    finish(
        list.into_objects(),
        cornell_camera(width, height),
        Color::ZERO,
        false,
    )
}

/// Cornell box where the two boxes are filled with smoke and fog.
pub fn cornell_smoke(width: u32, height: u32) -> Result<Scene, BvhError> {
    let mut list = HittableList::new();

    let light = Arc::new(DiffuseLight::solid(Color::splat(7.0)));
    cornell_walls(
        &mut list,
        XzRect::new(113.0, 443.0, 127.0, 432.0, 554.0, light),
    );

    let white: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::splat(0.73)));

    let tall: Box<dyn Hittable> = Box::new(Translate::new(
        Box::new(RotateY::new(
            Box::new(Cuboid::new(
                Vec3::ZERO,
                Vec3::new(165.0, 330.0, 165.0),
                Arc::clone(&white),
            )),
            15.0,
        )),
        Vec3::new(265.0, 0.0, 295.0),
    ));
    list.add(Box::new(ConstantMedium::new(
        tall,
        0.01,
        Arc::new(SolidColor::new(Color::ZERO)),
    )));

    let short: Box<dyn Hittable> = Box::new(Translate::new(
        Box::new(RotateY::new(
            Box::new(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white)),
            -18.0,
        )),
        Vec3::new(130.0, 0.0, 65.0),
    ));
    list.add(Box::new(ConstantMedium::new(
        short,
        0.01,
        Arc::new(SolidColor::new(Color::ONE)),
    )));

    finish(
        list.into_objects(),
        cornell_camera(width, height),
        Color::ZERO,
        false,
    )
}

/// Procedural stand-in for an image file: a 256x128 RGB plate with a
/// latitude gradient and longitude bands, so the showcase scene needs no
/// assets on disk.
fn procedural_plate() -> ImageTexture {
    let (width, height) = (256u32, 128u32);
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for j in 0..height {
        for i in 0..width {
            let latitude = j as f32 / (height - 1) as f32;
            let band = if (i / 16) % 2 == 0 { 1.0 } else { 0.7 };
            data.push((255.0 * band * (0.2 + 0.6 * latitude)) as u8);
            data.push((255.0 * band * (0.4 + 0.3 * latitude)) as u8);
            data.push((255.0 * band * (0.8 - 0.5 * latitude)) as u8);
        }
    }
    ImageTexture::from_bytes(width, height, data)
}

/// Showcase scene combining every feature: a box-terrain floor, motion
/// blur, dielectric and metal spheres, bounded and scene-wide media,
/// textured spheres, and an instanced cloud of small spheres.
pub fn final_scene(width: u32, height: u32, rng: &mut dyn RngCore) -> Result<Scene, BvhError> {
    let mut list = HittableList::new();

    // Ground made of randomly raised boxes, grouped under their own BVH.
    let ground: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::new(0.48, 0.83, 0.53)));
    let mut boxes: Vec<Box<dyn Hittable>> = Vec::new();
    for i in 0..20 {
        for j in 0..20 {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            boxes.push(Box::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                Arc::clone(&ground),
            )));
        }
    }
    list.add(Box::new(BvhNode::new(boxes)?));

    let light = Arc::new(DiffuseLight::solid(Color::splat(7.0)));
    list.add(Box::new(XzRect::new(
        123.0, 423.0, 147.0, 412.0, 554.0, light,
    )));

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    list.add(Box::new(MovingSphere::new(
        center0,
        center0 + Vec3::new(30.0, 0.0, 0.0),
        0.0,
        1.0,
        50.0,
        Arc::new(Lambertian::solid(Color::new(0.7, 0.3, 0.1))),
    )));

    list.add(Box::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    list.add(Box::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass ball filled with a blue haze.
    let boundary = Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    );
    list.add(Box::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    list.add(Box::new(ConstantMedium::new(
        Box::new(boundary),
        0.2,
        Arc::new(SolidColor::new(Color::new(0.2, 0.4, 0.9))),
    )));

    // Thin mist over the whole scene.
    let mist_boundary = Sphere::new(Vec3::ZERO, 5000.0, Arc::new(Dielectric::new(1.5)));
    list.add(Box::new(ConstantMedium::new(
        Box::new(mist_boundary),
        0.0001,
        Arc::new(SolidColor::new(Color::ONE)),
    )));

    list.add(Box::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::new(Arc::new(procedural_plate()))),
    )));
    list.add(Box::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(0.1, rng)))),
    )));

    // Cloud of white spheres in a cube, instanced into place.
    let white: Arc<dyn Material> = Arc::new(Lambertian::solid(Color::splat(0.73)));
    let cloud: Vec<Box<dyn Hittable>> = (0..1000)
        .map(|_| {
            let center = Vec3::new(
                gen_range_f32(rng, 0.0, 165.0),
                gen_range_f32(rng, 0.0, 165.0),
                gen_range_f32(rng, 0.0, 165.0),
            );
            Box::new(Sphere::new(center, 10.0, Arc::clone(&white))) as Box<dyn Hittable>
        })
        .collect();
    list.add(Box::new(Translate::new(
        Box::new(RotateY::new(Box::new(BvhNode::new(cloud)?), 15.0)),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    let camera = Camera::new()
        .with_resolution(width, height)
        .with_position(
            Vec3::new(478.0, 278.0, -600.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0);

    finish(list.into_objects(), camera, Color::ZERO, false)
}
