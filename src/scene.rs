use log::trace;
use serde::{ Serialize, Deserialize };

use crate::camera::Camera;
use crate::color::Color;
use crate::consts::{ ATTENUATION_FACTOR, BACKGROUND, EPSILON, MAX_DEPTH };
use crate::intersect::{ Hit, nearest };
use crate::light::Light;
use crate::ray::Ray;
use crate::shape::Shape;

/// Rendering parameters of a scene.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Deepest reflection level traced. Primary rays are at depth 0.
    pub max_depth: usize,

    /// Ambient light, scaled by each surface's `ka`.
    pub ambient: Color,

    /// Color of rays escaping the scene, or going deeper than `max_depth`.
    pub background: Color,

    /// Pixel whose shading is traced through the `log` crate.
    pub debug_pixel: Option<(usize, usize)>,
}

impl Default for SceneConfig {
    fn default() -> SceneConfig {
        SceneConfig {
            max_depth: MAX_DEPTH,
            ambient: Color::black(),
            background: BACKGROUND.into(),
            debug_pixel: None,
        }
    }
}

/// A scene with a camera, objects and lights.
///
/// Scenes are built once, then rendered with `raytrace`. Objects and lights
/// are read-only during a render and shared by all trace workers.
#[derive(Debug)]
pub struct Scene {
    pub camera: Camera,
    pub config: SceneConfig,

    objects: Vec<Shape>,
    lights: Vec<Box<dyn Light>>,
}

impl Scene {
    /// Creates an empty scene with the default configuration.
    pub fn new(camera: Camera) -> Scene {
        Scene::with_config(camera, Default::default())
    }

    pub fn with_config(camera: Camera, config: SceneConfig) -> Scene {
        Scene {
            camera,
            config,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_objects<I: IntoIterator<Item = Shape>>(&mut self, objects: I) {
        self.objects.extend(objects);
    }

    pub fn add_lights<I: IntoIterator<Item = Box<dyn Light>>>(&mut self, lights: I) {
        self.lights.extend(lights);
    }

    /// Adds a single light.
    pub fn add_light<L: Light + 'static>(&mut self, light: L) {
        self.lights.push(Box::new(light));
    }

    pub fn objects(&self) -> &[Shape] {
        &self.objects
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    fn debug(&self, ray: &Ray) -> bool {
        ray.pixel.is_some() && ray.pixel == self.config.debug_pixel
    }

    /// Computes the color seen along a ray.
    ///
    /// `ray` must be normalized. Rays missing every object, or going deeper
    /// than `max_depth`, see the background.
    pub fn trace(&self, ray: &Ray, depth: usize) -> Color {
        if depth > self.config.max_depth {
            return self.config.background;
        }

        let hit = match self.find_intersection(ray) {
            Some(hit) => hit,
            None => return self.config.background,
        };

        if self.debug(ray) {
            trace!("pixel {:?} depth {}: hit at {:?} normal {:?}",
                ray.pixel, depth, hit.glob_norm.origin, hit.glob_norm.direction);
        }

        let mut c = self.whitted(ray, &hit);
        if hit.surface.ks > 0.0 {
            c += self.reflection(&hit, depth);
        }

        c
    }

    /// Traces the mirror reflection of a hit, weighted by the surface's `ks`.
    fn reflection(&self, hit: &Hit, depth: usize) -> Color {
        let direction = hit.glob_ray.direction.reflect(&hit.glob_norm.direction);
        let mut reflected = Ray::new(hit.glob_norm.origin, direction)
            .with_pixel(hit.glob_ray.pixel);
        reflected.normalize();

        self.trace(&reflected, depth + 1) * hit.surface.ks
    }

    /// Local illumination at a hit: ambient, plus Lambert diffuse and Phong
    /// specular for every light that reaches the point.
    pub fn whitted(&self, ray: &Ray, hit: &Hit) -> Color {
        let surface = hit.surface;
        let color = surface.color_at(hit);
        let normal = hit.glob_norm.direction;
        let view = ray.direction.normalized();
        let debug = self.debug(ray);

        let mut c = color * self.config.ambient * surface.ka;

        for light in self.lights.iter() {
            let mut rl = light.ray_to_light(hit.glob_norm.origin).with_pixel(ray.pixel);
            let dist = rl.direction.norm();
            if dist < EPSILON {
                continue;
            }
            rl.normalize();

            let cos_nl = normal.dot(&rl.direction);
            if debug {
                trace!("light dir {:?} normal {:?} cos_nl {:.4} dist {:.4}",
                    rl.direction, normal, cos_nl, dist);
            }

            if cos_nl <= EPSILON {
                continue;
            }

            if self.is_hidden(&rl, dist) {
                continue;
            }

            let fatt = if light.is_sun() {
                1.0
            } else {
                (-ATTENUATION_FACTOR * dist).exp()
            };
            let lc = light.color(&rl);

            c += lc * color * (surface.kd * cos_nl * fatt);

            // Phong: light direction mirrored about the normal, against the
            // incoming view ray. Aligned when cos_ro is -1.
            let vr = normal * (2.0 * cos_nl) - rl.direction;
            let cos_ro = vr.dot(&view);
            if debug {
                trace!("cos_ro {:.4}", cos_ro);
            }

            if cos_ro <= 0.0 {
                c += lc * (surface.ks * (-cos_ro).powf(surface.phong) * fatt);
            }
        }

        c
    }

    /// Whether something lies on `ray` closer than `dist`.
    ///
    /// `ray` must be normalized, so that `dist` is comparable with distances
    /// measured along it.
    pub fn is_hidden(&self, ray: &Ray, dist: f64) -> bool {
        for obj in self.objects.iter() {
            let hit = match obj.intersect(ray) {
                Some(hit) => hit,
                None => continue,
            };

            let d = ray.origin.dist(&hit.glob_norm.origin);
            if d < dist {
                if self.debug(ray) {
                    trace!("hidden by {} at {:.4} (light at {:.4})", obj.name(), d, dist);
                }

                return true;
            }
        }

        false
    }

    /// Finds the hit nearest to the ray origin over all objects.
    pub fn find_intersection(&self, ray: &Ray) -> Option<Hit> {
        self.objects.iter()
            .map(|o| o.intersect(ray))
            .fold(None, nearest)
    }
}

#[cfg(test)]
use crate::light::PointLight;
#[cfg(test)]
use crate::surface::Surface;
#[cfg(test)]
use crate::vector::{ Point3, Vector3 };

#[cfg(test)]
fn ground(surface: Surface) -> Shape {
    let mut p = Shape::plane().with_surface(surface);
    p.scale(10.0, 10.0, 10.0);
    p
}

#[cfg(test)]
fn unlit_config() -> SceneConfig {
    SceneConfig {
        background: Color::black(),
        ..Default::default()
    }
}

#[test]
fn find_intersection_ignores_insertion_order() {
    let at = |z: f64| {
        let mut s = Shape::sphere();
        s.translate(0.0, 0.0, z).set_name(&z.to_string());
        s
    };

    let orders = [
        [-5.0, -10.0, -15.0],
        [-15.0, -5.0, -10.0],
        [-10.0, -15.0, -5.0],
        [-15.0, -10.0, -5.0],
    ];
    let ray = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 0.0, -1.0));

    for order in orders.iter() {
        let mut scene = Scene::new(Camera::new(1.0, 1.0, 1.0, 4));
        scene.add_objects(order.iter().map(|z| at(*z)));

        let h = scene.find_intersection(&ray).unwrap();
        assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.0, -4.0));
    }
}

#[test]
fn miss_sees_background() {
    let scene = Scene::new(Camera::new(1.0, 1.0, 1.0, 4));
    let ray = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(scene.trace(&ray, 0), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn shadow_needs_an_occluder_before_the_light() {
    let mut scene = Scene::new(Camera::new(1.0, 1.0, 1.0, 4));
    let mut s = Shape::sphere();
    s.translate(0.0, 2.0, 0.0);
    scene.add_objects(vec![s]);

    let up = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 1.0, 0.0));
    assert!(scene.is_hidden(&up, 10.0));
    assert!(!scene.is_hidden(&up, 0.5));

    let side = Ray::new(Point3::ORIGIN, Vector3::new(1.0, 0.0, 0.0));
    assert!(!scene.is_hidden(&side, 10.0));
}

#[test]
fn diffuse_is_attenuated_unless_sun() {
    let white = Surface { ka: 0.0, kd: 1.0, ks: 0.0, color: Color::white(), phong: 1.0 };
    let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));

    let mut light = PointLight::new(Color::white());
    light.translate(0.0, 10.0, 0.0);

    let mut scene = Scene::with_config(Camera::new(1.0, 1.0, 1.0, 4), unlit_config());
    scene.add_objects(vec![ground(white)]);
    scene.add_light(light);
    assert_eq!(scene.trace(&ray, 0), Color::white() * (-0.1f64).exp());

    let mut sun = Scene::with_config(Camera::new(1.0, 1.0, 1.0, 4), unlit_config());
    sun.add_objects(vec![ground(white)]);
    light.set_sun(true);
    sun.add_light(light);
    assert_eq!(sun.trace(&ray, 0), Color::white());
}

#[test]
fn specular_highlight_facing_the_viewer() {
    let shiny = Surface { ka: 0.0, kd: 0.0, ks: 1.0, color: Color::black(), phong: 1.0 };
    let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));

    let mut light = PointLight::new(Color::rgb(0.5, 1.0, 0.5));
    light.translate(0.0, 10.0, 0.0).set_sun(true);

    let mut scene = Scene::with_config(Camera::new(1.0, 1.0, 1.0, 4), unlit_config());
    scene.add_objects(vec![ground(shiny)]);
    scene.add_light(light);

    assert_eq!(scene.trace(&ray, 0), Color::rgb(0.5, 1.0, 0.5));
}

#[test]
fn light_behind_surface_leaves_ambient_only() {
    let mut light = PointLight::new(Color::white());
    light.translate(0.0, -10.0, 0.0);

    let config = SceneConfig {
        ambient: Color::rgb(0.2, 0.2, 0.2),
        ..unlit_config()
    };
    let mut scene = Scene::with_config(Camera::new(1.0, 1.0, 1.0, 4), config);
    scene.add_objects(vec![ground(Surface { ks: 0.0, ..crate::surface::WHITE })]);
    scene.add_light(light);

    let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(scene.trace(&ray, 0), Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn facing_mirrors_terminate_at_max_depth() {
    let mirror = Surface { ka: 0.0, kd: 0.0, ks: 0.9, color: Color::black(), phong: 1000.0 };
    let wall = |z: f64| {
        let mut p = Shape::plane().with_surface(mirror);
        p.scale(10.0, 10.0, 10.0).rotate_x(std::f64::consts::FRAC_PI_2).translate(0.0, 0.0, z);
        p
    };

    let ray = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 0.0, -1.0));

    for max_depth in [0, 2, MAX_DEPTH] {
        let config = SceneConfig { max_depth, ..Default::default() };
        let mut scene = Scene::with_config(Camera::new(1.0, 1.0, 1.0, 4), config);
        scene.add_objects(vec![wall(-5.0), wall(5.0)]);

        let c = scene.trace(&ray, 0);
        let expected = 0.1 * 0.9f64.powi(max_depth as i32 + 1);

        assert!(c.is_finite());
        assert_eq!(c, Color::rgb(expected, expected, expected));
    }
}

#[test]
fn mirror_reproduces_reflected_sphere() {
    let config = SceneConfig {
        ambient: Color::rgb(0.2, 0.2, 0.2),
        ..Default::default()
    };

    let mut mirror = Shape::plane().with_surface(
        Surface { ka: 0.0, kd: 0.0, ks: 1.0, color: Color::black(), phong: 1000.0 }
    );
    mirror.scale(20.0, 20.0, 20.0)
        .rotate_x(std::f64::consts::FRAC_PI_2)
        .translate(0.0, 0.0, -20.0);

    let mut ball = Shape::sphere().with_surface(
        Surface { ka: 0.5, kd: 0.9, ks: 0.0, color: Color::red(), phong: 30.0 }
    );
    ball.scale(2.0, 2.0, 2.0).translate(0.0, 0.0, 10.0);

    let mut light = PointLight::new(Color::white());
    light.translate(0.0, 5.0, -5.0);

    let mut scene = Scene::with_config(Camera::new(1.0, 1.0, 1.0, 20), config);
    scene.add_objects(vec![mirror, ball]);
    scene.add_light(light);

    // The mirror image of the sphere center lands on the central pixel.
    assert_eq!(scene.camera.project(Point3::new(0.0, 0.0, -50.0)), (10, 10));

    let mut ray = scene.camera.build_ray(10, 10);
    ray.normalize();
    let reflected = scene.trace(&ray, 0);

    // The same spot of the sphere, seen directly.
    let direct = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 0.0, 1.0));
    let seen = scene.trace(&direct, 0);

    assert!(reflected.sum() > scene.config.background.sum());
    assert!(reflected.r > 0.5);
    assert!(reflected.g < 0.05 && reflected.b < 0.05);
    assert_eq!(reflected, seen);
}
