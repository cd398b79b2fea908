use std::fmt::Debug;

use crate::color::Color;
use crate::ray::Ray;
use crate::transform::Transform;
use crate::vector::Point3;

/// A light source, as seen by the shading code.
///
/// Lights are shared read-only between render workers, hence the `Send +
/// Sync` bound.
pub trait Light: Send + Sync + Debug {
    /// The ray going from `point` to the light. The direction is left
    /// unnormalized: its norm is the distance to the light.
    fn ray_to_light(&self, point: Point3) -> Ray;

    /// The color the light casts along a ray produced by `ray_to_light`.
    fn color(&self, ray: &Ray) -> Color;

    /// Sun lights are not attenuated with distance.
    fn is_sun(&self) -> bool;
}

/// A point light.
///
/// The light sits at the origin of its own frame and is placed with its
/// transform. Flagged as a sun, it lights the scene without distance
/// attenuation, approximating a directional source far away.
///
/// ```
/// # use whitted::color::Color;
/// # use whitted::light::{ Light, PointLight };
/// # use whitted::vector::Point3;
/// let mut l = PointLight::new(Color::white());
/// l.translate(0.0, 10.0, 0.0);
///
/// let r = l.ray_to_light(Point3::new(0.0, 4.0, 0.0));
/// assert_eq!(r.direction.norm(), 6.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub transform: Transform,
    pub intensity: Color,
    pub sun: bool,
}

impl Default for PointLight {
    fn default() -> PointLight {
        PointLight::new(Color::white())
    }
}

impl PointLight {
    pub fn new(intensity: Color) -> PointLight {
        PointLight {
            transform: Transform::new(),
            intensity,
            sun: false,
        }
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.transform.translate(x, y, z);
        self
    }

    pub fn rotate_x(&mut self, a: f64) -> &mut Self {
        self.transform.rotate_x(a);
        self
    }

    pub fn rotate_y(&mut self, a: f64) -> &mut Self {
        self.transform.rotate_y(a);
        self
    }

    pub fn rotate_z(&mut self, a: f64) -> &mut Self {
        self.transform.rotate_z(a);
        self
    }

    pub fn set_sun(&mut self, sun: bool) -> &mut Self {
        self.sun = sun;
        self
    }

    /// Position of the light in the global frame.
    pub fn position(&self) -> Point3 {
        self.transform.point_to_global(Point3::ORIGIN)
    }
}

impl Light for PointLight {
    fn ray_to_light(&self, point: Point3) -> Ray {
        Ray::between(point, self.position())
    }

    fn color(&self, _ray: &Ray) -> Color {
        self.intensity
    }

    fn is_sun(&self) -> bool {
        self.sun
    }
}

#[test]
fn point_light_is_placed_by_its_transform() {
    let mut l = PointLight::new(Color::red());
    l.translate(1.0, 0.0, 0.0).rotate_z(std::f64::consts::PI / 2.0);

    assert_eq!(l.position(), Point3::new(0.0, 1.0, 0.0));

    let r = l.ray_to_light(Point3::new(0.0, 1.0, 5.0));
    assert_eq!(r.origin, Point3::new(0.0, 1.0, 5.0));
    assert_eq!(r.direction.norm(), 5.0);
    assert_eq!(l.color(&r), Color::red());
    assert!(!l.is_sun());
}

#[test]
fn sun_flag() {
    let mut l = PointLight::default();
    l.set_sun(true);

    assert!(l.is_sun());
}
