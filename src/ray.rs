use crate::matrix::Matrix4;
use crate::vector::{ Point3, Vector3 };

/// A ray: an origin point and a direction vector.
///
/// Rays optionally carry the pixel they were shot for. The pixel plays no
/// part in the geometry; it only lets the shading code single out one pixel
/// for debug tracing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
    pub pixel: Option<(usize, usize)>,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Ray {
        Ray { origin, direction, pixel: None }
    }

    /// Creates a ray going from `src` to `dst`. The direction is not
    /// normalized, so its norm is the distance between the two points.
    pub fn between(src: Point3, dst: Point3) -> Ray {
        Ray::new(src, dst - src)
    }

    /// Tags the ray with the pixel it was generated for.
    pub fn with_pixel(mut self, pixel: Option<(usize, usize)>) -> Ray {
        self.pixel = pixel;
        self
    }

    pub fn position(&self, t: f64) -> Point3 {
        self.origin + (self.direction * t)
    }

    /// Normalizes the direction in place (no-op for a null direction).
    pub fn normalize(&mut self) {
        self.direction.normalize();
    }

    /// Applies a matrix to the origin (as a point) and the direction (as a
    /// vector, so translations leave it unchanged).
    pub fn transform(&self, m: &Matrix4) -> Ray {
        Ray {
            origin: *m * self.origin,
            direction: *m * self.direction,
            pixel: self.pixel,
        }
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Point3::new(2.0, 3.0, 4.0),
                Vector3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Point3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Point3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Point3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Point3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_translation() {
    let r = Ray::new(
                Point3::new(1.0, 2.0, 3.0),
                Vector3::new(0.0, 1.0, 0.0)
            );
    let m = Matrix4::translation(3.0, 4.0, 5.0);
    let t = r.transform(&m);

    assert_eq!(t.origin, Point3::new(4.0, 6.0, 8.0));
    assert_eq!(t.direction, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn ray_scaling() {
    let r = Ray::new(
                Point3::new(1.0, 2.0, 3.0),
                Vector3::new(0.0, 1.0, 0.0)
            );
    let m = Matrix4::scaling(2.0, 3.0, 4.0);
    let t = r.transform(&m);

    assert_eq!(t.origin, Point3::new(2.0, 6.0, 12.0));
    assert_eq!(t.direction, Vector3::new(0.0, 3.0, 0.0));
}

#[test]
fn ray_between_points_keeps_length() {
    let mut r = Ray::between(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 4.0, 5.0));

    assert_eq!(r.direction.norm(), 5.0);
    r.normalize();
    assert_eq!(r.direction, Vector3::new(0.0, 0.6, 0.8));
}
