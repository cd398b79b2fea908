use crate::matrix::Matrix4;
use crate::ray::Ray;
use crate::vector::Point3;
#[cfg(test)]
use crate::vector::Vector3;

/// A pair of mutually inverse matrices placing an entity in its parent frame.
///
/// `direct` maps local coordinates to global ones and `indirect` maps global
/// coordinates back to local ones. Both are updated together by every
/// mutator, so `direct * indirect` stays the identity and no inversion is
/// ever computed at render time.
///
/// Operations compose in the order they are issued: each new operation is
/// prepended to `direct` (applied after the previous ones when mapping a
/// local point out) and its inverse is appended to `indirect`.
///
/// # Examples
///
/// ```
/// # use whitted::transform::Transform;
/// # use whitted::vector::Point3;
/// let mut t = Transform::new();
/// t.scale(2.0, 2.0, 2.0);
/// t.translate(1.0, 0.0, 0.0);
///
/// let p = Point3::new(1.0, 1.0, 1.0);
/// assert_eq!(t.point_to_global(p), Point3::new(3.0, 2.0, 2.0));
/// assert_eq!(t.point_to_local(t.point_to_global(p)), p);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform {
    direct: Matrix4,
    indirect: Matrix4,
}

impl Transform {
    /// The identity transform.
    pub fn new() -> Transform {
        Transform {
            direct: Matrix4::identity(),
            indirect: Matrix4::identity(),
        }
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.indirect = self.indirect * Matrix4::translation(-x, -y, -z);
        self.direct = Matrix4::translation(x, y, z) * self.direct;
    }

    /// Scales along each axis.
    ///
    /// All factors must be non-zero; a zero factor has no inverse and leaves
    /// the transform unusable.
    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.indirect = self.indirect * Matrix4::scaling(1.0 / x, 1.0 / y, 1.0 / z);
        self.direct = Matrix4::scaling(x, y, z) * self.direct;
    }

    pub fn rotate_x(&mut self, a: f64) {
        self.indirect = self.indirect * Matrix4::rotation_x(-a);
        self.direct = Matrix4::rotation_x(a) * self.direct;
    }

    pub fn rotate_y(&mut self, a: f64) {
        self.indirect = self.indirect * Matrix4::rotation_y(-a);
        self.direct = Matrix4::rotation_y(a) * self.direct;
    }

    pub fn rotate_z(&mut self, a: f64) {
        self.indirect = self.indirect * Matrix4::rotation_z(-a);
        self.direct = Matrix4::rotation_z(a) * self.direct;
    }

    pub fn direct(&self) -> &Matrix4 {
        &self.direct
    }

    pub fn indirect(&self) -> &Matrix4 {
        &self.indirect
    }

    pub fn point_to_global(&self, p: Point3) -> Point3 {
        self.direct * p
    }

    pub fn point_to_local(&self, p: Point3) -> Point3 {
        self.indirect * p
    }

    pub fn ray_to_global(&self, r: &Ray) -> Ray {
        r.transform(&self.direct)
    }

    pub fn ray_to_local(&self, r: &Ray) -> Ray {
        r.transform(&self.indirect)
    }

    /// Maps a local surface normal, anchored at its surface point, to the
    /// global frame. The direction goes through the transposed `indirect`
    /// matrix so it stays perpendicular to the surface under non-uniform
    /// scaling. The result is normalized.
    pub fn normal_to_global(&self, n: &Ray) -> Ray {
        let mut g = Ray::new(self.direct * n.origin, self.indirect.transposition() * n.direction)
            .with_pixel(n.pixel);
        g.normalize();
        g
    }

    /// Returns `direct * indirect`, which should always be close to the
    /// identity. Meant as a self-test, not for the render path.
    pub fn check(&self) -> Matrix4 {
        self.direct * self.indirect
    }
}

#[test]
fn new_transform_is_identity() {
    let t = Transform::new();

    assert_eq!(*t.direct(), Matrix4::identity());
    assert_eq!(t.check(), Matrix4::identity());
}

#[test]
fn operations_compose_in_issue_order() {
    let mut t = Transform::new();
    t.rotate_x(std::f64::consts::PI / 2.0);
    t.scale(5.0, 5.0, 5.0);
    t.translate(10.0, 5.0, 7.0);

    let p = Point3::new(1.0, 0.0, 1.0);
    assert_eq!(t.point_to_global(p), Point3::new(15.0, 0.0, 7.0));
}

#[test]
fn inverse_consistency_after_mixed_operations() {
    let mut t = Transform::new();
    t.scale(2.0, 0.5, 3.0);
    t.rotate_y(0.7);
    t.translate(-4.0, 1.5, 9.0);
    t.rotate_z(-1.3);
    t.rotate_x(2.1);
    t.scale(0.25, 4.0, 1.0);

    assert_eq!(t.check(), Matrix4::identity());

    let points = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, -2.0, 3.0),
        Point3::new(-100.0, 42.0, 0.5),
    ];

    for p in points.iter() {
        assert_eq!(t.point_to_global(t.point_to_local(*p)), *p);
        assert_eq!(t.point_to_local(t.point_to_global(*p)), *p);
    }
}

#[test]
fn ray_direction_ignores_translation() {
    let mut t = Transform::new();
    t.translate(3.0, 4.0, 5.0);

    let r = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 1.0, 0.0));
    let g = t.ray_to_global(&r);

    assert_eq!(g.origin, Point3::new(4.0, 6.0, 8.0));
    assert_eq!(g.direction, Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(t.ray_to_local(&g).origin, r.origin);
}

#[test]
fn normal_stays_perpendicular_after_rotate_then_scale() {
    let mut t = Transform::new();
    t.rotate_z(std::f64::consts::FRAC_PI_4);
    t.scale(1.0, 3.0, 1.0);
    t.translate(2.0, -1.0, 4.0);

    let local = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 1.0, 0.0));
    let g = t.normal_to_global(&local);

    let tangent = t.direct * Vector3::new(1.0, 0.0, 0.0);
    assert!(crate::is_nul(g.direction.dot(&tangent)));
    assert!(crate::feq(g.direction.norm(), 1.0));
    assert_eq!(g.origin, Point3::new(2.0, -1.0, 4.0));
}
