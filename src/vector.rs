use std::ops::{ Add, Sub, Neg, Mul };

use serde::{ Serialize, Deserialize };

use crate::consts::EPSILON;
use crate::feq;

/// A direction in 3D space.
///
/// Vectors are moved by the linear part of a transform only, so translations
/// never affect them. Compare with `Point3`, which is moved by the full affine
/// transform.
///
/// # Examples
///
/// ```
/// # use whitted::vector::Vector3;
/// let a = Vector3::new(1.0, 0.0, 0.0);
/// let b = Vector3::new(0.0, 1.0, 0.0);
/// assert_eq!(a.cross(&b), Vector3::new(0.0, 0.0, 1.0));
/// ```
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A position in 3D space.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Vector3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Point3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3 { x, y, z }
    }

    /// The vector going from point `a` to point `b`.
    pub fn between(a: Point3, b: Point3) -> Vector3 {
        b - a
    }

    pub fn norm(&self) -> f64 {
        f64::sqrt(self.x.powi(2) + self.y.powi(2) + self.z.powi(2))
    }

    /// Normalizes the vector in place.
    ///
    /// Vectors with a norm below `EPSILON` are left untouched, so a
    /// degenerate vector never turns into NaNs.
    pub fn normalize(&mut self) {
        let n = self.norm();
        if n <= EPSILON {
            return;
        }

        self.x /= n;
        self.y /= n;
        self.z /= n;
    }

    /// Returns a normalized copy of the vector. See `normalize`.
    pub fn normalized(&self) -> Vector3 {
        let mut v = *self;
        v.normalize();
        v
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Reflects a vector about a (unit) normal.
    pub fn reflect(&self, normal: &Vector3) -> Vector3 {
        *self - (*normal * 2.0 * self.dot(normal))
    }

    /// Components by axis index (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Point3 {
        Point3 { x, y, z }
    }

    pub fn dist(&self, other: &Point3) -> f64 {
        self.square_dist(other).sqrt()
    }

    pub fn square_dist(&self, other: &Point3) -> f64 {
        (other.x - self.x).powi(2)
            + (other.y - self.y).powi(2)
            + (other.z - self.z).powi(2)
    }

    /// Components by axis index (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Reinterprets the position as a vector from the origin.
    pub fn to_vector(self) -> Vector3 {
        Vector3 { x: self.x, y: self.y, z: self.z }
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

/// Scalar right-multiplication.
impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, other: f64) -> Vector3 {
        Vector3 {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Scalar left-multiplication.
///
/// ```
/// # use whitted::vector::Vector3;
/// let v = Vector3::new(1.0, 2.0, 3.0);
/// assert_eq!(2.0 * v, v * 2.0);
/// ```
impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, other: Vector3) -> Vector3 {
        other * self
    }
}

/// Moves a point along a vector.
impl Add<Vector3> for Point3 {
    type Output = Point3;

    fn add(self, other: Vector3) -> Point3 {
        Point3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

/// The difference of two points is the vector between them.
impl Sub for Point3 {
    type Output = Vector3;

    fn sub(self, other: Point3) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a = Vector3::new(3.0, -2.0, 5.0);
    let b = Vector3::new(-2.0, 3.0, 1.0);

    assert_eq!(a + b, Vector3::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_points() {
    let p1 = Point3::new(3.0, 2.0, 1.0);
    let p2 = Point3::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3::new(-2.0, -4.0, -6.0));
    assert_eq!(Vector3::between(p2, p1), Vector3::new(-2.0, -4.0, -6.0));
}

#[test]
fn move_point_along_vector() {
    let p = Point3::new(3.0, 2.0, 1.0);
    let v = Vector3::new(5.0, 6.0, 7.0);

    assert_eq!(p + v, Point3::new(8.0, 8.0, 8.0));
}

#[test]
fn neg_vector() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3::new(-1.0, 2.0, -3.0));
}

#[test]
fn norm_neg() {
    let v = Vector3::new(-1.0, -2.0, -3.0);

    assert_eq!(v.norm(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let mut v = Vector3::new(1.0, 2.0, 3.0);
    v.normalize();

    let e = Vector3::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v, e);
    assert!((v.norm() - 1.0).abs() < 1e-12);
}

#[test]
fn normalize_null_vector_is_noop() {
    let mut v = Vector3::new(0.0, 1e-10, 0.0);
    v.normalize();

    assert_eq!(v.y, 1e-10);
    assert!(v.x.is_finite());
}

#[test]
fn dot_and_cross() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Vector3::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector3::new(1.0, -2.0, 1.0));
}

#[test]
fn reflect_45() {
    let v = Vector3::new(1.0, -1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Vector3::new(1.0, 1.0, 0.0));
}

#[test]
fn point_distances() {
    let a = Point3::new(1.0, 2.0, 3.0);
    let b = Point3::new(4.0, 6.0, 3.0);

    assert_eq!(a.dist(&b), 5.0);
    assert_eq!(a.square_dist(&b), 25.0);
}
