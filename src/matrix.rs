use std::fmt;
use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::vector::{ Point3, Vector3 };

/// A 4x4 homogeneous matrix, stored row-major.
///
/// These matrices encode affine transformations in 3D space. A `Point3` is
/// multiplied with an implicit `w` of `1.0` (translations apply), a `Vector3`
/// with an implicit `w` of `0.0` (only the linear part applies). No
/// perspective divide is ever performed.
///
/// # Examples
///
/// Creating an identity matrix:
///
/// ```
/// # use whitted::matrix::Matrix4;
/// # use whitted::vector::Point3;
/// let mat = Matrix4::identity();
/// let p = Point3::new(1.0, 2.0, 3.0);
/// assert_eq!(mat * p, p);
/// ```
///
/// Chaining transformations (applied right to left):
///
/// ```
/// # use whitted::matrix::Matrix4;
/// # use whitted::vector::Point3;
/// let m = Matrix4::translation(10.0, 0.0, 0.0) * Matrix4::scaling(2.0, 2.0, 2.0);
/// assert_eq!(m * Point3::new(1.0, 1.0, 1.0), Point3::new(12.0, 2.0, 2.0));
/// ```
#[derive(Copy, Clone, Debug, PartialOrd)]
pub struct Matrix4 {
    data: [f64; 16],
}

/// Determines whether two `Matrix4`s are equal.
///
/// Matrices are compared element-wise. Note that equality is approximate, as
/// `Matrix4` elements are floating point numbers.
impl PartialEq for Matrix4 {
    fn eq(&self, other: &Matrix4) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Default for Matrix4 {
    fn default() -> Matrix4 {
        Matrix4::identity()
    }
}

impl Matrix4 {
    /// Creates a new `Matrix4`. All elements are initialized to `0.0`.
    pub fn new() -> Matrix4 {
        Matrix4 { data: [0.0; 16] }
    }

    /// Instantiates a 4x4 identity matrix.
    pub fn identity() -> Matrix4 {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4 { data: buf }
    }

    /// Instantiates a translation matrix, offsetting points by `x`, `y`, `z`.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4 {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// Instantiates a scaling matrix.
    ///
    /// This matrix scales vectors or points by `x`, `y` and `z` along the X, Y
    /// and Z axes, respectively.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4 {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// Instantiates a rotation matrix about the X axis.
    ///
    /// Rotations are right-handed. Assumes that parameter `r` is in radians.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted::vector::Point3;
    /// # use whitted::matrix::Matrix4;
    /// let point = Point3::new(0.0, 1.0, 0.0);
    /// let m = Matrix4::rotation_x(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * point, Point3::new(0.0, 0.0, 1.0));
    /// ```
    pub fn rotation_x(r: f64) -> Matrix4 {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation matrix about the Y axis.
    ///
    /// ```
    /// # use whitted::vector::Point3;
    /// # use whitted::matrix::Matrix4;
    /// let point = Point3::new(1.0, 0.0, 0.0);
    /// let m = Matrix4::rotation_y(std::f64::consts::PI / 2.0);
    /// assert_eq!(m * point, Point3::new(0.0, 0.0, -1.0));
    /// ```
    pub fn rotation_y(r: f64) -> Matrix4 {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// Instantiates a rotation matrix about the Z axis.
    pub fn rotation_z(r: f64) -> Matrix4 {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Produces the transpose of a matrix in-place.
    pub fn transpose(&mut self) {
        for r in 0..4 {
            for c in (r+1)..4 {
                let tmp = self[(r, c)];
                self[(r, c)] = self[(c, r)];
                self[(c, r)] = tmp;
            }
        }
    }

    /// Produces the transpose of a matrix, returning a new matrix as a result.
    ///
    /// The transpose satisfies `A^T[i][j] == A[j][i]`.
    pub fn transposition(&self) -> Matrix4 {
        let mut buf = *self;
        buf.transpose();
        buf
    }
}

impl From<[f64; 16]> for Matrix4 {
    fn from(data: [f64; 16]) -> Matrix4 {
        Matrix4 { data }
    }
}

impl Index<(usize, usize)> for Matrix4 {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4 {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

/// Multiplies two matrices together.
///
/// Matrix multiplication isn't commutative: `a * b` applies `b` first when
/// the product is used on a point.
impl Mul<Matrix4> for Matrix4 {
    type Output = Matrix4;

    fn mul(self, other: Matrix4) -> Matrix4 {
        let mut buf = Matrix4::new();

        for r in 0..4 {
            for c in 0..4 {
                buf[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)];
            }
        }

        buf
    }
}

/// Applies the full affine transform to a point (implicit `w = 1`).
impl Mul<Point3> for Matrix4 {
    type Output = Point3;

    fn mul(self, p: Point3) -> Point3 {
        Point3 {
            x: self[(0, 0)] * p.x + self[(0, 1)] * p.y + self[(0, 2)] * p.z + self[(0, 3)],
            y: self[(1, 0)] * p.x + self[(1, 1)] * p.y + self[(1, 2)] * p.z + self[(1, 3)],
            z: self[(2, 0)] * p.x + self[(2, 1)] * p.y + self[(2, 2)] * p.z + self[(2, 3)],
        }
    }
}

/// Applies the linear part of the transform to a vector (implicit `w = 0`).
impl Mul<Vector3> for Matrix4 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        Vector3 {
            x: self[(0, 0)] * v.x + self[(0, 1)] * v.y + self[(0, 2)] * v.z,
            y: self[(1, 0)] * v.x + self[(1, 1)] * v.y + self[(1, 2)] * v.z,
            z: self[(2, 0)] * v.x + self[(2, 1)] * v.y + self[(2, 2)] * v.z,
        }
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            writeln!(f, "[{:9.5} {:9.5} {:9.5} {:9.5}]",
                self[(r, 0)], self[(r, 1)], self[(r, 2)], self[(r, 3)])?;
        }

        Ok(())
    }
}

#[test]
fn identity() {
    let a: Matrix4 = [ 0.0, 1.0,  2.0,  4.0,
                       1.0, 2.0,  4.0,  8.0,
                       2.0, 4.0,  8.0, 16.0,
                       4.0, 8.0, 16.0, 32.0 ].into();

    assert_eq!(a * Matrix4::identity(), a);
    assert_eq!(Matrix4::identity() * a, a);
}

#[test]
fn transpose() {
    let a: Matrix4 = [ 0.0, 9.0, 3.0, 0.0,
                       9.0, 8.0, 0.0, 8.0,
                       1.0, 8.0, 5.0, 3.0,
                       0.0, 0.0, 5.0, 8.0 ].into();

    let t: Matrix4 = [ 0.0, 9.0, 1.0, 0.0,
                       9.0, 8.0, 8.0, 0.0,
                       3.0, 0.0, 5.0, 5.0,
                       0.0, 8.0, 3.0, 8.0 ].into();

    assert_eq!(a.transposition(), t);
    assert_eq!(Matrix4::identity().transposition(), Matrix4::identity());
}

#[test]
fn mat4_multiply() {
    let a: Matrix4 = [ 1.0, 2.0, 3.0, 4.0,
                       5.0, 6.0, 7.0, 8.0,
                       9.0, 8.0, 7.0, 6.0,
                       5.0, 4.0, 3.0, 2.0 ].into();

    let b: Matrix4 = [ -2.0, 1.0, 2.0,  3.0,
                        3.0, 2.0, 1.0, -1.0,
                        4.0, 3.0, 6.0,  5.0,
                        1.0, 2.0, 7.0,  8.0 ].into();

    let c: Matrix4 = [ 20.0, 22.0,  50.0,  48.0,
                       44.0, 54.0, 114.0, 108.0,
                       40.0, 58.0, 110.0, 102.0,
                       16.0, 26.0,  46.0,  42.0 ].into();

    assert_eq!(a * b, c);
}

#[test]
fn mat4_translation() {
    let transform = Matrix4::translation(5.0, -3.0, 2.0);
    let p = Point3::new(-3.0, 4.0, 5.0);

    assert_eq!(transform * p, Point3::new(2.0, 1.0, 7.0));
}

#[test]
fn mat4_translation_vector() {
    let transform = Matrix4::translation(5.0, -3.0, 2.0);
    let v = Vector3::new(-3.0, 4.0, 5.0);

    assert_eq!(transform * v, v);
}

#[test]
fn mat4_scaling() {
    let transform = Matrix4::scaling(2.0, 3.0, 4.0);

    assert_eq!(transform * Point3::new(-4.0, 6.0, 8.0),
        Point3::new(-8.0, 18.0, 32.0));
    assert_eq!(transform * Vector3::new(-4.0, 6.0, 8.0),
        Vector3::new(-8.0, 18.0, 32.0));
}

#[test]
fn mat4_rotate_z() {
    let half_quarter = Matrix4::rotation_z(std::f64::consts::PI / 4.0);
    let full_quarter = Matrix4::rotation_z(std::f64::consts::PI / 2.0);
    let point = Point3::new(0.0, 1.0, 0.0);

    assert_eq!(full_quarter * point,
        Point3::new(-1.0, 0.0, 0.0));
    assert_eq!(half_quarter * point,
        Point3::new(-2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0, 0.0));
}

#[test]
fn chained_transforms() {
    let a = Matrix4::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix4::scaling(5.0, 5.0, 5.0);
    let c = Matrix4::translation(10.0, 5.0, 7.0);

    let t = c * b * a;
    let p = Point3::new(1.0, 0.0, 1.0);

    assert_eq!(t * p, Point3::new(15.0, 0.0, 7.0));
}
