pub mod consts;
pub mod error;

pub mod vector;
pub mod matrix;
pub mod ray;
pub mod transform;

pub mod color;
pub mod canvas;
pub mod surface;

pub mod intersect;
pub mod shape;
pub mod light;
pub mod camera;

pub mod scene;
pub mod parallel;
pub mod description;

use consts::FEQ_EPSILON;

/// Approximate floating point equality, used by the `PartialEq`
/// implementations of vectors, colors and matrices.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}

/// Returns true if `x` is within `EPSILON` of zero.
pub fn is_nul(x: f64) -> bool {
    x > -consts::EPSILON && x < consts::EPSILON
}
