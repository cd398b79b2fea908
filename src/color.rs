use std::ops::{ Add, AddAssign, Sub, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A floating point color.
///
/// Represented conventionally with red-green-blue (RGB) values. Components
/// are nominally in `[0, 1]`, but intermediate shading results may exceed
/// that range; they are only clamped when resolved to 8 bits.
///
/// # Examples
///
/// Construct the color red:
///
/// ```
/// # use whitted::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(1.0, 0.0, 0.0));
/// ```
///
/// Resolve a color to 8 bits per channel:
///
/// ```
/// # use whitted::color::Color;
/// let c = Color::rgb(1.5, 0.5, -0.2);
/// assert_eq!(c.to_rgb8(), [255, 128, 0]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise, accounting for possible floating
/// point error in comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<(f64, f64, f64)> for Color {
    fn from(c: (f64, f64, f64)) -> Color {
        Color { r: c.0, g: c.1, b: c.2 }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub const fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub const fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }

    pub const fn red() -> Color {
        Color::rgb(1.0, 0.0, 0.0)
    }

    pub const fn green() -> Color {
        Color::rgb(0.0, 1.0, 0.0)
    }

    pub const fn blue() -> Color {
        Color::rgb(0.0, 0.0, 1.0)
    }

    /// Computes the Hadamard (component-wise) product of two colors.
    ///
    /// This is how a light color filters a surface color.
    ///
    /// ```
    /// # use whitted::color::Color;
    /// let yellow = Color::rgb(1.0, 1.0, 0.0);
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// assert_eq!(Color::hadamard(&yellow, &purple), Color::red());
    /// ```
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color {
            r: c1.r * c2.r,
            g: c1.g * c2.g,
            b: c1.b * c2.b,
        }
    }

    /// Sum of the three channels, a crude brightness measure.
    pub fn sum(&self) -> f64 {
        self.r + self.g + self.b
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Resolves the color to 8 bits per channel.
    ///
    /// Each channel is clamped to `[0, 1]`, scaled to `255` and rounded to
    /// the nearest level.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let level = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;

        [level(self.r), level(self.g), level(self.b)]
    }
}

/// Adds two colors together, component by component.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

/// Subtracts one color from another, component by component.
impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies a scalar by a color.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        other * self
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::hadamard(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));

    let mut c3 = c1;
    c3 += c2;
    assert_eq!(c3, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(c1 * Color::rgb(0.5, 1.0, 0.0), Color::rgb(0.1, 0.3, 0.0));
}

#[test]
fn resolve_to_rgb8_rounds_to_nearest() {
    assert_eq!(Color::black().to_rgb8(), [0, 0, 0]);
    assert_eq!(Color::white().to_rgb8(), [255, 255, 255]);
    assert_eq!(Color::rgb(0.1, 0.1, 0.1).to_rgb8(), [26, 26, 26]);
    assert_eq!(Color::rgb(2.0, -1.0, 0.002).to_rgb8(), [255, 0, 1]);
}
