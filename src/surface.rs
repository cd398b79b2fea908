use serde::{ Serialize, Deserialize };

use crate::color::Color;
use crate::intersect::Hit;

/// Reflectance properties of a primitive.
///
/// Uses the Phong reflection model: ambient (`ka`), diffuse (`kd`) and
/// specular (`ks`) coefficients plus the Phong exponent. A non-zero `ks`
/// also makes the surface a mirror: reflected rays are traced recursively
/// and weighted by `ks`. Coefficients are nominally in `[0, 1]` but this is
/// not enforced.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub ka: f64,
    pub kd: f64,
    pub ks: f64,
    pub color: Color,
    pub phong: f64,
}

impl Default for Surface {
    fn default() -> Surface {
        DEFAULT
    }
}

impl Surface {
    /// The base color of the surface at a hit.
    ///
    /// Surfaces are uniformly colored for now; the hit is passed so that
    /// textured surfaces can be added without touching the shading code.
    pub fn color_at(&self, _hit: &Hit) -> Color {
        self.color
    }

    /// Looks up a named preset, as used in scene files.
    pub fn preset(name: &str) -> Option<Surface> {
        match name {
            "default" => Some(DEFAULT),
            "diffuse" => Some(DIFFUSE),
            "ocher" => Some(OCHER),
            "mirror" => Some(MIRROR),
            "white" => Some(WHITE),
            "building" => Some(BUILDING),
            _ => None,
        }
    }
}

pub const DEFAULT: Surface = Surface {
    ka: 0.5,
    kd: 0.5,
    ks: 0.5,
    color: Color::rgb(0.5, 0.5, 0.5),
    phong: 30.0,
};

pub const DIFFUSE: Surface = Surface {
    ka: 0.5,
    kd: 0.8,
    ks: 0.2,
    color: Color::rgb(0.6, 0.4, 0.3),
    phong: 30.0,
};

pub const OCHER: Surface = Surface {
    ka: 0.7,
    kd: 0.5,
    ks: 0.4,
    color: Color::rgb(1.0, 1.0 / 1.5, 0.0),
    phong: 50.0,
};

pub const MIRROR: Surface = Surface {
    ka: 0.0,
    kd: 0.1,
    ks: 0.9,
    color: Color::rgb(0.0, 0.0, 0.0),
    phong: 1000.0,
};

pub const WHITE: Surface = Surface {
    ka: 0.5,
    kd: 0.9,
    ks: 0.5,
    color: Color::rgb(1.0, 1.0, 1.0),
    phong: 100.0,
};

pub const BUILDING: Surface = Surface {
    ka: 0.5,
    kd: 0.9,
    ks: 0.2,
    color: Color::rgb(0.5, 0.5, 0.5),
    phong: 10.0,
};

#[test]
fn presets_by_name() {
    assert_eq!(Surface::preset("mirror"), Some(MIRROR));
    assert_eq!(Surface::preset("default"), Some(Surface::default()));
    assert_eq!(Surface::preset("velvet"), None);
    assert_eq!(Surface::preset("ocher").map(|s| s.color), Some(Color::rgb(1.0, 1.0 / 1.5, 0.0)));
}
