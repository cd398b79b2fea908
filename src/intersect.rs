use crate::ray::Ray;
use crate::surface::Surface;

/// An intersection record.
///
/// A `Hit` is produced by a single intersection query and dropped once the
/// hit has been shaded. It borrows the surface of the primitive that was hit.
///
/// The "normal rays" carry the hit point as their origin and the outward unit
/// normal as their direction. `glob_*` fields are expressed in the frame of
/// whoever asked for the intersection (the scene, or an enclosing bounding
/// box); `loc_*` fields are in the primitive's canonical frame.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    /// Material properties of the primitive that was hit.
    pub surface: &'a Surface,

    /// The incident ray, in the caller's frame.
    pub glob_ray: Ray,

    /// The incident ray, in the primitive's local frame.
    pub loc_ray: Ray,

    /// Hit point and normal, in the primitive's local frame.
    pub loc_norm: Ray,

    /// Hit point and unit normal, in the caller's frame.
    pub glob_norm: Ray,
}

impl<'a> Hit<'a> {
    /// Creates a hit with normal rays left at their defaults; the primitive
    /// fills them in.
    pub fn new(surface: &'a Surface, glob_ray: Ray, loc_ray: Ray) -> Hit<'a> {
        Hit {
            surface,
            glob_ray,
            loc_ray,
            loc_norm: Default::default(),
            glob_norm: Default::default(),
        }
    }

    /// Squared distance from the incident ray's origin to the hit point.
    pub fn square_dist(&self) -> f64 {
        self.glob_ray.origin.square_dist(&self.glob_norm.origin)
    }

    /// Distance from the incident ray's origin to the hit point.
    pub fn dist(&self) -> f64 {
        self.glob_ray.origin.dist(&self.glob_norm.origin)
    }
}

/// Keeps the nearer of two optional hits, by squared distance from the
/// incident ray origin.
pub fn nearest<'a>(a: Option<Hit<'a>>, b: Option<Hit<'a>>) -> Option<Hit<'a>> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if b.square_dist() < a.square_dist() { Some(b) } else { Some(a) }
        },
        (a, None) => a,
        (None, b) => b,
    }
}

#[test]
fn nearest_prefers_closer_hit() {
    use crate::vector::{ Point3, Vector3 };

    let s = Surface::default();
    let r = Ray::new(Point3::ORIGIN, Vector3::new(0.0, 0.0, -1.0));

    let mut far = Hit::new(&s, r, r);
    far.glob_norm.origin = Point3::new(0.0, 0.0, -10.0);
    let mut close = Hit::new(&s, r, r);
    close.glob_norm.origin = Point3::new(0.0, 0.0, -2.0);

    let n = nearest(Some(far), Some(close)).unwrap();
    assert_eq!(n.dist(), 2.0);
    assert_eq!(nearest(None, Some(far)).unwrap().dist(), 10.0);
    assert!(nearest(None, None).is_none());
}
