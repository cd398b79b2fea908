use crate::consts::{ EPSILON, BIG_EPSILON };
use crate::intersect::{ Hit, nearest };
use crate::is_nul;
use crate::ray::Ray;
use crate::surface::Surface;
use crate::transform::Transform;
use crate::vector::{ Point3, Vector3 };

#[derive(Debug, Clone)]
pub enum ShapeType {
    /// A two-sided square at local `y = 0`, spanning `[-1, 1]` in x and z.
    Plane,

    /// A unit sphere with its center at the object-space origin.
    Sphere,

    /// A cube spanning `[-1, 1]` on every axis.
    Cube,

    /// A group of shapes, culled by an enclosing box. Can include other
    /// bounding boxes.
    BoundingBox(BoundingBox),
}

/// Children of a bounding box and the box enclosing them, in the box's
/// local frame.
///
/// The extent is recomputed every time objects are added. It is *not*
/// recomputed when a child is transformed afterwards, so children must be
/// placed before they are added.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    children: Vec<Shape>,
    min: Point3,
    max: Point3,
}

impl Default for BoundingBox {
    fn default() -> BoundingBox {
        BoundingBox {
            children: Vec::new(),
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(-f64::INFINITY, -f64::INFINITY, -f64::INFINITY),
        }
    }
}

impl BoundingBox {
    /// Grows the box so that it encloses `child`.
    ///
    /// The eight corners of the child's own box are moved into this box's
    /// frame with the child's transform, then folded into the extent.
    fn merge(&mut self, child: &Shape) {
        let (lmin, lmax) = child.min_max();

        for i in 0..8 {
            let corner = Point3::new(
                if i & 1 == 0 { lmin.x } else { lmax.x },
                if i & 2 == 0 { lmin.y } else { lmax.y },
                if i & 4 == 0 { lmin.z } else { lmax.z },
            );
            let p = child.transform.point_to_global(corner);

            self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
            self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
        }
    }

    /// Slab test of a local ray against the box extent.
    ///
    /// Only hits in front of the ray origin count; a ray starting inside the
    /// box always hits. An empty box is never hit.
    fn hits_extent(&self, ray: &Ray) -> bool {
        if self.children.is_empty() {
            return false;
        }

        let mut t_near = -f64::INFINITY;
        let mut t_far = f64::INFINITY;

        for axis in 0..3 {
            let o = ray.origin.axis(axis);
            let d = ray.direction.axis(axis);
            let lo = self.min.axis(axis) - EPSILON;
            let hi = self.max.axis(axis) + EPSILON;

            if is_nul(d) {
                if o < lo || o > hi {
                    return false;
                }
                continue;
            }

            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));

            if t_near > t_far {
                return false;
            }
        }

        t_far > EPSILON
    }
}

/// A primitive placed in the scene.
///
/// Every shape is defined in a canonical local frame (see `ShapeType`) and
/// placed with its own `Transform`. Transforms compose in the order they are
/// issued:
///
/// ```
/// # use whitted::shape::Shape;
/// # use whitted::vector::Point3;
/// let mut s = Shape::sphere();
/// s.scale(10.0, 10.0, 10.0).translate(0.0, 0.0, -50.0);
///
/// let (_, max) = s.min_max();
/// assert_eq!(s.transform.point_to_global(max), Point3::new(10.0, 10.0, -40.0));
/// ```
#[derive(Debug, Clone)]
pub struct Shape {
    pub ty: ShapeType,

    /// Material of the shape. Unused by bounding boxes, whose hits carry the
    /// surface of the child that was hit.
    pub surface: Surface,
    pub transform: Transform,

    name: String,
}

impl Default for Shape {
    fn default() -> Shape {
        Shape {
            ty: ShapeType::Sphere,
            surface: Default::default(),
            transform: Transform::new(),
            name: String::new(),
        }
    }
}

impl Shape {
    pub fn plane() -> Shape {
        Shape {
            ty: ShapeType::Plane,
            ..Default::default()
        }
    }

    pub fn sphere() -> Shape {
        Shape {
            ty: ShapeType::Sphere,
            ..Default::default()
        }
    }

    pub fn cube() -> Shape {
        Shape {
            ty: ShapeType::Cube,
            ..Default::default()
        }
    }

    /// Creates an empty bounding box. Fill it with `add_objects`.
    pub fn bounding_box() -> Shape {
        Shape {
            ty: ShapeType::BoundingBox(Default::default()),
            ..Default::default()
        }
    }

    /// Sets the surface, returning `self` for chaining.
    pub fn with_surface(mut self, surface: Surface) -> Shape {
        self.surface = surface;
        self
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.transform.translate(x, y, z);
        self
    }

    /// Scales along each axis. Factors must be non-zero.
    pub fn scale(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.transform.scale(x, y, z);
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

    fn kind(&self) -> &'static str {
        match self.ty {
            ShapeType::Plane => "plane",
            ShapeType::Sphere => "sphere",
            ShapeType::Cube => "cube",
            ShapeType::BoundingBox(_) => "bb",
        }
    }

    /// Names the shape. The name is prefixed with the kind of shape:
    ///
    /// ```
    /// # use whitted::shape::Shape;
    /// let mut s = Shape::cube();
    /// s.set_name("pedestal");
    /// assert_eq!(s.name(), "cube:pedestal");
    /// ```
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = format!("{}:{}", self.kind(), name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds children to a bounding box and grows its extent to enclose them.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a bounding box.
    pub fn add_objects<I: IntoIterator<Item = Shape>>(&mut self, objects: I) {
        let bb = match self.ty {
            ShapeType::BoundingBox(ref mut bb) => bb,
            _ => panic!("Cannot add objects to a non bounding box shape."),
        };

        for o in objects {
            bb.merge(&o);
            bb.children.push(o);
        }
    }

    /// Returns the children if this is a bounding box.
    pub fn children(&self) -> Option<&[Shape]> {
        if let ShapeType::BoundingBox(ref bb) = self.ty {
            Some(&bb.children)
        } else {
            None
        }
    }

    /// The local-frame extent of the shape, as `(min, max)` corners.
    pub fn min_max(&self) -> (Point3, Point3) {
        match self.ty {
            ShapeType::Plane => (Point3::new(-1.0, 0.0, -1.0), Point3::new(1.0, 0.0, 1.0)),
            ShapeType::Sphere | ShapeType::Cube
                => (Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
            ShapeType::BoundingBox(ref bb) => (bb.min, bb.max),
        }
    }

    /// Intersects a ray, given in the shape's parent frame, with the shape.
    ///
    /// Returns the nearest hit in front of the ray origin, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self.ty {
            ShapeType::Plane => self.intersect_plane(ray),
            ShapeType::Sphere => self.intersect_sphere(ray),
            ShapeType::Cube => self.intersect_cube(ray),
            ShapeType::BoundingBox(ref bb) => self.intersect_bounding_box(bb, ray),
        }
    }

    fn intersect_plane(&self, ray: &Ray) -> Option<Hit> {
        let loc_ray = self.transform.ray_to_local(ray);
        let (p, d) = (loc_ray.origin, loc_ray.direction);

        if is_nul(d.y) {
            return None;
        }

        let t = -p.y / d.y;
        if t <= EPSILON {
            return None;
        }

        let x = p.x + t * d.x;
        let z = p.z + t * d.z;
        if !within_unit(x) || !within_unit(z) {
            return None;
        }

        // Two-sided: the normal faces the side the ray comes from.
        let ny = if p.y < 0.0 { -1.0 } else { 1.0 };

        let mut hit = Hit::new(&self.surface, *ray, loc_ray);
        hit.loc_norm = Ray::new(Point3::new(x, 0.0, z), Vector3::new(0.0, ny, 0.0));
        hit.glob_norm = self.transform.normal_to_global(&hit.loc_norm);

        Some(hit)
    }

    fn intersect_sphere(&self, ray: &Ray) -> Option<Hit> {
        let loc_ray = self.transform.ray_to_local(ray);
        let t = match sphere_roots(&loc_ray)? {
            (t1, _) if t1 > EPSILON => t1,
            (_, t2) if t2 > EPSILON => t2,
            _ => return None,
        };

        let lp = loc_ray.position(t);
        let gp = self.transform.point_to_global(lp);

        let mut hit = Hit::new(&self.surface, *ray, loc_ray);
        hit.loc_norm = Ray::new(lp, lp.to_vector());

        // Two points A and B of the local tangent plane at `lp`, solved on the
        // largest coordinate to keep the division well conditioned. Mapped to
        // the global frame, they span the global tangent plane, whose cross
        // product is the global normal under any (even non-uniform) scaling.
        let d = -(lp.x * lp.x + lp.y * lp.y + lp.z * lp.z);
        let (ax, ay, az) = (lp.x.abs(), lp.y.abs(), lp.z.abs());

        let (a, b) = if ax >= ay && ax >= az {
            (Point3::new(-(lp.z + d) / lp.x, 0.0, 1.0),
             Point3::new(-(lp.y + d) / lp.x, 1.0, 0.0))
        } else if ay >= ax && ay >= az {
            (Point3::new(0.0, -(lp.z + d) / lp.y, 1.0),
             Point3::new(1.0, -(lp.x + d) / lp.y, 0.0))
        } else {
            (Point3::new(0.0, 1.0, -(lp.y + d) / lp.z),
             Point3::new(1.0, 0.0, -(lp.x + d) / lp.z))
        };

        let u = self.transform.point_to_global(a) - gp;
        let v = self.transform.point_to_global(b) - gp;

        let mut normal = u.cross(&v).normalized();
        let center = self.transform.point_to_global(Point3::ORIGIN);
        if normal.dot(&(gp - center)) < 0.0 {
            normal = -normal;
        }

        hit.glob_norm = Ray::new(gp, normal);

        Some(hit)
    }

    fn intersect_cube(&self, ray: &Ray) -> Option<Hit> {
        let loc_ray = self.transform.ray_to_local(ray);
        let (p, d) = (loc_ray.origin, loc_ray.direction);

        let mut best_t = f64::INFINITY;
        let mut best = None;

        for axis in 0..3 {
            if is_nul(d.axis(axis)) {
                continue;
            }

            for side in [-1.0, 1.0] {
                let t = (side - p.axis(axis)) / d.axis(axis);
                if t <= EPSILON || t >= best_t {
                    continue;
                }

                let at = loc_ray.position(t);
                let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
                if !within_unit(at.axis(u)) || !within_unit(at.axis(v)) {
                    continue;
                }

                let mut coords = [at.x, at.y, at.z];
                coords[axis] = side;
                let mut normal = [0.0; 3];
                normal[axis] = side;

                best_t = t;
                best = Some(Ray::new(
                    Point3::new(coords[0], coords[1], coords[2]),
                    Vector3::new(normal[0], normal[1], normal[2]),
                ));
            }
        }

        let loc_norm = best?;
        let mut hit = Hit::new(&self.surface, *ray, loc_ray);
        hit.loc_norm = loc_norm;
        hit.glob_norm = self.transform.normal_to_global(&loc_norm);

        Some(hit)
    }

    fn intersect_bounding_box<'a>(&'a self, bb: &'a BoundingBox, ray: &Ray)
        -> Option<Hit<'a>> {
        let loc_ray = self.transform.ray_to_local(ray);
        if !bb.hits_extent(&loc_ray) {
            return None;
        }

        // Children live in the box frame, so their "global" hit data is
        // expressed relative to `loc_ray`.
        let mut closest = bb.children.iter()
            .map(|c| c.intersect(&loc_ray))
            .fold(None, nearest)?;

        closest.glob_ray = *ray;
        closest.glob_norm = self.transform.normal_to_global(&closest.glob_norm);

        Some(closest)
    }
}

/// Coordinate test for the canonical faces, with the same tolerance on both
/// bounds.
fn within_unit(x: f64) -> bool {
    x >= -1.0 - EPSILON && x <= 1.0 + EPSILON
}

/// Solves the intersection of a local ray with the unit sphere.
///
/// Returns both roots of the quadratic in increasing order, or `None` when
/// the discriminant is below `BIG_EPSILON` (no hit, or a grazing one).
pub fn sphere_roots(loc_ray: &Ray) -> Option<(f64, f64)> {
    let (p, d) = (loc_ray.origin.to_vector(), loc_ray.direction);

    let a = d.dot(&d);
    let b = 2.0 * d.dot(&p);
    let c = p.dot(&p) - 1.0;

    let delta = b * b - 4.0 * a * c;
    if delta < BIG_EPSILON || is_nul(a) {
        return None;
    }

    let sqd = delta.sqrt();
    Some(((-b - sqd) / (2.0 * a), (-b + sqd) / (2.0 * a)))
}

#[cfg(test)]
fn look_down_z(z: f64) -> Ray {
    Ray::new(Point3::new(0.0, 0.0, z), Vector3::new(0.0, 0.0, -1.0))
}

#[test]
fn sphere_roots_span_the_diameter() {
    for axis in 0..3 {
        let mut o = [0.0; 3];
        let mut d = [0.0; 3];
        o[axis] = -5.0;
        d[axis] = 1.0;

        let r = Ray::new(Point3::new(o[0], o[1], o[2]), Vector3::new(d[0], d[1], d[2]));
        let (t1, t2) = sphere_roots(&r).unwrap();

        assert!(crate::feq(t2 - t1, 2.0));
        assert!(crate::feq((t1 + t2) / 2.0, 5.0));
    }
}

#[test]
fn sphere_hit_from_outside_and_inside() {
    let s = Shape::sphere();

    let h = s.intersect(&look_down_z(5.0)).unwrap();
    assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.0, 1.0));
    assert_eq!(h.glob_norm.direction, Vector3::new(0.0, 0.0, 1.0));

    // From the center, only the far root is in front of the ray.
    let h = s.intersect(&look_down_z(0.0)).unwrap();
    assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.0, -1.0));
    assert_eq!(h.glob_norm.direction, Vector3::new(0.0, 0.0, -1.0));

    // Behind the ray.
    assert!(s.intersect(&look_down_z(-5.0)).is_none());
}

#[test]
fn sphere_grazing_ray_is_rejected() {
    let s = Shape::sphere();
    let r = Ray::new(Point3::new(1.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));

    assert!(s.intersect(&r).is_none());
}

#[test]
fn transformed_sphere_normal_points_outward() {
    let mut s = Shape::sphere();
    s.scale(1.0, 4.0, 1.0).rotate_z(0.3).translate(2.0, -1.0, -20.0);

    let r = Ray::new(Point3::new(1.5, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
    let h = s.intersect(&r).unwrap();
    let center = s.transform.point_to_global(Point3::ORIGIN);

    assert!(crate::feq(h.glob_norm.direction.norm(), 1.0));
    assert!(h.glob_norm.direction.dot(&(h.glob_norm.origin - center)) > 0.0);
    assert!(h.glob_norm.direction.dot(&r.direction) < 0.0);
}

#[test]
fn scaled_sphere_normal_is_not_skewed() {
    // A flattened sphere seen from above: the normal at the top is straight
    // up even though the scaling is non-uniform.
    let mut s = Shape::sphere();
    s.scale(3.0, 0.5, 3.0);

    let r = Ray::new(Point3::new(0.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
    let h = s.intersect(&r).unwrap();

    assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.5, 0.0));
    assert_eq!(h.glob_norm.direction, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn plane_parallel_ray_never_hits() {
    let mut p = Shape::plane();
    p.scale(7.0, 7.0, 7.0);

    let over = Ray::new(Point3::new(-10.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    let inside = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.3));

    assert!(p.intersect(&over).is_none());
    assert!(p.intersect(&inside).is_none());
}

#[test]
fn plane_normal_faces_the_incoming_side() {
    let p = Shape::plane();

    let from_above = Ray::new(Point3::new(0.5, 2.0, 0.5), Vector3::new(0.0, -1.0, 0.0));
    let h = p.intersect(&from_above).unwrap();
    assert_eq!(h.glob_norm.origin, Point3::new(0.5, 0.0, 0.5));
    assert_eq!(h.glob_norm.direction, Vector3::new(0.0, 1.0, 0.0));

    let from_below = Ray::new(Point3::new(0.5, -2.0, 0.5), Vector3::new(0.0, 1.0, 0.0));
    let h = p.intersect(&from_below).unwrap();
    assert_eq!(h.glob_norm.direction, Vector3::new(0.0, -1.0, 0.0));
}

#[test]
fn plane_is_bounded() {
    let p = Shape::plane();
    let r = Ray::new(Point3::new(1.5, 2.0, 0.0), Vector3::new(0.0, -1.0, 0.0));

    assert!(p.intersect(&r).is_none());
}

#[test]
fn cube_ray_through_center_hits_nearest_face() {
    let c = Shape::cube();
    let rays = [
        (Ray::new(Point3::new(5.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
            Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        (Ray::new(Point3::new(0.0, -5.0, 0.0), Vector3::new(0.0, 1.0, 0.0)),
            Point3::new(0.0, -1.0, 0.0), Vector3::new(0.0, -1.0, 0.0)),
        (look_down_z(5.0),
            Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0)),
        (Ray::new(Point3::new(3.0, 3.0, 3.0), Vector3::new(-1.0, -1.0, -1.0)),
            Point3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 0.0, 0.0)),
    ];

    for (ray, point, normal) in rays.iter() {
        let h = c.intersect(ray).unwrap();
        assert_eq!(h.glob_norm.origin, *point);
        assert!(crate::feq(h.glob_norm.direction.norm(), 1.0));

        // The corner hit may land on any of the three faces.
        if ray.direction.x == ray.direction.y {
            assert!(h.glob_norm.direction.dot(&ray.direction) < 0.0);
        } else {
            assert_eq!(h.glob_norm.direction, *normal);
        }
    }
}

#[test]
fn cube_edges_are_symmetric() {
    let c = Shape::cube();

    // Hitting x = +1 and x = -1 right on the y = 1 edge behaves the same way
    // from both sides.
    let right = Ray::new(Point3::new(5.0, 1.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
    let left = Ray::new(Point3::new(-5.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0));

    assert!(c.intersect(&right).is_some());
    assert!(c.intersect(&left).is_some());
}

#[test]
fn cube_from_inside_hits_exit_face() {
    let mut c = Shape::cube();
    c.scale(2.0, 2.0, 2.0);

    let h = c.intersect(&look_down_z(0.0)).unwrap();
    assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.0, -2.0));
}

/// Checks that a hit normal is perpendicular to the face it was found on,
/// with `direct` mapping the face's frame to the global one.
#[cfg(test)]
fn assert_normal_on_face(h: &Hit, direct: &crate::matrix::Matrix4) {
    let n = h.glob_norm.direction;
    assert!(crate::feq(n.norm(), 1.0));

    for axis in 0..3 {
        if !is_nul(h.loc_norm.direction.axis(axis)) {
            continue;
        }

        let mut e = [0.0; 3];
        e[axis] = 1.0;
        let tangent = *direct * Vector3::new(e[0], e[1], e[2]);
        assert!(crate::feq(n.dot(&tangent.normalized()), 0.0));
    }
}

#[test]
fn normals_survive_rotate_then_scale() {
    let r = Ray::new(Point3::new(-5.0, 5.0, 0.0), Vector3::new(1.0, -1.0, 0.0));
    let skew = |s: &mut Shape| {
        s.rotate_z(std::f64::consts::FRAC_PI_4).scale(1.0, 3.0, 1.0);
    };

    let mut p = Shape::plane();
    skew(&mut p);
    let h = p.intersect(&r).unwrap();
    assert_eq!(h.glob_norm.origin, Point3::ORIGIN);
    assert!(h.glob_norm.direction.dot(&r.direction) < 0.0);
    assert_normal_on_face(&h, p.transform.direct());

    let mut c = Shape::cube();
    skew(&mut c);
    let h = c.intersect(&r).unwrap();
    assert!(h.glob_norm.direction.dot(&r.direction) < 0.0);
    assert_normal_on_face(&h, c.transform.direct());

    // The box carries the skew, its child plane does not.
    let mut bb = Shape::bounding_box();
    bb.add_objects(vec![Shape::plane()]);
    skew(&mut bb);
    let h = bb.intersect(&r).unwrap();
    assert!(h.glob_norm.direction.dot(&r.direction) < 0.0);
    assert_normal_on_face(&h, bb.transform.direct());
}

#[test]
fn bounding_box_encloses_transformed_children() {
    let mut a = Shape::sphere();
    a.translate(5.0, 0.0, 0.0);
    let mut b = Shape::cube();
    b.scale(1.0, 3.0, 1.0).translate(0.0, 0.0, -4.0);

    let mut bb = Shape::bounding_box();
    bb.add_objects(vec![a, b]);

    let (min, max) = bb.min_max();
    assert_eq!(min, Point3::new(-1.0, -3.0, -5.0));
    assert_eq!(max, Point3::new(6.0, 3.0, 1.0));
    assert_eq!(bb.children().unwrap().len(), 2);
}

#[test]
fn bounding_box_returns_nearest_child_in_parent_frame() {
    let mut near = Shape::sphere();
    near.translate(0.0, 0.0, -5.0);
    near.set_name("near");
    let mut far = Shape::sphere();
    far.translate(0.0, 0.0, -10.0);
    far.set_name("far");

    let mut bb = Shape::bounding_box();
    bb.add_objects(vec![far, near]);
    bb.translate(0.0, 0.0, -10.0);

    let r = look_down_z(0.0);
    let h = bb.intersect(&r).unwrap();

    assert_eq!(h.glob_ray, r);
    assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.0, -14.0));
    assert_eq!(h.glob_norm.direction, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn bounding_box_prunes_children_when_extent_is_missed() {
    let mut bb = Shape::bounding_box();
    bb.add_objects(vec![Shape::sphere()]);

    // Move the child after the extent was computed, so the box is stale.
    if let ShapeType::BoundingBox(ref mut inner) = bb.ty {
        inner.children[0].translate(0.0, 0.0, -50.0);
    }

    let r = Ray::new(Point3::new(0.0, 10.0, -50.0), Vector3::new(0.0, -1.0, 0.0));
    let child = &bb.children().unwrap()[0];

    assert!(child.intersect(&r).is_some());
    assert!(bb.intersect(&r).is_none());
}

#[test]
fn empty_bounding_box_never_hits() {
    let bb = Shape::bounding_box();

    assert!(bb.intersect(&look_down_z(5.0)).is_none());
    assert!(bb.intersect(&look_down_z(0.0)).is_none());
}

#[test]
fn nested_bounding_boxes() {
    let mut inner = Shape::bounding_box();
    inner.add_objects(vec![Shape::cube()]);
    inner.scale(2.0, 2.0, 2.0);

    let mut outer = Shape::bounding_box();
    outer.add_objects(vec![inner]);
    outer.translate(0.0, 0.0, -10.0);

    let (min, max) = outer.min_max();
    assert_eq!(min, Point3::new(-2.0, -2.0, -2.0));
    assert_eq!(max, Point3::new(2.0, 2.0, 2.0));

    let h = outer.intersect(&look_down_z(0.0)).unwrap();
    assert_eq!(h.glob_norm.origin, Point3::new(0.0, 0.0, -8.0));
}
