use crate::canvas::Canvas;
use crate::ray::Ray;
use crate::transform::Transform;
use crate::vector::{ Point3, Vector3 };

/// A pinhole camera.
///
/// The camera sits at the origin of its own frame, looking down local -Z with
/// +Y up. The sensor is `sensor_width` by `sensor_height`, in the same units
/// as the focal length, and is mapped onto a `width` by `height` pixel grid.
/// The camera owns the canvas the render is written to.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub transform: Transform,

    pub focal: f64,
    pub sensor_width: f64,
    pub sensor_height: f64,

    /// Size of the output image, in pixels.
    pub width: usize,
    pub height: usize,

    pub canvas: Canvas,
}

impl Camera {
    /// Creates a camera from a focal length, a sensor size and the image
    /// width in pixels.
    ///
    /// The image height follows the sensor's aspect ratio:
    ///
    /// ```
    /// # use whitted::camera::Camera;
    /// let c = Camera::new(22.0, 16.0, 9.0, 1920);
    /// assert_eq!((c.width, c.height), (1920, 1080));
    /// ```
    pub fn new(focal: f64, sensor_width: f64, sensor_height: f64, width: usize)
        -> Camera {
        let height = (width as f64 * sensor_height / sensor_width).round() as usize;

        Camera {
            transform: Transform::new(),
            focal,
            sensor_width,
            sensor_height,
            width,
            height,
            canvas: Canvas::new(width, height),
        }
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.transform.translate(x, y, z);
        self
    }

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

    /// Builds the global ray going through a pixel.
    ///
    /// Pixel `(0, 0)` maps to the top-left corner of the sensor. The returned
    /// ray is not normalized.
    pub fn build_ray(&self, x: usize, y: usize) -> Ray {
        let sx = (x as f64 * self.sensor_width) / self.width as f64 - self.sensor_width / 2.0;
        let sy = self.sensor_height / 2.0 - (y as f64 * self.sensor_height) / self.height as f64;

        let local = Ray::new(Point3::ORIGIN, Vector3::new(sx, sy, -self.focal));
        self.transform.ray_to_global(&local)
    }

    /// Projects a global point to pixel coordinates.
    ///
    /// Points behind the camera are pushed to the sensor edge on their side,
    /// so the result may lie outside the image.
    pub fn project(&self, p: Point3) -> (isize, isize) {
        let lp = self.transform.point_to_local(p);

        let (x, y) = if lp.z < 0.0 {
            (self.focal * lp.x / -lp.z, self.focal * lp.y / -lp.z)
        } else {
            ((self.sensor_width / 2.0).copysign(lp.x), (self.sensor_height / 2.0).copysign(lp.y))
        };

        let px = (x + self.sensor_width / 2.0) * self.width as f64 / self.sensor_width;
        let py = self.height as f64
            - (y + self.sensor_height / 2.0) * self.height as f64 / self.sensor_height;

        (px.round() as isize, py.round() as isize)
    }
}

#[test]
fn center_pixel_looks_down_the_axis() {
    let c = Camera::new(2.0, 2.0, 2.0, 32);
    let r = c.build_ray(16, 16);

    assert_eq!(c.height, 32);
    assert_eq!(r.origin, Point3::ORIGIN);
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, -2.0));
}

#[test]
fn corner_pixel_hits_sensor_corner() {
    let c = Camera::new(1.0, 4.0, 2.0, 200);
    let r = c.build_ray(0, 0);

    assert_eq!(c.height, 100);
    assert_eq!(r.direction, Vector3::new(-2.0, 1.0, -1.0));
}

#[test]
fn transformed_camera_ray() {
    let mut c = Camera::new(1.0, 2.0, 2.0, 10);
    c.rotate_y(std::f64::consts::PI / 2.0).translate(0.0, 2.0, -5.0);

    let r = c.build_ray(5, 5);
    assert_eq!(r.origin, Point3::new(0.0, 2.0, -5.0));
    assert_eq!(r.direction, Vector3::new(-1.0, 0.0, 0.0));
}

#[test]
fn project_inverts_build_ray() {
    let mut c = Camera::new(3.0, 4.0, 3.0, 80);
    c.rotate_x(-0.2).rotate_y(0.4).translate(1.0, 2.0, 10.0);

    for &(x, y) in [(0, 0), (40, 30), (13, 51), (79, 59)].iter() {
        let r = c.build_ray(x, y);
        let p = r.position(7.5);

        assert_eq!(c.project(p), (x as isize, y as isize));
    }
}

#[test]
fn project_behind_camera_goes_to_sensor_edge() {
    let c = Camera::new(1.0, 2.0, 2.0, 10);

    assert_eq!(c.project(Point3::new(5.0, 5.0, 1.0)), (10, 0));
    assert_eq!(c.project(Point3::new(-5.0, -5.0, 1.0)), (0, 10));
}
