use std::io::{ self, BufWriter, Write };
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// The framebuffer a render is written into.
///
/// Pixels are stored already resolved to 8 bits per channel (see
/// `Color::to_rgb8`), which is what image encoders and previews consume.
/// Once a render finishes, the `Canvas` can be saved to a PPM file or handed
/// to any other encoder through `read_pixel`.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened, row-major vector.
    pixels: Vec<[u8; 3]>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![[0, 0, 0]; width * height]
        }
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column and `y` the row,
    /// both zero-indexed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted::color::Color;
    /// # use whitted::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), [255, 0, 255]);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel.to_rgb8();
    }

    /// Reads a resolved color from a location on the `Canvas`.
    ///
    /// Returns `None` if the location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Rows of resolved pixels, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]]> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Saves the canvas to a plain (P3) PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes the canvas as plain PPM.
    ///
    /// Lines are clamped to 70 columns. If a value would exceed the 70 column
    /// mark on a line, it is moved to the next line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for row in self.rows() {
            let mut col = 0;
            for value in row.iter().flat_map(|p| p.iter()) {
                let s = value.to_string();
                if col > 0 && col + 1 + s.len() > 70 {
                    writeln!(out)?;
                    col = 0;
                }

                if col > 0 {
                    write!(out, " ")?;
                    col += 1;
                }

                write!(out, "{}", s)?;
                col += s.len();
            }

            writeln!(out)?;
        }

        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    assert!(c.rows().flatten().all(|p| *p == [0, 0, 0]));
}

#[test]
fn out_of_bounds_is_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());
    c.write_pixel(0, 5, &Color::white());

    assert_eq!(c.read_pixel(2, 0), None);
    assert!(c.rows().flatten().all(|p| *p == [0, 0, 0]));
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let mut buf = Vec::new();
    c.write_ppm(&mut buf).unwrap();
    let ppm = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = ppm.lines().collect();

    assert_eq!(lines[0], "P3");
    assert_eq!(lines[1], "5 3");
    assert_eq!(lines[2], "255");
    assert_eq!(lines[3], "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0");
    assert_eq!(lines[4], "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0");
    assert_eq!(lines[5], "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255");
}

#[test]
fn ppm_lines_are_split_at_70_columns() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut buf = Vec::new();
    c.write_ppm(&mut buf).unwrap();
    let ppm = String::from_utf8(buf).unwrap();

    assert!(ppm.lines().all(|l| l.len() <= 70));
    assert_eq!(ppm.lines().nth(3).unwrap(),
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert!(ppm.ends_with('\n'));
}
