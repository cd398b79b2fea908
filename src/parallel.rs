use std::iter;
use std::mem;
use std::panic::{ self, AssertUnwindSafe };
use std::sync::mpsc::{ self, Receiver, SendError, SyncSender };
use std::sync::{ Arc, Mutex };
use std::thread;
use std::time::{ Duration, Instant };

use log::{ debug, info };
use serde::{ Serialize, Deserialize };

use crate::canvas::Canvas;
use crate::color::Color;
use crate::consts::{ BATCH_SIZE, CHANNEL_CAPACITY, WORKER_DIVISOR };
use crate::error::RenderError;
use crate::scene::Scene;

/// A unit of work flowing through the render pipeline.
///
/// `(x, y)` is the pixel a ray is traced for. `w` and `h` give the size of
/// the image region the pixel stands for: during a progressive render the
/// first pixels are painted as coarse blocks by previews. Only the pixel
/// itself is written to the canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
    pub color: Color,
}

impl Pixel {
    pub fn region(x: usize, y: usize, w: usize, h: usize) -> Pixel {
        Pixel { x, y, w, h, color: Color::black() }
    }
}

/// Order in which pixels are handed to the trace workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOrder {
    /// Row by row, from the top-left pixel.
    Linear,

    /// Coarse to fine: the whole image first, then blocks halving in size
    /// down to single pixels.
    Progressive,
}

impl Default for TraceOrder {
    fn default() -> TraceOrder {
        TraceOrder::Progressive
    }
}

/// Render pipeline parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Number of trace workers. `None` uses a quarter of the available
    /// hardware threads.
    pub workers: Option<usize>,
    pub order: TraceOrder,

    /// Pixels per message on the pipeline channels.
    pub batch_size: usize,

    /// Messages each pipeline channel holds before its producer blocks.
    pub channel_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            workers: None,
            order: Default::default(),
            batch_size: BATCH_SIZE,
            channel_capacity: CHANNEL_CAPACITY,
        }
    }
}

impl RenderConfig {
    /// The number of trace workers to start, at least 1.
    pub fn worker_count(&self) -> usize {
        let n = self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1) / WORKER_DIVISOR
        });

        n.max(1)
    }
}

/// Receives traced pixels as they are drawn, e.g. to show a live preview.
pub trait PreviewSink {
    /// Called by the draw stage for every batch, after it hit the canvas.
    fn draw_pixels(&mut self, pixels: &[Pixel]);

    /// Called once, after the last batch.
    fn end_render(&mut self);
}

/// A preview that shows nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPreview;

impl PreviewSink for NoPreview {
    fn draw_pixels(&mut self, _pixels: &[Pixel]) {}

    fn end_render(&mut self) {}
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Pixels written to the canvas.
    pub pixels: usize,

    /// Batches received by the draw stage.
    pub batches: usize,

    pub elapsed: Duration,
}

/// Accumulates pixels and sends them in batches of `size`.
struct PixelBatch<'a> {
    pixels: Vec<Pixel>,
    size: usize,
    sender: &'a SyncSender<Vec<Pixel>>,
}

impl<'a> PixelBatch<'a> {
    fn new(sender: &'a SyncSender<Vec<Pixel>>, size: usize) -> PixelBatch<'a> {
        let size = size.max(1);
        PixelBatch { pixels: Vec::with_capacity(size), size, sender }
    }

    fn add(&mut self, p: Pixel) -> Result<(), SendError<Vec<Pixel>>> {
        self.pixels.push(p);
        if self.pixels.len() >= self.size {
            self.flush()
        } else {
            Ok(())
        }
    }

    fn flush(&mut self) -> Result<(), SendError<Vec<Pixel>>> {
        if self.pixels.is_empty() {
            return Ok(());
        }

        let batch = mem::replace(&mut self.pixels, Vec::with_capacity(self.size));
        self.sender.send(batch)
    }
}

/// Every pixel of the image, row by row.
pub fn linear_order(width: usize, height: usize) -> impl Iterator<Item = Pixel> {
    (0..height).flat_map(move |y| (0..width).map(move |x| Pixel::region(x, y, 1, 1)))
}

/// Every pixel of the image, coarse to fine.
///
/// The first pixel stands for the whole image. Then, for block sizes from the
/// largest power of two not above the image's largest side down to 1, one
/// pixel per block of the grid, skipping blocks whose corner was already
/// emitted on a coarser grid. Every pixel is emitted exactly once.
///
/// ```
/// # use whitted::parallel::progressive_order;
/// let order: Vec<_> = progressive_order(2, 2).map(|p| (p.x, p.y, p.w)).collect();
/// assert_eq!(order, vec![(0, 0, 2), (1, 0, 1), (0, 1, 1), (1, 1, 1)]);
/// ```
pub fn progressive_order(width: usize, height: usize) -> impl Iterator<Item = Pixel> {
    let mut pow = 1;
    let mut t = width.max(height);
    while t > 1 {
        pow *= 2;
        t /= 2;
    }

    let whole = if width > 0 && height > 0 {
        Some(Pixel::region(0, 0, width, height))
    } else {
        None
    };

    let sizes = iter::successors(Some(pow), |m| if *m > 1 { Some(m / 2) } else { None });
    let blocks = sizes.flat_map(move |m| {
        (0..height).step_by(m).flat_map(move |y| {
            (0..width).step_by(m)
                .filter(move |x| x % (2 * m) != 0 || y % (2 * m) != 0)
                .map(move |x| Pixel::region(x, y, m, m))
        })
    });

    whole.into_iter().chain(blocks)
}

/// Pixel generator stage. Stops early if every worker is gone.
fn generate(order: TraceOrder, width: usize, height: usize, batch_size: usize,
    sender: SyncSender<Vec<Pixel>>) {
    let mut batch = PixelBatch::new(&sender, batch_size);
    let mut pixels: Box<dyn Iterator<Item = Pixel>> = match order {
        TraceOrder::Linear => Box::new(linear_order(width, height)),
        TraceOrder::Progressive => Box::new(progressive_order(width, height)),
    };

    let sent = pixels.try_for_each(|p| batch.add(p)).and_then(|_| batch.flush());
    if sent.is_err() {
        debug!("generator stopped: no trace worker left");
    } else {
        debug!("generator done");
    }
}

impl Scene {
    /// Renders the scene into the camera canvas, with the default pipeline
    /// configuration and no preview.
    pub fn raytrace(&mut self) -> Result<RenderStats, RenderError> {
        self.raytrace_with(&RenderConfig::default(), &mut NoPreview)
    }

    /// Renders the scene into the camera canvas.
    ///
    /// Runs a generator thread, a pool of trace workers and a coordinator on
    /// scoped threads, connected by bounded channels. The calling thread is
    /// the draw stage: it writes the canvas and feeds `preview`. Blocks until
    /// every pixel is drawn.
    ///
    /// If any stage panics, the render fails and the canvas content is
    /// unspecified.
    pub fn raytrace_with(&mut self, config: &RenderConfig, preview: &mut dyn PreviewSink)
        -> Result<RenderStats, RenderError> {
        let start = Instant::now();
        let (width, height) = (self.camera.width, self.camera.height);
        let workers = config.worker_count();

        let mut canvas = mem::take(&mut self.camera.canvas);
        if canvas.width != width || canvas.height != height {
            canvas = Canvas::new(width, height);
        }

        info!("rendering {}x{} pixels, {} objects, {} lights, {} trace workers, {:?} order",
            width, height, self.objects().len(), self.lights().len(), workers, config.order);

        let scene: &Scene = self;
        let (drawn, coordinated) = thread::scope(|s| {
            let (trace_tx, trace_rx) = mpsc::sync_channel(config.channel_capacity);
            let (draw_tx, draw_rx) = mpsc::sync_channel(config.channel_capacity);
            let trace_rx = Arc::new(Mutex::new(trace_rx));

            let (order, batch_size) = (config.order, config.batch_size);
            let generator = s.spawn(move || {
                generate(order, width, height, batch_size, trace_tx)
            });

            let pool: Vec<_> = (0..workers).map(|id| {
                let receiver = Arc::clone(&trace_rx);
                let sender = draw_tx.clone();
                s.spawn(move || scene.trace_worker(id, receiver, sender, batch_size))
            }).collect();

            // Only the workers hold the trace receiver, so the generator
            // stops if they all die.
            drop(trace_rx);

            // The coordinator owns the last draw sender: the draw channel
            // closes once every worker and the generator are joined.
            let coordinator = s.spawn(move || {
                let failed = pool.into_iter()
                    .map(|w| w.join())
                    .filter(|r| r.is_err())
                    .count();
                let generated = generator.join();

                debug!("trace workers joined, closing draw channel");
                drop(draw_tx);

                if failed > 0 {
                    Err(RenderError::WorkerPanicked(failed))
                } else if generated.is_err() {
                    Err(RenderError::GeneratorPanicked)
                } else {
                    Ok(())
                }
            });

            let drawn = panic::catch_unwind(AssertUnwindSafe(|| {
                draw(draw_rx, &mut canvas, preview)
            }));

            let coordinated = coordinator.join()
                .unwrap_or(Err(RenderError::GeneratorPanicked));

            (drawn, coordinated)
        });

        self.camera.canvas = canvas;

        let (pixels, batches) = drawn.map_err(|_| RenderError::DrawPanicked)?;
        coordinated?;

        let stats = RenderStats { pixels, batches, elapsed: start.elapsed() };
        info!("rendered {} pixels in {} batches, {:.3}s",
            stats.pixels, stats.batches, stats.elapsed.as_secs_f64());

        Ok(stats)
    }

    /// Trace worker stage: turns pixels into colored pixels until the trace
    /// channel is drained and closed.
    fn trace_worker(&self, id: usize, receiver: Arc<Mutex<Receiver<Vec<Pixel>>>>,
        sender: SyncSender<Vec<Pixel>>, batch_size: usize) {
        let mut out = PixelBatch::new(&sender, batch_size);
        let mut traced = 0usize;

        loop {
            // A worker never panics while holding the lock, so a poisoned
            // lock is still usable.
            let batch = match receiver.lock() {
                Ok(rx) => rx.recv(),
                Err(poisoned) => poisoned.into_inner().recv(),
            };

            let batch = match batch {
                Ok(batch) => batch,
                Err(_) => break,
            };

            for mut p in batch {
                let mut ray = self.camera.build_ray(p.x, p.y).with_pixel(Some((p.x, p.y)));
                ray.normalize();
                p.color = self.trace(&ray, 0);
                traced += 1;

                if out.add(p).is_err() {
                    debug!("trace worker {} stopped: draw stage is gone", id);
                    return;
                }
            }
        }

        if out.flush().is_err() {
            debug!("trace worker {} stopped: draw stage is gone", id);
            return;
        }
        debug!("trace worker {} done, {} rays", id, traced);
    }
}

/// Draw stage: the only writer of the canvas.
fn draw(receiver: Receiver<Vec<Pixel>>, canvas: &mut Canvas, preview: &mut dyn PreviewSink)
    -> (usize, usize) {
    let (mut pixels, mut batches) = (0, 0);

    for batch in receiver {
        for p in batch.iter() {
            canvas.write_pixel(p.x, p.y, &p.color);
        }

        pixels += batch.len();
        batches += 1;
        preview.draw_pixels(&batch);
    }

    preview.end_render();
    (pixels, batches)
}

#[cfg(test)]
use crate::camera::Camera;
#[cfg(test)]
use crate::light::PointLight;
#[cfg(test)]
use crate::shape::Shape;

#[cfg(test)]
fn sphere_scene() -> Scene {
    let mut ball = Shape::sphere();
    ball.scale(10.0, 10.0, 10.0).translate(0.0, 0.0, -50.0);

    let mut light = PointLight::new(Color::white());
    light.translate(10.0, 10.0, 0.0);

    let mut scene = Scene::new(Camera::new(2.0, 2.0, 2.0, 32));
    scene.add_objects(vec![ball]);
    scene.add_light(light);
    scene
}

#[cfg(test)]
#[derive(Default)]
struct Recorder {
    pixels: Vec<Pixel>,
    ended: usize,
}

#[cfg(test)]
impl PreviewSink for Recorder {
    fn draw_pixels(&mut self, pixels: &[Pixel]) {
        assert_eq!(self.ended, 0);
        self.pixels.extend_from_slice(pixels);
    }

    fn end_render(&mut self) {
        self.ended += 1;
    }
}

#[cfg(test)]
fn coverage(pixels: impl Iterator<Item = Pixel>, width: usize, height: usize) -> Vec<usize> {
    let mut seen = vec![0; width * height];
    for p in pixels {
        seen[p.y * width + p.x] += 1;
    }
    seen
}

#[test]
fn linear_order_is_row_major() {
    let order: Vec<_> = linear_order(3, 2).map(|p| (p.x, p.y)).collect();

    assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
}

#[test]
fn progressive_order_emits_every_pixel_once() {
    for &(w, h) in [(1, 1), (2, 2), (5, 3), (16, 16), (17, 9), (3, 40)].iter() {
        let seen = coverage(progressive_order(w, h), w, h);
        assert!(seen.iter().all(|n| *n == 1), "{}x{}: {:?}", w, h, seen);
    }

    assert_eq!(progressive_order(0, 4).count(), 0);
}

#[test]
fn progressive_order_goes_coarse_to_fine() {
    let order: Vec<_> = progressive_order(17, 9).collect();

    assert_eq!((order[0].w, order[0].h), (17, 9));
    assert_eq!(order[1].w, 16);
    assert!(order[1..].windows(2).all(|p| p[0].w >= p[1].w));
    assert!(order.iter().all(|p| p.x < 17 && p.y < 9));
}

#[test]
fn pixel_batches_are_bounded() {
    let (tx, rx) = mpsc::sync_channel(10);
    {
        let mut batch = PixelBatch::new(&tx, 4);
        for p in linear_order(5, 2) {
            batch.add(p).unwrap();
        }
        batch.flush().unwrap();
        batch.flush().unwrap();
    }
    drop(tx);

    let sizes: Vec<_> = rx.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
}

#[test]
fn worker_count_has_a_floor() {
    let mut config = RenderConfig::default();
    assert!(config.worker_count() >= 1);

    config.workers = Some(0);
    assert_eq!(config.worker_count(), 1);

    config.workers = Some(3);
    assert_eq!(config.worker_count(), 3);
}

#[test]
fn lit_sphere_is_brighter_than_background() {
    for order in [TraceOrder::Linear, TraceOrder::Progressive] {
        let mut scene = sphere_scene();
        let config = RenderConfig { workers: Some(2), order, ..Default::default() };

        let stats = scene.raytrace_with(&config, &mut NoPreview).unwrap();
        assert_eq!(stats.pixels, 32 * 32);

        let sum = |p: [u8; 3]| p.iter().map(|c| *c as u32).sum::<u32>();
        let canvas = &scene.camera.canvas;
        let center = canvas.read_pixel(16, 16).unwrap();
        let corner = canvas.read_pixel(0, 0).unwrap();

        assert_eq!(corner, [26, 26, 26]);
        assert!(sum(center) > sum(corner));
    }
}

#[test]
fn render_does_not_depend_on_order_or_workers() {
    let mut a = sphere_scene();
    let mut b = sphere_scene();

    a.raytrace_with(&RenderConfig {
        workers: Some(1), order: TraceOrder::Linear, ..Default::default()
    }, &mut NoPreview).unwrap();
    b.raytrace_with(&RenderConfig {
        workers: Some(4), order: TraceOrder::Progressive, batch_size: 3, channel_capacity: 1,
    }, &mut NoPreview).unwrap();

    assert_eq!(a.camera.canvas, b.camera.canvas);
}

#[test]
fn preview_sees_every_pixel_then_end() {
    let mut scene = sphere_scene();
    let mut recorder = Recorder::default();

    let stats = scene.raytrace_with(&RenderConfig::default(), &mut recorder).unwrap();

    assert_eq!(recorder.ended, 1);
    assert_eq!(recorder.pixels.len(), stats.pixels);
    assert!(coverage(recorder.pixels.into_iter(), 32, 32).iter().all(|n| *n == 1));
}

#[test]
fn raytrace_fills_the_camera_canvas() {
    let mut scene = sphere_scene();
    let stats = scene.raytrace().unwrap();

    assert_eq!(stats.pixels, 32 * 32);
    assert!(stats.batches >= 32 * 32 / BATCH_SIZE);
    assert_eq!(scene.camera.canvas.width, 32);
}

#[test]
fn panicking_worker_fails_the_render() {
    #[derive(Debug)]
    struct Broken;

    impl crate::light::Light for Broken {
        fn ray_to_light(&self, point: crate::vector::Point3) -> crate::ray::Ray {
            crate::ray::Ray::between(point, crate::vector::Point3::ORIGIN)
        }

        fn color(&self, _ray: &crate::ray::Ray) -> Color {
            panic!("broken light");
        }

        fn is_sun(&self) -> bool {
            false
        }
    }

    let mut scene = sphere_scene();
    scene.add_light(Broken);

    let config = RenderConfig { workers: Some(2), ..Default::default() };
    match scene.raytrace_with(&config, &mut NoPreview) {
        Err(RenderError::WorkerPanicked(n)) => assert!(n >= 1),
        other => panic!("unexpected render result: {:?}", other),
    }
}
