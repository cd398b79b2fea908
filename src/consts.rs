// Floating point tolerances
pub const EPSILON: f64 = 1e-8;
pub const BIG_EPSILON: f64 = 1e-3;
pub const FEQ_EPSILON: f64 = 0.0001;

// Shading
pub const MAX_DEPTH: usize = 7;
pub const ATTENUATION_FACTOR: f64 = 0.01;
pub const BACKGROUND: (f64, f64, f64) = (0.1, 0.1, 0.1);

// Render pipeline
pub const BATCH_SIZE: usize = 16;
pub const CHANNEL_CAPACITY: usize = 1000;
pub const WORKER_DIVISOR: usize = 4;

// Output
pub const OUT_FILE: &str = "./out.ppm";
