use thiserror::Error;

/// Errors raised while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown surface preset: {0}")]
    UnknownPreset(String),

    #[error("Zero scale factor on {0}")]
    ZeroScale(String),

    #[error("Only bounding boxes have children, found some on {0}")]
    UnexpectedChildren(String),

    #[error("Camera needs a positive focal length, sensor size and image width")]
    InvalidCamera,
}

/// Errors raised by the render pipeline.
///
/// Any stage panicking fails the whole render; the canvas is then left in
/// an unspecified state.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{0} trace worker(s) panicked")]
    WorkerPanicked(usize),

    #[error("Pixel generator panicked")]
    GeneratorPanicked,

    #[error("Draw stage panicked")]
    DrawPanicked,
}
