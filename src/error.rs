use thiserror::Error;

/// The device could not deliver a frame this tick. Never fatal to the
/// pipeline; the render loop skips the tick and retries.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("camera returned no frame: {0}")]
    Capture(String),

    #[error("failed to decode camera frame: {0}")]
    Decode(String),

    #[error("frame source is closed")]
    Closed,
}

#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    /// Both cursors sit on the same pixel column; no line can be fit.
    #[error("calibration cursors coincide at pixel {pixel}; two distinct positions are required")]
    CoincidentPoints { pixel: f64 },
}
