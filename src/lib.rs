//! Webcam spectrometer core: reduces a camera frame's region of interest to
//! a per-column mean intensity profile and maps its axis from pixel index to
//! wavelength via a two-point linear calibration.
//!
//! The pipeline is single-threaded and cooperative: [`pipeline::RenderLoop`]
//! pulls one frame per tick from a [`camera::FrameSource`], reduces it with
//! [`reducer::reduce`], transforms the axis per the current
//! [`calibration::CalibrationModel`], and hands the curve to a
//! [`display::SpectrumView`]. UI state (ROI, cursors) stays owned by the
//! view and is read fresh every tick.

pub mod axis;
pub mod calibration;
pub mod camera;
pub mod config;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod reducer;
pub mod types;

pub use axis::{axis_for, AxisLabel};
pub use calibration::{CalibrationModel, CalibrationPoint, LinearFit};
pub use camera::{CameraSource, FrameSource, SyntheticSource};
pub use display::{SpectrumCurve, SpectrumView};
pub use error::{AcquisitionError, CalibrationError};
pub use pipeline::{LoopState, RenderLoop, TickOutcome};
pub use types::Region;
