use anyhow::{anyhow, Context, Result};
use colored::*;
use image::{imageops, DynamicImage, GrayImage, Luma};
use log::debug;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, ControlValueSetter, KnownCameraControl, RequestedFormat, RequestedFormatType},
    Camera,
};

use crate::error::AcquisitionError;

/// Anything that can deliver ordered single-channel frames to the pipeline.
pub trait FrameSource {
    /// Deliver the next frame, flips already applied.
    fn next_frame(&mut self) -> Result<GrayImage, AcquisitionError>;

    /// `(width, height)` of delivered frames.
    fn dimensions(&self) -> (u32, u32);

    /// Set both flip toggles. Applied horizontal-first on every frame, so
    /// enabling both is a 180° rotation.
    fn set_flip(&mut self, horizontal: bool, vertical: bool);
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Result<GrayImage, AcquisitionError> {
        (**self).next_frame()
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        (**self).set_flip(horizontal, vertical)
    }
}

/// Numeric device properties the operator may tune. Not every webcam
/// supports all of them; a rejected set is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraProperty {
    Exposure,
    Gain,
    Brightness,
    Contrast,
}

impl CameraProperty {
    fn control(&self) -> KnownCameraControl {
        match self {
            CameraProperty::Exposure => KnownCameraControl::Exposure,
            CameraProperty::Gain => KnownCameraControl::Gain,
            CameraProperty::Brightness => KnownCameraControl::Brightness,
            CameraProperty::Contrast => KnownCameraControl::Contrast,
        }
    }
}

pub fn apply_flips(frame: &mut GrayImage, horizontal: bool, vertical: bool) {
    if horizontal {
        imageops::flip_horizontal_in_place(frame);
    }
    if vertical {
        imageops::flip_vertical_in_place(frame);
    }
}

/// Live webcam source. Owns the device handle for the process lifetime; the
/// stream is opened once here and closed when the source is dropped.
pub struct CameraSource {
    camera: Camera,
    flip_h: bool,
    flip_v: bool,
}

impl CameraSource {
    pub fn new(index: usize) -> Result<Self> {
        let cam_index = CameraIndex::Index(index as u32);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera =
            Camera::new(cam_index, requested).context("Failed to create camera instance")?;

        camera
            .open_stream()
            .map_err(|e| anyhow!(e))
            .context("Failed to open camera stream")?;

        println!(
            "{}",
            format!("Opened camera: {}", camera.info().human_name()).green()
        );
        println!("Format: {}", camera.camera_format());

        Ok(Self {
            camera,
            flip_h: false,
            flip_v: false,
        })
    }

    pub fn name(&self) -> String {
        self.camera.info().human_name()
    }

    /// Best-effort property set. Unsupported controls are common on cheap
    /// webcams, so a failure is logged and swallowed.
    pub fn set_property(&mut self, prop: CameraProperty, value: i64) {
        if let Err(e) = self
            .camera
            .set_camera_control(prop.control(), ControlValueSetter::Integer(value))
        {
            debug!("camera rejected {:?}={}: {}", prop, value, e);
        }
    }

    pub fn property(&self, prop: CameraProperty) -> Option<i64> {
        match self.camera.camera_control(prop.control()).ok()?.value() {
            ControlValueSetter::Integer(v) => Some(v),
            _ => None,
        }
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<GrayImage, AcquisitionError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| AcquisitionError::Capture(e.to_string()))?;
        let rgb = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| AcquisitionError::Decode(e.to_string()))?;

        // BT.709 luma collapse (image crate's sRGB weights); the rest of the
        // pipeline only ever sees a single channel.
        let mut gray = DynamicImage::ImageRgb8(rgb).into_luma8();
        apply_flips(&mut gray, self.flip_h, self.flip_v);
        Ok(gray)
    }

    fn dimensions(&self) -> (u32, u32) {
        let res = self.camera.resolution();
        (res.width(), res.height())
    }

    fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        self.flip_h = horizontal;
        self.flip_v = vertical;
    }
}

/// Deterministic stand-in for a real camera: a handful of emission-style
/// lines over a dark baseline, with a mild vertical falloff so flips are
/// visible. Lets the app and the integration tests run without hardware.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    flip_h: bool,
    flip_v: bool,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            flip_h: false,
            flip_v: false,
        }
    }

    fn intensity(&self, x: u32, y: u32) -> u8 {
        // (center fraction, amplitude, sigma in px)
        const LINES: [(f64, f64, f64); 3] = [(0.22, 200.0, 3.0), (0.45, 255.0, 2.5), (0.71, 150.0, 4.0)];
        let mut v = 8.0;
        for (frac, amp, sigma) in LINES {
            let d = x as f64 - frac * self.width as f64;
            v += amp * (-d * d / (2.0 * sigma * sigma)).exp();
        }
        let falloff = 1.0 - 0.2 * (y as f64 / self.height.max(1) as f64);
        (v * falloff).round().clamp(0.0, 255.0) as u8
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<GrayImage, AcquisitionError> {
        let mut frame = GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([self.intensity(x, y)])
        });
        apply_flips(&mut frame, self.flip_h, self.flip_v);
        Ok(frame)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        self.flip_h = horizontal;
        self.flip_v = vertical;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame() -> GrayImage {
        GrayImage::from_fn(5, 4, |x, y| Luma([(x * 10 + y) as u8]))
    }

    #[test]
    fn flips_are_idempotent_toggles() {
        let original = test_frame();
        let mut frame = original.clone();
        apply_flips(&mut frame, true, false);
        assert_ne!(frame, original);
        apply_flips(&mut frame, true, false);
        assert_eq!(frame, original);

        let mut frame = original.clone();
        apply_flips(&mut frame, false, true);
        apply_flips(&mut frame, false, true);
        assert_eq!(frame, original);
    }

    #[test]
    fn both_flips_equal_half_turn_in_either_order() {
        let original = test_frame();

        let mut both = original.clone();
        apply_flips(&mut both, true, true);

        let mut v_then_h = original.clone();
        apply_flips(&mut v_then_h, false, true);
        apply_flips(&mut v_then_h, true, false);
        assert_eq!(both, v_then_h);

        let rotated = imageops::rotate180(&original);
        assert_eq!(both, rotated);
    }

    #[test]
    fn synthetic_source_is_deterministic_and_sized() {
        let mut src = SyntheticSource::new(320, 240);
        let a = src.next_frame().unwrap();
        let b = src.next_frame().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), (320, 240));
        assert_eq!(src.dimensions(), (320, 240));
    }

    #[test]
    fn synthetic_flip_v_changes_frame() {
        let mut src = SyntheticSource::new(64, 48);
        let plain = src.next_frame().unwrap();
        src.set_flip(false, true);
        let flipped = src.next_frame().unwrap();
        assert_ne!(plain, flipped);
        assert_eq!(imageops::flip_vertical(&plain), flipped);
    }
}
