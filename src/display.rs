use anyhow::Result;
use image::GrayImage;

use crate::axis::AxisLabel;
use crate::error::AcquisitionError;
use crate::types::Region;

/// One tick's worth of plot data: x-coordinates, per-column mean
/// intensities, and which quantity x currently carries.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumCurve {
    pub axis: Vec<f64>,
    pub intensity: Vec<f64>,
    pub label: AxisLabel,
}

/// The display collaborator as seen from the render loop. The view owns all
/// mutable UI state (ROI, cursors); the loop only reads the region fresh
/// each tick and pushes results back.
pub trait SpectrumView {
    /// Current region of interest, read once per tick.
    fn region(&self) -> Region;

    /// A successful tick: the displayable frame plus the reduced curve.
    fn present(&mut self, frame: &GrayImage, curve: &SpectrumCurve) -> Result<()>;

    /// Transient status; the previous curve stays on screen.
    fn acquisition_failed(&mut self, _err: &AcquisitionError) {}
}

/// Operator intents the view cannot act on alone because the loop or the
/// frame source owns the state they touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ToggleFlipH,
    ToggleFlipV,
    ApplyCalibration,
    Quit,
}

const PLOT_HEIGHT: usize = 200;
const ROI_STEP: f64 = 5.0;
const CURSOR_STEP: f64 = 2.0;

/// Starting cursor positions: quarter and three-quarter marks of the
/// profile. Cursors live in profile-index space, so they are placed
/// relative to the region width, not the frame width.
fn initial_cursors(profile_width: f64) -> [f64; 2] {
    [profile_width * 0.25, profile_width * 0.75]
}

/// minifb window showing the live frame above a crude spectrum plot, with
/// the ROI outline and the two calibration cursors drawn on top. Keyboard
/// replaces the mouse: arrows move the ROI, W/S/A/D resize it, Q/E and U/O
/// move the cursors, H/V flip, C calibrates.
pub struct SpectrumWindow {
    window: minifb::Window,
    buffer: Vec<u32>,
    frame_w: usize,
    frame_h: usize,
    region: Region,
    cursors: [f64; 2],
    label: AxisLabel,
}

impl SpectrumWindow {
    pub fn new(title: &str, frame_w: usize, frame_h: usize, region: Region) -> Result<Self> {
        let window = minifb::Window::new(
            title,
            frame_w,
            frame_h + PLOT_HEIGHT,
            minifb::WindowOptions::default(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create window: {}", e))?;

        Ok(Self {
            window,
            buffer: vec![0; frame_w * (frame_h + PLOT_HEIGHT)],
            frame_w,
            frame_h,
            region,
            cursors: initial_cursors(region.width),
            label: AxisLabel::PixelIndex,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn cursors(&self) -> [f64; 2] {
        self.cursors
    }

    /// Translate this round of keyboard input into ROI/cursor mutations
    /// (applied here) and actions for state the view does not own.
    pub fn handle_input(&mut self) -> Vec<UiAction> {
        use minifb::Key;

        let mut actions = Vec::new();
        if self.window.is_key_down(Key::Escape) {
            actions.push(UiAction::Quit);
        }

        // Held keys: continuous ROI and cursor movement.
        if self.window.is_key_down(Key::Left) {
            self.region.shift(-ROI_STEP, 0.0);
        }
        if self.window.is_key_down(Key::Right) {
            self.region.shift(ROI_STEP, 0.0);
        }
        if self.window.is_key_down(Key::Up) {
            self.region.shift(0.0, -ROI_STEP);
        }
        if self.window.is_key_down(Key::Down) {
            self.region.shift(0.0, ROI_STEP);
        }
        if self.window.is_key_down(Key::A) {
            self.region.resize(-ROI_STEP, 0.0);
        }
        if self.window.is_key_down(Key::D) {
            self.region.resize(ROI_STEP, 0.0);
        }
        if self.window.is_key_down(Key::W) {
            self.region.resize(0.0, ROI_STEP);
        }
        if self.window.is_key_down(Key::S) {
            self.region.resize(0.0, -ROI_STEP);
        }
        if self.window.is_key_down(Key::Q) {
            self.cursors[0] -= CURSOR_STEP;
        }
        if self.window.is_key_down(Key::E) {
            self.cursors[0] += CURSOR_STEP;
        }
        if self.window.is_key_down(Key::U) {
            self.cursors[1] -= CURSOR_STEP;
        }
        if self.window.is_key_down(Key::O) {
            self.cursors[1] += CURSOR_STEP;
        }

        // Single-press toggles.
        for key in self.window.get_keys_pressed(minifb::KeyRepeat::No) {
            match key {
                Key::H => actions.push(UiAction::ToggleFlipH),
                Key::V => actions.push(UiAction::ToggleFlipV),
                Key::C => actions.push(UiAction::ApplyCalibration),
                _ => {}
            }
        }
        actions
    }

    /// Pump the event loop on ticks that produced nothing to draw, so the
    /// window stays responsive while showing the previous content.
    pub fn idle(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.frame_w, self.frame_h + PLOT_HEIGHT)
            .map_err(|e| anyhow::anyhow!("Window update failed: {}", e))
    }

    fn put(&mut self, x: usize, y: usize, color: u32) {
        if x < self.frame_w && y < self.frame_h + PLOT_HEIGHT {
            self.buffer[y * self.frame_w + x] = color;
        }
    }

    fn draw_frame(&mut self, frame: &GrayImage) {
        let w = (frame.width() as usize).min(self.frame_w);
        let h = (frame.height() as usize).min(self.frame_h);
        let raw = frame.as_raw();
        let stride = frame.width() as usize;
        for y in 0..h {
            for x in 0..w {
                let v = raw[y * stride + x] as u32;
                self.buffer[y * self.frame_w + x] = (v << 16) | (v << 8) | v;
            }
        }
    }

    fn draw_roi_outline(&mut self) {
        let x0 = self.region.x.max(0.0) as usize;
        let y0 = self.region.y.max(0.0) as usize;
        let x1 = ((self.region.x + self.region.width).max(0.0) as usize).min(self.frame_w - 1);
        let y1 = ((self.region.y + self.region.height).max(0.0) as usize).min(self.frame_h - 1);
        if x0 >= self.frame_w || y0 >= self.frame_h || x1 <= x0 || y1 <= y0 {
            return;
        }
        const RED: u32 = 0x00FF0000;
        for x in x0..=x1 {
            self.put(x, y0, RED);
            self.put(x, y1, RED);
        }
        for y in y0..=y1 {
            self.put(x0, y, RED);
            self.put(x1, y, RED);
        }
    }

    fn draw_plot(&mut self, curve: &SpectrumCurve) {
        let top = self.frame_h;
        let bottom = self.frame_h + PLOT_HEIGHT - 1;
        for y in top..=bottom {
            for x in 0..self.frame_w {
                self.buffer[y * self.frame_w + x] = 0x00101010;
            }
        }

        let n = curve.intensity.len();
        if n == 0 {
            return;
        }

        // Profile index -> plot column, stretched across the window width.
        const YELLOW: u32 = 0x00FFFF00;
        let mut prev_y = None;
        for x in 0..self.frame_w {
            let i = x * n / self.frame_w;
            let v = curve.intensity[i].clamp(0.0, 255.0);
            let y = bottom - ((v / 255.0) * (PLOT_HEIGHT - 10) as f64) as usize;
            // Fill the vertical gap to the previous column so steep peaks
            // stay connected.
            let (lo, hi) = match prev_y {
                Some(p) if p != y => (y.min(p), y.max(p)),
                _ => (y, y),
            };
            for yy in lo..=hi {
                self.put(x, yy, YELLOW);
            }
            prev_y = Some(y);
        }

        let cursor_colors = [0x0000FFFFu32, 0x00FF00FFu32];
        let cursors = self.cursors;
        for (pos, color) in cursors.iter().zip(cursor_colors) {
            if *pos < 0.0 || *pos >= n as f64 {
                continue;
            }
            let x = (*pos * self.frame_w as f64 / n as f64) as usize;
            for y in top..=bottom {
                self.put(x, y, color);
            }
        }
    }
}

impl SpectrumView for SpectrumWindow {
    fn region(&self) -> Region {
        self.region
    }

    fn present(&mut self, frame: &GrayImage, curve: &SpectrumCurve) -> Result<()> {
        if curve.label != self.label {
            self.label = curve.label;
            self.window
                .set_title(&format!("spectrocam - {}", self.label.text()));
        }

        self.draw_frame(frame);
        self.draw_roi_outline();
        self.draw_plot(curve);

        self.window
            .update_with_buffer(&self.buffer, self.frame_w, self.frame_h + PLOT_HEIGHT)
            .map_err(|e| anyhow::anyhow!("Window update failed: {}", e))
    }

    fn acquisition_failed(&mut self, err: &AcquisitionError) {
        log::warn!("acquisition skipped: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_cursors_sit_inside_the_profile() {
        // Default ROI is 200 px wide; both cursors must land on the plot
        // and at distinct pixel positions so a calibration can be applied
        // immediately.
        for width in [200.0, 50.0, 640.0] {
            let [c1, c2] = initial_cursors(width);
            assert!(c1 >= 0.0 && c1 < width);
            assert!(c2 >= 0.0 && c2 < width);
            assert_ne!(c1, c2);
        }
    }
}
