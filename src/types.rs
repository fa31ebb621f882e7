use serde::{Deserialize, Serialize};

/// Rectangular region of interest in frame pixel coordinates.
///
/// Coordinates are float-precision because the operator drags the rectangle
/// freely; it is snapped to whole pixel columns/rows only when reduced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Clamp to `[0,0]..[frame_w, frame_h]` and snap to integer pixel
    /// columns/rows. Returns `None` when nothing of the region survives,
    /// including regions whose clamped width or height rounds to zero
    /// columns/rows.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> Option<ClampedRegion> {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.width).min(frame_w as f64);
        let y1 = (self.y + self.height).min(frame_h as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        // Snap the origin once and take the sample count from the clamped
        // extent, so the profile length tracks the region's width rather
        // than how its fractional origin lands on the pixel grid.
        let cols = (x1 - x0).round() as u32;
        let rows = (y1 - y0).round() as u32;
        if cols == 0 || rows == 0 {
            return None;
        }

        let col0 = x0.round() as u32;
        let row0 = y0.round() as u32;
        let col1 = (col0 + cols).min(frame_w);
        let row1 = (row0 + rows).min(frame_h);
        if col1 <= col0 || row1 <= row0 {
            return None;
        }

        Some(ClampedRegion { col0, col1, row0, row1 })
    }

    /// Shift by whole pixels, keeping size.
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Grow or shrink, never below one pixel in either dimension.
    pub fn resize(&mut self, dw: f64, dh: f64) {
        self.width = (self.width + dw).max(1.0);
        self.height = (self.height + dh).max(1.0);
    }
}

/// A region snapped to whole pixels and guaranteed non-empty and in-bounds
/// for the frame it was clamped against. Half-open spans: `col0..col1`,
/// `row0..row1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedRegion {
    pub col0: u32,
    pub col1: u32,
    pub row0: u32,
    pub row1: u32,
}

impl ClampedRegion {
    pub fn width(&self) -> u32 {
        self.col1 - self.col0
    }

    pub fn height(&self) -> u32 {
        self.row1 - self.row0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_interior_region_keeps_rounded_size() {
        let r = Region::new(100.0, 100.0, 50.0, 20.0);
        let c = r.clamp_to(640, 480).unwrap();
        assert_eq!(c.width(), 50);
        assert_eq!(c.height(), 20);
        assert_eq!(c.col0, 100);
        assert_eq!(c.row0, 100);
    }

    #[test]
    fn clamp_cuts_overhang() {
        let r = Region::new(-10.0, -5.0, 30.0, 30.0);
        let c = r.clamp_to(640, 480).unwrap();
        assert_eq!(c.col0, 0);
        assert_eq!(c.row0, 0);
        assert_eq!(c.width(), 20);
        assert_eq!(c.height(), 25);

        let r = Region::new(630.0, 470.0, 100.0, 100.0);
        let c = r.clamp_to(640, 480).unwrap();
        assert_eq!(c.col1, 640);
        assert_eq!(c.row1, 480);
        assert_eq!(c.width(), 10);
        assert_eq!(c.height(), 10);
    }

    #[test]
    fn clamp_rejects_region_outside_frame() {
        assert!(Region::new(700.0, 100.0, 50.0, 50.0).clamp_to(640, 480).is_none());
        assert!(Region::new(-60.0, 100.0, 50.0, 50.0).clamp_to(640, 480).is_none());
    }

    #[test]
    fn clamp_rejects_subpixel_region() {
        assert!(Region::new(10.0, 10.0, 0.4, 20.0).clamp_to(640, 480).is_none());
        assert!(Region::new(10.0, 10.0, 20.0, 0.3).clamp_to(640, 480).is_none());
        assert!(Region::new(10.0, 10.0, 0.0, 0.0).clamp_to(640, 480).is_none());
    }

    #[test]
    fn clamp_rejects_subpixel_region_straddling_a_pixel_boundary() {
        // 10.3..10.7 crosses the 10/11 boundary; it still rounds to zero
        // columns and must stay empty.
        assert!(Region::new(10.3, 0.0, 0.4, 10.0).clamp_to(640, 480).is_none());
        assert!(Region::new(0.0, 10.3, 10.0, 0.4).clamp_to(640, 480).is_none());
    }

    #[test]
    fn clamped_size_is_independent_of_fractional_origin() {
        // Same width, sliding origin: the column count must not wobble with
        // the grid phase.
        for origin in [10.0, 10.3, 10.5, 10.7, 10.9] {
            let c = Region::new(origin, 10.0, 50.4, 20.0).clamp_to(640, 480).unwrap();
            assert_eq!(c.width(), 50, "origin {}", origin);
            assert_eq!(c.height(), 20, "origin {}", origin);
        }
    }

    #[test]
    fn clamp_near_frame_edge_never_overruns() {
        let c = Region::new(639.4, 0.0, 1.0, 10.0).clamp_to(640, 480).unwrap();
        assert!(c.col1 <= 640);
        assert_eq!(c.width(), 1);
        // Entirely within the last half-pixel: rounds to nothing.
        assert!(Region::new(639.8, 0.0, 0.4, 10.0).clamp_to(640, 480).is_none());
    }

    #[test]
    fn resize_never_collapses() {
        let mut r = Region::new(0.0, 0.0, 3.0, 3.0);
        r.resize(-10.0, -10.0);
        assert_eq!(r.width, 1.0);
        assert_eq!(r.height, 1.0);
    }
}
