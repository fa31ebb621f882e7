use image::GrayImage;

use crate::types::Region;

/// Reduce a frame's region of interest to a 1-D spectral profile.
///
/// Each output sample is the arithmetic mean of one pixel column within the
/// region's row span, indexed left-to-right relative to the region. The
/// region is clamped to the frame first; `None` means nothing was left to
/// reduce and the caller should keep its previous profile.
///
/// Accumulation is in `f64` so 8-bit inputs do not truncate, and the inner
/// loop walks the frame row-major so a full-frame region stays cache
/// friendly at interactive rates.
pub fn reduce(frame: &GrayImage, region: &Region) -> Option<Vec<f64>> {
    let clamped = region.clamp_to(frame.width(), frame.height())?;
    let cols = clamped.width() as usize;
    let rows = clamped.height() as usize;
    let stride = frame.width() as usize;
    let raw = frame.as_raw();

    let mut acc = vec![0.0f64; cols];
    for row in clamped.row0..clamped.row1 {
        let base = row as usize * stride + clamped.col0 as usize;
        for (sum, &px) in acc.iter_mut().zip(&raw[base..base + cols]) {
            *sum += px as f64;
        }
    }

    let inv = 1.0 / rows as f64;
    for sum in &mut acc {
        *sum *= inv;
    }
    Some(acc)
}
