use crate::error::CalibrationError;

/// One calibration reference: a cursor position on the profile plot paired
/// with the operator-entered wavelength for the line under that cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    pub pixel: f64,
    pub wavelength_nm: f64,
}

impl CalibrationPoint {
    pub fn new(pixel: f64, wavelength_nm: f64) -> Self {
        Self { pixel, wavelength_nm }
    }
}

/// Affine pixel-index → wavelength mapping fit from two reference points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit the line through two references. The sole validation rule is that
    /// the pixel positions differ; wavelength ordering is deliberately not
    /// checked (a reversed spectrum simply gives a negative slope).
    pub fn fit(p1: CalibrationPoint, p2: CalibrationPoint) -> Result<Self, CalibrationError> {
        if p1.pixel == p2.pixel {
            return Err(CalibrationError::CoincidentPoints { pixel: p1.pixel });
        }
        let slope = (p2.wavelength_nm - p1.wavelength_nm) / (p2.pixel - p1.pixel);
        let intercept = p1.wavelength_nm - slope * p1.pixel;
        Ok(Self { slope, intercept })
    }

    pub fn apply_to(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }
}

/// Current pixel→wavelength mapping. `Unset` until the operator applies a
/// calibration; once `Linear` it stays so until replaced by a new apply
/// (there is no uncalibrate action).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CalibrationModel {
    #[default]
    Unset,
    Linear(LinearFit),
}

impl CalibrationModel {
    /// Fit and install a new mapping. On rejection the current model is left
    /// untouched.
    pub fn apply(
        &mut self,
        p1: CalibrationPoint,
        p2: CalibrationPoint,
    ) -> Result<LinearFit, CalibrationError> {
        let fit = LinearFit::fit(p1, p2)?;
        *self = CalibrationModel::Linear(fit);
        Ok(fit)
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self, CalibrationModel::Linear(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn fit_passes_through_both_references() {
        let p1 = CalibrationPoint::new(12.5, 404.7);
        let p2 = CalibrationPoint::new(310.0, 632.8);
        let fit = LinearFit::fit(p1, p2).unwrap();
        assert!((fit.apply_to(p1.pixel) - p1.wavelength_nm).abs() < EPS);
        assert!((fit.apply_to(p2.pixel) - p2.wavelength_nm).abs() < EPS);
    }

    #[test]
    fn mercury_line_calibration() {
        // 436 nm at pixel 100 and 546 nm at pixel 300.
        let fit = LinearFit::fit(
            CalibrationPoint::new(100.0, 436.0),
            CalibrationPoint::new(300.0, 546.0),
        )
        .unwrap();
        assert!((fit.slope - 0.55).abs() < EPS);
        assert!((fit.intercept - 381.0).abs() < EPS);
        assert!((fit.apply_to(200.0) - 491.0).abs() < EPS);
    }

    #[test]
    fn coincident_cursors_are_rejected_without_mutation() {
        let mut model = CalibrationModel::default();
        let err = model
            .apply(
                CalibrationPoint::new(150.0, 436.0),
                CalibrationPoint::new(150.0, 546.0),
            )
            .unwrap_err();
        assert_eq!(err, CalibrationError::CoincidentPoints { pixel: 150.0 });
        assert_eq!(model, CalibrationModel::Unset);
    }

    #[test]
    fn rejection_keeps_previous_fit() {
        let mut model = CalibrationModel::default();
        model
            .apply(
                CalibrationPoint::new(100.0, 436.0),
                CalibrationPoint::new(300.0, 546.0),
            )
            .unwrap();
        let before = model;
        assert!(model
            .apply(
                CalibrationPoint::new(50.0, 400.0),
                CalibrationPoint::new(50.0, 500.0),
            )
            .is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn reapply_replaces_model() {
        let mut model = CalibrationModel::default();
        model
            .apply(
                CalibrationPoint::new(100.0, 436.0),
                CalibrationPoint::new(300.0, 546.0),
            )
            .unwrap();
        let fit = model
            .apply(
                CalibrationPoint::new(0.0, 400.0),
                CalibrationPoint::new(100.0, 500.0),
            )
            .unwrap();
        assert_eq!(model, CalibrationModel::Linear(fit));
        assert!((fit.slope - 1.0).abs() < EPS);
    }

    #[test]
    fn reversed_wavelengths_give_negative_slope() {
        let fit = LinearFit::fit(
            CalibrationPoint::new(100.0, 546.0),
            CalibrationPoint::new(300.0, 436.0),
        )
        .unwrap();
        assert!(fit.slope < 0.0);
    }
}
