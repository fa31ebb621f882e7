use crate::calibration::CalibrationModel;

/// Which quantity the horizontal axis currently carries. Pure query for the
/// display side so it can relabel its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLabel {
    PixelIndex,
    WavelengthNm,
}

impl AxisLabel {
    pub fn for_model(model: &CalibrationModel) -> Self {
        if model.is_calibrated() {
            AxisLabel::WavelengthNm
        } else {
            AxisLabel::PixelIndex
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            AxisLabel::PixelIndex => "Pixel",
            AxisLabel::WavelengthNm => "Wavelength (nm)",
        }
    }
}

/// X-coordinates for a profile of `len` samples: raw column indices while
/// uncalibrated, mapped wavelengths once a linear fit is installed.
pub fn axis_for(len: usize, model: &CalibrationModel) -> Vec<f64> {
    match model {
        CalibrationModel::Unset => (0..len).map(|i| i as f64).collect(),
        CalibrationModel::Linear(fit) => (0..len).map(|i| fit.apply_to(i as f64)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationModel, LinearFit};

    #[test]
    fn unset_model_passes_indices_through() {
        let axis = axis_for(5, &CalibrationModel::Unset);
        assert_eq!(axis, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            AxisLabel::for_model(&CalibrationModel::Unset),
            AxisLabel::PixelIndex
        );
    }

    #[test]
    fn linear_model_maps_every_index() {
        let model = CalibrationModel::Linear(LinearFit {
            slope: 0.55,
            intercept: 381.0,
        });
        let axis = axis_for(4, &model);
        for (i, x) in axis.iter().enumerate() {
            assert!((x - (0.55 * i as f64 + 381.0)).abs() < 1e-9);
        }
        assert_eq!(AxisLabel::for_model(&model), AxisLabel::WavelengthNm);
    }

    #[test]
    fn empty_profile_gives_empty_axis() {
        assert!(axis_for(0, &CalibrationModel::Unset).is_empty());
    }
}
