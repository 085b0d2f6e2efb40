use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;
use crate::math::TOLERANCE;

/// Invariant-mass window over which background shapes are normalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMassWindow")]
pub struct MassWindow {
    lower: f64,
    upper: f64,
}

#[derive(Deserialize)]
struct RawMassWindow {
    lower: f64,
    upper: f64,
}

impl TryFrom<RawMassWindow> for MassWindow {
    type Error = CalibrationError;

    fn try_from(raw: RawMassWindow) -> Result<Self, Self::Error> {
        Self::new(raw.lower, raw.upper)
    }
}

impl MassWindow {
    /// Creates a mass window.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 <= lower < upper` and both are finite.
    pub fn new(lower: f64, upper: f64) -> Result<Self, CalibrationError> {
        if !(lower.is_finite() && upper.is_finite() && lower >= 0.0 && lower < upper) {
            return Err(CalibrationError::InvalidWindow { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[must_use]
    pub fn contains(&self, mass: f64) -> bool {
        mass >= self.lower && mass <= self.upper
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Functional form of a background component, selected by integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundShape {
    /// `a + b·m`, parameters `[a, b]`.
    Linear,
    /// `exp(-b·m)`, parameters `[b]`.
    Exponential,
    /// `m^-n`, parameters `[n]`.
    PowerLaw,
}

impl BackgroundShape {
    /// Maps a function id from a parameter file to a shape.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::UnknownFunction`] for unrecognised ids.
    pub fn from_id(id: i32) -> Result<Self, CalibrationError> {
        match id {
            1 => Ok(Self::Linear),
            2 => Ok(Self::Exponential),
            3 => Ok(Self::PowerLaw),
            other => Err(CalibrationError::UnknownFunction(other)),
        }
    }

    #[must_use]
    pub fn id(self) -> i32 {
        match self {
            Self::Linear => 1,
            Self::Exponential => 2,
            Self::PowerLaw => 3,
        }
    }

    /// Number of parameters the shape consumes.
    #[must_use]
    pub fn parameter_count(self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Exponential | Self::PowerLaw => 1,
        }
    }

    /// Normalised density at `mass`; zero outside the window or when the
    /// shape does not integrate to a positive finite value over it.
    ///
    /// `parameters` must hold at least [`Self::parameter_count`] values.
    #[must_use]
    pub fn density(self, parameters: &[f64], window: &MassWindow, mass: f64) -> f64 {
        if !window.contains(mass) || parameters.len() < self.parameter_count() {
            return 0.0;
        }
        let (lo, hi) = (window.lower(), window.upper());
        let (value, norm) = match self {
            Self::Linear => {
                let (a, b) = (parameters[0], parameters[1]);
                (a + b * mass, a * (hi - lo) + 0.5 * b * (hi * hi - lo * lo))
            }
            Self::Exponential => {
                let b = parameters[0];
                let norm = if b.abs() < TOLERANCE {
                    hi - lo
                } else {
                    ((-b * lo).exp() - (-b * hi).exp()) / b
                };
                ((-b * mass).exp(), norm)
            }
            Self::PowerLaw => {
                let n = parameters[0];
                let norm = if (n - 1.0).abs() < TOLERANCE {
                    (hi / lo).ln()
                } else {
                    (hi.powf(1.0 - n) - lo.powf(1.0 - n)) / (1.0 - n)
                };
                (mass.powf(-n), norm)
            }
        };
        if norm.is_finite() && norm > TOLERANCE {
            value / norm
        } else {
            0.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn integrate(shape: BackgroundShape, params: &[f64], window: &MassWindow) -> f64 {
        let steps = 20_000;
        let h = window.width() / f64::from(steps);
        (0..steps)
            .map(|i| shape.density(params, window, window.lower() + (f64::from(i) + 0.5) * h) * h)
            .sum()
    }

    #[test]
    fn ids_roundtrip() {
        for id in 1..=3 {
            assert_eq!(BackgroundShape::from_id(id).unwrap().id(), id);
        }
        assert!(matches!(
            BackgroundShape::from_id(42),
            Err(CalibrationError::UnknownFunction(42))
        ));
    }

    #[test]
    fn densities_are_normalised() {
        let w = MassWindow::new(70.0, 110.0).unwrap();
        assert_relative_eq!(integrate(BackgroundShape::Linear, &[2.0, -0.01], &w), 1.0, epsilon = 1e-6);
        assert_relative_eq!(integrate(BackgroundShape::Exponential, &[0.05], &w), 1.0, epsilon = 1e-6);
        assert_relative_eq!(integrate(BackgroundShape::Exponential, &[0.0], &w), 1.0, epsilon = 1e-6);
        assert_relative_eq!(integrate(BackgroundShape::PowerLaw, &[2.5], &w), 1.0, epsilon = 1e-6);
        assert_relative_eq!(integrate(BackgroundShape::PowerLaw, &[1.0], &w), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_outside_window() {
        let w = MassWindow::new(1.0, 2.0).unwrap();
        assert_eq!(BackgroundShape::Exponential.density(&[1.0], &w, 0.5), 0.0);
        assert_eq!(BackgroundShape::Exponential.density(&[1.0], &w, 2.5), 0.0);
    }

    #[test]
    fn invalid_windows_rejected() {
        assert!(MassWindow::new(2.0, 1.0).is_err());
        assert!(MassWindow::new(-1.0, 1.0).is_err());
        assert!(MassWindow::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn deserialised_window_is_validated() {
        let w: MassWindow = serde_json::from_str(r#"{ "lower": 70.0, "upper": 110.0 }"#).unwrap();
        assert_eq!(w.lower(), 70.0);
        assert_eq!(w.upper(), 110.0);
        assert!(serde_json::from_str::<MassWindow>(r#"{ "lower": 2.0, "upper": 1.0 }"#).is_err());
        assert!(serde_json::from_str::<MassWindow>(r#"{ "lower": -1.0, "upper": 1.0 }"#).is_err());
    }
}
