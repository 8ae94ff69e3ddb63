//! Bounded confidence scalar.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CONFIDENCE;
use crate::error::ModelError;

/// Confidence in a concept or relation, in `[0.0, 1.0]`.
///
/// Immutable: [`strengthen`](Self::strengthen) and [`weaken`](Self::weaken)
/// return a new value and saturate at the bounds, so no sequence of
/// adjustments can leave the interval.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence at all.
    pub const MIN: Confidence = Confidence(0.0);
    /// Full confidence.
    pub const MAX: Confidence = Confidence(1.0);

    /// Create a confidence, rejecting values outside `[0.0, 1.0]` and NaN.
    pub fn new(value: f64) -> Result<Self, ModelError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ModelError::InvalidConfidence { value })
        }
    }

    /// Create a confidence by clamping into range. NaN maps to the default.
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self::default()
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// The raw scalar.
    pub fn value(self) -> f64 {
        self.0
    }

    /// `min(1.0, v + factor)`, floored at 0.0 for negative factors.
    pub fn strengthen(self, factor: f64) -> Self {
        self.shifted(factor)
    }

    /// `max(0.0, v - factor)`, capped at 1.0 for negative factors.
    pub fn weaken(self, factor: f64) -> Self {
        self.shifted(-factor)
    }

    fn shifted(self, delta: f64) -> Self {
        let next = self.0 + delta;
        if next.is_nan() {
            self
        } else {
            Self(next.clamp(0.0, 1.0))
        }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(DEFAULT_CONFIDENCE)
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ModelError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> f64 {
        c.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(v: f64) -> Confidence {
        Confidence::new(v).unwrap()
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Confidence::new(-0.01).is_err());
        assert!(Confidence::new(1.01).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
    }

    #[test]
    fn default_is_half() {
        assert_eq!(Confidence::default().value(), 0.5);
    }

    #[test]
    fn strengthen_and_weaken_saturate() {
        assert_eq!(c(0.95).strengthen(0.1), Confidence::MAX);
        assert_eq!(c(0.05).weaken(0.1), Confidence::MIN);
        assert!((c(0.5).strengthen(0.1).value() - 0.6).abs() < 1e-12);
        assert!((c(0.5).weaken(0.1).value() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn extreme_factors_stay_in_bounds() {
        let factors = [
            -1e300,
            -5.0,
            -0.3,
            0.0,
            0.3,
            5.0,
            1e300,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
        ];
        for start in [0.0, 0.2, 0.5, 1.0] {
            for factor in factors {
                let s = c(start).strengthen(factor).value();
                let w = c(start).weaken(factor).value();
                assert!((0.0..=1.0).contains(&s), "strengthen({start}, {factor}) = {s}");
                assert!((0.0..=1.0).contains(&w), "weaken({start}, {factor}) = {w}");
            }
        }
    }

    #[test]
    fn repeated_application_never_escapes() {
        let mut x = c(0.5);
        for _ in 0..100 {
            x = x.strengthen(0.1);
        }
        assert_eq!(x, Confidence::MAX);
        for _ in 0..100 {
            x = x.weaken(0.3);
        }
        assert_eq!(x, Confidence::MIN);
    }

    #[test]
    fn serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Confidence>("0.7").is_ok());
        assert!(serde_json::from_str::<Confidence>("1.7").is_err());
    }
}
