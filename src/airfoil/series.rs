//! Camber line coefficients for the standard (non-reflexed) NACA 5-digit series, keyed by the
//! first three digits of the designation.

use crate::{Result, WingError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveDigitCoefficients {
    /// Chord fraction where the cubic forward camber segment ends
    pub m: f64,

    /// Chord fraction of the maximum camber
    pub p: f64,
    pub k1: f64,
}

const FIVE_DIGIT_SERIES: [(u16, FiveDigitCoefficients); 5] = [
    (210, FiveDigitCoefficients { m: 0.0580, p: 0.05, k1: 361.400 }),
    (220, FiveDigitCoefficients { m: 0.1260, p: 0.10, k1: 51.640 }),
    (230, FiveDigitCoefficients { m: 0.2025, p: 0.15, k1: 15.957 }),
    (240, FiveDigitCoefficients { m: 0.2900, p: 0.20, k1: 6.643 }),
    (250, FiveDigitCoefficients { m: 0.3910, p: 0.25, k1: 3.230 }),
];

pub fn five_digit_coefficients(series: u16) -> Result<FiveDigitCoefficients> {
    FIVE_DIGIT_SERIES
        .iter()
        .find(|(key, _)| *key == series)
        .map(|(_, c)| *c)
        .ok_or_else(|| WingError::UnknownFiveDigitSeries(format!("{:03}", series)))
}
