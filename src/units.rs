//! Energy / frequency unit conversion used by `wt5 convert`.
//!
//! Every unit is mapped to and from frequency in Hz. Wavelength is reciprocal.

use crate::error::ApiError;
use std::fmt;
use std::str::FromStr;

/// Speed of light, m/s
const C: f64 = 299_792_458.0;
/// Planck constant, eV·s
const H_EV: f64 = 4.135_667_696e-15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Nm,
    Wn,
    EV,
    MeV,
    Hz,
    THz,
    GHz,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Nm,
        Unit::Wn,
        Unit::EV,
        Unit::MeV,
        Unit::Hz,
        Unit::THz,
        Unit::GHz,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Unit::Nm => "nm",
            Unit::Wn => "wn",
            Unit::EV => "eV",
            Unit::MeV => "meV",
            Unit::Hz => "Hz",
            Unit::THz => "THz",
            Unit::GHz => "GHz",
        }
    }

    fn to_hz(self, value: f64) -> f64 {
        match self {
            Unit::Nm => C / (value * 1e-9),
            Unit::Wn => value * C * 100.0,
            Unit::EV => value / H_EV,
            Unit::MeV => value * 1e-3 / H_EV,
            Unit::Hz => value,
            Unit::THz => value * 1e12,
            Unit::GHz => value * 1e9,
        }
    }

    fn from_hz(self, hz: f64) -> f64 {
        match self {
            Unit::Nm => C / hz * 1e9,
            Unit::Wn => hz / (C * 100.0),
            Unit::EV => hz * H_EV,
            Unit::MeV => hz * H_EV * 1e3,
            Unit::Hz => hz,
            Unit::THz => hz / 1e12,
            Unit::GHz => hz / 1e9,
        }
    }
}

impl FromStr for Unit {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.token() == s)
            .ok_or_else(|| ApiError::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

pub fn is_unit(token: &str) -> bool {
    token.parse::<Unit>().is_ok()
}

pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return value;
    }
    to.from_hz(from.to_hz(value))
}
