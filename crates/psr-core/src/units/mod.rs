//! Unit bookkeeping for response contents, spectral normalizations and energy axes.
//!
//! Units are kept as ordered products of named factors (`keV-1 cm-2 s-1`) so they
//! render the way they were written, while scale and dimension are derived from a
//! fixed table relative to the base units cm, s, keV and rad.

mod parser;

pub use parser::parse_unit;

use crate::domain::PsrError;
use std::fmt::{Display, Formatter};
use std::ops::{Div, Mul};
use std::str::FromStr;

const DIMENSION_COUNT: usize = 4;
const LENGTH: usize = 0;
const TIME: usize = 1;
const ENERGY: usize = 2;
const ANGLE: usize = 3;

pub const KEV_PER_ERG: f64 = 6.241_509_074_460_763e8;

/// Largest exponent magnitude accepted when parsing a unit expression.
pub const MAX_EXPONENT: i32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension([i32; DIMENSION_COUNT]);

impl Dimension {
    pub const DIMENSIONLESS: Self = Self([0, 0, 0, 0]);
    pub const LENGTH: Self = Self::base(LENGTH);
    pub const TIME: Self = Self::base(TIME);
    pub const ENERGY: Self = Self::base(ENERGY);
    pub const ANGLE: Self = Self::base(ANGLE);
    pub const AREA: Self = Self([2, 0, 0, 0]);
    pub const AREA_TIME: Self = Self([2, 1, 0, 0]);
    /// Photons per unit energy, area and time.
    pub const PHOTON_FLUX_DENSITY: Self = Self([-2, -1, -1, 0]);

    const fn base(index: usize) -> Self {
        let mut exponents = [0; DIMENSION_COUNT];
        exponents[index] = 1;
        Self(exponents)
    }

    pub fn powi(self, power: i32) -> Self {
        Self(self.0.map(|exponent| exponent.saturating_mul(power)))
    }

    pub fn is_dimensionless(self) -> bool {
        self == Self::DIMENSIONLESS
    }

    pub fn combine(self, other: Self) -> Self {
        let mut exponents = self.0;
        for (exponent, other) in exponents.iter_mut().zip(other.0) {
            *exponent = exponent.saturating_add(other);
        }
        Self(exponents)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("dimensionless");
        }
        let names = ["length", "time", "energy", "angle"];
        let rendered: Vec<String> = names
            .iter()
            .zip(self.0)
            .filter(|(_, exponent)| *exponent != 0)
            .map(|(name, exponent)| {
                if exponent == 1 {
                    (*name).to_string()
                } else {
                    format!("{name}^{exponent}")
                }
            })
            .collect();
        f.write_str(&rendered.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NamedUnit {
    pub(crate) symbol: &'static str,
    pub(crate) aliases: &'static [&'static str],
    pub(crate) scale: f64,
    pub(crate) dimension: Dimension,
}

pub(crate) static NAMED_UNITS: [NamedUnit; 25] = [
    named("eV", &[], 1.0e-3, Dimension::ENERGY),
    named("keV", &[], 1.0, Dimension::ENERGY),
    named("MeV", &[], 1.0e3, Dimension::ENERGY),
    named("GeV", &[], 1.0e6, Dimension::ENERGY),
    named("TeV", &[], 1.0e9, Dimension::ENERGY),
    named("erg", &[], KEV_PER_ERG, Dimension::ENERGY),
    named("J", &[], KEV_PER_ERG * 1.0e7, Dimension::ENERGY),
    named("cm", &[], 1.0, Dimension::LENGTH),
    named("mm", &[], 0.1, Dimension::LENGTH),
    named("m", &[], 100.0, Dimension::LENGTH),
    named("km", &[], 1.0e5, Dimension::LENGTH),
    named("s", &["sec"], 1.0, Dimension::TIME),
    named("ms", &[], 1.0e-3, Dimension::TIME),
    named("ks", &[], 1.0e3, Dimension::TIME),
    named("min", &[], 60.0, Dimension::TIME),
    named("h", &["hr"], 3600.0, Dimension::TIME),
    named("d", &["day"], 86_400.0, Dimension::TIME),
    named("yr", &["year"], 3.155_76e7, Dimension::TIME),
    named("rad", &[], 1.0, Dimension::ANGLE),
    named("deg", &[], std::f64::consts::PI / 180.0, Dimension::ANGLE),
    named("sr", &[], 1.0, Dimension([0, 0, 0, 2])),
    named("ph", &["photon", "photons"], 1.0, Dimension::DIMENSIONLESS),
    named("ct", &["count", "counts"], 1.0, Dimension::DIMENSIONLESS),
    named("pix", &["pixel"], 1.0, Dimension::DIMENSIONLESS),
    named("bin", &[], 1.0, Dimension::DIMENSIONLESS),
];

const fn named(
    symbol: &'static str,
    aliases: &'static [&'static str],
    scale: f64,
    dimension: Dimension,
) -> NamedUnit {
    NamedUnit {
        symbol,
        aliases,
        scale,
        dimension,
    }
}

pub(crate) fn lookup_named_unit(token: &str) -> Option<&'static NamedUnit> {
    NAMED_UNITS
        .iter()
        .find(|unit| unit.symbol == token || unit.aliases.contains(&token))
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown unit '{token}'")]
    UnknownUnit { token: String },
    #[error("malformed unit expression '{expression}': {reason}")]
    Malformed {
        expression: String,
        reason: &'static str,
    },
    #[error("cannot convert '{from}' ({from_dimension}) to '{to}' ({to_dimension})")]
    IncompatibleDimensions {
        from: String,
        from_dimension: Dimension,
        to: String,
        to_dimension: Dimension,
    },
}

impl From<UnitError> for PsrError {
    fn from(error: UnitError) -> Self {
        PsrError::input_validation("INPUT.UNIT", error.to_string())
    }
}

/// Product of named unit factors raised to integer powers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unit {
    factors: Vec<(&'static NamedUnit, i32)>,
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// Look up a single named unit such as `keV` or `cm`.
    pub fn named(symbol: &str) -> Result<Self, UnitError> {
        let unit = lookup_named_unit(symbol).ok_or_else(|| UnitError::UnknownUnit {
            token: symbol.to_string(),
        })?;
        Ok(Self {
            factors: vec![(unit, 1)],
        })
    }

    pub fn kev() -> Self {
        Self::from_static("keV")
    }

    pub fn cm2_s() -> Self {
        Self::from_static("cm").powi(2) * Self::from_static("s")
    }

    /// `1 / (keV cm2 s)`, the differential photon flux density.
    pub fn photon_flux_density() -> Self {
        (Self::kev() * Self::cm2_s()).powi(-1)
    }

    fn from_static(symbol: &'static str) -> Self {
        let unit = NAMED_UNITS
            .iter()
            .find(|unit| unit.symbol == symbol)
            .unwrap_or(&NAMED_UNITS[0]);
        Self {
            factors: vec![(unit, 1)],
        }
    }

    pub(crate) fn from_factor(unit: &'static NamedUnit, power: i32) -> Self {
        let mut result = Self::default();
        result.push_factor(unit, power);
        result
    }

    /// Scale relative to the base units (cm, s, keV, rad).
    pub fn scale(&self) -> f64 {
        self.factors
            .iter()
            .map(|(unit, power)| unit.scale.powi(*power))
            .product()
    }

    pub fn dimension(&self) -> Dimension {
        self.factors
            .iter()
            .fold(Dimension::DIMENSIONLESS, |dimension, (unit, power)| {
                dimension.combine(unit.dimension.powi(*power))
            })
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension().is_dimensionless()
    }

    pub fn has_dimension(&self, dimension: Dimension) -> bool {
        self.dimension() == dimension
    }

    pub fn powi(&self, power: i32) -> Self {
        let mut result = Self::default();
        for (unit, exponent) in &self.factors {
            result.push_factor(unit, exponent.saturating_mul(power));
        }
        result
    }

    /// Multiplicative factor taking a value in `self` to a value in `target`.
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64, UnitError> {
        let from_dimension = self.dimension();
        let to_dimension = target.dimension();
        if from_dimension != to_dimension {
            return Err(UnitError::IncompatibleDimensions {
                from: self.to_string(),
                from_dimension,
                to: target.to_string(),
                to_dimension,
            });
        }
        Ok(self.scale() / target.scale())
    }

    /// Equal dimension and scale, regardless of how the factors are written.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension()
            && (self.scale() - other.scale()).abs() <= 1.0e-12 * self.scale().abs()
    }

    /// Every factor exponent lies within `-limit..=limit`.
    pub(crate) fn exponents_within(&self, limit: i32) -> bool {
        self.factors
            .iter()
            .all(|(_, power)| (-limit..=limit).contains(power))
    }

    fn push_factor(&mut self, unit: &'static NamedUnit, power: i32) {
        if power == 0 {
            return;
        }
        if let Some(index) = self
            .factors
            .iter()
            .position(|(existing, _)| existing.symbol == unit.symbol)
        {
            self.factors[index].1 = self.factors[index].1.saturating_add(power);
            if self.factors[index].1 == 0 {
                self.factors.remove(index);
            }
        } else {
            self.factors.push((unit, power));
        }
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        &self * &rhs
    }
}

impl Mul<&Unit> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        let mut result = self.clone();
        for (unit, power) in &rhs.factors {
            result.push_factor(unit, *power);
        }
        result
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        &self * &rhs.powi(-1)
    }
}

impl Div<&Unit> for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self * &rhs.powi(-1)
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        parse_unit(expression)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let render = |factors: &[&(&'static NamedUnit, i32)]| -> Vec<String> {
            factors
                .iter()
                .map(|(unit, power)| {
                    let power = power.abs();
                    if power == 1 {
                        unit.symbol.to_string()
                    } else {
                        format!("{}{}", unit.symbol, power)
                    }
                })
                .collect()
        };

        let numerator: Vec<_> = self.factors.iter().filter(|(_, p)| *p > 0).collect();
        let denominator: Vec<_> = self.factors.iter().filter(|(_, p)| *p < 0).collect();
        let numerator = render(&numerator);
        let denominator = render(&denominator);

        let numerator_text = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(" ")
        };
        match denominator.len() {
            0 if numerator.is_empty() => Ok(()),
            0 => f.write_str(&numerator_text),
            1 => write!(f, "{} / {}", numerator_text, denominator[0]),
            _ => write!(f, "{} / ({})", numerator_text, denominator.join(" ")),
        }
    }
}

/// A value tagged with its unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn to(&self, target: &Unit) -> Result<Quantity, UnitError> {
        let factor = self.unit.conversion_factor(target)?;
        Ok(Quantity::new(self.value * factor, target.clone()))
    }

    pub fn value_in(&self, target: &Unit) -> Result<f64, UnitError> {
        Ok(self.to(target)?.value)
    }
}

impl Mul<&Quantity> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::new(self.value * rhs.value, &self.unit * &rhs.unit)
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::new(self.value * rhs, self.unit)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.unit.factors.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
