use super::{SpectralKind, SpectrumError};
use crate::histogram::Axis;
use crate::numerics::{QuadratureOptions, integrate_adaptive};
use crate::units::{Dimension, Unit};
use std::f64::consts::{LN_2, PI};
use tracing::{debug, warn};

/// A spectral function with concrete parameter values.
///
/// Shape parameters are plain numbers in whatever energy unit the model is later
/// evaluated in; only the normalization parameter carries a [`Unit`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralModel {
    kind: SpectralKind,
    values: Vec<f64>,
    normalization_unit: Unit,
}

/// Per-bin integrals of a spectral model over an energy axis.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedFlux {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub values: Vec<f64>,
    /// Unit of every entry of `values`.
    pub unit: Unit,
    /// Unit of `lower` and `upper`.
    pub energy_unit: Unit,
    /// Bins whose quadrature stopped before reaching the requested tolerance.
    pub unconverged_bins: Vec<usize>,
}

impl BinnedFlux {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl SpectralModel {
    /// A model with the catalog defaults and the default normalization unit.
    pub fn new(kind: SpectralKind) -> Self {
        let energy_power = kind
            .normalization()
            .map_or(0, |normalization| normalization.energy_power);
        Self {
            kind,
            values: kind.default_values().to_vec(),
            normalization_unit: &Unit::photon_flux_density() * &Unit::kev().powi(-energy_power),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, SpectrumError> {
        SpectralKind::from_name(name)
            .map(Self::new)
            .ok_or_else(|| SpectrumError::UnknownModel {
                name: name.trim().to_string(),
            })
    }

    /// Apply `overrides` on top of the defaults and validate the result.
    pub fn with_parameters(
        kind: SpectralKind,
        overrides: &[(&str, f64)],
    ) -> Result<Self, SpectrumError> {
        let mut model = Self::new(kind);
        for (name, value) in overrides {
            model.set_parameter(name, *value)?;
        }
        model.validate()?;
        Ok(model)
    }

    pub fn kind(&self) -> SpectralKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.kind
            .parameter_names()
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| self.values[index])
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.kind
            .parameter_names()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Overwrite one parameter. Cross-parameter constraints are checked by [`Self::validate`].
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), SpectrumError> {
        let index = self
            .kind
            .parameter_names()
            .iter()
            .position(|candidate| *candidate == name)
            .ok_or_else(|| SpectrumError::UnknownParameter {
                model: self.name(),
                name: name.to_string(),
                available: self.kind.parameter_names(),
            })?;
        self.values[index] = value;
        Ok(())
    }

    /// Set the unit of the normalization parameter. It must be a photon flux density
    /// times the kind's power of energy.
    pub fn set_normalization_unit(&mut self, unit: Unit) -> Result<(), SpectrumError> {
        let normalization = self
            .kind
            .normalization()
            .ok_or(SpectrumError::Unsupported { model: self.name() })?;
        let expected = Dimension::PHOTON_FLUX_DENSITY
            .combine(Dimension::ENERGY.powi(-normalization.energy_power));
        if !unit.has_dimension(expected) {
            return Err(SpectrumError::NormalizationDimension {
                model: self.name(),
                parameter: normalization.parameter,
                unit: unit.to_string(),
                expected,
            });
        }
        self.normalization_unit = unit;
        Ok(())
    }

    /// Unit of the normalization parameter; fails for kinds outside the normalization table.
    pub fn normalization_unit(&self) -> Result<&Unit, SpectrumError> {
        if self.kind.is_supported() {
            Ok(&self.normalization_unit)
        } else {
            Err(SpectrumError::Unsupported { model: self.name() })
        }
    }

    /// Unit of [`Self::evaluate`] when energies are expressed in `energy_unit`.
    pub fn output_unit(&self, energy_unit: &Unit) -> Result<Unit, SpectrumError> {
        let normalization = self
            .kind
            .normalization()
            .ok_or(SpectrumError::Unsupported { model: self.name() })?;
        Ok(&self.normalization_unit * &energy_unit.powi(normalization.energy_power))
    }

    pub fn validate(&self) -> Result<(), SpectrumError> {
        for (name, value) in self.parameters() {
            if !value.is_finite() {
                return Err(self.invalid(name, value, "must be finite"));
            }
        }
        for &name in positive_parameters(self.kind) {
            if let Some(value) = self.parameter(name) {
                if value <= 0.0 {
                    return Err(self.invalid(name, value, "must be positive"));
                }
            }
        }

        match self.kind {
            SpectralKind::Band | SpectralKind::BandGrbm => {
                let [_, alpha, _, beta, _] = self.values::<5>();
                if alpha < beta {
                    return Err(self.invalid("alpha", alpha, "must be >= beta"));
                }
                if self.kind == SpectralKind::Band && alpha <= -2.0 {
                    return Err(self.invalid("alpha", alpha, "must be greater than -2"));
                }
            }
            SpectralKind::PowerlawEflux | SpectralKind::PowerlawFlux => {
                let [_, _, a, b] = self.values::<4>();
                if a >= b {
                    return Err(self.invalid("a", a, "must be below b"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Differential photon flux at energy `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.kind {
            SpectralKind::Blackbody => {
                let [k, kt] = self.values::<2>();
                k * x * x / (x / kt).exp_m1()
            }
            SpectralKind::ModifiedBlackbody => {
                let [k, kt] = self.values::<2>();
                k * x / (x / kt).exp_m1()
            }
            SpectralKind::NonDissipativePhotosphere => {
                let [k, ec, piv] = self.values::<3>();
                k * (x / piv).powf(0.4) * (-(x / ec).powf(0.65)).exp()
            }
            SpectralKind::NonDissipativePhotosphereDeep => {
                let [k, ec, piv] = self.values::<3>();
                k * (x / piv).powf(1.4) * (-(x / ec).powf(0.65)).exp()
            }
            SpectralKind::Sin => {
                let [k, f, phi] = self.values::<3>();
                k * (2.0 * PI * f * x + phi).sin()
            }
            SpectralKind::LogParabola => {
                let [k, piv, alpha, beta] = self.values::<4>();
                let ratio = x / piv;
                k * ratio.powf(alpha - beta * ratio.ln())
            }
            SpectralKind::ExponentialCutoff => {
                let [k, xc] = self.values::<2>();
                k * (-x / xc).exp()
            }
            SpectralKind::Powerlaw => {
                let [k, piv, index] = self.values::<3>();
                k * (x / piv).powf(index)
            }
            SpectralKind::CutoffPowerlaw => {
                let [k, piv, index, xc] = self.values::<4>();
                k * (x / piv).powf(index) * (-x / xc).exp()
            }
            SpectralKind::CutoffPowerlawEp => {
                let [k, piv, index, xp] = self.values::<4>();
                k * (x / piv).powf(index) * (-x * (2.0 + index) / xp).exp()
            }
            SpectralKind::InverseCutoffPowerlaw => {
                let [k, piv, index, b] = self.values::<4>();
                k * (x / piv).powf(index) * (-x * b).exp()
            }
            SpectralKind::SuperCutoffPowerlaw => {
                let [k, piv, index, xc, gamma] = self.values::<5>();
                k * (x / piv).powf(index) * (-(x / xc).powf(gamma)).exp()
            }
            SpectralKind::SmoothlyBrokenPowerLaw => {
                let [k, alpha, break_energy, break_scale, beta, pivot] = self.values::<6>();
                let slope = (alpha + beta) / 2.0;
                let magnitude = (beta - alpha) / 2.0;
                let log_cosh = |energy: f64| {
                    let arg = (energy / break_energy).log10() / break_scale;
                    let value = if arg < -6.0 {
                        -arg - LN_2
                    } else if arg > 4.0 {
                        arg - LN_2
                    } else {
                        arg.cosh().ln()
                    };
                    magnitude * break_scale * value
                };
                k * (x / pivot).powf(slope) * 10.0_f64.powf(log_cosh(x) - log_cosh(pivot))
            }
            SpectralKind::BrokenPowerlaw => {
                let [k, xb, alpha, beta, piv] = self.values::<5>();
                if x < xb {
                    k * (x / piv).powf(alpha)
                } else {
                    k * (xb / piv).powf(alpha - beta) * (x / piv).powf(beta)
                }
            }
            SpectralKind::Band => {
                let [k, alpha, xp, beta, piv] = self.values::<5>();
                let e0 = xp / (2.0 + alpha);
                band(k, alpha, beta, piv, e0, x)
            }
            SpectralKind::BandGrbm => {
                let [k, alpha, xc, beta, piv] = self.values::<5>();
                band(k, alpha, beta, piv, xc, x)
            }
            SpectralKind::Cauchy => {
                let [k, x0, gamma] = self.values::<3>();
                let z = (x - x0) / gamma;
                k / (PI * gamma * (1.0 + z * z))
            }
            SpectralKind::Constant => self.values::<1>()[0],
            SpectralKind::Line
            | SpectralKind::Quadratic
            | SpectralKind::Cubic
            | SpectralKind::Quartic => {
                // Horner over a + b x + c x^2 + ...
                self.values
                    .iter()
                    .rev()
                    .fold(0.0, |acc, coefficient| acc * x + coefficient)
            }
            SpectralKind::PowerlawEflux => {
                let [f, index, a, b] = self.values::<4>();
                f / power_integral(index + 2.0, a, b) * x.powf(index)
            }
            SpectralKind::PowerlawFlux => {
                let [f, index, a, b] = self.values::<4>();
                f / power_integral(index + 1.0, a, b) * x.powf(index)
            }
            SpectralKind::LogNormal => {
                let [f, mu, sigma] = self.values::<3>();
                if x <= 0.0 {
                    return 0.0;
                }
                let z = (x.ln() - mu) / sigma;
                f / (x * sigma * (2.0 * PI).sqrt()) * (-0.5 * z * z).exp()
            }
            SpectralKind::Gaussian => {
                let [f, mu, sigma] = self.values::<3>();
                let z = (x - mu) / sigma;
                f / (sigma * (2.0 * PI).sqrt()) * (-0.5 * z * z).exp()
            }
            SpectralKind::StepFunction | SpectralKind::UniformPrior => {
                let [lower, upper, value] = self.values::<3>();
                if (lower..=upper).contains(&x) { value } else { 0.0 }
            }
            SpectralKind::StepFunctionUpper => {
                let [lower, upper, value] = self.values::<3>();
                if x > lower && x <= upper { value } else { 0.0 }
            }
            SpectralKind::DiracDelta => {
                let [value, zero_point] = self.values::<2>();
                if x == zero_point { value } else { 0.0 }
            }
            SpectralKind::LogUniformPrior => {
                let [lower, upper, k] = self.values::<3>();
                if x > 0.0 && (lower..=upper).contains(&x) { k / x } else { 0.0 }
            }
        }
    }

    /// Integrate the model over every bin of `axis`, which must carry an energy unit.
    pub fn integrate_bins(
        &self,
        axis: &Axis,
        options: &QuadratureOptions,
    ) -> Result<BinnedFlux, SpectrumError> {
        let energy_unit = axis
            .unit()
            .filter(|unit| unit.has_dimension(Dimension::ENERGY))
            .ok_or_else(|| SpectrumError::EnergyAxis {
                label: axis.label().to_string(),
                unit: axis.unit().map(ToString::to_string),
            })?;
        let unit = &self.output_unit(energy_unit)? * energy_unit;
        self.validate()?;

        let mut values = Vec::with_capacity(axis.nbins());
        let mut unconverged_bins = Vec::new();
        for (bin, (&lower, &upper)) in axis
            .lower_bounds()
            .iter()
            .zip(axis.upper_bounds())
            .enumerate()
        {
            let result = integrate_adaptive(|x| self.evaluate(x), lower, upper, options)
                .map_err(|source| SpectrumError::Quadrature {
                    model: self.name(),
                    bin,
                    lower,
                    upper,
                    source,
                })?;
            if !result.converged {
                warn!(
                    model = self.name(),
                    bin,
                    lower,
                    upper,
                    error = result.error,
                    "spectral integral did not reach the requested tolerance"
                );
                unconverged_bins.push(bin);
            }
            debug!(
                model = self.name(),
                bin,
                lower,
                upper,
                integral = result.integral,
                evaluations = result.evaluations,
                "integrated spectral bin"
            );
            values.push(result.integral);
        }

        Ok(BinnedFlux {
            lower: axis.lower_bounds().to_vec(),
            upper: axis.upper_bounds().to_vec(),
            values,
            unit,
            energy_unit: energy_unit.clone(),
            unconverged_bins,
        })
    }

    /// The leading `N` parameter values; kinds always carry at least `N` of them.
    fn values<const N: usize>(&self) -> [f64; N] {
        std::array::from_fn(|index| self.values.get(index).copied().unwrap_or_default())
    }

    fn invalid(&self, name: &'static str, value: f64, reason: &'static str) -> SpectrumError {
        SpectrumError::InvalidParameter {
            model: self.name(),
            name,
            value,
            reason,
        }
    }
}

/// Band-type function with low-energy index `alpha`, high-energy index `beta` and
/// e-folding energy `e0`.
fn band(k: f64, alpha: f64, beta: f64, piv: f64, e0: f64, x: f64) -> f64 {
    let break_energy = (alpha - beta) * e0;
    if x < break_energy {
        k * (x / piv).powf(alpha) * (-x / e0).exp()
    } else {
        k * (break_energy / piv).powf(alpha - beta) * (beta - alpha).exp() * (x / piv).powf(beta)
    }
}

/// `integral of x^(p - 1) dx` over `[a, b]`.
fn power_integral(p: f64, a: f64, b: f64) -> f64 {
    if p == 0.0 {
        (b / a).ln()
    } else {
        (b.powf(p) - a.powf(p)) / p
    }
}

fn positive_parameters(kind: SpectralKind) -> &'static [&'static str] {
    match kind {
        SpectralKind::Blackbody | SpectralKind::ModifiedBlackbody => &["kT"],
        SpectralKind::NonDissipativePhotosphere
        | SpectralKind::NonDissipativePhotosphereDeep => &["ec", "piv"],
        SpectralKind::LogParabola
        | SpectralKind::Powerlaw
        | SpectralKind::InverseCutoffPowerlaw => &["piv"],
        SpectralKind::ExponentialCutoff => &["xc"],
        SpectralKind::CutoffPowerlaw | SpectralKind::SuperCutoffPowerlaw => &["piv", "xc"],
        SpectralKind::CutoffPowerlawEp => &["piv", "xp"],
        SpectralKind::SmoothlyBrokenPowerLaw => &["break_energy", "break_scale", "pivot"],
        SpectralKind::BrokenPowerlaw => &["xb", "piv"],
        SpectralKind::Band => &["xp", "piv"],
        SpectralKind::BandGrbm => &["xc", "piv"],
        SpectralKind::Cauchy => &["gamma"],
        SpectralKind::PowerlawEflux | SpectralKind::PowerlawFlux => &["a", "b"],
        SpectralKind::LogNormal | SpectralKind::Gaussian => &["sigma"],
        SpectralKind::LogUniformPrior => &["lower_bound"],
        SpectralKind::Sin
        | SpectralKind::Constant
        | SpectralKind::Line
        | SpectralKind::Quadratic
        | SpectralKind::Cubic
        | SpectralKind::Quartic
        | SpectralKind::StepFunction
        | SpectralKind::StepFunctionUpper
        | SpectralKind::DiracDelta
        | SpectralKind::UniformPrior => &[],
    }
}
