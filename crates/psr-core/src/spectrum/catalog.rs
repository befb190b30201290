//! Known spectral function classes, their parameters and their normalization table.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralKind {
    Blackbody,
    ModifiedBlackbody,
    NonDissipativePhotosphere,
    NonDissipativePhotosphereDeep,
    Sin,
    LogParabola,
    ExponentialCutoff,
    Powerlaw,
    CutoffPowerlaw,
    CutoffPowerlawEp,
    InverseCutoffPowerlaw,
    SuperCutoffPowerlaw,
    SmoothlyBrokenPowerLaw,
    BrokenPowerlaw,
    Band,
    BandGrbm,
    Cauchy,
    Constant,
    Line,
    Quadratic,
    Cubic,
    Quartic,
    PowerlawEflux,
    LogNormal,
    Gaussian,
    StepFunction,
    StepFunctionUpper,
    DiracDelta,
    PowerlawFlux,
    UniformPrior,
    LogUniformPrior,
}

/// Which parameter carries the model's unit, and how it relates to photon flux density.
///
/// The function returns `parameter * E^energy_power` in units, where `E` is the unit the
/// energies are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalization {
    pub parameter: &'static str,
    pub energy_power: i32,
}

const fn normalization(parameter: &'static str, energy_power: i32) -> Option<Normalization> {
    Some(Normalization {
        parameter,
        energy_power,
    })
}

impl SpectralKind {
    pub const ALL: [Self; 31] = [
        Self::Blackbody,
        Self::ModifiedBlackbody,
        Self::NonDissipativePhotosphere,
        Self::NonDissipativePhotosphereDeep,
        Self::Sin,
        Self::LogParabola,
        Self::ExponentialCutoff,
        Self::Powerlaw,
        Self::CutoffPowerlaw,
        Self::CutoffPowerlawEp,
        Self::InverseCutoffPowerlaw,
        Self::SuperCutoffPowerlaw,
        Self::SmoothlyBrokenPowerLaw,
        Self::BrokenPowerlaw,
        Self::Band,
        Self::BandGrbm,
        Self::Cauchy,
        Self::Constant,
        Self::Line,
        Self::Quadratic,
        Self::Cubic,
        Self::Quartic,
        Self::PowerlawEflux,
        Self::LogNormal,
        Self::Gaussian,
        Self::StepFunction,
        Self::StepFunctionUpper,
        Self::DiracDelta,
        Self::PowerlawFlux,
        Self::UniformPrior,
        Self::LogUniformPrior,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blackbody => "Blackbody",
            Self::ModifiedBlackbody => "ModifiedBlackbody",
            Self::NonDissipativePhotosphere => "NonDissipativePhotosphere",
            Self::NonDissipativePhotosphereDeep => "NonDissipativePhotosphere_Deep",
            Self::Sin => "Sin",
            Self::LogParabola => "Log_parabola",
            Self::ExponentialCutoff => "Exponential_cutoff",
            Self::Powerlaw => "Powerlaw",
            Self::CutoffPowerlaw => "Cutoff_powerlaw",
            Self::CutoffPowerlawEp => "Cutoff_powerlaw_Ep",
            Self::InverseCutoffPowerlaw => "Inverse_cutoff_powerlaw",
            Self::SuperCutoffPowerlaw => "Super_cutoff_powerlaw",
            Self::SmoothlyBrokenPowerLaw => "SmoothlyBrokenPowerLaw",
            Self::BrokenPowerlaw => "Broken_powerlaw",
            Self::Band => "Band",
            Self::BandGrbm => "Band_grbm",
            Self::Cauchy => "Cauchy",
            Self::Constant => "Constant",
            Self::Line => "Line",
            Self::Quadratic => "Quadratic",
            Self::Cubic => "Cubic",
            Self::Quartic => "Quartic",
            Self::PowerlawEflux => "Powerlaw_Eflux",
            Self::LogNormal => "Log_normal",
            Self::Gaussian => "Gaussian",
            Self::StepFunction => "StepFunction",
            Self::StepFunctionUpper => "StepFunctionUpper",
            Self::DiracDelta => "DiracDelta",
            Self::PowerlawFlux => "Powerlaw_flux",
            Self::UniformPrior => "Uniform_prior",
            Self::LogUniformPrior => "Log_uniform_prior",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }

    /// Parameter names in evaluation order.
    pub const fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Self::Blackbody | Self::ModifiedBlackbody => &["K", "kT"],
            Self::NonDissipativePhotosphere | Self::NonDissipativePhotosphereDeep => {
                &["K", "ec", "piv"]
            }
            Self::Sin => &["K", "f", "phi"],
            Self::LogParabola => &["K", "piv", "alpha", "beta"],
            Self::ExponentialCutoff => &["K", "xc"],
            Self::Powerlaw => &["K", "piv", "index"],
            Self::CutoffPowerlaw => &["K", "piv", "index", "xc"],
            Self::CutoffPowerlawEp => &["K", "piv", "index", "xp"],
            Self::InverseCutoffPowerlaw => &["K", "piv", "index", "b"],
            Self::SuperCutoffPowerlaw => &["K", "piv", "index", "xc", "gamma"],
            Self::SmoothlyBrokenPowerLaw => &[
                "K",
                "alpha",
                "break_energy",
                "break_scale",
                "beta",
                "pivot",
            ],
            Self::BrokenPowerlaw => &["K", "xb", "alpha", "beta", "piv"],
            Self::Band => &["K", "alpha", "xp", "beta", "piv"],
            Self::BandGrbm => &["K", "alpha", "xc", "beta", "piv"],
            Self::Cauchy => &["K", "x0", "gamma"],
            Self::Constant => &["k"],
            Self::Line => &["a", "b"],
            Self::Quadratic => &["a", "b", "c"],
            Self::Cubic => &["a", "b", "c", "d"],
            Self::Quartic => &["a", "b", "c", "d", "e"],
            Self::PowerlawEflux | Self::PowerlawFlux => &["F", "index", "a", "b"],
            Self::LogNormal | Self::Gaussian => &["F", "mu", "sigma"],
            Self::StepFunction | Self::StepFunctionUpper | Self::UniformPrior => {
                &["lower_bound", "upper_bound", "value"]
            }
            Self::DiracDelta => &["value", "zero_point"],
            Self::LogUniformPrior => &["lower_bound", "upper_bound", "K"],
        }
    }

    /// Default parameter values, aligned with [`Self::parameter_names`].
    pub const fn default_values(self) -> &'static [f64] {
        match self {
            Self::Blackbody | Self::ModifiedBlackbody => &[1.0e-4, 30.0],
            Self::NonDissipativePhotosphere | Self::NonDissipativePhotosphereDeep => {
                &[1.0e-4, 200.0, 100.0]
            }
            Self::Sin => &[1.0, 0.1, 0.0],
            Self::LogParabola => &[1.0, 1.0, -2.0, 1.0],
            Self::ExponentialCutoff => &[1.0, 1.0],
            Self::Powerlaw => &[1.0, 1.0, -2.01],
            Self::CutoffPowerlaw => &[1.0, 1.0, -2.0, 10.0],
            Self::CutoffPowerlawEp => &[1.0, 1.0, -1.0, 500.0],
            Self::InverseCutoffPowerlaw => &[1.0, 1.0, -2.0, 1.0],
            Self::SuperCutoffPowerlaw => &[1.0, 1.0, -0.7, 1.0, 1.0],
            Self::SmoothlyBrokenPowerLaw => &[1.0, -1.0, 300.0, 0.5, -2.0, 100.0],
            Self::BrokenPowerlaw => &[1.0, 300.0, -1.5, -2.5, 100.0],
            Self::Band | Self::BandGrbm => &[1.0e-4, -1.0, 500.0, -2.0, 100.0],
            Self::Cauchy => &[1.0, 0.0, 1.0],
            Self::Constant => &[0.0],
            Self::Line => &[0.0, 0.0],
            Self::Quadratic => &[0.0, 0.0, 0.0],
            Self::Cubic => &[0.0, 0.0, 0.0, 0.0],
            Self::Quartic => &[0.0, 0.0, 0.0, 0.0, 0.0],
            Self::PowerlawEflux | Self::PowerlawFlux => &[1.0, -2.0, 1.0, 100.0],
            Self::LogNormal | Self::Gaussian => &[1.0, 0.0, 1.0],
            Self::StepFunction | Self::StepFunctionUpper | Self::UniformPrior => &[0.0, 1.0, 1.0],
            Self::DiracDelta => &[1.0, 0.0],
            Self::LogUniformPrior => &[1.0e-20, 100.0, 1.0],
        }
    }

    /// The table of models whose expected counts can be computed.
    pub const fn normalization(self) -> Option<Normalization> {
        match self {
            Self::Blackbody => normalization("K", 2),
            Self::ModifiedBlackbody => normalization("K", 1),
            Self::NonDissipativePhotosphere
            | Self::NonDissipativePhotosphereDeep
            | Self::Sin
            | Self::LogParabola
            | Self::ExponentialCutoff
            | Self::Powerlaw
            | Self::CutoffPowerlaw
            | Self::CutoffPowerlawEp
            | Self::InverseCutoffPowerlaw
            | Self::SuperCutoffPowerlaw
            | Self::SmoothlyBrokenPowerLaw
            | Self::BrokenPowerlaw
            | Self::Band
            | Self::BandGrbm => normalization("K", 0),
            Self::Cauchy => normalization("K", -1),
            Self::Constant => normalization("k", 0),
            Self::Line | Self::Quadratic | Self::Cubic | Self::Quartic => normalization("a", 0),
            Self::PowerlawEflux => normalization("F", -2),
            Self::LogNormal => normalization("F", -1),
            Self::Gaussian
            | Self::StepFunction
            | Self::StepFunctionUpper
            | Self::DiracDelta
            | Self::PowerlawFlux
            | Self::UniformPrior
            | Self::LogUniformPrior => None,
        }
    }

    pub const fn is_supported(self) -> bool {
        self.normalization().is_some()
    }
}

impl Display for SpectralKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
