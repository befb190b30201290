//! Spectral hypotheses: the model catalog, evaluation and per-bin integration.

mod catalog;
mod model;

pub use catalog::{Normalization, SpectralKind};
pub use model::{BinnedFlux, SpectralModel};

use crate::domain::PsrError;
use crate::numerics::QuadratureError;
use crate::units::Dimension;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    #[error("unknown spectral model '{name}'")]
    UnknownModel { name: String },
    #[error("spectral model '{model}' has no parameter '{name}'; parameters: {available:?}")]
    UnknownParameter {
        model: &'static str,
        name: String,
        available: &'static [&'static str],
    },
    #[error("spectral model '{model}' parameter '{name}' {reason}, got {value}")]
    InvalidParameter {
        model: &'static str,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("Spectrum not yet supported: '{model}' has no known normalization unit")]
    Unsupported { model: &'static str },
    #[error(
        "spectral model '{model}' parameter '{parameter}' needs dimension {expected}, got unit '{unit}'"
    )]
    NormalizationDimension {
        model: &'static str,
        parameter: &'static str,
        unit: String,
        expected: Dimension,
    },
    #[error("energy axis '{label}' must carry an energy unit, got {unit:?}")]
    EnergyAxis { label: String, unit: Option<String> },
    #[error("spectral model '{model}' failed to integrate bin {bin} [{lower}, {upper}]: {source}")]
    Quadrature {
        model: &'static str,
        bin: usize,
        lower: f64,
        upper: f64,
        source: QuadratureError,
    },
}

impl From<SpectrumError> for PsrError {
    fn from(error: SpectrumError) -> Self {
        match &error {
            SpectrumError::Unsupported { .. } => {
                PsrError::input_validation("INPUT.UNSUPPORTED_SPECTRUM", error.to_string())
            }
            SpectrumError::EnergyAxis { .. } => {
                PsrError::input_validation("INPUT.ENERGY_AXIS", error.to_string())
            }
            SpectrumError::Quadrature { source, .. } => {
                let base = PsrError::from(source.clone());
                PsrError::new(base.category(), base.placeholder(), error.to_string())
            }
            SpectrumError::UnknownModel { .. }
            | SpectrumError::UnknownParameter { .. }
            | SpectrumError::InvalidParameter { .. }
            | SpectrumError::NormalizationDimension { .. } => {
                PsrError::input_validation("INPUT.SPECTRUM", error.to_string())
            }
        }
    }
}
