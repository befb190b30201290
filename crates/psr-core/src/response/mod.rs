//! Point-source response: effective area times exposure, binned over true energy and
//! any number of data-space axes.

use crate::domain::{PsrError, ResponseAxis};
use crate::histogram::{Axis, Histogram, HistogramError};
use crate::numerics::QuadratureOptions;
use crate::spectrum::{BinnedFlux, SpectralModel, SpectrumError};
use crate::units::Dimension;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseError {
    #[error("response axis '{label}' must carry an energy unit, got {unit:?}")]
    EnergyAxisUnit { label: String, unit: Option<String> },
    #[error("response contents must have area x time dimension, got '{unit}' ({dimension})")]
    ContentsUnit { unit: String, dimension: Dimension },
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}

impl From<ResponseError> for PsrError {
    fn from(error: ResponseError) -> Self {
        match error {
            ResponseError::Histogram(error) => error.into(),
            ResponseError::Spectrum(error) => error.into(),
            other => PsrError::input_validation("INPUT.RESPONSE", other.to_string()),
        }
    }
}

/// Expected response of the instrument to a source at one sky location.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSourceResponse {
    histogram: Histogram,
}

impl PointSourceResponse {
    pub fn new(histogram: Histogram) -> Result<Self, ResponseError> {
        let label = ResponseAxis::PhotonEnergy.as_str();
        let energy_axis = histogram.axes().get(label)?;
        if !energy_axis
            .unit()
            .is_some_and(|unit| unit.has_dimension(Dimension::ENERGY))
        {
            return Err(ResponseError::EnergyAxisUnit {
                label: label.to_string(),
                unit: energy_axis.unit().map(ToString::to_string),
            });
        }

        let unit = histogram.unit();
        if !unit.has_dimension(Dimension::AREA_TIME) {
            return Err(ResponseError::ContentsUnit {
                unit: unit.to_string(),
                dimension: unit.dimension(),
            });
        }

        for axis in histogram.axes() {
            if ResponseAxis::from_label(axis.label()).is_none() {
                debug!(label = axis.label(), "response carries an unrecognized axis");
            }
        }
        Ok(Self { histogram })
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn into_histogram(self) -> Histogram {
        self.histogram
    }

    /// The true photon energy (`Ei`) binning.
    pub fn photon_energy_axis(&self) -> &Axis {
        let index = self
            .histogram
            .axes()
            .index_of(ResponseAxis::PhotonEnergy.as_str())
            .unwrap_or_default();
        &self.histogram.axes()[index]
    }

    /// Spectrum integrated over every `Ei` bin.
    pub fn integrated_flux(
        &self,
        spectrum: &SpectralModel,
        options: &QuadratureOptions,
    ) -> Result<BinnedFlux, ResponseError> {
        Ok(spectrum.integrate_bins(self.photon_energy_axis(), options)?)
    }

    /// Expected counts per analysis bin for `spectrum`, with default quadrature settings.
    pub fn get_expectation(&self, spectrum: &SpectralModel) -> Result<Histogram, ResponseError> {
        self.get_expectation_with(spectrum, &QuadratureOptions::default())
    }

    pub fn get_expectation_with(
        &self,
        spectrum: &SpectralModel,
        options: &QuadratureOptions,
    ) -> Result<Histogram, ResponseError> {
        // Fails before any integration for kinds outside the normalization table.
        spectrum.normalization_unit()?;

        let flux = self.integrated_flux(spectrum, options)?;
        let expectation = self.histogram.scale_along(
            ResponseAxis::PhotonEnergy.as_str(),
            &flux.values,
            &flux.unit,
        )?;
        info!(
            model = spectrum.name(),
            bins = flux.len(),
            sparse = expectation.is_sparse(),
            total = expectation.total(),
            unit = %expectation.unit(),
            "computed point-source expectation"
        );
        Ok(expectation)
    }
}

impl TryFrom<Histogram> for PointSourceResponse {
    type Error = ResponseError;

    fn try_from(histogram: Histogram) -> Result<Self, Self::Error> {
        Self::new(histogram)
    }
}
