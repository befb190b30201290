//! JSON run configuration for spectral flux tables.

use crate::domain::{PsrError, ResponseAxis};
use crate::histogram::{Axis, HistogramError};
use crate::numerics::QuadratureOptions;
use crate::spectrum::{SpectralModel, SpectrumError};
use crate::units::{Dimension, Unit, UnitError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunConfig {
    pub spectrum: SpectrumConfig,
    pub energy_axis: EnergyAxisConfig,
    #[serde(default)]
    pub quadrature: QuadratureOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpectrumConfig {
    pub model: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterValue>,
}

/// A bare number, or a number with an explicit unit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Value(f64),
    Quantity { value: f64, unit: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnergyAxisConfig {
    pub edges: Vec<f64>,
    #[serde(default = "default_energy_unit")]
    pub unit: String,
}

fn default_energy_unit() -> String {
    "keV".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read run config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse run config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("parameter '{name}' unit '{unit}' must be an energy unit ({dimension})")]
    ParameterUnit {
        name: String,
        unit: String,
        dimension: Dimension,
    },
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error(transparent)]
    Unit(#[from] UnitError),
}

impl From<ConfigError> for PsrError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Read { .. } => PsrError::io_system("IO.CONFIG_READ", error.to_string()),
            ConfigError::Parse { .. } => {
                PsrError::input_validation("INPUT.CONFIG_PARSE", error.to_string())
            }
            ConfigError::ParameterUnit { .. } => {
                PsrError::input_validation("INPUT.SPECTRUM", error.to_string())
            }
            ConfigError::Spectrum(error) => error.into(),
            ConfigError::Histogram(error) => error.into(),
            ConfigError::Unit(error) => error.into(),
        }
    }
}

pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl RunConfig {
    pub fn energy_unit(&self) -> Result<Unit, ConfigError> {
        Ok(self.energy_axis.unit.parse()?)
    }

    /// The configured binning as an `Ei` axis.
    pub fn energy_axis(&self) -> Result<Axis, ConfigError> {
        Ok(Axis::new(
            ResponseAxis::PhotonEnergy.as_str(),
            self.energy_axis.edges.clone(),
            Some(self.energy_unit()?),
        )?)
    }

    /// Build the spectral model.
    ///
    /// Kinds without a normalization unit are rejected before any parameter is read.
    /// The normalization parameter keeps its unit. Shape parameters given with an energy
    /// unit are converted into the energy axis unit; bare numbers are taken as-is.
    pub fn spectral_model(&self) -> Result<SpectralModel, ConfigError> {
        let mut model = SpectralModel::from_name(&self.spectrum.model)?;
        if !model.kind().is_supported() {
            return Err(SpectrumError::Unsupported { model: model.name() }.into());
        }
        let energy_unit = self.energy_unit()?;
        let normalization = model
            .kind()
            .normalization()
            .map(|normalization| normalization.parameter);

        for (name, parameter) in &self.spectrum.parameters {
            let value = match parameter {
                ParameterValue::Value(value) => *value,
                ParameterValue::Quantity { value, unit } => {
                    let unit: Unit = unit.parse()?;
                    if normalization == Some(name.as_str()) {
                        model.set_normalization_unit(unit)?;
                        *value
                    } else if unit.has_dimension(Dimension::ENERGY) {
                        value * unit.conversion_factor(&energy_unit)?
                    } else {
                        return Err(ConfigError::ParameterUnit {
                            name: name.clone(),
                            unit: unit.to_string(),
                            dimension: unit.dimension(),
                        });
                    }
                }
            };
            model.set_parameter(name, value)?;
        }

        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ParameterValue, load_run_config};
    use crate::domain::PsrError;
    use crate::spectrum::{SpectralKind, SpectrumError};
    use std::fs;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, content: &str) -> std::path::PathBuf {
        let path = temp.path().join("run.json");
        fs::write(&path, content).expect("config should be written");
        path
    }

    #[test]
    fn loads_parameters_with_and_without_units() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_config(
            &temp,
            r#"{
                "spectrum": {
                    "model": "Band",
                    "parameters": {
                        "K": { "value": 0.01, "unit": "1 / (keV cm2 s)" },
                        "alpha": -1.0,
                        "beta": -2.3,
                        "xp": { "value": 0.5, "unit": "MeV" }
                    }
                },
                "energyAxis": { "edges": [50.0, 100.0, 500.0, 2000.0] },
                "quadrature": { "relTol": 1e-10 }
            }"#,
        );

        let config = load_run_config(&path).expect("config should load");
        assert_eq!(
            config.spectrum.parameters.get("alpha"),
            Some(&ParameterValue::Value(-1.0))
        );
        assert_eq!(config.quadrature.rel_tol, 1.0e-10);
        assert_eq!(config.quadrature.limit, 50);

        let model = config.spectral_model().expect("model should build");
        assert_eq!(model.kind(), SpectralKind::Band);
        assert_eq!(model.parameter("xp"), Some(500.0));
        assert_eq!(model.parameter("K"), Some(0.01));

        let axis = config.energy_axis().expect("axis should build");
        assert_eq!(axis.label(), "Ei");
        assert_eq!(axis.nbins(), 3);
        assert_eq!(axis.unit().map(ToString::to_string).as_deref(), Some("keV"));
    }

    #[test]
    fn read_and_parse_failures_are_distinct() {
        let temp = TempDir::new().expect("tempdir should be created");
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            load_run_config(&missing),
            Err(ConfigError::Read { path, .. }) if path == missing
        ));

        let path = write_config(&temp, r#"{ "spectrum": { "model": "Powerlaw" } }"#);
        assert!(matches!(
            load_run_config(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn shape_parameters_reject_non_energy_units() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_config(
            &temp,
            r#"{
                "spectrum": {
                    "model": "Powerlaw",
                    "parameters": { "piv": { "value": 1.0, "unit": "cm" } }
                },
                "energyAxis": { "edges": [1.0, 2.0], "unit": "MeV" }
            }"#,
        );
        let config = load_run_config(&path).expect("config should load");
        assert!(matches!(
            config.spectral_model(),
            Err(ConfigError::ParameterUnit { name, .. }) if name == "piv"
        ));
    }

    #[test]
    fn unknown_models_surface_spectrum_errors() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_config(
            &temp,
            r#"{
                "spectrum": { "model": "TbAbs" },
                "energyAxis": { "edges": [1.0, 2.0] }
            }"#,
        );
        let config = load_run_config(&path).expect("config should load");
        assert!(matches!(
            config.spectral_model(),
            Err(ConfigError::Spectrum(SpectrumError::UnknownModel { .. }))
        ));
    }

    #[test]
    fn unsupported_models_fail_before_parameters_are_applied() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_config(
            &temp,
            r#"{
                "spectrum": {
                    "model": "Gaussian",
                    "parameters": {
                        "F": { "value": 1.0, "unit": "1 / (keV cm2 s)" },
                        "mu": { "value": 0.5, "unit": "MeV" }
                    }
                },
                "energyAxis": { "edges": [100.0, 1000.0] }
            }"#,
        );
        let config = load_run_config(&path).expect("config should load");
        let error = config.spectral_model().expect_err("Gaussian is unsupported");
        assert!(matches!(
            error,
            ConfigError::Spectrum(SpectrumError::Unsupported { model: "Gaussian" })
        ));
        assert_eq!(PsrError::from(error).placeholder(), "INPUT.UNSUPPORTED_SPECTRUM");
    }
}
