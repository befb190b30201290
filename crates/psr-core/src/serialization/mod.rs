//! Deterministic text and JSON renderings of binned spectral flux.

use crate::spectrum::{BinnedFlux, SpectralModel};
use crate::units::Unit;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const COLUMN_WIDTH: usize = 16;
const COLUMN_PRECISION: usize = 8;

pub fn format_scientific_f64(value: f64, width: usize, precision: usize) -> String {
    format!(
        "{value:>width$.precision$e}",
        width = width,
        precision = precision
    )
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

fn unit_label(unit: &Unit) -> String {
    let rendered = unit.to_string();
    if rendered.is_empty() {
        "dimensionless".to_string()
    } else {
        rendered
    }
}

/// Fixed-width `lower upper flux` table preceded by `#` header lines.
pub fn format_flux_table(model: &SpectralModel, flux: &BinnedFlux) -> String {
    let mut table = String::new();
    let _ = writeln!(table, "# model: {}", model.name());
    for (name, value) in model.parameters() {
        let _ = writeln!(table, "# parameter {name} = {value:e}");
    }
    let _ = writeln!(table, "# energy unit: {}", unit_label(&flux.energy_unit));
    let _ = writeln!(table, "# unit: {}", unit_label(&flux.unit));
    let _ = writeln!(
        table,
        "#{:>w1$}{:>w$}{:>w$}",
        "lower",
        "upper",
        "flux",
        w1 = COLUMN_WIDTH - 1,
        w = COLUMN_WIDTH
    );
    for ((lower, upper), value) in flux.lower.iter().zip(&flux.upper).zip(&flux.values) {
        let _ = writeln!(
            table,
            "{}{}{}",
            format_scientific_f64(*lower, COLUMN_WIDTH, COLUMN_PRECISION),
            format_scientific_f64(*upper, COLUMN_WIDTH, COLUMN_PRECISION),
            format_scientific_f64(*value, COLUMN_WIDTH, COLUMN_PRECISION)
        );
    }
    normalize_text_artifact(&table)
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FluxReport {
    pub model: String,
    pub parameters: Vec<FluxReportParameter>,
    pub energy_unit: String,
    pub unit: String,
    pub total: f64,
    pub bins: Vec<FluxReportBin>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FluxReportParameter {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FluxReportBin {
    pub lower: f64,
    pub upper: f64,
    pub flux: f64,
    pub converged: bool,
}

impl FluxReport {
    pub fn new(model: &SpectralModel, flux: &BinnedFlux) -> Self {
        let bins = flux
            .lower
            .iter()
            .zip(&flux.upper)
            .zip(&flux.values)
            .enumerate()
            .map(|(bin, ((lower, upper), value))| FluxReportBin {
                lower: *lower,
                upper: *upper,
                flux: *value,
                converged: !flux.unconverged_bins.contains(&bin),
            })
            .collect();
        Self {
            model: model.name().to_string(),
            parameters: model
                .parameters()
                .map(|(name, value)| FluxReportParameter {
                    name: name.to_string(),
                    value,
                })
                .collect(),
            energy_unit: unit_label(&flux.energy_unit),
            unit: unit_label(&flux.unit),
            total: flux.total(),
            bins,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FluxReport, format_flux_table, format_scientific_f64, normalize_text_artifact,
        write_text_artifact,
    };
    use crate::spectrum::{BinnedFlux, SpectralKind, SpectralModel};
    use crate::units::Unit;
    use std::fs;
    use tempfile::TempDir;

    fn sample_flux() -> BinnedFlux {
        BinnedFlux {
            lower: vec![1.0, 2.0],
            upper: vec![2.0, 4.0],
            values: vec![0.5, 0.25],
            unit: "1 / (cm2 s)".parse().expect("unit"),
            energy_unit: Unit::kev(),
            unconverged_bins: vec![1],
        }
    }

    #[test]
    fn scientific_formatting_is_fixed_width() {
        assert_eq!(format_scientific_f64(1234.0, 12, 3), "     1.234e3");
        assert_eq!(format_scientific_f64(-0.5, 8, 1), " -5.0e-1");
    }

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        let normalized = normalize_text_artifact("alpha\r\nbeta\rgamma");
        assert_eq!(normalized, "alpha\nbeta\ngamma\n");
    }

    #[test]
    fn flux_table_has_unit_header_and_aligned_rows() {
        let model = SpectralModel::new(SpectralKind::Constant);
        let table = format_flux_table(&model, &sample_flux());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "# model: Constant");
        assert_eq!(lines[1], "# parameter k = 0e0");
        assert_eq!(lines[2], "# energy unit: keV");
        assert_eq!(lines[3], "# unit: 1 / (cm2 s)");
        assert_eq!(lines[4].len(), 48);
        assert_eq!(lines[5], "    1.00000000e0    2.00000000e0   5.00000000e-1");
        assert_eq!(lines.len(), 7);
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn json_report_marks_unconverged_bins() {
        let model = SpectralModel::new(SpectralKind::Constant);
        let report = FluxReport::new(&model, &sample_flux());
        assert_eq!(report.total, 0.75);
        assert!(report.bins[0].converged);
        assert!(!report.bins[1].converged);

        let json = report.to_json().expect("json");
        assert!(json.contains("\"energyUnit\": \"keV\""));
        let parsed: FluxReport = serde_json::from_str(&json).expect("roundtrip");
        assert_eq!(parsed, report);
    }

    #[test]
    fn repeated_text_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("flux.txt");
        let input = "line 1\r\nline 2\rline 3";

        write_text_artifact(&path, input).expect("first write should succeed");
        let first = fs::read(&path).expect("artifact should be readable");
        write_text_artifact(&path, input).expect("second write should succeed");
        let second = fs::read(&path).expect("artifact should be readable");

        assert_eq!(first, second);
        assert_eq!(second, b"line 1\nline 2\nline 3\n");
    }
}
