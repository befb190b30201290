use super::CliError;
use anyhow::Context;
use psr_core::config::load_run_config;
use psr_core::serialization::{FluxReport, format_flux_table, write_text_artifact};
use psr_core::spectrum::SpectralKind;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct ModelsArgs {
    /// Only list models usable for expected counts
    #[arg(long)]
    supported_only: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct FluxArgs {
    /// JSON run configuration path
    #[arg(long)]
    config: PathBuf,

    /// Write the result here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit a JSON report instead of a fixed-width table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: &'static str,
    normalization: Option<&'static str>,
    supported: bool,
    parameters: &'static [&'static str],
}

pub(super) fn run_models_command(args: ModelsArgs) -> Result<i32, CliError> {
    let entries: Vec<ModelEntry> = SpectralKind::ALL
        .iter()
        .filter(|kind| !args.supported_only || kind.is_supported())
        .map(|kind| ModelEntry {
            name: kind.as_str(),
            normalization: kind.normalization().map(|normalization| normalization.parameter),
            supported: kind.is_supported(),
            parameters: kind.parameter_names(),
        })
        .collect();

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&entries).context("failed to render model catalog")?;
        println!("{rendered}");
        return Ok(0);
    }

    println!(
        "{:<32}{:<15}{:<11}PARAMETERS",
        "MODEL", "NORMALIZATION", "SUPPORTED"
    );
    for entry in &entries {
        println!(
            "{:<32}{:<15}{:<11}{}",
            entry.name,
            entry.normalization.unwrap_or("-"),
            if entry.supported { "yes" } else { "no" },
            entry.parameters.join(", ")
        );
    }
    Ok(0)
}

pub(super) fn run_flux_command(args: FluxArgs) -> Result<i32, CliError> {
    let config = load_run_config(&args.config).map_err(CliError::compute)?;
    let model = config.spectral_model().map_err(CliError::compute)?;
    let axis = config.energy_axis().map_err(CliError::compute)?;

    let flux = model
        .integrate_bins(&axis, &config.quadrature)
        .map_err(CliError::compute)?;
    info!(
        model = model.name(),
        bins = flux.len(),
        total = flux.total(),
        "integrated spectral flux"
    );

    let rendered = if args.json {
        FluxReport::new(&model, &flux)
            .to_json()
            .context("failed to render flux report")?
    } else {
        format_flux_table(&model, &flux)
    };

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory '{}'", parent.display())
                })?;
            }
            write_text_artifact(&path, &rendered)
                .with_context(|| format!("failed to write flux output '{}'", path.display()))?;
            println!("Flux output: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(0)
}
