use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_psr(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_psr"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("psr should run")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn powerlaw_config(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("config/powerlaw.json");
    write_file(
        &path,
        r#"
        {
          "spectrum": {
            "model": "Powerlaw",
            "parameters": {
              "K": { "value": 1e-3, "unit": "1 / (keV cm2 s)" },
              "piv": 100.0,
              "index": -2.0
            }
          },
          "energyAxis": { "edges": [100.0, 200.0, 400.0], "unit": "keV" }
        }
        "#,
    );
    path
}

#[test]
fn models_command_lists_catalog_with_support_flags() {
    let output = run_psr(&["models"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let powerlaw = stdout
        .lines()
        .find(|line| line.starts_with("Powerlaw "))
        .expect("Powerlaw row");
    assert!(powerlaw.contains(" yes "));
    assert!(powerlaw.ends_with("K, piv, index"));
    let gaussian = stdout
        .lines()
        .find(|line| line.starts_with("Gaussian "))
        .expect("Gaussian row");
    assert!(gaussian.contains(" no "));
}

#[test]
fn models_command_emits_supported_json() {
    let output = run_psr(&["models", "--json", "--supported-only"]);
    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("models JSON should parse");
    let entries = parsed.as_array().expect("array");
    assert_eq!(entries.len(), 24);
    assert!(entries.iter().all(|entry| entry["supported"] == Value::Bool(true)));
    let eflux = entries
        .iter()
        .find(|entry| entry["name"] == "Powerlaw_Eflux")
        .expect("Powerlaw_Eflux entry");
    assert_eq!(eflux["normalization"], "F");
}

#[test]
fn flux_command_prints_fixed_width_table() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config = powerlaw_config(&temp);

    let output = run_psr(&["flux", "--config", config.to_str().expect("utf-8 path")]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# model: Powerlaw"));
    assert!(stdout.contains("# unit: 1 / (cm2 s)"));
    let rows: Vec<&str> = stdout.lines().filter(|line| !line.starts_with('#')).collect();
    assert_eq!(rows.len(), 2);

    // 10 * (1/100 - 1/200) = 0.05
    let flux: f64 = rows[0]
        .split_whitespace()
        .nth(2)
        .expect("flux column")
        .parse()
        .expect("numeric flux");
    assert!((flux - 0.05).abs() < 1.0e-9, "flux was {flux}");
}

#[test]
fn flux_command_writes_json_report_to_output_path() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config = powerlaw_config(&temp);
    let report_path = temp.path().join("out/report.json");

    let output = run_psr(&[
        "flux",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--json",
        "--output",
        report_path.to_str().expect("utf-8 path"),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Flux output:"));

    let parsed: Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report should be readable"))
            .expect("report JSON should parse");
    assert_eq!(parsed["model"], "Powerlaw");
    assert_eq!(parsed["unit"], "1 / (cm2 s)");
    let bins = parsed["bins"].as_array().expect("bins");
    assert_eq!(bins.len(), 2);
    let second = bins[1]["flux"].as_f64().expect("flux");
    assert!((second - 0.025).abs() < 1.0e-9, "flux was {second}");
    assert_eq!(bins[1]["converged"], Value::Bool(true));
}

#[test]
fn unsupported_spectrum_exits_with_input_validation_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config = temp.path().join("gaussian.json");
    write_file(
        &config,
        r#"
        {
          "spectrum": { "model": "Gaussian", "parameters": { "mu": 500.0, "sigma": 20.0 } },
          "energyAxis": { "edges": [100.0, 1000.0] }
        }
        "#,
    );

    let output = run_psr(&["flux", "--config", config.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [INPUT.UNSUPPORTED_SPECTRUM] Spectrum not yet supported"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("FATAL EXIT CODE: 2"));
}

#[test]
fn unsupported_spectrum_with_unit_carrying_normalization_is_still_unsupported() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config = temp.path().join("gaussian_units.json");
    write_file(
        &config,
        r#"
        {
          "spectrum": {
            "model": "Gaussian",
            "parameters": {
              "F": { "value": 1.0, "unit": "1 / (keV cm2 s)" },
              "mu": 500.0,
              "sigma": 20.0
            }
          },
          "energyAxis": { "edges": [100.0, 1000.0] }
        }
        "#,
    );

    let output = run_psr(&["flux", "--config", config.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [INPUT.UNSUPPORTED_SPECTRUM] Spectrum not yet supported"),
        "stderr: {stderr}"
    );
    assert!(!stderr.contains("INPUT.SPECTRUM]"), "stderr: {stderr}");
}

#[test]
fn missing_config_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("absent.json");

    let output = run_psr(&["flux", "--config", missing.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [IO.CONFIG_READ]"), "stderr: {stderr}");
    assert!(stderr.contains("FATAL EXIT CODE: 3"));
}

#[test]
fn invalid_band_parameters_are_rejected() {
    let temp = TempDir::new().expect("tempdir should be created");
    let config = temp.path().join("band.json");
    write_file(
        &config,
        r#"
        {
          "spectrum": { "model": "Band", "parameters": { "alpha": -2.5, "beta": -2.0 } },
          "energyAxis": { "edges": [10.0, 100.0] }
        }
        "#,
    );

    let output = run_psr(&["flux", "--config", config.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [INPUT.SPECTRUM]"));
}

#[test]
fn usage_errors_map_to_exit_code_two() {
    let output = run_psr(&["flux"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [INPUT.CLI_USAGE]"), "stderr: {stderr}");

    let help = run_psr(&["--help"]);
    assert!(help.status.success());
    assert!(String::from_utf8_lossy(&help.stdout).contains("models"));
}
