use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cannings() -> Command {
    Command::cargo_bin("cannings").unwrap()
}

#[test]
fn test_run_prints_summary() {
    cannings()
        .args(["run", "--model", "poisson", "--lambda", "1.0"])
        .args(["-n", "10", "--initial", "5", "--trials", "200", "--seed", "42"])
        .arg("--no-progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Population Size: 10"))
        .stdout(predicate::str::contains("Fixation probability:"))
        .stdout(predicate::str::contains("Trials: 200"));
}

#[test]
fn test_run_json_output() {
    let output = cannings()
        .args(["run", "--model", "poisson", "--lambda", "1.0"])
        .args(["-n", "10", "--initial", "5", "--trials", "300", "--seed", "42"])
        .args(["--max-generations", "500", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["n_trials"], 300);
    assert_eq!(report["configuration"]["model"]["population_size"], 10);
    let p = report["summary"]["fixation_probability"].as_f64().unwrap();
    assert!((p - 0.5).abs() < 0.12, "fixation probability {p}");
}

#[test]
fn test_run_is_reproducible() {
    let run = || {
        cannings()
            .args(["run", "-n", "20", "--alpha", "1.3", "--p0", "0.1"])
            .args(["--selection", "viability", "--strength", "1.1"])
            .args(["--trials", "50", "--initial", "2", "--seed", "7", "--json"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_run_rejects_invalid_parameters() {
    cannings()
        .args(["run", "--p0", "1.5", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("p0"));

    cannings()
        .args(["run", "--selection", "fecundity", "--strength", "0.5"])
        .assert()
        .failure();

    cannings()
        .args(["run", "--selection", "both"])
        .assert()
        .failure();

    cannings()
        .args(["run", "-n", "10", "--initial", "11"])
        .assert()
        .failure();
}

#[test]
fn test_run_require_supercritical() {
    cannings()
        .args(["run", "--model", "poisson", "--lambda", "0.8"])
        .args(["--trials", "5", "--require-supercritical", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--require-supercritical"));
}

#[test]
fn test_run_stores_and_inspects_data() {
    let temp = tempdir().unwrap();
    let data = temp.path().join("fixation.json");

    for strength in ["1.0", "1.5"] {
        cannings()
            .args(["run", "-n", "20", "--alpha", "1.5", "--p0", "0.1"])
            .args(["--selection", "fecundity", "--strength", strength])
            .args(["--trials", "30", "--initial", "2", "--seed", "1", "--no-progress"])
            .arg("--output")
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("Stored"));
    }
    assert!(data.exists());

    cannings()
        .arg("inspect")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Population size: 20"))
        .stdout(predicate::str::contains("Selection: fecundity"))
        .stdout(predicate::str::contains("Number of iterations"))
        .stdout(predicate::str::contains("Number of fixations"));

    cannings()
        .arg("inspect")
        .arg(&data)
        .args(["--parameter", "1.5", "--selection-coefficient", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Iterations: 30"));
}

#[test]
fn test_run_refuses_mismatched_data_file() {
    let temp = tempdir().unwrap();
    let data = temp.path().join("fixation.json");

    cannings()
        .args(["run", "-n", "20", "--selection", "fecundity", "--strength", "1.1"])
        .args(["--trials", "5", "--seed", "1", "--no-progress"])
        .arg("--output")
        .arg(&data)
        .assert()
        .success();

    cannings()
        .args(["run", "-n", "20", "--selection", "viability", "--strength", "1.1"])
        .args(["--trials", "5", "--seed", "1", "--no-progress"])
        .arg("--output")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("hyperparameters"));
}

#[test]
fn test_run_from_config_file() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("config.json");
    let saved = temp.path().join("saved.json");

    std::fs::write(
        &config,
        r#"{
            "model": {
                "population_size": 12,
                "distribution": { "family": "beta_coalescent", "p0": 0.1, "beta": 0.5 },
                "selection": { "mode": "none", "strength": 1.0 }
            },
            "execution": { "n_trials": 40, "initial_type_a": 6, "max_generations": 100000, "seed": 3 }
        }"#,
    )
    .unwrap();

    cannings()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .args(["--trials", "25", "--no-progress"])
        .arg("--save-config")
        .arg(&saved)
        .assert()
        .success()
        .stdout(predicate::str::contains("Population Size: 12"))
        .stdout(predicate::str::contains("Trials: 25"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    assert_eq!(saved["execution"]["n_trials"], 25);
    assert_eq!(saved["model"]["distribution"]["family"], "beta_coalescent");
}

#[test]
fn test_config_conflicts_with_model_flags() {
    cannings()
        .args(["run", "--config", "config.json", "--alpha", "1.2"])
        .assert()
        .failure();
}

#[test]
fn test_validate_neutral_poisson() {
    cannings()
        .args(["validate", "--model", "poisson", "--lambda", "2.0"])
        .args(["-n", "20", "--initial", "5", "--trials", "1000", "--seed", "8"])
        .args(["--max-z", "4.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Diffusion Approximation"))
        .stdout(predicate::str::contains("Consistent"));
}

#[test]
fn test_validate_neutral_ignores_strength() {
    cannings()
        .args(["validate", "--model", "poisson", "--lambda", "2.0"])
        .args(["-n", "20", "--initial", "5", "--trials", "500", "--seed", "9"])
        .args(["--selection", "none", "--strength", "3.0", "--max-z", "4.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Regime: Neutral"));
}

#[test]
fn test_neutral_run_stores_zero_coefficient() {
    let temp = tempdir().unwrap();
    let data = temp.path().join("fixation.json");

    cannings()
        .args(["run", "-n", "10", "--selection", "none", "--strength", "3.0"])
        .args(["--trials", "5", "--initial", "5", "--seed", "2", "--no-progress"])
        .arg("--output")
        .arg(&data)
        .assert()
        .success();

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(stored[1][0]["selection_coefficient"], 0.0);
}

#[test]
fn test_validate_heavy_tail_has_no_reference() {
    cannings()
        .args(["validate", "--alpha", "1.5", "--trials", "5", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("infinite variance"));
}

#[test]
fn test_inspect_missing_file() {
    cannings()
        .args(["inspect", "/nonexistent/fixation.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open fixation data"));
}
