use cannings_analysis::ValidationReport;
use cannings_sim::simulation::{Configuration, DistributionConfig, TrialSummary};
use cannings_sim::storage::{FixationDataStore, ParameterGrid};
use std::fmt::Display;

pub fn print_parameters(config: &Configuration) {
    let model = &config.model;
    let execution = &config.execution;

    println!("\n📋 Model Configuration");
    println!(
        "  • Population Size: {} [-n, --population-size]",
        model.population_size
    );
    match model.distribution {
        DistributionConfig::PowerLaw { p0, alpha } => {
            println!("  • Model: Schweinsberg power law [--model schweinsberg]");
            println!("    - alpha: {alpha} [--alpha]");
            println!("    - p0: {p0} [--p0]");
        }
        DistributionConfig::BetaCoalescent { p0, beta } => {
            println!("  • Model: Beta({beta}, {}) coalescent [--model beta-coalescent]", 2.0 - beta);
            println!("    - beta: {beta} [--beta] (alpha = {})", 2.0 - beta);
            println!("    - p0: {p0} [--p0]");
        }
        DistributionConfig::Poisson { lambda } => {
            println!("  • Model: Poisson [--model poisson]");
            println!("    - lambda: {lambda} [--lambda]");
        }
    }

    println!("\n🎯 Selection");
    if model.selection.is_neutral() {
        println!("  • Regime: Neutral (No Selection)");
    } else {
        println!("  • Regime: {} [--selection]", model.selection.mode());
        println!(
            "  • Strength: {} (s = {:.4}) [-s, --strength]",
            model.selection.strength(),
            model.selection.coefficient()
        );
    }

    println!("\n⚙️  Execution");
    println!("  • Trials: {} [-r, --trials]", execution.n_trials);
    println!("  • Initial Type A: {} [-i, --initial]", execution.initial_type_a);
    println!(
        "  • Max Generations: {} [-g, --max-generations]",
        execution.max_generations
    );
    match execution.seed {
        Some(seed) => println!("  • Random Seed: {seed} [--seed]"),
        None => println!("  • Random Seed: Random [--seed]"),
    }
    println!();
}

fn format_option(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

pub fn print_summary(summary: &TrialSummary) {
    println!("\n📊 Results");
    println!("{}", "=".repeat(50));
    println!("Trials: {}", summary.n_trials);
    println!("  • Fixed: {}", summary.fixed);
    println!("  • Extinct: {}", summary.extinct);
    if summary.censored > 0 {
        println!("  • Censored (max generations reached): {}", summary.censored);
    }
    if summary.failed > 0 {
        println!("  • Failed (empty offspring pool): {}", summary.failed);
    }
    println!(
        "Fixation probability: {}",
        format_option(summary.fixation_probability, 4)
    );
    println!(
        "Mean absorption time: {}",
        format_option(summary.mean_absorption_time, 2)
    );
    println!(
        "Variance of absorption time: {}",
        format_option(summary.variance_absorption_time, 2)
    );
    println!(
        "Mean fixation time: {}",
        format_option(summary.mean_fixation_time, 2)
    );
    println!(
        "Mean extinction time: {}",
        format_option(summary.mean_extinction_time, 2)
    );
}

pub fn print_validation(report: &ValidationReport, max_z: f64) {
    println!("\n🔬 Diffusion Approximation");
    println!("{}", "=".repeat(50));
    println!("Completed trials: {}", report.completed_trials);
    println!(
        "Fixation probability: observed {:.4}, expected {:.4} (± {:.4})",
        report.observed_fixation_probability,
        report.expected_fixation_probability,
        report.standard_error
    );
    println!("z-score: {:.2} (accepted |z| <= {max_z})", report.z_score);
    match report.expected_absorption_time {
        Some(expected) => println!(
            "Mean absorption time: observed {:.2}, expected {expected:.2}",
            report.observed_absorption_time
        ),
        None => println!(
            "Mean absorption time: observed {:.2} (no closed form under selection)",
            report.observed_absorption_time
        ),
    }
    println!("Median absorption time: {:.1}", report.median_absorption_time);
}

/// Print a grid with selection coefficients as rows and parameters as columns.
pub fn print_grid<T: Display>(title: &str, grid: &ParameterGrid<T>) {
    println!("\n{title}");
    let header: Vec<String> = grid.parameters.iter().map(|p| format!("{p:>10}")).collect();
    println!("{:<22}{}", "selection \\ parameter", header.join(""));
    for (s, row) in grid.selection_coefficients.iter().zip(&grid.cells) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(value) => format!("{value:>10}"),
                None => format!("{:>10}", "-"),
            })
            .collect();
        println!("{s:<22}{}", cells.join(""));
    }
}

pub fn print_store_header(store: &FixationDataStore) {
    let hyper = store.hyperparameters();
    println!("\n📂 Fixation Data: {}", store.path().display());
    println!("{}", "=".repeat(50));
    println!("Model: {}", hyper.model);
    println!("Population size: {}", hyper.population_size);
    match hyper.p0 {
        Some(p0) => println!("p0: {p0}"),
        None => println!("p0: n/a"),
    }
    println!("Selection: {}", hyper.selection);
    println!("Datasets: {}", store.datasets().len());
}
