use anyhow::{Context, Result};
use cannings_sim::simulation::{Configuration, TrialRunner, TrialSummary};
use cannings_sim::storage::{FixationDataStore, Hyperparameters};
use serde::Serialize;

use crate::args::{resolve_configuration, RunArgs};
use crate::commands::run_with_bar;
use crate::printing::{print_parameters, print_summary};

#[derive(Serialize)]
struct RunReport {
    configuration: Configuration,
    summary: TrialSummary,
}

pub fn run_trials(args: &RunArgs) -> Result<()> {
    let config = resolve_configuration(&args.model, &args.execution)?;
    let model = config.model.build()?;
    if args.require_supercritical {
        model
            .ensure_supercritical()
            .context("Model rejected by --require-supercritical")?;
    }

    if let Some(path) = &args.save_config {
        std::fs::write(path, config.to_json()?)
            .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
    }

    if !args.json {
        println!("🧬 Cannings - Fixation Trials");
        println!("============================================");
        print_parameters(&config);
    }

    let runner = TrialRunner::new(model, config.execution)
        .context("Invalid execution settings")?
        .with_parallelism(!args.execution.sequential);
    let stats = run_with_bar(&runner, !(args.json || args.no_progress))?;
    let summary = stats.summary();

    if args.json {
        let report = RunReport {
            configuration: config,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&summary);
    }

    if let Some(path) = &args.output {
        let mut store =
            FixationDataStore::open_or_create(path, Hyperparameters::from(&config.model))
                .with_context(|| format!("Failed to open fixation data {}", path.display()))?;
        let stored = store
            .append(
                config.model.distribution.shape(),
                config.model.selection.coefficient(),
                &stats,
            )
            .context("Failed to store fixation times")?;
        if !args.json {
            println!("\n💾 Stored {stored} fixation times in {}", path.display());
        }
    }

    if !args.json {
        println!("\n✓ Done!");
    }
    Ok(())
}
