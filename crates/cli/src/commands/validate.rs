use anyhow::{bail, Context, Result};
use cannings_analysis::compare;
use cannings_sim::simulation::TrialRunner;

use crate::args::{resolve_configuration, ValidateArgs};
use crate::commands::run_with_bar;
use crate::printing::{print_parameters, print_summary, print_validation};

pub fn validate_model(args: &ValidateArgs) -> Result<()> {
    let config = resolve_configuration(&args.model, &args.execution)?;
    let model = config.model.build()?;

    if !args.json {
        println!("🧬 Cannings - Diffusion Check");
        println!("============================================");
        print_parameters(&config);
    }

    let runner = TrialRunner::new(model.clone(), config.execution)
        .context("Invalid execution settings")?
        .with_parallelism(!args.execution.sequential);
    let stats = run_with_bar(&runner, !args.json)?;

    let report = compare(&model, config.execution.initial_type_a, &stats)
        .context("Cannot compare with the diffusion approximation")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&stats.summary());
        print_validation(&report, args.max_z);
    }

    if !report.is_consistent(args.max_z) {
        bail!(
            "Simulated fixation probability {:.4} is {:.2} standard errors from the expected {:.4}",
            report.observed_fixation_probability,
            report.z_score,
            report.expected_fixation_probability
        );
    }
    if !args.json {
        println!("\n✓ Consistent with the diffusion approximation");
    }
    Ok(())
}
