use anyhow::{Context, Result};
use cannings_sim::storage::{FixationDataStore, FixationSet};

use crate::args::InspectArgs;
use crate::printing::{print_grid, print_store_header};

pub fn show_data(args: &InspectArgs) -> Result<()> {
    let store = FixationDataStore::open(&args.file)
        .with_context(|| format!("Failed to open fixation data {}", args.file.display()))?;

    print_store_header(&store);

    if let (Some(parameter), Some(coefficient)) = (args.parameter, args.selection_coefficient) {
        match store.fixation_set(parameter, coefficient) {
            Some(set) => {
                println!("\n{set}");
                println!("Iterations: {}", set.nb_iterations());
                println!("Fixations: {}", set.nb_fixations());
                if let Some(p) = set.probability_fixation() {
                    println!("Fixation probability: {p:.4}");
                }
                if let Some(t) = set.avg_fixation_time() {
                    println!("Mean fixation time: {t:.2}");
                }
            }
            None => println!(
                "\nNo dataset for parameter {parameter} and selection coefficient {coefficient}."
            ),
        }
        return Ok(());
    }

    if store.datasets().is_empty() {
        println!("\nNo datasets stored yet.");
        return Ok(());
    }

    print_grid("Number of iterations", &store.grid(FixationSet::nb_iterations));
    print_grid("Number of fixations", &store.grid(FixationSet::nb_fixations));
    print_grid(
        "Fixation probability",
        &store.grid(|set| format!("{:.4}", set.probability_fixation().unwrap_or(0.0))),
    );
    print_grid(
        "Mean fixation time",
        &store.grid(|set| {
            set.avg_fixation_time()
                .map_or_else(|| "n/a".to_string(), |t| format!("{t:.2}"))
        }),
    );

    Ok(())
}
