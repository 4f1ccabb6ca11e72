pub mod inspect;
pub mod run;
pub mod validate;

use anyhow::Result;
use cannings_sim::simulation::TrialRunner;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over trials, hidden when `show` is false.
pub(crate) fn trial_progress(n_trials: usize, show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(n_trials as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} trials ({eta}) {per_sec}",
            )?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Run every trial of `runner` behind a progress bar.
pub(crate) fn run_with_bar(
    runner: &TrialRunner,
    show: bool,
) -> Result<cannings_sim::simulation::TrialStatistics> {
    let pb = trial_progress(runner.execution().n_trials, show)?;
    let stats = runner.run_with_progress(|n| pb.inc(n));
    pb.finish_and_clear();
    Ok(stats)
}
