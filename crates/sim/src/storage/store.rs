//! JSON file of signed fixation times.
//!
//! Layout of the file:
//!
//! ```text
//! [ hyperparameters, [dataset, dataset, ...] ]
//!
//! hyperparameters: {"model", "population_size", "p0", "selection"}
//! dataset:         {"parameter", "selection_coefficient", "fixation": [t1, t2, ...]}
//! ```
//!
//! A positive time is a time to fixation, a negative one a time to extinction. A
//! file is bound to its hyperparameters; in particular fecundity and viability
//! results always live in different files.

use crate::errors::StorageError;
use crate::simulation::TrialStatistics;
use crate::storage::types::{FixationSet, Hyperparameters, ParameterGrid};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// On-disk layout: a two-element JSON array.
type FileContents = (Hyperparameters, Vec<FixationSet>);

/// A fixation data file loaded in memory.
#[derive(Debug, Clone)]
pub struct FixationDataStore {
    path: PathBuf,
    hyperparameters: Hyperparameters,
    datasets: Vec<FixationSet>,
}

impl FixationDataStore {
    /// Load an existing file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let reader = BufReader::new(File::open(&path)?);
        let (hyperparameters, datasets): FileContents = serde_json::from_reader(reader)?;
        tracing::debug!(path = %path.display(), datasets = datasets.len(), "opened fixation store");
        Ok(Self {
            path,
            hyperparameters,
            datasets,
        })
    }

    /// Load `path`, or create it with `hyperparameters` if it does not exist.
    ///
    /// # Errors
    /// Returns [`StorageError::HyperparameterMismatch`] if the existing file was
    /// created with different hyperparameters.
    pub fn open_or_create(
        path: impl AsRef<Path>,
        hyperparameters: Hyperparameters,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                hyperparameters,
                datasets: Vec::new(),
            };
            store.save()?;
            tracing::info!(path = %path.display(), "created fixation store");
            return Ok(store);
        }

        let store = Self::open(path)?;
        if store.hyperparameters != hyperparameters {
            return Err(StorageError::HyperparameterMismatch {
                path: path.to_path_buf(),
                expected: hyperparameters.to_string(),
                found: store.hyperparameters.to_string(),
            });
        }
        Ok(store)
    }

    /// Write the whole file.
    pub fn save(&self) -> Result<(), StorageError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, &(&self.hyperparameters, &self.datasets))?;
        writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn datasets(&self) -> &[FixationSet] {
        &self.datasets
    }

    /// Append signed times to the dataset for `(parameter, selection_coefficient)`,
    /// creating it if needed. Does not write to disk.
    pub fn append_times(&mut self, parameter: f64, selection_coefficient: f64, times: &[i64]) {
        let index = match self
            .datasets
            .iter()
            .position(|set| set.matches(parameter, selection_coefficient))
        {
            Some(index) => index,
            None => {
                self.datasets
                    .push(FixationSet::new(parameter, selection_coefficient));
                self.datasets.len() - 1
            }
        };
        self.datasets[index].fixation.extend_from_slice(times);
    }

    /// Append the completed trials of `stats` and write the file.
    ///
    /// Censored and failed trials have no absorption time and are not stored.
    pub fn append(
        &mut self,
        parameter: f64,
        selection_coefficient: f64,
        stats: &TrialStatistics,
    ) -> Result<usize, StorageError> {
        let times = stats.signed_times();
        self.append_times(parameter, selection_coefficient, &times);
        self.save()?;
        tracing::info!(
            parameter,
            selection_coefficient,
            stored = times.len(),
            skipped = stats.len() - times.len(),
            "appended fixation times"
        );
        Ok(times.len())
    }

    /// Distinct shape parameters, optionally restricted to one selection coefficient.
    pub fn parameters(&self, selection_coefficient: Option<f64>) -> Vec<f64> {
        sorted_unique(
            self.datasets
                .iter()
                .filter(|set| selection_coefficient.map_or(true, |s| set.selection_coefficient == s))
                .map(|set| set.parameter),
        )
    }

    /// Distinct selection coefficients, optionally restricted to one parameter.
    pub fn selection_coefficients(&self, parameter: Option<f64>) -> Vec<f64> {
        sorted_unique(
            self.datasets
                .iter()
                .filter(|set| parameter.map_or(true, |p| set.parameter == p))
                .map(|set| set.selection_coefficient),
        )
    }

    pub fn exists(&self, parameter: f64, selection_coefficient: f64) -> bool {
        self.fixation_set(parameter, selection_coefficient).is_some()
    }

    pub fn fixation_set(&self, parameter: f64, selection_coefficient: f64) -> Option<&FixationSet> {
        self.datasets
            .iter()
            .find(|set| set.matches(parameter, selection_coefficient))
    }

    /// Tabulate `f` over every stored `(selection coefficient, parameter)` pair.
    pub fn grid<T>(&self, f: impl Fn(&FixationSet) -> T) -> ParameterGrid<T> {
        let parameters = self.parameters(None);
        let selection_coefficients = self.selection_coefficients(None);
        let cells = selection_coefficients
            .iter()
            .map(|&s| {
                parameters
                    .iter()
                    .map(|&p| self.fixation_set(p, s).map(&f))
                    .collect()
            })
            .collect();
        ParameterGrid {
            parameters,
            selection_coefficients,
            cells,
        }
    }
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}
