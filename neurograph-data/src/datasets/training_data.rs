use neurograph_core::{NeuroGraphError, Trial};

use super::traits::Dataset;
use crate::samplers::{Sampler, SequentialSampler};

/// An immutable, ordered set of trials.
///
/// Every call to [`iter`](Self::iter) starts a fresh pass, so several epochs
/// (or several trainers) can walk the same set independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingData {
    trials: Vec<Trial>,
}

impl TrainingData {
    pub fn new(trials: Vec<Trial>) -> Self {
        TrainingData { trials }
    }

    /// Builds `count` trials by calling `f` with each index in turn.
    pub fn from_fn<F>(count: usize, f: F) -> Self
    where
        F: FnMut(usize) -> Trial,
    {
        (0..count).map(f).collect()
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// A new pass over every trial in stored order.
    pub fn iter(&self) -> Trials<'_> {
        let len = self.trials.len();
        Trials::new(&self.trials, SequentialSampler.indices(len).collect())
    }

    /// A new pass in the order chosen by `sampler`.
    ///
    /// The indices are drawn up front so a bad sampler is caught before any
    /// trial is visited.
    ///
    /// # Errors
    /// `IndexOutOfBounds` for an index past the last trial, `DimensionMismatch`
    /// when the sampler yields a different count than its `num_samples`.
    pub fn iter_with<S: Sampler + ?Sized>(&self, sampler: &S) -> Result<Trials<'_>, NeuroGraphError> {
        let len = self.trials.len();
        let indices: Vec<usize> = sampler.indices(len).collect();
        if let Some(&index) = indices.iter().find(|&&index| index >= len) {
            return Err(NeuroGraphError::IndexOutOfBounds { index, len });
        }
        let expected = sampler.num_samples(len);
        if indices.len() != expected {
            return Err(NeuroGraphError::DimensionMismatch {
                expected,
                actual: indices.len(),
                operation: format!("indices from {:?}", sampler),
            });
        }
        Ok(Trials::new(&self.trials, indices))
    }

    /// Checks every trial against a network's boundary widths.
    ///
    /// # Errors
    /// `DimensionMismatch` naming the first offending trial.
    pub fn check_widths(&self, inputs: usize, outputs: usize) -> Result<(), NeuroGraphError> {
        for (index, trial) in self.trials.iter().enumerate() {
            if trial.inputs.len() != inputs {
                return Err(NeuroGraphError::DimensionMismatch {
                    expected: inputs,
                    actual: trial.inputs.len(),
                    operation: format!("inputs of trial {}", index),
                });
            }
            if trial.outputs.len() != outputs {
                return Err(NeuroGraphError::DimensionMismatch {
                    expected: outputs,
                    actual: trial.outputs.len(),
                    operation: format!("outputs of trial {}", index),
                });
            }
        }
        Ok(())
    }
}

impl Dataset for TrainingData {
    type Item = Trial;

    fn get(&self, index: usize) -> Result<Trial, NeuroGraphError> {
        self.trials
            .get(index)
            .cloned()
            .ok_or(NeuroGraphError::IndexOutOfBounds {
                index,
                len: self.trials.len(),
            })
    }

    fn len(&self) -> usize {
        self.trials.len()
    }
}

impl From<Vec<Trial>> for TrainingData {
    fn from(trials: Vec<Trial>) -> Self {
        TrainingData::new(trials)
    }
}

impl FromIterator<Trial> for TrainingData {
    fn from_iter<I: IntoIterator<Item = Trial>>(iter: I) -> Self {
        TrainingData::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TrainingData {
    type Item = &'a Trial;
    type IntoIter = Trials<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`TrainingData`], borrowing the trials.
pub struct Trials<'a> {
    trials: &'a [Trial],
    indices: std::vec::IntoIter<usize>,
}

impl<'a> Trials<'a> {
    fn new(trials: &'a [Trial], indices: Vec<usize>) -> Self {
        Trials {
            trials,
            indices: indices.into_iter(),
        }
    }
}

impl<'a> Iterator for Trials<'a> {
    type Item = &'a Trial;

    fn next(&mut self) -> Option<&'a Trial> {
        let trials = self.trials;
        // every index was checked against the length when the pass began
        self.indices.next().and_then(|i| trials.get(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Trials<'_> {}

#[cfg(test)]
#[path = "training_data_test.rs"]
mod tests;
