//! Racing several independent trainers and dropping the weakest.

use log::{info, warn};
use neurograph_core::NeuroGraphError;

use crate::report::EpochReport;
use crate::trainer::Trainer;

/// A named trainer taking part in a [`Tournament`].
#[derive(Debug)]
pub struct Entrant<'d> {
    name: String,
    trainer: Trainer<'d>,
    last_report: Option<EpochReport>,
}

impl<'d> Entrant<'d> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trainer(&self) -> &Trainer<'d> {
        &self.trainer
    }

    pub fn last_report(&self) -> Option<&EpochReport> {
        self.last_report.as_ref()
    }

    pub fn min_error(&self) -> Option<f64> {
        self.trainer.min_error()
    }

    pub fn into_trainer(self) -> Trainer<'d> {
        self.trainer
    }
}

/// Steps every entrant in turn; entrants share nothing but the data set.
#[derive(Debug, Default)]
pub struct Tournament<'d> {
    entrants: Vec<Entrant<'d>>,
}

impl<'d> Tournament<'d> {
    pub fn new() -> Self {
        Tournament { entrants: Vec::new() }
    }

    pub fn add(&mut self, name: impl Into<String>, trainer: Trainer<'d>) -> &mut Self {
        self.entrants.push(Entrant {
            name: name.into(),
            trainer,
            last_report: None,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn entrants(&self) -> &[Entrant<'d>] {
        &self.entrants
    }

    /// Runs `epochs` epochs on every entrant.
    ///
    /// An entrant whose training diverges (`NumericOverflow`) is disqualified
    /// and its name returned; any other error aborts the round.
    pub fn round(&mut self, epochs: usize) -> Result<Vec<String>, NeuroGraphError> {
        let mut disqualified = Vec::new();
        let mut index = 0;
        while index < self.entrants.len() {
            match run_epochs(&mut self.entrants[index], epochs) {
                Ok(()) => index += 1,
                Err(NeuroGraphError::NumericOverflow { operation, .. }) => {
                    let entrant = self.entrants.remove(index);
                    warn!("{} disqualified: {} produced NaN", entrant.name, operation);
                    disqualified.push(entrant.name);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(disqualified)
    }

    /// Keeps the `keep` entrants with the lowest minimum error and returns the
    /// names of the others. Entrants that have not finished an epoch rank last.
    pub fn eliminate(&mut self, keep: usize) -> Vec<String> {
        self.rank();
        let eliminated: Vec<String> = self
            .entrants
            .drain(keep.min(self.entrants.len())..)
            .map(|entrant| entrant.name)
            .collect();
        if !eliminated.is_empty() {
            info!("eliminated {:?}, {} remaining", eliminated, self.entrants.len());
        }
        eliminated
    }

    /// Entrants ordered from best to worst minimum error.
    pub fn standings(&mut self) -> &[Entrant<'d>] {
        self.rank();
        &self.entrants
    }

    /// The entrant with the lowest minimum error so far.
    pub fn leader(&self) -> Option<&Entrant<'d>> {
        self.entrants
            .iter()
            .filter(|e| e.min_error().is_some())
            .min_by(|a, b| rank_key(a).total_cmp(&rank_key(b)))
    }

    /// Ends the tournament, handing back the leader's trainer.
    pub fn into_leader(mut self) -> Option<Entrant<'d>> {
        self.rank();
        self.entrants
            .into_iter()
            .next()
            .filter(|e| e.min_error().is_some())
    }

    fn rank(&mut self) {
        self.entrants
            .sort_by(|a, b| rank_key(a).total_cmp(&rank_key(b)));
    }
}

fn rank_key(entrant: &Entrant<'_>) -> f64 {
    entrant.min_error().unwrap_or(f64::INFINITY)
}

fn run_epochs(entrant: &mut Entrant<'_>, epochs: usize) -> Result<(), NeuroGraphError> {
    for _ in 0..epochs {
        entrant.last_report = Some(entrant.trainer.step()?);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tournament_test.rs"]
mod tests;
