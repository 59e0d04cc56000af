//! Progressive learning rate.

use std::collections::VecDeque;

use log::info;
use neurograph_core::NeuroGraphError;

/// Grows alpha while the error keeps falling and cuts it back when the error
/// rises.
///
/// Each epoch's error is compared with the mean of the last `window` epoch
/// errors:
/// * lower: `alpha *= creep`
/// * higher: `alpha *= reversal`
/// * equal: unchanged
///
/// The result never drops below `floor` when one is set.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveAlpha {
    pub creep: f64,
    pub reversal: f64,
    pub floor: Option<f64>,
    pub window: usize,
}

impl Default for AdaptiveAlpha {
    fn default() -> Self {
        AdaptiveAlpha {
            creep: 1.01,
            reversal: 0.5,
            floor: None,
            window: 1,
        }
    }
}

impl AdaptiveAlpha {
    pub fn new(creep: f64, reversal: f64) -> Self {
        AdaptiveAlpha {
            creep,
            reversal,
            ..Default::default()
        }
    }

    pub fn floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<(), NeuroGraphError> {
        if !(self.creep > 1.0 && self.creep.is_finite()) {
            return Err(NeuroGraphError::InvalidConfiguration(format!(
                "creep must be greater than 1, got {}",
                self.creep
            )));
        }
        if !(self.reversal > 0.0 && self.reversal < 1.0) {
            return Err(NeuroGraphError::InvalidConfiguration(format!(
                "reversal must lie in (0, 1), got {}",
                self.reversal
            )));
        }
        if self.window == 0 {
            return Err(NeuroGraphError::InvalidConfiguration(
                "adaptive alpha window must hold at least one epoch".to_string(),
            ));
        }
        if let Some(floor) = self.floor {
            if !(floor >= 0.0 && floor.is_finite()) {
                return Err(NeuroGraphError::InvalidConfiguration(format!(
                    "alpha floor must be non-negative and finite, got {}",
                    floor
                )));
            }
        }
        Ok(())
    }
}

/// An [`AdaptiveAlpha`] policy together with the errors it has seen.
#[derive(Debug, Clone)]
pub(crate) struct AlphaSchedule {
    policy: AdaptiveAlpha,
    history: VecDeque<f64>,
}

impl AlphaSchedule {
    pub(crate) fn new(policy: AdaptiveAlpha) -> Self {
        let history = VecDeque::with_capacity(policy.window);
        AlphaSchedule { policy, history }
    }

    /// Returns the alpha to use after an epoch that ended with `error`.
    pub(crate) fn adjust(&mut self, alpha: f64, error: f64) -> f64 {
        let mut next = alpha;
        if !self.history.is_empty() {
            let reference = self.history.iter().sum::<f64>() / self.history.len() as f64;
            if error < reference {
                next *= self.policy.creep;
            } else if error > reference {
                next *= self.policy.reversal;
            }
        }

        if self.history.len() == self.policy.window {
            self.history.pop_front();
        }
        self.history.push_back(error);

        match self.policy.floor {
            Some(floor) if next < floor => {
                info!("alpha {} clamped to floor {}", next, floor);
                floor
            }
            _ => next,
        }
    }
}

#[cfg(test)]
#[path = "alpha_test.rs"]
mod tests;
