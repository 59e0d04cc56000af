//! A single computational node.
//!
//! Units never own each other. An input that comes from another unit is an
//! [`Input::Unit`] holding that unit's [`UnitId`], an index into the
//! [`UnitArena`](crate::arena::UnitArena) owned by the network. Everything that
//! needs to follow those references (recursive forward calculation, hidden
//! deltas) lives on the arena; this module only covers what a unit can do with
//! its own state.

use std::fmt;
use std::sync::Arc;

use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::NeuroGraphError;
use crate::matrix::{self, Matrix};
use crate::transfer::Transfer;

/// Index of a unit inside its network's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Zero-argument numeric source used as a unit input.
pub type Callback = Arc<dyn Fn() -> f64 + Send + Sync>;

/// A scalar source feeding a unit.
#[derive(Clone)]
pub enum Input {
    Constant(f64),
    Callback(Callback),
    Unit(UnitId),
}

impl Input {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        Input::Callback(Arc::new(f))
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Constant(v) => write!(f, "Constant({})", v),
            Input::Callback(_) => write!(f, "Callback(..)"),
            Input::Unit(id) => write!(f, "Unit({})", id),
        }
    }
}

impl From<f64> for Input {
    fn from(value: f64) -> Self {
        Input::Constant(value)
    }
}

impl From<UnitId> for Input {
    fn from(id: UnitId) -> Self {
        Input::Unit(id)
    }
}

/// A neuron: weighted inputs, a transfer function and cached results of the
/// last evaluation.
///
/// `weights.len() == inputs.len()` always holds. Any change to inputs, weights
/// or transfer clears the cached activation.
#[derive(Debug, Clone)]
pub struct Unit {
    id: Option<UnitId>,
    inputs: Vec<Input>,
    weights: Vec<f64>,
    transfer: Transfer,
    output_units: Vec<UnitId>,
    is_output: bool,
    expected: Option<f64>,
    activation: Option<f64>,
    input_sum: Option<f64>,
    delta: f64,
    // set while the arena is resolving this unit's inputs
    pub(crate) pending: bool,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::new(Transfer::default())
    }
}

impl Unit {
    /// Creates an output unit with no inputs.
    pub fn new(transfer: Transfer) -> Self {
        Unit {
            id: None,
            inputs: Vec::new(),
            weights: Vec::new(),
            transfer,
            output_units: Vec::new(),
            is_output: true,
            expected: None,
            activation: None,
            input_sum: None,
            delta: 0.0,
            pending: false,
        }
    }

    /// Creates a unit with the given inputs and matching weights.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the lengths differ.
    pub fn with_inputs(
        transfer: Transfer,
        inputs: Vec<Input>,
        weights: Vec<f64>,
    ) -> Result<Self, NeuroGraphError> {
        let mut unit = Unit::new(transfer);
        unit.set_inputs(inputs);
        unit.set_weights(weights)?;
        Ok(unit)
    }

    /// The arena index, once the unit has been inserted into a network.
    pub fn id(&self) -> Option<UnitId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: UnitId) {
        self.id = Some(id);
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Replaces the inputs. A change in input count resets every weight to zero.
    pub fn set_inputs(&mut self, inputs: Vec<Input>) {
        if inputs.len() != self.inputs.len() {
            self.weights = matrix::zeros(inputs.len(), None).into_vec();
        }
        self.inputs = inputs;
        self.invalidate();
    }

    /// Appends one input with a zero weight.
    pub fn add_input(&mut self, input: Input) {
        self.inputs.push(input);
        self.weights.push(0.0);
        self.invalidate();
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Replaces the weights.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `weights.len()` differs from the input count.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<(), NeuroGraphError> {
        if weights.len() != self.inputs.len() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.inputs.len(),
                actual: weights.len(),
                operation: "Unit::set_weights".to_string(),
            });
        }
        self.weights = weights;
        self.invalidate();
        Ok(())
    }

    pub fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    pub fn set_transfer(&mut self, transfer: Transfer) {
        self.transfer = transfer;
        self.invalidate();
    }

    pub fn is_output(&self) -> bool {
        self.is_output
    }

    pub fn output_units(&self) -> &[UnitId] {
        &self.output_units
    }

    /// Rewires the downstream fan-out. The unit stops being an output unit and
    /// loses its expected value.
    pub fn update_output_units(&mut self, units: Vec<UnitId>) {
        self.output_units = units;
        self.is_output = false;
        self.expected = None;
    }

    pub fn expected(&self) -> Option<f64> {
        self.expected
    }

    /// Sets the target value.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` on a unit that feeds other units.
    pub fn set_expected(&mut self, expected: f64) -> Result<(), NeuroGraphError> {
        if !self.is_output {
            return Err(NeuroGraphError::InvalidConfiguration(format!(
                "unit {:?} is not an output unit and cannot hold an expected value",
                self.id.map(|id| id.0)
            )));
        }
        self.expected = Some(expected);
        Ok(())
    }

    pub fn activation(&self) -> Option<f64> {
        self.activation
    }

    pub fn input_sum(&self) -> Option<f64> {
        self.input_sum
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub(crate) fn set_delta(&mut self, delta: f64) {
        self.delta = delta;
    }

    /// Clears the cached activation.
    pub fn invalidate(&mut self) {
        self.activation = None;
    }

    /// Position of `id` among this unit's inputs.
    pub fn input_position(&self, id: UnitId) -> Option<usize> {
        self.inputs
            .iter()
            .position(|input| matches!(input, Input::Unit(u) if *u == id))
    }

    /// Calculates the activation of a unit whose inputs are all constants or
    /// callbacks. Units fed by other units are calculated through their arena.
    pub fn calc(&mut self) -> Result<f64, NeuroGraphError> {
        if let Some(activation) = self.activation {
            return Ok(activation);
        }
        let row = matrix::invoke(&self.inputs, |id| Err(NeuroGraphError::UnitNotFound(id.0)))?;
        self.compute(&row)
    }

    /// Weighted sum of an already resolved input row, then the transfer.
    pub(crate) fn compute(&mut self, resolved: &Matrix) -> Result<f64, NeuroGraphError> {
        let weights = Matrix::from(self.weights.as_slice());
        let product = matrix::mult(resolved, &matrix::transpose(&weights))?;
        let input_sum = product.flatten().as_scalar().ok_or_else(|| {
            NeuroGraphError::ShapeMismatch {
                expected: "[1, 1]".to_string(),
                actual: format!("{:?}", resolved.size()),
                operation: "Unit::compute".to_string(),
            }
        })?;
        let activation = self.transfer.apply(input_sum);
        trace!("unit {:?}: sum {} -> activation {}", self.id, input_sum, activation);
        self.input_sum = Some(input_sum);
        self.activation = Some(activation);
        Ok(activation)
    }

    /// `activation - expected`.
    pub fn error(&self) -> Result<f64, NeuroGraphError> {
        let activation = self.require_activation()?;
        let expected = self.expected.ok_or(NeuroGraphError::MissingValue {
            what: "expected value",
            unit: self.id.map(|id| id.0),
        })?;
        Ok(activation - expected)
    }

    /// `transfer'(input_sum, activation)` for the last calculation.
    pub(crate) fn transfer_derivative(&self) -> Result<f64, NeuroGraphError> {
        let activation = self.require_activation()?;
        let input_sum = self.input_sum.ok_or(NeuroGraphError::MissingValue {
            what: "input sum",
            unit: self.id.map(|id| id.0),
        })?;
        Ok(self.transfer.derivative(input_sum, activation))
    }

    /// Output-unit delta: `-(expected - activation) * transfer'`.
    ///
    /// # Errors
    /// Returns `NumericOverflow` if the result is NaN.
    pub fn calc_output_delta(&mut self) -> Result<f64, NeuroGraphError> {
        let delta = self.error()? * self.transfer_derivative()?;
        if delta.is_nan() {
            return Err(NeuroGraphError::NumericOverflow {
                operation: "output delta".to_string(),
                unit: self.id.map(|id| id.0),
            });
        }
        self.delta = delta;
        Ok(delta)
    }

    fn require_activation(&self) -> Result<f64, NeuroGraphError> {
        self.activation.ok_or(NeuroGraphError::MissingValue {
            what: "activation",
            unit: self.id.map(|id| id.0),
        })
    }

    /// Overwrites every weight with a uniform value in `[min, max)`.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if either bound is not finite.
    pub fn randomize_weights(&mut self, max: f64, min: f64) -> Result<(), NeuroGraphError> {
        self.randomize_weights_with(&mut rand::thread_rng(), max, min)
    }

    /// Same as [`randomize_weights`](Self::randomize_weights) with a caller-supplied RNG.
    pub fn randomize_weights_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        max: f64,
        min: f64,
    ) -> Result<(), NeuroGraphError> {
        let (low, high) = uniform_bounds(max, min)?;
        for w in self.weights.iter_mut() {
            *w = if low == high { low } else { rng.gen_range(low..high) };
        }
        self.invalidate();
        Ok(())
    }

    /// Overwrites every weight with a sample from `N(0, std_dev^2)`.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if `std_dev` is negative or not finite.
    pub fn randomize_weights_normal<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        std_dev: f64,
    ) -> Result<(), NeuroGraphError> {
        check_std_dev(std_dev)?;
        let normal = Normal::new(0.0, std_dev).map_err(|e| {
            NeuroGraphError::InvalidConfiguration(format!("normal initialisation: {}", e))
        })?;
        for w in self.weights.iter_mut() {
            *w = normal.sample(rng);
        }
        self.invalidate();
        Ok(())
    }
}

/// Orders a uniform range and rejects bounds `gen_range` cannot sample from.
pub(crate) fn uniform_bounds(max: f64, min: f64) -> Result<(f64, f64), NeuroGraphError> {
    if !(max - min).is_finite() {
        return Err(NeuroGraphError::InvalidConfiguration(format!(
            "uniform initialisation needs a finite range, got [{}, {})",
            min, max
        )));
    }
    Ok(if min <= max { (min, max) } else { (max, min) })
}

/// `Normal::new` accepts a negative deviation, so it is checked here.
pub(crate) fn check_std_dev(std_dev: f64) -> Result<(), NeuroGraphError> {
    if std_dev >= 0.0 && std_dev.is_finite() {
        Ok(())
    } else {
        Err(NeuroGraphError::InvalidConfiguration(format!(
            "normal initialisation needs a finite, non-negative std_dev, got {}",
            std_dev
        )))
    }
}

#[cfg(test)]
#[path = "unit_test.rs"]
mod tests;
