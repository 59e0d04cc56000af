//! Per-network storage for units.
//!
//! The arena owns every [`Unit`] of a network and hands out [`UnitId`] indices.
//! Units refer to each other only through those indices, which keeps the
//! graph free of ownership cycles while still allowing identity lookups
//! ("where am I among my consumer's inputs?") during backpropagation.

use crate::error::NeuroGraphError;
use crate::matrix;
use crate::unit::{Unit, UnitId};

#[derive(Debug, Clone, Default)]
pub struct UnitArena {
    units: Vec<Unit>,
}

impl UnitArena {
    pub fn new() -> Self {
        UnitArena { units: Vec::new() }
    }

    /// Moves a unit into the arena and returns its id.
    pub fn insert(&mut self, mut unit: Unit) -> UnitId {
        let id = UnitId(self.units.len());
        unit.assign_id(id);
        self.units.push(unit);
        id
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Result<&Unit, NeuroGraphError> {
        self.units.get(id.0).ok_or(NeuroGraphError::UnitNotFound(id.0))
    }

    pub fn get_mut(&mut self, id: UnitId) -> Result<&mut Unit, NeuroGraphError> {
        self.units.get_mut(id.0).ok_or(NeuroGraphError::UnitNotFound(id.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Activation of `id`, calculating upstream units first when needed.
    ///
    /// Cached activations are returned as-is; recursion through unit inputs is
    /// what threads forward propagation through the whole graph.
    ///
    /// # Errors
    /// `CycleDetected` if the unit (indirectly) feeds itself, plus anything the
    /// matrix layer reports for mismatched weights.
    pub fn calc(&mut self, id: UnitId) -> Result<f64, NeuroGraphError> {
        let unit = self.get_mut(id)?;
        if let Some(activation) = unit.activation() {
            return Ok(activation);
        }
        if unit.pending {
            return Err(NeuroGraphError::CycleDetected(id.0));
        }
        unit.pending = true;
        let inputs = unit.inputs().to_vec();

        let resolved = matrix::invoke(&inputs, |upstream| self.calc(upstream));
        let unit = self.get_mut(id)?;
        unit.pending = false;
        unit.compute(&resolved?)
    }

    pub fn invalidate(&mut self, id: UnitId) -> Result<(), NeuroGraphError> {
        self.get_mut(id)?.invalidate();
        Ok(())
    }

    /// Computes and stores the delta of `id`.
    ///
    /// Output units use their own error. Hidden units sum, over every
    /// consumer, `consumer.delta * consumer.weights[k]` where `k` is this unit's
    /// position among the consumer's inputs, so consumers must already hold
    /// their deltas.
    pub fn calc_delta(&mut self, id: UnitId) -> Result<f64, NeuroGraphError> {
        let unit = self.get_mut(id)?;
        if unit.is_output() {
            return unit.calc_output_delta();
        }
        let derivative = unit.transfer_derivative()?;
        let consumers = unit.output_units().to_vec();

        let mut downstream = 0.0;
        for consumer_id in consumers {
            let consumer = self.get(consumer_id)?;
            downstream += consumer.delta() * self.weight_towards(id, consumer_id)?;
        }
        let delta = derivative * downstream;
        self.get_mut(id)?.set_delta(delta);
        Ok(delta)
    }

    /// Weight that `consumer` applies to the input coming from `id`.
    fn weight_towards(&self, id: UnitId, consumer: UnitId) -> Result<f64, NeuroGraphError> {
        let unit = self.get(consumer)?;
        unit.input_position(id)
            .and_then(|k| unit.weight(k))
            .ok_or_else(|| {
                NeuroGraphError::InvalidConfiguration(format!(
                    "unit {} lists {} as an output but is not one of its inputs",
                    id, consumer
                ))
            })
    }

    /// Partial derivatives of the error with respect to each input weight of
    /// `id`: the resolved input value times the unit's delta. For the bias
    /// input (constant 1) this is the delta itself.
    pub fn input_weight_partials(&mut self, id: UnitId) -> Result<Vec<f64>, NeuroGraphError> {
        let unit = self.get(id)?;
        let delta = unit.delta();
        let inputs = unit.inputs().to_vec();
        let resolved = matrix::invoke(&inputs, |upstream| self.calc(upstream))?;
        Ok(resolved.as_slice().iter().map(|v| v * delta).collect())
    }

    /// `activation * consumer.delta` for every consumer of `id`, in
    /// fan-out order.
    pub fn output_weight_partials(&self, id: UnitId) -> Result<Vec<f64>, NeuroGraphError> {
        let unit = self.get(id)?;
        let activation = unit.activation().ok_or(NeuroGraphError::MissingValue {
            what: "activation",
            unit: Some(id.0),
        })?;
        unit.output_units()
            .iter()
            .map(|&consumer| Ok(activation * self.get(consumer)?.delta()))
            .collect()
    }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod tests;
