//! Layers: ordered groups of units sharing the same wiring.
//!
//! A [`Layer`] only stores the ids of its units. Every operation that touches
//! unit state takes the network's [`UnitArena`] explicitly.

use log::trace;
use rand::Rng;

use crate::arena::UnitArena;
use crate::error::NeuroGraphError;
use crate::transfer::Transfer;
use crate::unit::{Input, Unit, UnitId};

/// Value of the synthetic bias input added to every plugged unit.
pub const BIAS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Layer {
    units: Vec<UnitId>,
    is_input: bool,
    is_output: bool,
}

impl Layer {
    /// Inserts `width` fresh units with the given transfer into `arena`.
    pub fn new(arena: &mut UnitArena, width: usize, transfer: &Transfer) -> Self {
        let units = (0..width)
            .map(|_| arena.insert(Unit::new(transfer.clone())))
            .collect();
        Layer::from_units(units)
    }

    /// Wraps units that already live in the arena.
    pub fn from_units(units: Vec<UnitId>) -> Self {
        Layer {
            units,
            is_input: true,
            is_output: true,
        }
    }

    pub fn width(&self) -> usize {
        self.units.len()
    }

    pub fn unit_ids(&self) -> &[UnitId] {
        &self.units
    }

    pub fn is_input(&self) -> bool {
        self.is_input
    }

    pub fn is_output(&self) -> bool {
        self.is_output
    }

    /// Feeds every unit of this layer, plus a bias constant, into every unit
    /// of `next`.
    ///
    /// Weights of `next` are reset to zero because its input count changes.
    pub fn plug(&mut self, next: &mut Layer, arena: &mut UnitArena) -> Result<(), NeuroGraphError> {
        let mut inputs: Vec<Input> = self.units.iter().map(|&id| Input::Unit(id)).collect();
        inputs.push(Input::Constant(BIAS));
        next.set_inputs(arena, &inputs, false)?;
        next.is_input = false;

        for &id in &self.units {
            arena.get_mut(id)?.update_output_units(next.units.clone());
        }
        self.is_output = false;
        trace!("plugged {} units into {} units", self.width(), next.width());
        Ok(())
    }

    /// Sets the inputs of every unit.
    ///
    /// With `is_input_layer`, `inputs[i]` feeds unit `i` alone with a fixed
    /// weight of 1 and a linear transfer, making the layer a pass-through.
    /// Otherwise the whole slice is broadcast to every unit.
    ///
    /// # Errors
    /// `DimensionMismatch` if a pass-through layer gets a slice of the wrong length.
    pub fn set_inputs(
        &mut self,
        arena: &mut UnitArena,
        inputs: &[Input],
        is_input_layer: bool,
    ) -> Result<(), NeuroGraphError> {
        if !is_input_layer {
            for &id in &self.units {
                arena.get_mut(id)?.set_inputs(inputs.to_vec());
            }
            return Ok(());
        }

        if inputs.len() != self.units.len() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.units.len(),
                actual: inputs.len(),
                operation: "Layer::set_inputs".to_string(),
            });
        }
        for (&id, input) in self.units.iter().zip(inputs) {
            let unit = arena.get_mut(id)?;
            unit.set_inputs(vec![input.clone()]);
            unit.set_weights(vec![1.0])?;
            if !matches!(unit.transfer(), Transfer::Linear) {
                unit.set_transfer(Transfer::Linear);
            }
        }
        self.is_input = true;
        Ok(())
    }

    /// Gives each unit its own input vector.
    pub fn set_unit_inputs(
        &mut self,
        arena: &mut UnitArena,
        inputs: Vec<Vec<Input>>,
    ) -> Result<(), NeuroGraphError> {
        if inputs.len() != self.units.len() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.units.len(),
                actual: inputs.len(),
                operation: "Layer::set_unit_inputs".to_string(),
            });
        }
        for (&id, unit_inputs) in self.units.iter().zip(inputs) {
            arena.get_mut(id)?.set_inputs(unit_inputs);
        }
        Ok(())
    }

    /// Assigns expected values 1:1 to the units.
    ///
    /// # Errors
    /// `DimensionMismatch` if the counts disagree, `InvalidConfiguration` if
    /// the layer feeds another layer.
    pub fn set_outputs(&self, arena: &mut UnitArena, expected: &[f64]) -> Result<(), NeuroGraphError> {
        if expected.len() != self.units.len() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.units.len(),
                actual: expected.len(),
                operation: "Layer::set_outputs".to_string(),
            });
        }
        for (&id, &value) in self.units.iter().zip(expected) {
            arena.get_mut(id)?.set_expected(value)?;
        }
        Ok(())
    }

    pub fn set_transfer(&self, arena: &mut UnitArena, transfer: &Transfer) -> Result<(), NeuroGraphError> {
        for &id in &self.units {
            arena.get_mut(id)?.set_transfer(transfer.clone());
        }
        Ok(())
    }

    pub fn calc(&self, arena: &mut UnitArena) -> Result<Vec<f64>, NeuroGraphError> {
        self.units.iter().map(|&id| arena.calc(id)).collect()
    }

    pub fn invalidate(&self, arena: &mut UnitArena) -> Result<(), NeuroGraphError> {
        for &id in &self.units {
            arena.invalidate(id)?;
        }
        Ok(())
    }

    /// Computes the delta of every unit. Layers downstream must already hold
    /// their deltas.
    pub fn calc_deltas(&self, arena: &mut UnitArena) -> Result<Vec<f64>, NeuroGraphError> {
        self.units.iter().map(|&id| arena.calc_delta(id)).collect()
    }

    /// One weight vector per unit, bias weight last.
    pub fn weights(&self, arena: &UnitArena) -> Result<Vec<Vec<f64>>, NeuroGraphError> {
        self.units
            .iter()
            .map(|&id| Ok(arena.get(id)?.weights().to_vec()))
            .collect()
    }

    pub fn set_weights(&self, arena: &mut UnitArena, weights: Vec<Vec<f64>>) -> Result<(), NeuroGraphError> {
        if weights.len() != self.units.len() {
            return Err(NeuroGraphError::DimensionMismatch {
                expected: self.units.len(),
                actual: weights.len(),
                operation: "Layer::set_weights".to_string(),
            });
        }
        for (&id, unit_weights) in self.units.iter().zip(weights) {
            arena.get_mut(id)?.set_weights(unit_weights)?;
        }
        Ok(())
    }

    /// Uniform weights in `[min, max)`. The input layer keeps its fixed weights.
    pub fn randomize_weights<R: Rng + ?Sized>(
        &self,
        arena: &mut UnitArena,
        rng: &mut R,
        max: f64,
        min: f64,
    ) -> Result<(), NeuroGraphError> {
        if self.is_input {
            return Ok(());
        }
        for &id in &self.units {
            arena.get_mut(id)?.randomize_weights_with(rng, max, min)?;
        }
        Ok(())
    }

    pub fn input_weight_partials(&self, arena: &mut UnitArena) -> Result<Vec<Vec<f64>>, NeuroGraphError> {
        self.units
            .iter()
            .map(|&id| arena.input_weight_partials(id))
            .collect()
    }

    pub fn output_weight_partials(&self, arena: &UnitArena) -> Result<Vec<Vec<f64>>, NeuroGraphError> {
        self.units
            .iter()
            .map(|&id| arena.output_weight_partials(id))
            .collect()
    }
}

/// A layer assembled by hand before the network exists.
///
/// Its units are detached; building a network moves them into the network's
/// arena. Inputs and weights are replaced when the layer is plugged, so only
/// per-unit transfers survive construction.
#[derive(Debug, Clone, Default)]
pub struct PrebuiltLayer {
    units: Vec<Unit>,
}

impl PrebuiltLayer {
    pub fn new(width: usize, transfer: Transfer) -> Self {
        PrebuiltLayer {
            units: (0..width).map(|_| Unit::new(transfer.clone())).collect(),
        }
    }

    pub fn from_units(units: Vec<Unit>) -> Self {
        PrebuiltLayer { units }
    }

    pub fn width(&self) -> usize {
        self.units.len()
    }

    pub fn unit_mut(&mut self, index: usize) -> Option<&mut Unit> {
        self.units.get_mut(index)
    }

    pub(crate) fn into_layer(self, arena: &mut UnitArena) -> Layer {
        let ids = self.units.into_iter().map(|unit| arena.insert(unit)).collect();
        Layer::from_units(ids)
    }
}

#[cfg(test)]
#[path = "layer_test.rs"]
mod tests;
