use std::f64::consts::PI;

use neurograph_data::{TrainingData, Trial};

/// `count` samples of `sin(x)` for `x` evenly spaced over `[0, 2π)`.
#[allow(dead_code)]
pub fn sine_data(count: usize) -> TrainingData {
    TrainingData::from_fn(count, |i| {
        let x = 2.0 * PI * i as f64 / count as f64;
        Trial::new(vec![x], vec![x.sin()])
    })
}
