use super::traits::Sampler;

/// Visits every sample once, in stored order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn indices(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(0..dataset_len)
    }

    fn num_samples(&self, dataset_len: usize) -> usize {
        dataset_len
    }
}

#[cfg(test)]
#[path = "sequential_sampler_test.rs"]
mod tests;
