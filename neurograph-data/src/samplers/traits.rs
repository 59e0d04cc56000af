use std::fmt::Debug;

/// Decides the order in which a pass visits the samples of a dataset.
pub trait Sampler: Debug {
    /// Indices to visit for a dataset of `dataset_len` samples.
    fn indices(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + '_>;

    /// How many indices [`indices`](Self::indices) yields.
    fn num_samples(&self, dataset_len: usize) -> usize;
}
