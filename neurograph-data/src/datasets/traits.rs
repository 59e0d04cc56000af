use neurograph_core::NeuroGraphError;

/// Indexed access to a fixed collection of samples.
pub trait Dataset {
    type Item;

    /// Returns the sample at `index`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` past the end.
    fn get(&self, index: usize) -> Result<Self::Item, NeuroGraphError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
