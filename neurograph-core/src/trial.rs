/// One labelled example: the values fed to the input layer and the values
/// expected from the output layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trial {
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

impl Trial {
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> Self {
        Trial { inputs, outputs }
    }
}
