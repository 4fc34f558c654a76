use crate::{activation::Activation, error::PrimitivesError, util::OutDim};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

fn default_use_bias() -> bool {
    true
}

fn default_output_activation() -> Activation {
    Activation::Linear
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`](super::Mlp).
pub struct MlpConfig {
    /// Input dimension of the network.
    pub input_dim: usize,

    /// Sizes of the hidden layers.
    ///
    /// If empty, only the output layer is built (if any).
    #[serde(default)]
    pub hidden_layer_dims: Vec<usize>,

    /// Activation function after each hidden layer.
    #[serde(default)]
    pub hidden_layer_activation: Activation,

    /// If `true`, a layer normalization is inserted between each hidden layer
    /// and its activation.
    #[serde(default)]
    pub hidden_layer_use_layernorm: bool,

    /// Output dimension of the network.
    ///
    /// If `None`, no extra output layer is added and the last hidden layer is
    /// the output of the network.
    #[serde(default)]
    pub output_dim: Option<usize>,

    /// Activation function after the output layer.
    #[serde(default = "default_output_activation")]
    pub output_activation: Activation,

    /// If `true`, all dense layers have a bias term.
    #[serde(default = "default_use_bias")]
    pub use_bias: bool,
}

impl MlpConfig {
    /// Creates configuration of MLP with ReLU hidden layers, no layer
    /// normalization, a linear output layer and biases.
    pub fn new(input_dim: usize, hidden_layer_dims: Vec<usize>, output_dim: Option<usize>) -> Self {
        Self {
            input_dim,
            hidden_layer_dims,
            hidden_layer_activation: Activation::default(),
            hidden_layer_use_layernorm: false,
            output_dim,
            output_activation: default_output_activation(),
            use_bias: default_use_bias(),
        }
    }

    /// Sets the activation function of the hidden layers.
    pub fn hidden_layer_activation(mut self, v: Activation) -> Self {
        self.hidden_layer_activation = v;
        self
    }

    /// Sets whether layer normalization is used in the hidden layers.
    pub fn hidden_layer_use_layernorm(mut self, v: bool) -> Self {
        self.hidden_layer_use_layernorm = v;
        self
    }

    /// Sets the activation function of the output layer.
    pub fn output_activation(mut self, v: Activation) -> Self {
        self.output_activation = v;
        self
    }

    /// Sets whether dense layers have bias terms.
    pub fn use_bias(mut self, v: bool) -> Self {
        self.use_bias = v;
        self
    }

    /// Returns the sizes of all layers, from the input to the output.
    pub fn dims(&self) -> Vec<usize> {
        let mut dims = Vec::with_capacity(self.hidden_layer_dims.len() + 2);
        dims.push(self.input_dim);
        dims.extend(self.hidden_layer_dims.iter());
        dims.extend(self.output_dim);
        dims
    }

    /// Checks that all dimensions are positive.
    pub fn check(&self) -> Result<(), PrimitivesError> {
        if self.input_dim == 0 {
            return Err(PrimitivesError::zero_dim("input_dim"));
        }
        if let Some(i) = self.hidden_layer_dims.iter().position(|&d| d == 0) {
            return Err(PrimitivesError::zero_dim(format!("hidden_layer_dims[{}]", i)));
        }
        if self.output_dim == Some(0) {
            return Err(PrimitivesError::zero_dim("output_dim"));
        }
        Ok(())
    }

    /// Loads [`MlpConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of MLP from {}", path_.display());
        Ok(b)
    }

    /// Saves [`MlpConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of MLP into {}", path_.display());
        Ok(())
    }
}

impl OutDim for MlpConfig {
    fn get_out_dim(&self) -> usize {
        self.output_dim
            .or_else(|| self.hidden_layer_dims.last().copied())
            .unwrap_or(self.input_dim)
    }

    fn set_out_dim(&mut self, out_dim: usize) {
        self.output_dim = Some(out_dim);
    }
}
