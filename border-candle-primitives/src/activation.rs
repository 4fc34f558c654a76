//! Activation functions applied between layers.
use crate::error::PrimitivesError;
use candle_core::{Module, Result, Tensor};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Activation function following a layer.
///
/// Names are resolved with [`FromStr`], which accepts both the lowercase names
/// (`"relu"`, `"tanh"`, `"silu"`, ...) and the capitalized module-style names
/// (`"ReLU"`, `"Tanh"`, `"SiLU"`, ...). [`Activation::Linear`] means that no
/// activation layer is added at all.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Identity, no layer is added.
    Linear,

    /// Rectified linear unit.
    #[default]
    #[serde(alias = "ReLU")]
    Relu,

    /// Hyperbolic tangent.
    #[serde(alias = "Tanh")]
    Tanh,

    /// Sigmoid linear unit, also known as swish.
    #[serde(alias = "swish", alias = "SiLU")]
    Silu,

    /// Exponential linear unit with `alpha = 1.0`.
    #[serde(alias = "ELU")]
    Elu,

    /// Logistic sigmoid.
    #[serde(alias = "Sigmoid")]
    Sigmoid,

    /// Gaussian error linear unit (exact, erf based).
    #[serde(alias = "GELU")]
    Gelu,

    /// Leaky ReLU with negative slope 0.01.
    #[serde(alias = "LeakyReLU")]
    LeakyRelu,
}

impl Activation {
    /// Returns `true` if no activation layer should be added.
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }

    /// Canonical name of the activation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Relu => "relu",
            Self::Tanh => "tanh",
            Self::Silu => "silu",
            Self::Elu => "elu",
            Self::Sigmoid => "sigmoid",
            Self::Gelu => "gelu",
            Self::LeakyRelu => "leaky_relu",
        }
    }
}

impl FromStr for Activation {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "relu" | "ReLU" => Ok(Self::Relu),
            "tanh" | "Tanh" => Ok(Self::Tanh),
            "swish" | "silu" | "SiLU" => Ok(Self::Silu),
            "elu" | "ELU" => Ok(Self::Elu),
            "sigmoid" | "Sigmoid" => Ok(Self::Sigmoid),
            "gelu" | "GELU" => Ok(Self::Gelu),
            "leaky_relu" | "LeakyReLU" => Ok(Self::LeakyRelu),
            _ => Err(PrimitivesError::UnknownActivation(s.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Module for Activation {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            Self::Linear => Ok(xs.clone()),
            Self::Relu => xs.relu(),
            Self::Tanh => xs.tanh(),
            Self::Silu => xs.silu(),
            Self::Elu => xs.elu(1.0),
            Self::Sigmoid => candle_nn::ops::sigmoid(xs),
            Self::Gelu => xs.gelu_erf(),
            Self::LeakyRelu => candle_nn::ops::leaky_relu(xs, 0.01),
        }
    }
}
