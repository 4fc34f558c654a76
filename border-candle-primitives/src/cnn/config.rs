use super::same_padding;
use crate::{activation::Activation, error::PrimitivesError};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Size of a kernel or a stride.
///
/// In YAML, either a single integer for square shapes or a pair `[h, w]`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Size2 {
    /// The same size along height and width.
    Square(usize),

    /// Height and width.
    Rect(usize, usize),
}

impl Size2 {
    /// Returns `(height, width)`.
    pub fn hw(&self) -> (usize, usize) {
        match *self {
            Self::Square(n) => (n, n),
            Self::Rect(h, w) => (h, w),
        }
    }

    fn is_positive(&self) -> bool {
        let (h, w) = self.hw();
        h > 0 && w > 0
    }
}

impl From<usize> for Size2 {
    fn from(n: usize) -> Self {
        Self::Square(n)
    }
}

impl From<(usize, usize)> for Size2 {
    fn from((h, w): (usize, usize)) -> Self {
        Self::Rect(h, w)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CnnFilterSpecRepr {
    Seq(usize, Size2, Size2),
    Map {
        out_depth: usize,
        kernel: Size2,
        stride: Size2,
    },
}

impl From<CnnFilterSpecRepr> for CnnFilterSpec {
    fn from(repr: CnnFilterSpecRepr) -> Self {
        match repr {
            CnnFilterSpecRepr::Seq(out_depth, kernel, stride) => Self {
                out_depth,
                kernel,
                stride,
            },
            CnnFilterSpecRepr::Map {
                out_depth,
                kernel,
                stride,
            } => Self {
                out_depth,
                kernel,
                stride,
            },
        }
    }
}

/// Specification of a Conv2D layer.
///
/// Deserializes from `[out_depth, kernel, stride]` as well as from a map.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "CnnFilterSpecRepr")]
pub struct CnnFilterSpec {
    /// Number of filters.
    pub out_depth: usize,

    /// Kernel size.
    pub kernel: Size2,

    /// Stride.
    pub stride: Size2,
}

impl CnnFilterSpec {
    /// Creates a specification from the number of filters, the kernel and the stride.
    pub fn new(out_depth: usize, kernel: impl Into<Size2>, stride: impl Into<Size2>) -> Self {
        Self {
            out_depth,
            kernel: kernel.into(),
            stride: stride.into(),
        }
    }
}

fn default_use_bias() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Cnn`](super::Cnn).
pub struct CnnConfig {
    /// Dims of the input image, `[height, width, channels]`.
    pub input_dims: Vec<usize>,

    /// Conv2D layers, stacked in order.
    pub cnn_filter_specifiers: Vec<CnnFilterSpec>,

    /// If `true`, a layer normalization is inserted between each Conv2D layer
    /// and its activation.
    #[serde(default)]
    pub cnn_use_layernorm: bool,

    /// Activation function after each Conv2D layer.
    #[serde(default)]
    pub cnn_activation: Activation,

    /// If `true`, all Conv2D layers have a bias term.
    #[serde(default = "default_use_bias")]
    pub use_bias: bool,
}

impl CnnConfig {
    /// Creates configuration of CNN with ReLU activation, no layer normalization
    /// and biases.
    pub fn new(input_dims: Vec<usize>, cnn_filter_specifiers: Vec<CnnFilterSpec>) -> Self {
        Self {
            input_dims,
            cnn_filter_specifiers,
            cnn_use_layernorm: false,
            cnn_activation: Activation::default(),
            use_bias: default_use_bias(),
        }
    }

    /// Sets whether layer normalization is used.
    pub fn cnn_use_layernorm(mut self, v: bool) -> Self {
        self.cnn_use_layernorm = v;
        self
    }

    /// Sets the activation function.
    pub fn cnn_activation(mut self, v: Activation) -> Self {
        self.cnn_activation = v;
        self
    }

    /// Sets whether Conv2D layers have bias terms.
    pub fn use_bias(mut self, v: bool) -> Self {
        self.use_bias = v;
        self
    }

    /// Checks the input dims and the filter specifiers.
    pub fn check(&self) -> Result<(), PrimitivesError> {
        if self.input_dims.len() != 3 {
            return Err(PrimitivesError::InputRank(self.input_dims.len()));
        }
        if let Some(i) = self.input_dims.iter().position(|&d| d == 0) {
            return Err(PrimitivesError::zero_dim(format!("input_dims[{}]", i)));
        }
        if self.cnn_filter_specifiers.is_empty() {
            return Err(PrimitivesError::EmptyFilterSpecifiers);
        }
        for (i, spec) in self.cnn_filter_specifiers.iter().enumerate() {
            if spec.out_depth == 0 {
                return Err(PrimitivesError::zero_dim(format!(
                    "cnn_filter_specifiers[{}].out_depth",
                    i
                )));
            }
            if !spec.kernel.is_positive() {
                return Err(PrimitivesError::zero_dim(format!(
                    "cnn_filter_specifiers[{}].kernel",
                    i
                )));
            }
            if !spec.stride.is_positive() {
                return Err(PrimitivesError::zero_dim(format!(
                    "cnn_filter_specifiers[{}].stride",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Returns `[height, width, depth]` of the output of the whole stack.
    pub fn output_dims(&self) -> Result<[usize; 3], PrimitivesError> {
        self.check()?;
        let mut size = [self.input_dims[0], self.input_dims[1]];
        let mut depth = self.input_dims[2];

        for spec in self.cnn_filter_specifiers.iter() {
            size = same_padding(size, spec.kernel, spec.stride).1;
            depth = spec.out_depth;
        }

        Ok([size[0], size[1], depth])
    }

    /// Loads [`CnnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of CNN from {}", path_.display());
        Ok(b)
    }

    /// Saves [`CnnConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of CNN into {}", path_.display());
        Ok(())
    }
}
