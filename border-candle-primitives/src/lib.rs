//! Neural network building blocks implemented with [candle](https://crates.io/crates/candle-core).
//!
//! This crate provides configurable submodules for RL models:
//!
//! * [`Mlp`](mlp::Mlp): a stack of dense layers, optionally with layer
//!   normalization and an extra output layer.
//! * [`Cnn`](cnn::Cnn): a stack of Conv2D layers padded in SAME mode, optionally
//!   with layer normalization.
//!
//! Both are built from a serializable configuration and a
//! [`VarBuilder`](candle_nn::VarBuilder), so that their parameters live in a
//! [`VarMap`](candle_nn::VarMap) owned by the calling model.
//!
//! ```no_run
//! use border_candle_primitives::{
//!     cnn::{Cnn, CnnConfig, CnnFilterSpec},
//!     mlp::{Mlp, MlpConfig},
//!     Activation, SubModel1,
//! };
//! use candle_core::{DType, Device, Tensor};
//! use candle_nn::{VarBuilder, VarMap};
//!
//! # fn main() -> anyhow::Result<()> {
//! let varmap = VarMap::new();
//! let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
//!
//! let cnn_config = CnnConfig::new(
//!     vec![42, 42, 4],
//!     vec![CnnFilterSpec::new(16, 4, 2), CnnFilterSpec::new(32, 4, 2)],
//! );
//! let cnn = Cnn::build(vb.pp("encoder"), cnn_config)?;
//!
//! let [h, w, c] = cnn.output_dims();
//! let mlp_config = MlpConfig::new(h * w * c, vec![256], Some(6))
//!     .hidden_layer_activation(Activation::Tanh);
//! let mlp = <Mlp as SubModel1>::build(vb.pp("head"), mlp_config)?;
//!
//! let obs = Tensor::zeros((8, 42, 42, 4), DType::F32, &Device::Cpu)?;
//! let q = mlp.forward(&cnn.forward(&obs)?.flatten_from(1)?)?;
//! assert_eq!(q.dims(), &[8, 6]);
//! # Ok(())
//! # }
//! ```
mod activation;
pub mod cnn;
mod error;
pub mod mlp;
mod model;
pub mod util;
pub use activation::Activation;
pub use error::PrimitivesError;
pub use model::{SubModel1, SubModel2};
