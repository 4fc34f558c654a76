//! Convolutional neural network.
//!
//! A stack of Conv2D layers padded in the SAME manner of TensorFlow, each
//! optionally followed by a layer normalization and an activation function.
//! There is neither flattening nor a dense layer at the end of the stack.
//!
//! The input is a batch of images in channels-last layout,
//! `[batch, height, width, channels]`; the output is channels-first,
//! `[batch, depth, out_height, out_width]`.
mod base;
mod config;
mod layers;
mod padding;
pub use base::Cnn;
pub use config::{CnnConfig, CnnFilterSpec, Size2};
pub use layers::{SameConv2d, SpatialLayerNorm};
pub use padding::{same_padding, Padding};
