//! Multilayer perceptron.
//!
//! All hidden layers share the same activation function, bias setting and
//! layer normalization setting. An optional output layer can be appended,
//! which has its own activation function and never uses layer normalization.
mod base;
mod config;
pub use base::Mlp;
pub use config::MlpConfig;
