//! Errors in the library.
use thiserror::Error;

/// Errors raised when a configuration cannot be turned into a module.
#[derive(Error, Debug, PartialEq)]
pub enum PrimitivesError {
    /// A dimension, depth, kernel size or stride is zero.
    #[error("{name} must be positive")]
    ZeroDim {
        /// Name of the offending configuration value.
        name: String,
    },

    /// The CNN input does not have exactly three dimensions.
    #[error("Expected 3 input dims (height, width, channels), got {0}")]
    InputRank(usize),

    /// The CNN has no convolutional layer.
    #[error("cnn_filter_specifiers must not be empty")]
    EmptyFilterSpecifiers,

    /// The activation name is not known.
    #[error("Unknown activation ({0})")]
    UnknownActivation(String),
}

impl PrimitivesError {
    pub(crate) fn zero_dim(name: impl Into<String>) -> Self {
        Self::ZeroDim { name: name.into() }
    }
}
