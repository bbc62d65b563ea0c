use std::fmt;

use thiserror::Error;

use super::Axis;
use crate::nn::PoolMethod;

/// Malformed or contradictory layer configuration, detected once at setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Must input fix_time.")]
    MissingFixTime,

    #[error("fix_time must be positive, got {0}")]
    NonPositiveFixTime(i64),

    #[error("Filter size is kernel_size OR kernel_h and kernel_w; not both")]
    AmbiguousKernel,

    #[error("For non-square filters both kernel_h and kernel_w are required.")]
    MissingKernel,

    #[error("Filter dimensions cannot be zero: kernel_{axis} is {kernel}")]
    NonPositiveKernel { axis: Axis, kernel: i64 },

    #[error("pad is pad OR pad_h and pad_w are required.")]
    AmbiguousPad,

    #[error("Stride is stride OR stride_h and stride_w are required.")]
    AmbiguousStride,

    #[error("pad_{axis} cannot be negative, got {pad}")]
    NegativePad { axis: Axis, pad: i64 },

    #[error("stride_{axis} must be positive, got {stride}")]
    NonPositiveStride { axis: Axis, stride: i64 },

    #[error("Padding implemented only for average and max pooling, got {0}")]
    PaddingUnsupported(PoolMethod),

    #[error("pad_{axis} ({pad}) must be smaller than kernel_{axis} ({kernel})")]
    PadExceedsKernel { axis: Axis, pad: i64, kernel: i64 },
}

/// An input shape the layer cannot plan for, or a broken geometry invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error(
        "Input must have 4 or 5 axes, corresponding to (num, channels, [optional length,] height, width), got {0}"
    )]
    UnsupportedRank(usize),

    #[error("axis {0} of the input has zero extent")]
    EmptyAxis(usize),

    #[error("pooled_{axis} is {extent}, must be at least 1")]
    EmptyOutput { axis: Axis, extent: i64 },

    #[error("pooling geometry along {axis} overflows 64-bit arithmetic")]
    ExtentOverflow { axis: Axis },

    #[error("last pooling window along {axis} starts at {start}, must start before {limit}")]
    WindowOutsideInput { axis: Axis, start: i64, limit: i64 },

    #[error("{layer} takes exactly {expected} {role} blob(s), got {got}")]
    BlobCount {
        layer: &'static str,
        role: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Which pass of a layer was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Forward,
    Backward,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Forward => write!(f, "forward"),
            Pass::Backward => write!(f, "backward"),
        }
    }
}

/// A pass the layer declares but intentionally does not compute.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{layer} does not implement the {pass} pass")]
pub struct NotImplemented {
    pub layer: &'static str,
    pub pass: Pass,
}

/// Every failure a layer can surface to its host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    NotImplemented(#[from] NotImplemented),

    #[error("Unknown layer type: {0}")]
    UnknownType(String),

    #[error("Layer type {0} is already registered")]
    DuplicateType(String),
}
