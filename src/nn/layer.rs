use std::fmt::Debug;

use ndarray::{ArrayD, ArrayViewD};
use serde::{Deserialize, Serialize};

use crate::core::{LayerError, NotImplemented, ShapeError};

use super::PoolingParameter;

/// The parameters a host holds for one layer of its graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub bottom: Vec<String>,
    pub top: Vec<String>,
    pub pooling_param: PoolingParameter,
}

/// The outcome of a numeric pass: either its output, or an explicit signal that the layer does
/// not compute this pass.
#[must_use = "a NotImplemented pass must be surfaced to the host"]
#[derive(Debug, Clone, PartialEq)]
pub enum Computed<T> {
    Ok(T),
    NotImplemented(NotImplemented),
}

impl<T> Computed<T> {
    pub fn is_implemented(&self) -> bool {
        matches!(self, Computed::Ok(_))
    }

    pub fn into_result(self) -> Result<T, NotImplemented> {
        match self {
            Computed::Ok(output) => Ok(output),
            Computed::NotImplemented(signal) => Err(signal),
        }
    }
}

impl<T> From<Computed<T>> for Result<T, LayerError> {
    fn from(computed: Computed<T>) -> Self {
        computed.into_result().map_err(LayerError::from)
    }
}

/// A layer of a host graph. It is set up once from its parameters, reshaped whenever the bottom
/// shapes change, and then run forward and backward.
pub trait Layer: Debug + Send + Sync {
    /// The type name the layer is registered under.
    fn layer_type(&self) -> &'static str;

    /// The number of bottom blobs the layer requires, if it requires an exact number.
    fn exact_num_bottom_blobs(&self) -> Option<usize> {
        None
    }

    /// The number of top blobs the layer produces, if it produces an exact number.
    fn exact_num_top_blobs(&self) -> Option<usize> {
        None
    }

    /// Check the number of bottom blobs a host wires to this layer.
    fn check_bottom_blobs(&self, count: usize) -> Result<(), ShapeError> {
        check_blob_count(self.layer_type(), "bottom", self.exact_num_bottom_blobs(), count)
    }

    /// Check the number of top blobs a host wires to this layer.
    fn check_top_blobs(&self, count: usize) -> Result<(), ShapeError> {
        check_blob_count(self.layer_type(), "top", self.exact_num_top_blobs(), count)
    }

    fn check_blob_counts(&self, bottom: usize, top: usize) -> Result<(), ShapeError> {
        self.check_bottom_blobs(bottom)?;
        self.check_top_blobs(top)
    }

    /// Compute the top blob shapes from the bottom blob shapes. The host allocates the top blobs.
    fn reshape(&self, bottom: &[&[usize]]) -> Result<Vec<Vec<usize>>, LayerError>;

    fn forward(&self, bottom: &[ArrayViewD<'_, f32>]) -> Computed<Vec<ArrayD<f32>>>;

    /// Compute the bottom gradients from the top gradients, for every bottom with `propagate_down` set.
    fn backward(
        &self,
        top_diff: &[ArrayViewD<'_, f32>],
        propagate_down: &[bool],
        bottom: &[ArrayViewD<'_, f32>],
    ) -> Computed<Vec<ArrayD<f32>>>;
}

fn check_blob_count(
    layer: &'static str,
    role: &'static str,
    expected: Option<usize>,
    got: usize,
) -> Result<(), ShapeError> {
    match expected {
        Some(expected) if expected != got => Err(ShapeError::BlobCount {
            layer,
            role,
            expected,
            got,
        }),
        _ => Ok(()),
    }
}
