use ndarray::{ArrayD, ArrayViewD};
use parking_lot::RwLock;

use crate::core::{
    ConfigError, InputShape, LayerError, NotImplemented, OutputShape, Pass, ShapeError,
};

use super::{Computed, FixTPoolingConfig, Layer, LayerParameter, PoolingParameter};

/// Pools a series of images to a fixed number of frames.
///
/// The layer plans the geometry of its top blob: the spatial axes are pooled with the configured
/// kernel, padding and stride, while the temporal axis always holds `fix_time` frames whatever the
/// input length. The temporal reduction itself is not computed: [Layer::forward] and
/// [Layer::backward] return [Computed::NotImplemented].
#[derive(Debug)]
pub struct FixTPooling {
    config: FixTPoolingConfig,
    output_shape: RwLock<Option<OutputShape>>,
}

impl FixTPooling {
    pub const TYPE: &'static str = "FixTPooling";

    pub fn new(config: FixTPoolingConfig) -> Self {
        Self {
            config,
            output_shape: RwLock::new(None),
        }
    }

    /// Validate `param` and build the layer.
    pub fn setup(param: &PoolingParameter) -> Result<Self, ConfigError> {
        let config = FixTPoolingConfig::try_from(param)?;
        log::debug!(
            "{} setup: fix_time {}, kernel {}x{}, pad {}x{}, stride {}x{}, pool {}",
            Self::TYPE,
            config.fix_time(),
            config.kernel_h(),
            config.kernel_w(),
            config.pad_h(),
            config.pad_w(),
            config.stride_h(),
            config.stride_w(),
            config.pool(),
        );
        Ok(Self::new(config))
    }

    /// The factory the layer registry uses for [FixTPooling::TYPE].
    pub fn create(param: &LayerParameter) -> Result<Box<dyn Layer>, LayerError> {
        Ok(Box::new(Self::setup(&param.pooling_param)?))
    }

    pub fn config(&self) -> &FixTPoolingConfig {
        &self.config
    }

    /// Plan the top blob for a bottom blob of shape `input`, and keep it until the next reshape.
    pub fn reshape_input(&self, input: &InputShape) -> Result<OutputShape, ShapeError> {
        let output = self.config.output_shape(input)?;
        log::debug!("{} reshape: {} -> {}", Self::TYPE, input, output);
        *self.output_shape.write() = Some(output);
        Ok(output)
    }

    /// The shape planned by the last successful reshape.
    pub fn output_shape(&self) -> Option<OutputShape> {
        *self.output_shape.read()
    }

    fn not_implemented<T>(&self, pass: Pass) -> Computed<T> {
        log::error!("{} {} pass is not implemented", Self::TYPE, pass);
        Computed::NotImplemented(NotImplemented {
            layer: Self::TYPE,
            pass,
        })
    }
}

impl Layer for FixTPooling {
    fn layer_type(&self) -> &'static str {
        Self::TYPE
    }

    fn exact_num_bottom_blobs(&self) -> Option<usize> {
        Some(1)
    }

    fn exact_num_top_blobs(&self) -> Option<usize> {
        Some(1)
    }

    fn reshape(&self, bottom: &[&[usize]]) -> Result<Vec<Vec<usize>>, LayerError> {
        // Top blobs are allocated by the host from the returned shapes.
        self.check_bottom_blobs(bottom.len())?;
        let input = InputShape::from_dims(bottom[0])?;
        let output = self.reshape_input(&input)?;
        Ok(vec![output.dims().to_vec()])
    }

    fn forward(&self, _bottom: &[ArrayViewD<'_, f32>]) -> Computed<Vec<ArrayD<f32>>> {
        self.not_implemented(Pass::Forward)
    }

    fn backward(
        &self,
        _top_diff: &[ArrayViewD<'_, f32>],
        _propagate_down: &[bool],
        _bottom: &[ArrayViewD<'_, f32>],
    ) -> Computed<Vec<ArrayD<f32>>> {
        self.not_implemented(Pass::Backward)
    }
}
