use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::core::{Axis, ConfigError, InputShape, OutputShape, ShapeError};

/// The reduction a pooling layer applies over each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PoolMethod {
    #[default]
    Max,
    Ave,
    Stochastic,
}

impl PoolMethod {
    /// Padding is only defined for max and average pooling.
    pub fn supports_padding(self) -> bool {
        matches!(self, PoolMethod::Max | PoolMethod::Ave)
    }
}

impl fmt::Display for PoolMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolMethod::Max => write!(f, "MAX"),
            PoolMethod::Ave => write!(f, "AVE"),
            PoolMethod::Stochastic => write!(f, "STOCHASTIC"),
        }
    }
}

/// Raw pooling parameters as the host supplies them. Every field is optional here;
/// consistency is only checked when the parameters are turned into a [FixTPoolingConfig].
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[builder(pattern = "owned", default, setter(into, strip_option))]
#[serde(default)]
pub struct PoolingParameter {
    pub fix_time: Option<i64>,
    pub kernel_size: Option<i64>,
    pub kernel_h: Option<i64>,
    pub kernel_w: Option<i64>,
    pub pad: Option<i64>,
    pub pad_h: Option<i64>,
    pub pad_w: Option<i64>,
    pub stride: Option<i64>,
    pub stride_h: Option<i64>,
    pub stride_w: Option<i64>,
    pub pool: Option<PoolMethod>,
}

/// A window property given either once for both spatial axes, or per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPair {
    Square(i64),
    Rectangular(i64, i64),
}

pub type KernelSpec = AxisPair;
pub type PadSpec = AxisPair;
pub type StrideSpec = AxisPair;

impl AxisPair {
    pub fn h(&self) -> i64 {
        match *self {
            AxisPair::Square(value) => value,
            AxisPair::Rectangular(h, _) => h,
        }
    }

    pub fn w(&self) -> i64 {
        match *self {
            AxisPair::Square(value) => value,
            AxisPair::Rectangular(_, w) => w,
        }
    }

    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::Height => self.h(),
            Axis::Width => self.w(),
        }
    }

    fn axes(&self) -> [(Axis, i64); 2] {
        [(Axis::Height, self.h()), (Axis::Width, self.w())]
    }

    /// Accepts the symmetric value alone, both per-axis values without it, or nothing at all.
    fn resolve(
        symmetric: Option<i64>,
        h: Option<i64>,
        w: Option<i64>,
        default: i64,
    ) -> Option<Self> {
        match (symmetric, h, w) {
            (None, Some(h), Some(w)) => Some(AxisPair::Rectangular(h, w)),
            (symmetric, None, None) => Some(AxisPair::Square(symmetric.unwrap_or(default))),
            _ => None,
        }
    }
}

/// Validated geometry of a fixed-time pooling layer. It can only be obtained
/// through `TryFrom<&PoolingParameter>`, so every instance satisfies the setup checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixTPoolingConfig {
    fix_time: i64,
    kernel: KernelSpec,
    pad: PadSpec,
    pad_l: i64,
    stride: StrideSpec,
    stride_l: i64,
    pool: PoolMethod,
}

impl TryFrom<&PoolingParameter> for FixTPoolingConfig {
    type Error = ConfigError;

    fn try_from(param: &PoolingParameter) -> Result<Self, Self::Error> {
        let fix_time = param.fix_time.ok_or(ConfigError::MissingFixTime)?;
        if fix_time <= 0 {
            return Err(ConfigError::NonPositiveFixTime(fix_time));
        }

        let kernel = match (param.kernel_size, param.kernel_h.zip(param.kernel_w)) {
            (Some(_), Some(_)) => return Err(ConfigError::AmbiguousKernel),
            (None, None) => return Err(ConfigError::MissingKernel),
            (Some(size), None) => KernelSpec::Square(size),
            (None, Some((h, w))) => KernelSpec::Rectangular(h, w),
        };
        let pad = PadSpec::resolve(param.pad, param.pad_h, param.pad_w, 0)
            .ok_or(ConfigError::AmbiguousPad)?;
        let stride = StrideSpec::resolve(param.stride, param.stride_h, param.stride_w, 1)
            .ok_or(ConfigError::AmbiguousStride)?;

        for (axis, kernel) in kernel.axes() {
            if kernel <= 0 {
                return Err(ConfigError::NonPositiveKernel { axis, kernel });
            }
        }
        for (axis, pad) in pad.axes() {
            if pad < 0 {
                return Err(ConfigError::NegativePad { axis, pad });
            }
        }
        for (axis, stride) in stride.axes() {
            if stride <= 0 {
                return Err(ConfigError::NonPositiveStride { axis, stride });
            }
        }

        let pool = param.pool.unwrap_or_default();
        if pad.h() != 0 || pad.w() != 0 {
            if !pool.supports_padding() {
                return Err(ConfigError::PaddingUnsupported(pool));
            }
            for (axis, pad) in pad.axes() {
                let kernel = kernel.get(axis);
                if pad >= kernel {
                    return Err(ConfigError::PadExceedsKernel { axis, pad, kernel });
                }
            }
        }

        // The temporal axis only follows the symmetric form.
        let pad_l = match pad {
            PadSpec::Square(pad) => pad,
            PadSpec::Rectangular(..) => 0,
        };
        let stride_l = match stride {
            StrideSpec::Square(stride) => stride,
            StrideSpec::Rectangular(..) => 1,
        };

        Ok(Self {
            fix_time,
            kernel,
            pad,
            pad_l,
            stride,
            stride_l,
            pool,
        })
    }
}

impl FixTPoolingConfig {
    pub fn fix_time(&self) -> i64 {
        self.fix_time
    }

    pub fn kernel(&self) -> KernelSpec {
        self.kernel
    }

    pub fn kernel_h(&self) -> i64 {
        self.kernel.h()
    }

    pub fn kernel_w(&self) -> i64 {
        self.kernel.w()
    }

    pub fn pad(&self) -> PadSpec {
        self.pad
    }

    pub fn pad_h(&self) -> i64 {
        self.pad.h()
    }

    pub fn pad_w(&self) -> i64 {
        self.pad.w()
    }

    /// Temporal padding. Kept for the temporal reduction, it does not enter the output shape.
    pub fn pad_l(&self) -> i64 {
        self.pad_l
    }

    pub fn stride(&self) -> StrideSpec {
        self.stride
    }

    pub fn stride_h(&self) -> i64 {
        self.stride.h()
    }

    pub fn stride_w(&self) -> i64 {
        self.stride.w()
    }

    /// Temporal stride. Kept for the temporal reduction, it does not enter the output shape.
    pub fn stride_l(&self) -> i64 {
        self.stride_l
    }

    pub fn pool(&self) -> PoolMethod {
        self.pool
    }

    /// Infer the top blob shape for a bottom blob of shape `input`.
    ///
    /// The spatial axes are pooled with the configured kernel, padding and stride. The temporal
    /// axis is not pooled from `input.length`: it always holds `fix_time` frames.
    pub fn output_shape(&self, input: &InputShape) -> Result<OutputShape, ShapeError> {
        let pooled_height = pooled_extent(
            Axis::Height,
            to_i64(Axis::Height, input.height)?,
            self.kernel_h(),
            self.pad_h(),
            self.stride_h(),
        )?;
        let pooled_width = pooled_extent(
            Axis::Width,
            to_i64(Axis::Width, input.width)?,
            self.kernel_w(),
            self.pad_w(),
            self.stride_w(),
        )?;
        Ok(OutputShape {
            num: input.num,
            channels: input.channels,
            fix_time: self.fix_time as usize,
            pooled_height: pooled_height as usize,
            pooled_width: pooled_width as usize,
        })
    }
}

fn to_i64(axis: Axis, extent: usize) -> Result<i64, ShapeError> {
    i64::try_from(extent).map_err(|_| ShapeError::ExtentOverflow { axis })
}

/// `ceil(numerator / denominator)` over the reals, for a positive denominator.
fn ceil_div(numerator: i64, denominator: i64) -> Option<i64> {
    let quotient = numerator.checked_div_euclid(denominator)?;
    let remainder = numerator.checked_rem_euclid(denominator)?;
    quotient.checked_add((remainder != 0) as i64)
}

/// Number of pooling windows along one spatial axis.
///
/// The count is rounded up, so a partial window at the far edge still produces an output. With
/// padding, a last window that would start inside the trailing padding is clipped off. The
/// clipping is applied at most once; the result is then checked against the padded bound.
/// Geometry that does not fit in `i64` is reported as [ShapeError::ExtentOverflow].
pub fn pooled_extent(
    axis: Axis,
    extent: i64,
    kernel: i64,
    pad: i64,
    stride: i64,
) -> Result<i64, ShapeError> {
    let overflow = || ShapeError::ExtentOverflow { axis };
    let span = pad
        .checked_mul(2)
        .and_then(|pads| pads.checked_add(extent))
        .and_then(|padded| padded.checked_sub(kernel))
        .ok_or_else(overflow)?;
    let mut pooled = ceil_div(span, stride)
        .and_then(|steps| steps.checked_add(1))
        .ok_or_else(overflow)?;
    if pad != 0 {
        let limit = extent.checked_add(pad).ok_or_else(overflow)?;
        let last_start = |pooled: i64| (pooled - 1).checked_mul(stride).ok_or_else(overflow);
        if last_start(pooled)? >= limit {
            log::trace!(
                "clipping last pooling window along {}: {} -> {}",
                axis,
                pooled,
                pooled - 1
            );
            pooled -= 1;
        }
        let start = last_start(pooled)?;
        if start >= limit {
            return Err(ShapeError::WindowOutsideInput { axis, start, limit });
        }
    }
    if pooled < 1 {
        return Err(ShapeError::EmptyOutput {
            axis,
            extent: pooled,
        });
    }
    Ok(pooled)
}
