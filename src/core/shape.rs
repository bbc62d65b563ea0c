use std::fmt;

use itertools::Itertools;

use super::ShapeError;

/// A spatial axis of a pooling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Height,
    Width,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Height => write!(f, "h"),
            Axis::Width => write!(f, "w"),
        }
    }
}

/// The shape of a bottom blob: `(num, channels, [length,] height, width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputShape {
    pub num: usize,
    pub channels: usize,
    pub length: Option<usize>,
    pub height: usize,
    pub width: usize,
}

impl InputShape {
    /// Read a shape from raw dimensions. Only 4 or 5 axes are accepted, and none of them may be empty.
    pub fn from_dims(dims: &[usize]) -> Result<Self, ShapeError> {
        let shape = match *dims {
            [num, channels, height, width] => Self {
                num,
                channels,
                length: None,
                height,
                width,
            },
            [num, channels, length, height, width] => Self {
                num,
                channels,
                length: Some(length),
                height,
                width,
            },
            _ => return Err(ShapeError::UnsupportedRank(dims.len())),
        };
        if let Some(axis) = dims.iter().position(|&dim| dim == 0) {
            return Err(ShapeError::EmptyAxis(axis));
        }
        Ok(shape)
    }

    pub fn num_axes(&self) -> usize {
        if self.length.is_some() {
            5
        } else {
            4
        }
    }

    pub fn dims(&self) -> Vec<usize> {
        let mut dims = vec![self.num, self.channels];
        dims.extend(self.length);
        dims.extend([self.height, self.width]);
        dims
    }
}

impl TryFrom<&[usize]> for InputShape {
    type Error = ShapeError;

    fn try_from(dims: &[usize]) -> Result<Self, Self::Error> {
        Self::from_dims(dims)
    }
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dims().iter().join(" x "))
    }
}

/// The shape of the top blob. The temporal axis always holds `fix_time` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputShape {
    pub num: usize,
    pub channels: usize,
    pub fix_time: usize,
    pub pooled_height: usize,
    pub pooled_width: usize,
}

impl OutputShape {
    pub fn dims(&self) -> [usize; 5] {
        [
            self.num,
            self.channels,
            self.fix_time,
            self.pooled_height,
            self.pooled_width,
        ]
    }

    /// Number of elements a buffer of this shape holds.
    pub fn count(&self) -> usize {
        self.dims().iter().product()
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dims().iter().join(" x "))
    }
}
