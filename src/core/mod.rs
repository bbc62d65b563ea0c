pub use error::*;
pub use shape::*;

pub mod error;
pub mod shape;
