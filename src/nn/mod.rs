pub use fix_tpooling::*;
pub use layer::*;
pub use pooling::*;
pub use registry::*;

pub mod fix_tpooling;
pub mod layer;
pub mod pooling;
pub mod registry;
