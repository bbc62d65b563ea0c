pub mod core;
pub mod nn;
pub mod util;
