//! Fixed-point export of trained PSQT weights for the engine.

mod quantize;
mod render;

pub use quantize::*;
pub use render::*;
