//! Encoding of positions into the sparse PSQT feature vector.

pub mod constants;
mod encoder;
mod layout;

pub use constants::*;
pub use encoder::*;
pub use layout::*;
