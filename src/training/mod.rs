//! Fitting the PSQT model to labelled positions.

pub mod dataset;
mod step;
mod trainer;

pub use dataset::*;
pub use step::*;
pub use trainer::*;
