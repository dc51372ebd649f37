//! The linear PSQT evaluation model and its framework boundary.

mod parameters;
mod psqt;
pub mod utils;
mod value_network;

pub use parameters::*;
pub use psqt::*;
pub use value_network::*;
