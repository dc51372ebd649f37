mod colored_piece;
mod piece_values;

pub use colored_piece::*;
pub use piece_values::*;
