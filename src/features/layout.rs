//! Mapping from (piece, square) to a slot of the feature vector.

use static_init::dynamic;
use crate::features::constants::NUM_SQUARES;
use crate::utils::{ColoredPiece, SEMANTIC_PIECE_ORDER};

/// Start of each piece's block in the feature vector, indexed by engine index.
#[dynamic]
static PIECE_FEATURE_OFFSETS: [usize; ColoredPiece::LIMIT] = {
    let mut offsets = [usize::MAX; ColoredPiece::LIMIT];
    for (order, piece) in SEMANTIC_PIECE_ORDER.iter().enumerate() {
        offsets[piece.engine_index()] = order * NUM_SQUARES;
    }
    offsets
};

/// First feature slot owned by `piece`.
pub fn feature_offset(piece: ColoredPiece) -> usize {
    PIECE_FEATURE_OFFSETS[piece.engine_index()]
}

/// Feature slot for `piece` standing on `square` (a1 = 0, h8 = 63).
pub fn feature_index(piece: ColoredPiece, square: usize) -> usize {
    debug_assert!(square < NUM_SQUARES);
    feature_offset(piece) + square
}
