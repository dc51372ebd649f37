use rayon::prelude::*;
use shakmaty::{Board, Color};
use crate::error::{FenFormatError, PsqtError, Result};
use crate::features::constants::{FEATURE_TEMPO, NUM_FEATURES};
use crate::features::layout::feature_index;
use crate::utils::ColoredPiece;

/// The two FEN fields the encoder reads: piece placement and side to move.
/// Remaining fields (castling, en passant, clocks) are ignored.
pub fn parse_position(fen: &str) -> Result<(Board, Color)> {
    let mut fields = fen.split_whitespace();

    let placement = fields
        .next()
        .ok_or_else(|| PsqtError::invalid_position(fen, FenFormatError::MissingField("piece placement")))?;
    let side_to_move = fields
        .next()
        .ok_or_else(|| PsqtError::invalid_position(fen, FenFormatError::MissingField("side to move")))?;

    let board = placement
        .parse::<Board>()
        .map_err(|_| PsqtError::invalid_position(fen, FenFormatError::InvalidPlacement(placement.to_string())))?;

    let turn = match side_to_move {
        "w" => Color::White,
        "b" => Color::Black,
        _ => {
            return Err(PsqtError::invalid_position(
                fen,
                FenFormatError::InvalidSideToMove(side_to_move.to_string()),
            ))
        }
    };

    Ok((board, turn))
}

/// Tempo feature value for the side to move.
pub const fn tempo(turn: Color) -> f32 {
    match turn {
        Color::White => 1.,
        Color::Black => -1.,
    }
}

/// Writes the features of `fen` into `row`, which must be zeroed and exactly
/// [`NUM_FEATURES`] long. On error `row` is left untouched.
pub fn fill_features(row: &mut [f32], fen: &str) -> Result<()> {
    if row.len() != NUM_FEATURES {
        return Err(PsqtError::ShapeMismatch { expected: NUM_FEATURES, actual: row.len() });
    }

    let (board, turn) = parse_position(fen)?;

    for piece in ColoredPiece::iter_semantic() {
        for square in board.by_piece(piece.to_piece()) {
            row[feature_index(piece, usize::from(square))] = 1.;
        }
    }
    row[FEATURE_TEMPO] = tempo(turn);

    Ok(())
}

/// Encodes a single position into a fresh feature vector.
pub fn encode(fen: &str) -> Result<Vec<f32>> {
    let mut features = vec![0.; NUM_FEATURES];
    fill_features(&mut features, fen)?;
    Ok(features)
}

/// Encodes `fens` into a row-major `fens.len() x NUM_FEATURES` matrix.
/// Fails as a whole if any position is malformed.
pub fn encode_batch<S: AsRef<str> + Sync>(fens: &[S]) -> Result<Vec<f32>> {
    let mut matrix = vec![0.; fens.len() * NUM_FEATURES];
    matrix
        .par_chunks_mut(NUM_FEATURES)
        .zip(fens.par_iter())
        .try_for_each(|(row, fen)| fill_features(row, fen.as_ref()))?;
    Ok(matrix)
}

/// Indices of the placement slots set for `fen`, ascending. The tempo slot is not included.
pub fn active_features(fen: &str) -> Result<Vec<usize>> {
    let (board, _) = parse_position(fen)?;

    let mut features = Vec::with_capacity(32);
    for piece in ColoredPiece::iter_semantic() {
        for square in board.by_piece(piece.to_piece()) {
            features.push(feature_index(piece, usize::from(square)));
        }
    }
    features.sort_unstable();

    Ok(features)
}
