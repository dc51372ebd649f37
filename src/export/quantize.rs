use crate::config::{ExportConfig, Rounding};
use crate::error::{PsqtError, Result};
use crate::features::{feature_index, parse_position, FEATURE_TEMPO, NUM_FEATURES, NUM_SQUARES};
use crate::model::PsqtParameters;
use crate::utils::ColoredPiece;

/// Engine-side piece-square table: one row per engine piece index, one column per square.
pub type PsqtTable = [[i32; NUM_SQUARES]; ColoredPiece::LIMIT];

/// Fixed-point constants handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedPsqt {
    /// Rows 0, 7 and 8 are always zero
    pub table: PsqtTable,
    pub tempo_bonus: i32,
    pub bias: i32,
    pub divisor: i32,
}

impl Rounding {
    pub fn round(self, value: f64) -> f64 {
        match self {
            Rounding::HalfAwayFromZero => value.round(),
            Rounding::HalfToEven => value.round_ties_even(),
        }
    }
}

/// `round(scale * value)`. Values beyond the `i32` range saturate.
pub fn quantize(value: f32, scale: f64, rounding: Rounding) -> i32 {
    rounding.round(scale * value as f64) as i32
}

/// Converts trained weights into the engine's fixed-point layout.
///
/// `weights[feature_index(piece, square)]` lands in `table[piece.engine_index()][square]`,
/// the tempo weight becomes `tempo_bonus`, and `divisor` is passed through unchanged.
/// Nothing is produced unless `weights` has exactly [`NUM_FEATURES`] entries.
pub fn export(weights: &[f32], bias: f32, scale: f64, divisor: i32, rounding: Rounding) -> Result<QuantizedPsqt> {
    if weights.len() != NUM_FEATURES {
        return Err(PsqtError::ShapeMismatch { expected: NUM_FEATURES, actual: weights.len() });
    }

    let mut table = [[0; NUM_SQUARES]; ColoredPiece::LIMIT];
    for piece in ColoredPiece::iter_semantic() {
        let row = &mut table[piece.engine_index()];
        for (square, value) in row.iter_mut().enumerate() {
            *value = quantize(weights[feature_index(piece, square)], scale, rounding);
        }
    }

    Ok(QuantizedPsqt {
        table,
        tempo_bonus: quantize(weights[FEATURE_TEMPO], scale, rounding),
        bias: quantize(bias, scale, rounding),
        divisor,
    })
}

impl QuantizedPsqt {
    pub fn from_parameters(parameters: &PsqtParameters, config: &ExportConfig) -> Result<Self> {
        export(&parameters.weights, parameters.bias, config.scale, config.divisor, config.rounding)
    }

    /// Fixed-point evaluation the engine performs with these constants, before dividing
    /// by `divisor`: the table entries of every piece on the board, the tempo bonus
    /// signed by the side to move, and the bias.
    pub fn raw_score(&self, fen: &str) -> Result<i64> {
        let (board, turn) = parse_position(fen)?;

        let mut score = self.bias as i64;
        for (square, piece) in board {
            score += self.table[ColoredPiece::from(piece.color, piece.role).engine_index()][usize::from(square)] as i64;
        }
        score += match turn {
            shakmaty::Color::White => self.tempo_bonus as i64,
            shakmaty::Color::Black => -(self.tempo_bonus as i64),
        };
        Ok(score)
    }
}
