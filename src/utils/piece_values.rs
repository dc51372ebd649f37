use shakmaty::{Color, Role};
use crate::utils::ColoredPiece;

/// Centipawn value that maps to 1.0 in the model's normalized weight range.
pub const NORMALIZATION_CENTIPAWNS: f32 = 512.;

/// Conventional material values in centipawns, indexed by role.
const fn centipawn_value(role: Role) -> f32 {
    match role {
        Role::Pawn => 100.,
        Role::Knight => 325.,
        Role::Bishop => 350.,
        Role::Rook => 550.,
        Role::Queen => 1000.,
        Role::King => 0.,
    }
}

/// Material value of a piece in the normalized weight range, negative for black.
pub fn material_value(piece: ColoredPiece) -> f32 {
    let value = centipawn_value(piece.get_role()) / NORMALIZATION_CENTIPAWNS;
    match piece.get_color() {
        Color::White => value,
        Color::Black => -value,
    }
}
