use shakmaty::{Color, Piece, Role};

/// A piece of a given color, numbered the way the engine indexes its piece-square tables.
/// White pieces take 1-6, black pieces 9-14. Indices 0, 7 and 8 are never used.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ColoredPiece {
    WhitePawn=1, WhiteKnight=2, WhiteBishop=3, WhiteRook=4, WhiteQueen=5, WhiteKing=6,
    BlackPawn=9, BlackKnight=10, BlackBishop=11, BlackRook=12, BlackQueen=13, BlackKing=14
}

/// Order in which pieces own the 64-slot blocks of the feature vector.
/// Shared by the encoder and the exporter; reordering it silently breaks exported tables.
pub const SEMANTIC_PIECE_ORDER: [ColoredPiece; 12] = [
    ColoredPiece::WhitePawn,
    ColoredPiece::WhiteKnight,
    ColoredPiece::WhiteBishop,
    ColoredPiece::WhiteRook,
    ColoredPiece::WhiteQueen,
    ColoredPiece::WhiteKing,
    ColoredPiece::BlackPawn,
    ColoredPiece::BlackKnight,
    ColoredPiece::BlackBishop,
    ColoredPiece::BlackRook,
    ColoredPiece::BlackQueen,
    ColoredPiece::BlackKing
];

impl ColoredPiece {
    /// Number of rows in an engine piece-indexed table.
    pub const LIMIT: usize = 15;
    pub const COLOR_DIFFERENCE: u8 = 8;

    pub const fn from(color: Color, role: Role) -> ColoredPiece {
        match (color, role) {
            (Color::White, Role::Pawn) => ColoredPiece::WhitePawn,
            (Color::White, Role::Knight) => ColoredPiece::WhiteKnight,
            (Color::White, Role::Bishop) => ColoredPiece::WhiteBishop,
            (Color::White, Role::Rook) => ColoredPiece::WhiteRook,
            (Color::White, Role::Queen) => ColoredPiece::WhiteQueen,
            (Color::White, Role::King) => ColoredPiece::WhiteKing,
            (Color::Black, Role::Pawn) => ColoredPiece::BlackPawn,
            (Color::Black, Role::Knight) => ColoredPiece::BlackKnight,
            (Color::Black, Role::Bishop) => ColoredPiece::BlackBishop,
            (Color::Black, Role::Rook) => ColoredPiece::BlackRook,
            (Color::Black, Role::Queen) => ColoredPiece::BlackQueen,
            (Color::Black, Role::King) => ColoredPiece::BlackKing,
        }
    }

    pub const fn get_color(&self) -> Color {
        if *self as u8 & ColoredPiece::COLOR_DIFFERENCE != 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    pub const fn get_role(&self) -> Role {
        match *self as u8 & 0b111 {
            1 => Role::Pawn,
            2 => Role::Knight,
            3 => Role::Bishop,
            4 => Role::Rook,
            5 => Role::Queen,
            _ => Role::King,
        }
    }

    pub const fn to_piece(&self) -> Piece {
        Piece { color: self.get_color(), role: self.get_role() }
    }

    /// Row of this piece in an engine piece-indexed table.
    pub const fn engine_index(&self) -> usize {
        *self as usize
    }

    /// Position of this piece in [`SEMANTIC_PIECE_ORDER`].
    pub const fn semantic_index(&self) -> usize {
        let color_offset = match self.get_color() {
            Color::White => 0,
            Color::Black => 6,
        };
        color_offset + (*self as usize & 0b111) - 1
    }

    pub const fn to_char(&self) -> char {
        match self {
            ColoredPiece::WhitePawn => 'P',
            ColoredPiece::WhiteKnight => 'N',
            ColoredPiece::WhiteBishop => 'B',
            ColoredPiece::WhiteRook => 'R',
            ColoredPiece::WhiteQueen => 'Q',
            ColoredPiece::WhiteKing => 'K',
            ColoredPiece::BlackPawn => 'p',
            ColoredPiece::BlackKnight => 'n',
            ColoredPiece::BlackBishop => 'b',
            ColoredPiece::BlackRook => 'r',
            ColoredPiece::BlackQueen => 'q',
            ColoredPiece::BlackKing => 'k'
        }
    }

    pub fn iter_semantic() -> impl Iterator<Item = ColoredPiece> {
        SEMANTIC_PIECE_ORDER.iter().copied()
    }
}

impl From<Piece> for ColoredPiece {
    fn from(piece: Piece) -> Self {
        ColoredPiece::from(piece.color, piece.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colored_piece() {
        assert_eq!(ColoredPiece::WhitePawn as u8, 1);
        assert_eq!(ColoredPiece::WhiteKing as u8, 6);
        assert_eq!(ColoredPiece::BlackPawn as u8, 9);
        assert_eq!(ColoredPiece::BlackKing as u8, 14);

        assert_eq!(ColoredPiece::LIMIT, 15);
        assert_eq!(ColoredPiece::COLOR_DIFFERENCE, 8);

        assert_eq!(ColoredPiece::from(Color::White, Role::Pawn), ColoredPiece::WhitePawn);
        assert_eq!(ColoredPiece::from(Color::Black, Role::Queen), ColoredPiece::BlackQueen);

        assert_eq!(ColoredPiece::WhitePawn.get_color(), Color::White);
        assert_eq!(ColoredPiece::BlackPawn.get_color(), Color::Black);

        assert_eq!(ColoredPiece::WhiteRook.get_role(), Role::Rook);
        assert_eq!(ColoredPiece::BlackKing.get_role(), Role::King);

        assert_eq!(ColoredPiece::BlackKnight.to_char(), 'n');
        assert_eq!(ColoredPiece::WhiteBishop.to_char(), 'B');
    }

    #[test]
    fn test_round_trip_through_shakmaty_piece() {
        for piece in ColoredPiece::iter_semantic() {
            assert_eq!(ColoredPiece::from(piece.to_piece().color, piece.to_piece().role), piece);
            assert_eq!(<ColoredPiece as From<Piece>>::from(piece.to_piece()), piece);
            assert_eq!(piece.to_piece().char(), piece.to_char());
        }
    }

    #[test]
    fn test_semantic_order() {
        for (index, piece) in SEMANTIC_PIECE_ORDER.iter().enumerate() {
            assert_eq!(piece.semantic_index(), index);
        }
        // white block first, kinds in pawn..king order
        assert_eq!(SEMANTIC_PIECE_ORDER[0], ColoredPiece::WhitePawn);
        assert_eq!(SEMANTIC_PIECE_ORDER[5], ColoredPiece::WhiteKing);
        assert_eq!(SEMANTIC_PIECE_ORDER[6], ColoredPiece::BlackPawn);
        assert_eq!(SEMANTIC_PIECE_ORDER[11], ColoredPiece::BlackKing);
    }

    #[test]
    fn test_engine_indices_skip_reserved_rows() {
        let mut used = [false; ColoredPiece::LIMIT];
        for piece in ColoredPiece::iter_semantic() {
            assert!(!used[piece.engine_index()]);
            used[piece.engine_index()] = true;
        }
        assert!(!used[0]);
        assert!(!used[7]);
        assert!(!used[8]);
        assert_eq!(used.iter().filter(|&&u| u).count(), 12);
    }
}
