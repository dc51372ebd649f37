// Layout of the PSQT feature vector
pub const NUM_SQUARES: usize = 64;
pub const NUM_PIECE_BLOCKS: usize = 12; // one 64-slot block per colored piece
pub const NUM_PLACEMENT_FEATURES: usize = NUM_PIECE_BLOCKS * NUM_SQUARES; // 768 one-hot slots
pub const FEATURE_TEMPO: usize = NUM_PLACEMENT_FEATURES; // +1 white to move, -1 black to move
pub const NUM_FEATURES: usize = NUM_PLACEMENT_FEATURES + 1; // 769 inputs to the linear layer
