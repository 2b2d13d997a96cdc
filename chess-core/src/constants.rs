//! 棋盘常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 白方底线所在行
pub const WHITE_BACK_RANK: u8 = 7;

/// 黑方底线所在行
pub const BLACK_BACK_RANK: u8 = 0;

/// 白方兵的初始行
pub const WHITE_PAWN_RANK: u8 = 6;

/// 黑方兵的初始行
pub const BLACK_PAWN_RANK: u8 = 1;

/// 王的初始列
pub const KING_START_COL: u8 = 4;

/// 王翼车的初始列
pub const KINGSIDE_ROOK_COL: u8 = 7;

/// 后翼车的初始列
pub const QUEENSIDE_ROOK_COL: u8 = 0;

/// 王翼易位后车所在列
pub const KINGSIDE_ROOK_CASTLED_COL: u8 = 5;

/// 后翼易位后车所在列
pub const QUEENSIDE_ROOK_CASTLED_COL: u8 = 3;
