//! 棋子与坐标定义

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLACK_BACK_RANK, BLACK_PAWN_RANK, BOARD_SIZE, SQUARE_COUNT, WHITE_BACK_RANK, WHITE_PAWN_RANK,
};
use crate::error::{ChessError, Result};

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 兵
    Pawn,
    /// 车
    Rook,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceKind {
    /// 兵升变时可选的棋子
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// 是否可以作为升变目标
    pub fn is_promotion_choice(&self) -> bool {
        Self::PROMOTION_CHOICES.contains(self)
    }

    /// 获取 ASCII 字符（白方大写，黑方小写）
    pub fn to_char(&self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 白方（先手，底线在第 7 行）
    White,
    /// 黑方（后手，底线在第 0 行）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 兵前进方向（行增量）
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// 底线所在行
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => WHITE_BACK_RANK,
            Color::Black => BLACK_BACK_RANK,
        }
    }

    /// 兵的初始行
    pub fn pawn_rank(&self) -> u8 {
        match self {
            Color::White => WHITE_PAWN_RANK,
            Color::Black => BLACK_PAWN_RANK,
        }
    }

    /// 兵的升变行（对方底线）
    pub fn promotion_rank(&self) -> u8 {
        self.opponent().back_rank()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 棋子（值类型，不带身份）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    /// 创建新棋子
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// 获取棋子的 Unicode 字形
    pub fn display_char(&self) -> char {
        match (self.kind, self.color) {
            (PieceKind::King, Color::White) => '♔',
            (PieceKind::Queen, Color::White) => '♕',
            (PieceKind::Rook, Color::White) => '♖',
            (PieceKind::Bishop, Color::White) => '♗',
            (PieceKind::Knight, Color::White) => '♘',
            (PieceKind::Pawn, Color::White) => '♙',
            (PieceKind::King, Color::Black) => '♚',
            (PieceKind::Queen, Color::Black) => '♛',
            (PieceKind::Rook, Color::Black) => '♜',
            (PieceKind::Bishop, Color::Black) => '♝',
            (PieceKind::Knight, Color::Black) => '♞',
            (PieceKind::Pawn, Color::Black) => '♟',
        }
    }

    /// 获取 ASCII 字符
    pub fn to_char(&self) -> char {
        self.kind.to_char(self.color)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.color, self.kind)
    }
}

/// 棋盘格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    /// 行 (0-7)
    pub row: u8,
    /// 列 (0-7)
    pub col: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查格子是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 越界时返回 `InvalidSquare`
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ChessError::InvalidSquare {
                row: self.row as i16,
                col: self.col as i16,
            })
        }
    }

    /// 获取偏移后的格子
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row >= 0 && (row as usize) < BOARD_SIZE && col >= 0 && (col as usize) < BOARD_SIZE {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 到目标格子的 (行差, 列差)
    pub fn delta(&self, to: Square) -> (i8, i8) {
        (
            to.row as i8 - self.row as i8,
            to.col as i8 - self.col as i8,
        )
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < SQUARE_COUNT {
            Some(Square {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 按行优先顺序遍历全部 64 个格子
    pub fn all() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT).map(|i| Square {
            row: (i / BOARD_SIZE) as u8,
            col: (i % BOARD_SIZE) as u8,
        })
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
