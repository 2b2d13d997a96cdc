//! 错误类型定义

use thiserror::Error;

use crate::piece::{Piece, PieceKind, Square};

/// 规则引擎错误
///
/// `IllegalMove` 表示走法被拒绝（局面不变）；`PieceMismatch` 与
/// `UnvalidatedMove` 表示调用方违反了执行器的前置条件。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 坐标越界
    #[error("Invalid square: ({row}, {col})")]
    InvalidSquare { row: i16, col: i16 },

    /// 起点没有棋子
    #[error("No piece at {square}")]
    NoPiece { square: Square },

    /// 不是该方走棋
    #[error("Not your turn")]
    NotYourTurn,

    /// 走法不合规则
    #[error("Illegal move: from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// 声明的棋子与起点上的棋子不一致
    #[error("Piece mismatch at {square}: declared {declared}, found {found:?}")]
    PieceMismatch {
        square: Square,
        declared: Piece,
        found: Option<Piece>,
    },

    /// 未经验证的走法被交给执行器
    #[error("Move from {from} to {to} was not validated")]
    UnvalidatedMove { from: Square, to: Square },

    /// 无效的升变棋子
    #[error("Invalid promotion kind: {0:?}")]
    InvalidPromotion(PieceKind),

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 规则引擎操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
