//! 走法执行

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{CastlingSide, GameState};
use crate::error::{ChessError, Result};
use crate::moves::MoveValidator;
use crate::piece::{Color, Piece, PieceKind, Square};

/// 走法类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// 普通走子或吃子
    Normal,
    /// 兵从初始行直进两格
    DoublePawnPush,
    /// 吃过路兵，`captured_at` 为被吃兵所在格
    EnPassant { captured_at: Square },
    /// 易位
    Castling(CastlingSide),
    /// 兵升变
    Promotion(PieceKind),
}

/// 一步棋的执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// 走动的棋子（升变前）
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    /// 被吃掉的棋子
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    /// 终局检查的结果，由 `Game` 填写
    pub winner: Option<Color>,
}

/// 走法执行器
pub struct MoveExecutor;

impl MoveExecutor {
    /// 执行一步已验证的走法
    ///
    /// `promotion` 为 `None` 时兵升变为后。调用方违反前置条件（坐标越界、声明的棋子与起点不符、
    /// 走法未通过验证、升变棋子无效）时返回错误，局面保持不变。
    pub fn apply(
        state: &mut GameState,
        piece: Piece,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome> {
        from.ensure_valid()?;
        to.ensure_valid()?;

        let found = state.board.get(from);
        if found != Some(piece) {
            return Err(ChessError::PieceMismatch {
                square: from,
                declared: piece,
                found,
            });
        }

        if let Some(kind) = promotion {
            if !kind.is_promotion_choice() {
                return Err(ChessError::InvalidPromotion(kind));
            }
        }

        if !MoveValidator::is_legal(
            piece,
            from,
            to,
            &state.board,
            state.en_passant,
            &state.castling,
        ) {
            return Err(ChessError::UnvalidatedMove { from, to });
        }

        let mut kind = MoveKind::Normal;

        // 1. 吃过路兵：被吃的兵在起点所在行、终点所在列
        let captured = if MoveValidator::is_en_passant(
            piece,
            from,
            to,
            &state.board,
            state.en_passant,
        ) {
            let captured_at = Square::new_unchecked(from.row, to.col);
            let captured = state.board.get(captured_at);
            state.board.set(captured_at, None);
            kind = MoveKind::EnPassant { captured_at };
            captured
        } else {
            state.board.get(to)
        };

        // 2. 移动棋子；4. 兵到达对方底线时升变
        let placed = if piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_rank() {
            let promoted = promotion.unwrap_or(PieceKind::Queen);
            kind = MoveKind::Promotion(promoted);
            Piece::new(piece.color, promoted)
        } else {
            piece
        };
        state.board.set(from, None);
        state.board.set(to, Some(placed));

        // 3. 易位时移动车
        let castled = MoveValidator::castling_side(piece, from, to);
        if let Some(side) = castled {
            let rook_from = side.rook_home(piece.color);
            let rook_to = Square::new_unchecked(rook_from.row, side.castled_rook_col());
            state.board.move_piece(rook_from, rook_to);
            kind = MoveKind::Castling(side);
        }

        // 5. 更新易位标记（只置位，不清除）
        match piece.kind {
            PieceKind::King => {
                state.castling.mark_king_moved(piece.color);
                if let Some(side) = castled {
                    state.castling.mark_rook_moved(piece.color, side);
                }
            }
            PieceKind::Rook => {
                if let Some(side) = CastlingSide::of_rook_home(piece.color, from) {
                    state.castling.mark_rook_moved(piece.color, side);
                }
            }
            _ => {}
        }

        // 6. 吃过路兵目标格只在双步推兵后保留一步
        let (dr, _) = from.delta(to);
        state.en_passant = if piece.kind == PieceKind::Pawn && dr.abs() == 2 {
            kind = MoveKind::DoublePawnPush;
            from.offset(dr / 2, 0)
        } else {
            None
        };

        // 7. 切换走子方
        state.switch_turn();

        debug!(
            "{} {} -> {} ({:?}), captured: {:?}",
            piece, from, to, kind, captured
        );

        Ok(MoveOutcome {
            piece,
            from,
            to,
            captured,
            kind,
            winner: None,
        })
    }
}
