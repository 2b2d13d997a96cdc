//! 对局控制
//!
//! 一步棋是一次完整的事务：验证 → 执行 → 终局检查。被拒绝的走法不改变局面。

use tracing::{debug, info};

use crate::board::GameState;
use crate::error::{ChessError, Result};
use crate::executor::{MoveExecutor, MoveOutcome};
use crate::moves::{Move, MoveValidator};
use crate::piece::{Color, Piece, PieceKind, Square};
use crate::termination::TerminationCheck;

/// 一局棋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    state: GameState,
    winner: Option<Color>,
}

impl Game {
    /// 以标准初始局面开局
    pub fn new() -> Self {
        Self {
            state: GameState::initial(),
            winner: None,
        }
    }

    /// 从已有局面继续（重新计算胜负）
    pub fn from_state(state: GameState) -> Self {
        let winner = TerminationCheck::winner(&state.board);
        Self { state, winner }
    }

    /// 当前局面
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 当前走子方
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// 指定格子上的棋子
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.state.board.get(sq)
    }

    /// 重新开局
    pub fn reset(&mut self) {
        info!("重新开局");
        *self = Self::new();
    }

    /// 起点棋子所有可以到达的格子
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        if self.is_over() {
            return Vec::new();
        }
        MoveValidator::legal_destinations(&self.state, from)
    }

    /// 该走法是否会触发兵升变（用于决定是否询问升变棋子）
    pub fn needs_promotion(&self, from: Square, to: Square) -> bool {
        match self.state.board.get(from) {
            Some(piece) => {
                piece.kind == PieceKind::Pawn
                    && to.row == piece.color.promotion_rank()
                    && MoveValidator::is_legal_in(&self.state, from, to)
            }
            None => false,
        }
    }

    /// 走一步棋
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome> {
        from.ensure_valid()?;
        to.ensure_valid()?;

        if self.is_over() {
            return Err(ChessError::GameOver);
        }

        let piece = self
            .state
            .board
            .get(from)
            .ok_or(ChessError::NoPiece { square: from })?;

        if piece.color != self.state.side_to_move {
            return Err(ChessError::NotYourTurn);
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
            &self.state.board,
            self.state.en_passant,
            &self.state.castling,
        ) {
            debug!("拒绝走法: {} {} -> {}", piece, from, to);
            return Err(ChessError::IllegalMove { from, to });
        }

        let mut outcome = MoveExecutor::apply(&mut self.state, piece, from, to, promotion)?;

        self.winner = TerminationCheck::winner(&self.state.board);
        outcome.winner = self.winner;
        if let Some(winner) = self.winner {
            info!("{} 的王被吃掉，{} 获胜", winner.opponent(), winner);
        }

        Ok(outcome)
    }

    /// 按 `Move` 走一步棋
    pub fn play_move(&mut self, mv: Move) -> Result<MoveOutcome> {
        self.play(mv.from, mv.to, mv.promotion)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
