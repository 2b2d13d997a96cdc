//! 输入会话
//!
//! 对应鼠标"按下拿起、松开放下"的操作：拿起时检查棋子属于走子方，
//! 放下时走一步完整的事务。

use chess_core::{ChessError, Color, Game, GameState, MoveOutcome, PieceKind, Square};
use tracing::debug;

/// 升变棋子提供者
pub trait PromotionProvider {
    /// 为指定阵营的兵选择升变棋子，返回 `None` 表示使用后
    fn choose(&mut self, color: Color) -> Option<PieceKind>;
}

/// 固定升变为某种棋子，不询问
pub struct FixedPromotion(pub PieceKind);

impl PromotionProvider for FixedPromotion {
    fn choose(&mut self, _color: Color) -> Option<PieceKind> {
        Some(self.0)
    }
}

/// 放下棋子的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// 没有拿起的棋子
    NothingPicked,
    /// 放回原处，视为取消
    Cancelled,
    /// 走法被拒绝，局面不变
    Rejected(ChessError),
    /// 走法已执行；若产生胜者，会话已重新开局
    Committed(MoveOutcome),
}

/// 输入会话
#[derive(Debug, Default)]
pub struct Session {
    game: Game,
    /// 已拿起的棋子所在格
    selected: Option<Square>,
    /// 已拿起棋子的可走格子
    hints: Vec<Square>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有局面继续
    pub fn from_state(state: GameState) -> Self {
        let mut session = Self {
            game: Game::from_state(state),
            selected: None,
            hints: Vec::new(),
        };
        // 载入的局面已经分出胜负时直接重新开局
        if session.game.is_over() {
            session.game.reset();
        }
        session
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn hints(&self) -> &[Square] {
        &self.hints
    }

    /// 拿起棋子：只能拿起走子方的棋子，返回可走格子
    pub fn pick(&mut self, sq: Square) -> Result<&[Square], ChessError> {
        self.clear_selection();

        let piece = self.game.piece_at(sq).ok_or(ChessError::NoPiece { square: sq })?;
        if piece.color != self.game.side_to_move() {
            return Err(ChessError::NotYourTurn);
        }

        self.selected = Some(sq);
        self.hints = self.game.legal_destinations(sq);
        debug!("拿起 {} @ {}，可走 {} 格", piece, sq, self.hints.len());
        Ok(&self.hints)
    }

    /// 放下棋子：无论结果如何都会清除已拿起的棋子
    pub fn release(
        &mut self,
        to: Square,
        promotion: &mut dyn PromotionProvider,
    ) -> ReleaseOutcome {
        let Some(from) = self.selected else {
            return ReleaseOutcome::NothingPicked;
        };
        self.clear_selection();

        if from == to {
            return ReleaseOutcome::Cancelled;
        }

        let kind = if self.game.needs_promotion(from, to) {
            promotion.choose(self.game.side_to_move())
        } else {
            None
        };
        self.commit(from, to, kind)
    }

    /// 一次完成拿起与放下
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: &mut dyn PromotionProvider,
    ) -> ReleaseOutcome {
        if let Err(e) = self.pick(from) {
            return ReleaseOutcome::Rejected(e);
        }
        self.release(to, promotion)
    }

    /// 重新开局
    pub fn reset(&mut self) {
        self.clear_selection();
        self.game.reset();
    }

    fn commit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ReleaseOutcome {
        match self.game.play(from, to, promotion) {
            Ok(outcome) => {
                if outcome.winner.is_some() {
                    self.game.reset();
                }
                ReleaseOutcome::Committed(outcome)
            }
            Err(e) => ReleaseOutcome::Rejected(e),
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.hints.clear();
    }
}
