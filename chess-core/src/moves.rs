//! 走法验证

use serde::{Deserialize, Serialize};

use crate::board::{Board, CastlingRights, CastlingSide, GameState};
use crate::constants::KING_START_COL;
use crate::piece::{Color, Piece, PieceKind, Square};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始格
    pub from: Square,
    /// 目标格
    pub to: Square,
    /// 升变棋子（仅兵到达底线时有意义，缺省为后）
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// 创建指定升变棋子的走法
    pub fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, " ={:?}", kind)?;
        }
        Ok(())
    }
}

/// 走法验证器
///
/// 纯函数：只根据传入的棋盘、吃过路兵目标格与易位标记作答，不修改任何状态。
/// 只判断伪合法性（不考虑走后是否被将军）。
pub struct MoveValidator;

impl MoveValidator {
    /// 判断走法是否合法
    ///
    /// 前置条件：`piece` 正是 `board` 上 `from` 格的棋子。
    pub fn is_legal(
        piece: Piece,
        from: Square,
        to: Square,
        board: &Board,
        en_passant: Option<Square>,
        castling: &CastlingRights,
    ) -> bool {
        if !from.is_valid() || !to.is_valid() || from == to {
            return false;
        }

        // 不能吃己方棋子
        if let Some(target) = board.get(to) {
            if target.color == piece.color {
                return false;
            }
        }

        match piece.kind {
            PieceKind::Pawn => Self::is_pawn_move_legal(piece.color, from, to, board, en_passant),
            PieceKind::Rook => Self::is_rook_move_legal(from, to, board),
            PieceKind::Knight => Self::is_knight_move_legal(from, to),
            PieceKind::Bishop => Self::is_bishop_move_legal(from, to, board),
            PieceKind::Queen => {
                Self::is_rook_move_legal(from, to, board)
                    || Self::is_bishop_move_legal(from, to, board)
            }
            PieceKind::King => {
                Self::is_king_step_legal(from, to)
                    || Self::is_castling_legal(piece.color, from, to, board, castling)
            }
        }
    }

    /// 按对局状态判断走法是否合法（起点无子时返回 false）
    pub fn is_legal_in(state: &GameState, from: Square, to: Square) -> bool {
        match state.board.get(from) {
            Some(piece) => Self::is_legal(
                piece,
                from,
                to,
                &state.board,
                state.en_passant,
                &state.castling,
            ),
            None => false,
        }
    }

    /// 列出起点棋子所有可以到达的格子
    pub fn legal_destinations(state: &GameState, from: Square) -> Vec<Square> {
        Square::all()
            .filter(|&to| Self::is_legal_in(state, from, to))
            .collect()
    }

    /// 检查两格之间（不含两端）的直线或斜线路径是否畅通
    ///
    /// 沿单位方向逐格前进，遇到任何棋子即失败。两格不在同一直线或斜线上时返回 false。
    pub fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
        let (dr, dc) = from.delta(to);
        if (dr == 0 && dc == 0) || (dr != 0 && dc != 0 && dr.abs() != dc.abs()) {
            return false;
        }

        let (step_r, step_c) = (dr.signum(), dc.signum());
        let mut current = from;
        while let Some(next) = current.offset(step_r, step_c) {
            if next == to {
                return true;
            }
            if board.get(next).is_some() {
                return false;
            }
            current = next;
        }
        false
    }

    /// 是否是吃过路兵：兵斜进到目标格，目标格为空且等于吃过路兵目标格
    pub fn is_en_passant(
        piece: Piece,
        from: Square,
        to: Square,
        board: &Board,
        en_passant: Option<Square>,
    ) -> bool {
        let (dr, dc) = from.delta(to);
        piece.kind == PieceKind::Pawn
            && dc.abs() == 1
            && dr == piece.color.pawn_direction()
            && en_passant == Some(to)
            && board.is_empty(to)
    }

    /// 是否是易位走法（王横移两格），返回易位方向
    pub fn castling_side(piece: Piece, from: Square, to: Square) -> Option<CastlingSide> {
        let (dr, dc) = from.delta(to);
        if piece.kind == PieceKind::King && dr == 0 {
            CastlingSide::from_delta(dc)
        } else {
            None
        }
    }

    /// 兵的走法
    fn is_pawn_move_legal(
        color: Color,
        from: Square,
        to: Square,
        board: &Board,
        en_passant: Option<Square>,
    ) -> bool {
        let direction = color.pawn_direction();
        let (dr, dc) = from.delta(to);
        let destination = board.get(to);

        if dc == 0 {
            // 直进一格
            if dr == direction {
                return destination.is_none();
            }
            // 初始行直进两格，中间格和目标格都必须为空
            if dr == 2 * direction && from.row == color.pawn_rank() {
                let skipped = from.offset(direction, 0);
                return destination.is_none()
                    && skipped.is_some_and(|sq| board.is_empty(sq));
            }
            false
        } else if dc.abs() == 1 && dr == direction {
            match destination {
                // 斜吃敌子
                Some(target) => target.color != color,
                // 吃过路兵
                None => en_passant == Some(to),
            }
        } else {
            false
        }
    }

    /// 车的走法
    fn is_rook_move_legal(from: Square, to: Square, board: &Board) -> bool {
        let (dr, dc) = from.delta(to);
        ((dr == 0) != (dc == 0)) && Self::path_is_clear(board, from, to)
    }

    /// 马的走法
    fn is_knight_move_legal(from: Square, to: Square) -> bool {
        let (dr, dc) = from.delta(to);
        matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1))
    }

    /// 象的走法
    fn is_bishop_move_legal(from: Square, to: Square, board: &Board) -> bool {
        let (dr, dc) = from.delta(to);
        dr != 0 && dr.abs() == dc.abs() && Self::path_is_clear(board, from, to)
    }

    /// 王走一步
    fn is_king_step_legal(from: Square, to: Square) -> bool {
        let (dr, dc) = from.delta(to);
        dr.abs().max(dc.abs()) == 1
    }

    /// 易位
    ///
    /// 王和该侧车都在初始格且均未移动过，二者之间的格子全部为空。
    /// 不检查王经过或到达的格子是否受攻击。
    fn is_castling_legal(
        color: Color,
        from: Square,
        to: Square,
        board: &Board,
        castling: &CastlingRights,
    ) -> bool {
        let (dr, dc) = from.delta(to);
        if dr != 0 {
            return false;
        }
        let Some(side) = CastlingSide::from_delta(dc) else {
            return false;
        };

        if from != Square::new_unchecked(color.back_rank(), KING_START_COL) {
            return false;
        }

        let rook_home = side.rook_home(color);
        if board.get(rook_home) != Some(Piece::new(color, PieceKind::Rook)) {
            return false;
        }

        Self::path_is_clear(board, from, rook_home) && castling.can_castle(color, side)
    }
}
