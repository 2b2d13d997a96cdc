//! 棋盘与对局状态

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    KINGSIDE_ROOK_CASTLED_COL, KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_CASTLED_COL, QUEENSIDE_ROOK_COL,
    SQUARE_COUNT,
};
use crate::piece::{Color, Piece, PieceKind, Square};

/// 底线棋子排列（按列）
const BACK_RANK_ORDER: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + col，使用 Vec 以支持 serde
    #[serde(deserialize_with = "deserialize_squares")]
    squares: Vec<Option<Piece>>,
}

/// 反序列化格子数组，长度必须是 64
fn deserialize_squares<'de, D>(deserializer: D) -> Result<Vec<Option<Piece>>, D::Error>
where
    D: Deserializer<'de>,
{
    let squares = Vec::<Option<Piece>>::deserialize(deserializer)?;
    if squares.len() != SQUARE_COUNT {
        return Err(serde::de::Error::invalid_length(squares.len(), &"64 squares"));
    }
    Ok(squares)
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK_RANK_ORDER.iter().enumerate() {
                board.set(
                    Square::new_unchecked(color.back_rank(), col as u8),
                    Some(Piece::new(color, *kind)),
                );
                board.set(
                    Square::new_unchecked(color.pawn_rank(), col as u8),
                    Some(Piece::new(color, PieceKind::Pawn)),
                );
            }
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if sq.is_valid() {
            self.squares[sq.to_index()]
        } else {
            None
        }
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if sq.is_valid() {
            self.squares[sq.to_index()] = piece;
        }
    }

    /// 格子是否为空
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// 移动棋子（不检查规则），返回目标格原有的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 查找指定阵营的王
    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Some(Piece::new(color, PieceKind::King)))
    }

    /// 获取指定阵营的所有棋子
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// 易位方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastlingSide {
    /// 王翼（短易位）
    Kingside,
    /// 后翼（长易位）
    Queenside,
}

impl CastlingSide {
    /// 由王的列差推断易位方向
    pub fn from_delta(dc: i8) -> Option<CastlingSide> {
        match dc {
            2 => Some(CastlingSide::Kingside),
            -2 => Some(CastlingSide::Queenside),
            _ => None,
        }
    }

    /// 该侧车的初始列
    pub fn rook_col(&self) -> u8 {
        match self {
            CastlingSide::Kingside => KINGSIDE_ROOK_COL,
            CastlingSide::Queenside => QUEENSIDE_ROOK_COL,
        }
    }

    /// 易位后车所在列（紧邻王的内侧）
    pub fn castled_rook_col(&self) -> u8 {
        match self {
            CastlingSide::Kingside => KINGSIDE_ROOK_CASTLED_COL,
            CastlingSide::Queenside => QUEENSIDE_ROOK_CASTLED_COL,
        }
    }

    /// 指定阵营该侧车的初始格子
    pub fn rook_home(&self, color: Color) -> Square {
        Square::new_unchecked(color.back_rank(), self.rook_col())
    }

    /// 由格子反查：该格是否是某一侧车的初始格子
    pub fn of_rook_home(color: Color, sq: Square) -> Option<CastlingSide> {
        [CastlingSide::Kingside, CastlingSide::Queenside]
            .into_iter()
            .find(|side| side.rook_home(color) == sq)
    }
}

/// 易位资格标记
///
/// 六个单调标记：一旦置为 true，本局内不再清除。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_king_moved: bool,
    pub white_kingside_rook_moved: bool,
    pub white_queenside_rook_moved: bool,
    pub black_king_moved: bool,
    pub black_kingside_rook_moved: bool,
    pub black_queenside_rook_moved: bool,
}

impl CastlingRights {
    /// 王是否已经移动过
    pub fn king_moved(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_king_moved,
            Color::Black => self.black_king_moved,
        }
    }

    /// 指定一侧的车是否已经移动过
    pub fn rook_moved(&self, color: Color, side: CastlingSide) -> bool {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => self.white_kingside_rook_moved,
            (Color::White, CastlingSide::Queenside) => self.white_queenside_rook_moved,
            (Color::Black, CastlingSide::Kingside) => self.black_kingside_rook_moved,
            (Color::Black, CastlingSide::Queenside) => self.black_queenside_rook_moved,
        }
    }

    /// 是否仍保有该侧的易位资格
    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        !self.king_moved(color) && !self.rook_moved(color, side)
    }

    pub fn mark_king_moved(&mut self, color: Color) {
        match color {
            Color::White => self.white_king_moved = true,
            Color::Black => self.black_king_moved = true,
        }
    }

    pub fn mark_rook_moved(&mut self, color: Color, side: CastlingSide) {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => self.white_kingside_rook_moved = true,
            (Color::White, CastlingSide::Queenside) => self.white_queenside_rook_moved = true,
            (Color::Black, CastlingSide::Kingside) => self.black_kingside_rook_moved = true,
            (Color::Black, CastlingSide::Queenside) => self.black_queenside_rook_moved = true,
        }
    }
}

/// 完整的对局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub side_to_move: Color,
    /// 易位资格
    pub castling: CastlingRights,
    /// 吃过路兵目标格（仅在双步推兵后的下一步有效）
    pub en_passant: Option<Square>,
}

impl GameState {
    /// 创建初始状态
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            side_to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
        }
    }

    /// 从棋盘创建状态
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            side_to_move,
            castling: CastlingRights::default(),
            en_passant: None,
        }
    }

    /// 切换走子方
    pub fn switch_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 反序列化
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(
            board.get(Square::new_unchecked(7, 4)),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.get(Square::new_unchecked(0, 3)),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(
            board.get(Square::new_unchecked(6, 2)),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        assert_eq!(
            board.get(Square::new_unchecked(1, 7)),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );

        // 中间四行为空
        for row in 2..6 {
            for col in 0..8 {
                assert!(board.is_empty(Square::new_unchecked(row, col)));
            }
        }

        assert_eq!(board.pieces(Color::White).len(), 16);
        assert_eq!(board.pieces(Color::Black).len(), 16);
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::initial();

        let from = Square::new_unchecked(7, 6);
        let to = Square::new_unchecked(5, 5);

        let captured = board.move_piece(from, to);
        assert!(captured.is_none());
        assert!(board.is_empty(from));
        assert_eq!(
            board.get(to),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn test_find_king() {
        let board = Board::initial();
        assert_eq!(board.find_king(Color::White), Some(Square::new_unchecked(7, 4)));
        assert_eq!(board.find_king(Color::Black), Some(Square::new_unchecked(0, 4)));

        assert_eq!(Board::empty().find_king(Color::White), None);
    }

    #[test]
    fn test_castling_rights_monotonic() {
        let mut rights = CastlingRights::default();
        assert!(rights.can_castle(Color::White, CastlingSide::Kingside));

        rights.mark_rook_moved(Color::White, CastlingSide::Kingside);
        assert!(!rights.can_castle(Color::White, CastlingSide::Kingside));
        assert!(rights.can_castle(Color::White, CastlingSide::Queenside));
        assert!(rights.can_castle(Color::Black, CastlingSide::Kingside));

        rights.mark_king_moved(Color::Black);
        assert!(!rights.can_castle(Color::Black, CastlingSide::Queenside));
        assert!(rights.black_king_moved);
    }

    #[test]
    fn test_castling_side_geometry() {
        assert_eq!(CastlingSide::from_delta(2), Some(CastlingSide::Kingside));
        assert_eq!(CastlingSide::from_delta(-2), Some(CastlingSide::Queenside));
        assert_eq!(CastlingSide::from_delta(1), None);

        assert_eq!(
            CastlingSide::Kingside.rook_home(Color::White),
            Square::new_unchecked(7, 7)
        );
        assert_eq!(
            CastlingSide::of_rook_home(Color::Black, Square::new_unchecked(0, 0)),
            Some(CastlingSide::Queenside)
        );
        assert_eq!(
            CastlingSide::of_rook_home(Color::Black, Square::new_unchecked(7, 0)),
            None
        );
    }

    #[test]
    fn test_game_state_json() {
        let mut state = GameState::initial();
        state.en_passant = Some(Square::new_unchecked(5, 3));
        state.castling.mark_king_moved(Color::White);

        let json = state.to_json().unwrap();
        let restored = GameState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_json_rejects_wrong_square_count() {
        let mut value: serde_json::Value =
            serde_json::from_str(&GameState::initial().to_json().unwrap()).unwrap();
        value["board"]["squares"] = serde_json::json!([]);
        assert!(GameState::from_json(&value.to_string()).is_err());

        value["board"]["squares"] = serde_json::json!(vec![serde_json::Value::Null; 65]);
        assert!(GameState::from_json(&value.to_string()).is_err());
    }
}
