//! 终局判定

use crate::board::Board;
use crate::piece::Color;

/// 终局检查：王被吃掉即告负
pub struct TerminationCheck;

impl TerminationCheck {
    /// 扫描全部 64 格，缺少王的一方告负
    ///
    /// 两方的王都不在时按白方缺王处理，判黑方胜。
    pub fn winner(board: &Board) -> Option<Color> {
        if board.find_king(Color::White).is_none() {
            Some(Color::Black)
        } else if board.find_king(Color::Black).is_none() {
            Some(Color::White)
        } else {
            None
        }
    }
}
