//! 文本棋盘渲染

use std::fmt::Write;

use chess_core::{Board, Color, Square, BOARD_SIZE};

/// 渲染选项
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// 使用 Unicode 棋子字形
    pub unicode: bool,
    /// 显示在下方的阵营
    pub bottom: Option<Color>,
    /// 已拿起的棋子所在格
    pub selected: Option<Square>,
    /// 需要标记的可走格子
    pub hints: Vec<Square>,
}

/// 将棋盘渲染为多行文本
///
/// 每行前后标出行号，底部标出列号。空格子用 `.`（浅色）和 `:`（深色）表示，
/// 可走格子用 `*`（有子时在棋子后加 `*`），拿起的棋子用方括号括起。
pub fn render_board(board: &Board, options: &RenderOptions) -> String {
    let white_bottom = options.bottom.unwrap_or(Color::White) == Color::White;

    // 行 0 在显示的顶部时白方在下
    let rows: Vec<u8> = if white_bottom {
        (0..BOARD_SIZE as u8).collect()
    } else {
        (0..BOARD_SIZE as u8).rev().collect()
    };
    let cols: Vec<u8> = if white_bottom {
        (0..BOARD_SIZE as u8).collect()
    } else {
        (0..BOARD_SIZE as u8).rev().collect()
    };

    let mut out = String::new();
    for &row in &rows {
        let _ = write!(out, "{} ", row);
        for &col in &cols {
            let sq = Square::new_unchecked(row, col);
            let _ = write!(out, "{}", cell(board, sq, options));
        }
        let _ = writeln!(out, " {}", row);
    }

    out.push_str("  ");
    for &col in &cols {
        let _ = write!(out, " {} ", col);
    }
    out.push('\n');
    out
}

fn cell(board: &Board, sq: Square, options: &RenderOptions) -> String {
    let hinted = options.hints.contains(&sq);
    let glyph = match board.get(sq) {
        Some(piece) if options.unicode => piece.display_char(),
        Some(piece) => piece.to_char(),
        None if hinted => '*',
        None if (sq.row + sq.col) % 2 == 0 => '.',
        None => ':',
    };

    if options.selected == Some(sq) {
        format!("[{}]", glyph)
    } else if hinted && board.get(sq).is_some() {
        format!(" {}*", glyph)
    } else {
        format!(" {} ", glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Piece, PieceKind};

    fn ascii() -> RenderOptions {
        RenderOptions {
            unicode: false,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_initial_ascii() {
        let text = render_board(&Board::initial(), &ascii());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "0  r  n  b  q  k  b  n  r  0");
        assert_eq!(lines[2], "2  .  :  .  :  .  :  .  :  2");
        assert_eq!(lines[7], "7  R  N  B  Q  K  B  N  R  7");
        assert_eq!(lines[8], "   0  1  2  3  4  5  6  7 ");
    }

    #[test]
    fn test_flipped_board() {
        let options = RenderOptions {
            bottom: Some(Color::Black),
            ..ascii()
        };
        let text = render_board(&Board::initial(), &options);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "7  R  N  B  K  Q  B  N  R  7");
        assert_eq!(lines[7], "0  r  n  b  k  q  b  n  r  0");
        assert_eq!(lines[8], "   7  6  5  4  3  2  1  0 ");
    }

    #[test]
    fn test_selection_and_hints() {
        let mut board = Board::empty();
        board.set(
            Square::new_unchecked(6, 0),
            Some(Piece::new(Color::White, PieceKind::Pawn)),
        );
        board.set(
            Square::new_unchecked(5, 1),
            Some(Piece::new(Color::Black, PieceKind::Knight)),
        );
        let options = RenderOptions {
            selected: Some(Square::new_unchecked(6, 0)),
            hints: vec![
                Square::new_unchecked(5, 0),
                Square::new_unchecked(4, 0),
                Square::new_unchecked(5, 1),
            ],
            ..ascii()
        };

        let text = render_board(&board, &options);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[6].starts_with("6 [P]"));
        assert!(lines[5].starts_with("5  *  n*"));
        assert!(lines[4].starts_with("4  *  :"));
    }

    #[test]
    fn test_unicode_glyphs() {
        let options = RenderOptions {
            unicode: true,
            ..RenderOptions::default()
        };
        let text = render_board(&Board::initial(), &options);
        assert!(text.contains('♔'));
        assert!(text.contains('♟'));
    }
}
