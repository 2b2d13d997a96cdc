//! 终端命令解析
//!
//! 坐标直接使用行号和列号（0-7），不使用棋谱记法。

use std::str::FromStr;

use chess_core::{Move, PieceKind, Square};
use thiserror::Error;

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("`{command}` expects {expected} arguments, got {actual}")]
    WrongArity {
        command: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("not a board coordinate: {0} (expected 0-7)")]
    BadCoordinate(String),

    #[error("not a promotion piece: {0} (expected q, r, b or n)")]
    BadPromotion(String),
}

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 拿起棋子
    Pick(Square),
    /// 放下棋子
    Drop(Square),
    /// 一次完成拿起与放下，可附带升变棋子
    Move(Move),
    /// 显示棋盘
    Board,
    /// 显示某个棋子的可走格子
    Hints(Square),
    /// 保存当前局面
    Save(Option<String>),
    /// 列出已保存的局面
    Saves,
    /// 加载局面
    Load(String),
    /// 删除已保存的局面
    Delete(String),
    /// 重新开局
    Reset,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match head.to_ascii_lowercase().as_str() {
            "pick" | "p" => {
                expect_arity("pick", "2", &args, 2)?;
                Ok(Command::Pick(parse_square(args[0], args[1])?))
            }
            "drop" | "d" => {
                expect_arity("drop", "2", &args, 2)?;
                Ok(Command::Drop(parse_square(args[0], args[1])?))
            }
            "move" | "m" => {
                if args.len() != 4 && args.len() != 5 {
                    return Err(CommandError::WrongArity {
                        command: "move",
                        expected: "4 or 5",
                        actual: args.len(),
                    });
                }
                let from = parse_square(args[0], args[1])?;
                let to = parse_square(args[2], args[3])?;
                let mv = match args.get(4) {
                    Some(text) => Move::with_promotion(from, to, parse_promotion(text)?),
                    None => Move::new(from, to),
                };
                Ok(Command::Move(mv))
            }
            "hints" | "h" => {
                expect_arity("hints", "2", &args, 2)?;
                Ok(Command::Hints(parse_square(args[0], args[1])?))
            }
            "board" | "b" => Ok(Command::Board),
            "save" => Ok(Command::Save(
                (!args.is_empty()).then(|| args.join("_")),
            )),
            "saves" | "list" => Ok(Command::Saves),
            "load" => {
                expect_arity("load", "1", &args, 1)?;
                Ok(Command::Load(args[0].to_string()))
            }
            "delete" | "rm" => {
                expect_arity("delete", "1", &args, 1)?;
                Ok(Command::Delete(args[0].to_string()))
            }
            "reset" | "new" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn expect_arity(
    command: &'static str,
    expected: &'static str,
    args: &[&str],
    count: usize,
) -> Result<(), CommandError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::WrongArity {
            command,
            expected,
            actual: args.len(),
        })
    }
}

fn parse_square(row: &str, col: &str) -> Result<Square, CommandError> {
    let row: u8 = row
        .parse()
        .map_err(|_| CommandError::BadCoordinate(row.to_string()))?;
    let col: u8 = col
        .parse()
        .map_err(|_| CommandError::BadCoordinate(col.to_string()))?;
    Square::new(row, col).ok_or_else(|| CommandError::BadCoordinate(format!("{row} {col}")))
}

/// 解析升变棋子（q/r/b/n 或完整英文名）
pub fn parse_promotion(text: &str) -> Result<PieceKind, CommandError> {
    let kind = match text.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => PieceKind::Queen,
        "r" | "rook" => PieceKind::Rook,
        "b" | "bishop" => PieceKind::Bishop,
        "n" | "knight" => PieceKind::Knight,
        _ => return Err(CommandError::BadPromotion(text.trim().to_string())),
    };
    Ok(kind)
}

/// 帮助文本
pub const HELP: &str = "\
commands (coordinates are row and column, 0-7):
  pick R C              pick up the piece on (R, C)
  drop R C              release the picked piece on (R, C)
  move R1 C1 R2 C2 [P]  pick and release in one step, P = q|r|b|n
  hints R C             list destinations of the piece on (R, C)
  board                 print the board
  save [LABEL]          save the current position
  saves                 list saved positions
  load NAME             resume a saved position
  delete NAME           remove a saved position
  reset                 start a new game
  help                  show this text
  quit                  leave";

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new_unchecked(row, col)
    }

    #[test]
    fn test_parse_pick_and_drop() {
        assert_eq!("pick 6 4".parse::<Command>(), Ok(Command::Pick(sq(6, 4))));
        assert_eq!("D 4 4".parse::<Command>(), Ok(Command::Drop(sq(4, 4))));
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            "move 1 0 0 0 n".parse::<Command>(),
            Ok(Command::Move(Move::with_promotion(
                sq(1, 0),
                sq(0, 0),
                PieceKind::Knight
            )))
        );
        assert_eq!(
            "m 6 4 4 4".parse::<Command>().unwrap(),
            Command::Move(Move::new(sq(6, 4), sq(4, 4)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "castle".parse::<Command>(),
            Err(CommandError::Unknown("castle".to_string()))
        );
        assert_eq!(
            "pick 8 0".parse::<Command>(),
            Err(CommandError::BadCoordinate("8 0".to_string()))
        );
        assert_eq!(
            "pick x 0".parse::<Command>(),
            Err(CommandError::BadCoordinate("x".to_string()))
        );
        assert!(matches!(
            "move 1 2 3".parse::<Command>(),
            Err(CommandError::WrongArity { actual: 3, .. })
        ));
        assert_eq!(
            "move 1 0 0 0 k".parse::<Command>(),
            Err(CommandError::BadPromotion("k".to_string()))
        );
    }

    #[test]
    fn test_parse_storage_commands() {
        assert_eq!("save".parse::<Command>(), Ok(Command::Save(None)));
        assert_eq!(
            "save before castling".parse::<Command>(),
            Ok(Command::Save(Some("before_castling".to_string())))
        );
        assert_eq!(
            "load a.json".parse::<Command>(),
            Ok(Command::Load("a.json".to_string()))
        );
        assert_eq!("saves".parse::<Command>(), Ok(Command::Saves));
    }

    #[test]
    fn test_parse_promotion() {
        assert_eq!(parse_promotion("Q"), Ok(PieceKind::Queen));
        assert_eq!(parse_promotion(" bishop "), Ok(PieceKind::Bishop));
        assert!(parse_promotion("pawn").is_err());
    }
}
