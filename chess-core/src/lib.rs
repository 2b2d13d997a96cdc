//! 国际象棋规则引擎
//!
//! 包含:
//! - 棋子、格子、棋盘与对局状态
//! - 走法验证（含易位、吃过路兵）
//! - 走法执行（含升变、易位标记与吃过路兵目标格更新）
//! - 终局判定（王被吃掉即告负）
//! - 对局事务封装

mod board;
mod constants;
mod error;
mod executor;
mod game;
mod moves;
mod piece;
mod termination;

pub use board::{Board, CastlingRights, CastlingSide, GameState};
pub use constants::*;
pub use error::{ChessError, Result};
pub use executor::{MoveExecutor, MoveKind, MoveOutcome};
pub use game::Game;
pub use moves::{Move, MoveValidator};
pub use piece::{Color, Piece, PieceKind, Square};
pub use termination::TerminationCheck;
