//! 终端应用：把命令分发给会话、渲染与存储

use std::io::Write;

use anyhow::{Context, Result};
use chess_core::{ChessError, MoveKind, MoveOutcome, Square};
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::render::{render_board, RenderOptions};
use crate::session::{FixedPromotion, PromotionProvider, ReleaseOutcome, Session};
use crate::settings::Settings;
use crate::storage::StorageManager;

/// 命令处理后是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 终端应用
pub struct App {
    session: Session,
    settings: Settings,
    storage: StorageManager,
}

impl App {
    pub fn new(session: Session, settings: Settings, storage: StorageManager) -> Self {
        Self {
            session,
            settings,
            storage,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 打印当前棋盘与走子方
    pub fn print_board(&self, out: &mut dyn Write) -> Result<()> {
        let game = self.session.game();
        let hints = if self.settings.show_move_hints {
            self.session.hints().to_vec()
        } else {
            Vec::new()
        };
        let options = RenderOptions {
            unicode: self.settings.unicode_pieces,
            bottom: Some(self.settings.board_flip.bottom_color(game.side_to_move())),
            selected: self.session.selected(),
            hints,
        };

        write!(out, "{}", render_board(&game.state().board, &options))?;
        writeln!(out, "{} to move", game.side_to_move())?;
        Ok(())
    }

    /// 处理一条命令
    pub fn handle(
        &mut self,
        command: Command,
        promotion: &mut dyn PromotionProvider,
        out: &mut dyn Write,
    ) -> Result<Flow> {
        match command {
            Command::Pick(sq) => match self.session.pick(sq) {
                Ok(_) => self.print_board(out)?,
                Err(e) => writeln!(out, "cannot pick up {}: {}", sq, e)?,
            },
            Command::Drop(sq) => {
                let outcome = self.session.release(sq, promotion);
                self.report(outcome, out)?;
            }
            Command::Move(mv) => {
                // 命令里给出的升变棋子优先于询问
                let outcome = match mv.promotion {
                    Some(kind) => self.session.play(mv.from, mv.to, &mut FixedPromotion(kind)),
                    None => self.session.play(mv.from, mv.to, promotion),
                };
                self.report(outcome, out)?;
            }
            Command::Hints(sq) => {
                let targets = self.session.game().legal_destinations(sq);
                if targets.is_empty() {
                    writeln!(out, "no moves from {}", sq)?;
                } else {
                    writeln!(out, "{}", join_squares(&targets))?;
                }
            }
            Command::Board => self.print_board(out)?,
            Command::Save(label) => {
                let label = label.unwrap_or_default();
                let id = self
                    .storage
                    .save_snapshot(&label, self.session.game().state())?;
                writeln!(out, "saved as {}", id)?;
            }
            Command::Saves => {
                let snapshots = self.storage.list_snapshots()?;
                if snapshots.is_empty() {
                    writeln!(out, "no saved positions")?;
                }
                for info in snapshots {
                    writeln!(
                        out,
                        "{}  {}  {} to move",
                        info.id,
                        info.saved_at.format("%Y-%m-%d %H:%M:%S"),
                        info.side_to_move
                    )?;
                }
            }
            Command::Load(id) => {
                let snapshot = self
                    .storage
                    .load_snapshot(&id)
                    .with_context(|| format!("cannot load {}", id))?;
                info!("载入局面 {} ({})", id, snapshot.label);
                self.session = Session::from_state(snapshot.state);
                self.print_board(out)?;
            }
            Command::Delete(id) => {
                self.storage.delete_snapshot(&id)?;
                writeln!(out, "deleted {}", id)?;
            }
            Command::Reset => {
                self.session.reset();
                self.print_board(out)?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn report(&self, outcome: ReleaseOutcome, out: &mut dyn Write) -> Result<()> {
        match outcome {
            ReleaseOutcome::NothingPicked => writeln!(out, "nothing picked up")?,
            ReleaseOutcome::Cancelled => writeln!(out, "move cancelled")?,
            ReleaseOutcome::Rejected(e) => {
                if matches!(e, ChessError::IllegalMove { .. }) {
                    writeln!(out, "illegal move")?;
                } else {
                    warn!("走法被拒绝: {}", e);
                    writeln!(out, "{}", e)?;
                }
            }
            ReleaseOutcome::Committed(outcome) => {
                writeln!(out, "{}", describe(&outcome))?;
                if let Some(winner) = outcome.winner {
                    writeln!(
                        out,
                        "{} wins: the {} king was captured",
                        winner,
                        winner.opponent()
                    )?;
                    writeln!(out, "new game")?;
                }
                self.print_board(out)?;
            }
        }
        Ok(())
    }
}

/// 一步棋的文字描述
pub fn describe(outcome: &MoveOutcome) -> String {
    let mut text = format!("{} {} -> {}", outcome.piece, outcome.from, outcome.to);
    match outcome.kind {
        MoveKind::Normal | MoveKind::DoublePawnPush => {}
        MoveKind::EnPassant { captured_at } => {
            text.push_str(&format!(" en passant, pawn removed from {}", captured_at));
        }
        MoveKind::Castling(side) => text.push_str(&format!(" castles {:?}", side)),
        MoveKind::Promotion(kind) => text.push_str(&format!(" promotes to {:?}", kind)),
    }
    if let Some(captured) = outcome.captured {
        text.push_str(&format!(", captures {}", captured));
    }
    text
}

fn join_squares(squares: &[Square]) -> String {
    squares
        .iter()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
