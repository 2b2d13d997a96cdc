//! 国际象棋终端前端
//!
//! 把拿起/放下的操作、局面存储与设置组合到规则引擎之上。

pub mod app;
pub mod command;
pub mod render;
pub mod session;
pub mod settings;
pub mod storage;

pub use app::{App, Flow};
pub use command::{Command, CommandError};
pub use session::{FixedPromotion, PromotionProvider, ReleaseOutcome, Session};
pub use settings::{BoardFlip, LogLevel, Settings};
pub use storage::{Snapshot, SnapshotInfo, StorageManager};
