//! 终端设置模块
//!
//! 提供设置数据结构与 JSON 持久化

use std::path::{Path, PathBuf};

use chess_core::{Color, PieceKind};
use serde::{Deserialize, Serialize};

/// 棋盘视角
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardFlip {
    /// 白方在下
    #[default]
    WhiteBottom,
    /// 黑方在下
    BlackBottom,
    /// 自动（跟随走子方）
    Auto,
}

impl BoardFlip {
    /// 显示在下方的阵营
    pub fn bottom_color(&self, side_to_move: Color) -> Color {
        match self {
            BoardFlip::WhiteBottom => Color::White,
            BoardFlip::BlackBottom => Color::Black,
            BoardFlip::Auto => side_to_move,
        }
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// tracing 过滤指令中的级别名
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// 终端设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === 对局设置 ===
    /// 不询问时的默认升变棋子
    pub default_promotion: PieceKind,
    /// 兵升变时是否询问
    pub ask_promotion: bool,
    /// 拿起棋子后是否标出可走格子
    pub show_move_hints: bool,

    // === 显示设置 ===
    /// 棋盘视角
    pub board_flip: BoardFlip,
    /// 使用 Unicode 棋子字形（否则用 ASCII 字母）
    pub unicode_pieces: bool,

    // === 高级设置 ===
    /// 日志级别
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_promotion: PieceKind::Queen,
            ask_promotion: true,
            show_move_hints: true,
            board_flip: BoardFlip::WhiteBottom,
            unicode_pieces: true,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// 默认设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("chess-board");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置，任何失败都回退到默认设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        let mut settings: Settings = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    return Self::default();
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                return Self::default();
            }
        };

        if !settings.default_promotion.is_promotion_choice() {
            tracing::warn!(
                "默认升变棋子无效: {:?}，改为后",
                settings.default_promotion
            );
            settings.default_promotion = PieceKind::Queen;
        }
        settings
    }

    /// 保存设置到默认位置
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::settings_path() else {
            return Err("无法获取配置目录".to_string());
        };
        self.save_to(&path)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // 确保目录存在
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("无法创建配置目录: {}", e));
            }
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("序列化设置失败: {}", e))?;

        std::fs::write(path, content).map_err(|e| format!("写入设置文件失败: {}", e))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let settings = Settings {
            default_promotion: PieceKind::Knight,
            ask_promotion: false,
            board_flip: BoardFlip::Auto,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_invalid_file_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        assert_eq!(Settings::load_from(&path), Settings::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "unicode_pieces": false }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert!(!settings.unicode_pieces);
        assert_eq!(settings.default_promotion, PieceKind::Queen);
    }

    #[test]
    fn test_invalid_default_promotion_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "default_promotion": "King" }"#).unwrap();

        assert_eq!(Settings::load_from(&path).default_promotion, PieceKind::Queen);
    }

    #[test]
    fn test_board_flip() {
        assert_eq!(BoardFlip::WhiteBottom.bottom_color(Color::Black), Color::White);
        assert_eq!(BoardFlip::Auto.bottom_color(Color::Black), Color::Black);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
