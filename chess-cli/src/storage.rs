//! 局面存储
//!
//! 只保存当前局面（不含走法历史），每个局面一个 JSON 文件

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_core::{Color, GameState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 局面快照文件内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// 保存时间
    pub saved_at: DateTime<Utc>,
    /// 用户给的标签
    pub label: String,
    /// 局面
    pub state: GameState,
}

/// 已保存局面的概要
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// 快照 ID（文件名）
    pub id: String,
    pub label: String,
    pub saved_at: DateTime<Utc>,
    pub side_to_move: Color,
}

/// 存储管理器
pub struct StorageManager {
    saves_dir: PathBuf,
}

impl StorageManager {
    /// 在默认数据目录下创建存储管理器
    pub fn new() -> Result<Self> {
        Self::with_dir(get_saves_directory()?)
    }

    /// 在指定目录下创建存储管理器
    pub fn with_dir(saves_dir: PathBuf) -> Result<Self> {
        if !saves_dir.exists() {
            fs::create_dir_all(&saves_dir)
                .with_context(|| format!("无法创建存储目录: {:?}", saves_dir))?;
        }
        Ok(Self { saves_dir })
    }

    /// 保存局面，返回快照 ID
    pub fn save_snapshot(&self, label: &str, state: &GameState) -> Result<String> {
        let saved_at = Utc::now();
        let id = generate_filename(&saved_at, label);
        let filepath = self.saves_dir.join(&id);

        let snapshot = Snapshot {
            saved_at,
            label: label.to_string(),
            state: state.clone(),
        };
        let content = serde_json::to_string_pretty(&snapshot).context("序列化局面失败")?;

        fs::write(&filepath, content)
            .with_context(|| format!("写入文件失败: {:?}", filepath))?;

        tracing::info!("局面已保存: {:?}", filepath);
        Ok(id)
    }

    /// 加载快照
    pub fn load_snapshot(&self, id: &str) -> Result<Snapshot> {
        let filepath = self.snapshot_path(id)?;

        if !filepath.exists() {
            anyhow::bail!("局面文件不存在: {}", id);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取文件失败: {:?}", filepath))?;

        serde_json::from_str(&content).context("解析局面文件失败")
    }

    /// 列出所有快照，按保存时间倒序
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>> {
        let mut snapshots = Vec::new();

        let entries = fs::read_dir(&self.saves_dir)
            .with_context(|| format!("读取存储目录失败: {:?}", self.saves_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            match self.load_snapshot(filename) {
                Ok(snapshot) => snapshots.push(SnapshotInfo {
                    id: filename.to_string(),
                    label: snapshot.label,
                    saved_at: snapshot.saved_at,
                    side_to_move: snapshot.state.side_to_move,
                }),
                Err(e) => {
                    // 跳过损坏的文件
                    tracing::warn!("跳过无法解析的局面文件 {}: {:#}", filename, e);
                }
            }
        }

        snapshots.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| b.id.cmp(&a.id)));
        Ok(snapshots)
    }

    /// 删除快照
    pub fn delete_snapshot(&self, id: &str) -> Result<()> {
        let filepath = self.snapshot_path(id)?;

        if filepath.exists() {
            fs::remove_file(&filepath)
                .with_context(|| format!("删除文件失败: {:?}", filepath))?;
        }

        Ok(())
    }

    /// 存储目录路径
    pub fn saves_directory(&self) -> &Path {
        &self.saves_dir
    }

    /// 快照 ID 只能是存储目录下的文件名
    fn snapshot_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            anyhow::bail!("无效的局面名称: {}", id);
        }
        Ok(self.saves_dir.join(id))
    }
}

/// 获取跨平台存储目录
fn get_saves_directory() -> Result<PathBuf> {
    let app_data_dir = dirs::data_dir().context("无法获取应用数据目录")?;

    Ok(app_data_dir.join("chess-board").join("saves"))
}

/// 生成文件名
fn generate_filename(timestamp: &DateTime<Utc>, label: &str) -> String {
    let timestamp_str = timestamp.format("%Y%m%d_%H%M%S%.3f").to_string();
    let clean_label = sanitize_filename(label);

    if clean_label.is_empty() {
        format!("{}.json", timestamp_str)
    } else {
        format!("{}_{}.json", timestamp_str, clean_label)
    }
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Game, Square};
    use tempfile::TempDir;

    fn create_test_storage() -> (StorageManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageManager::with_dir(temp_dir.path().to_path_buf()).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_save_and_load_snapshot() {
        let (storage, _temp_dir) = create_test_storage();

        let mut game = Game::new();
        game.play(Square::new_unchecked(6, 3), Square::new_unchecked(4, 3), None)
            .unwrap();

        let id = storage.save_snapshot("opening", game.state()).unwrap();
        assert!(id.ends_with("_opening.json"));

        let loaded = storage.load_snapshot(&id).unwrap();
        assert_eq!(loaded.label, "opening");
        assert_eq!(&loaded.state, game.state());
        assert_eq!(loaded.state.en_passant, Some(Square::new_unchecked(5, 3)));
    }

    #[test]
    fn test_list_snapshots() {
        let (storage, _temp_dir) = create_test_storage();

        for i in 1..=3 {
            storage
                .save_snapshot(&format!("game{}", i), &GameState::initial())
                .unwrap();
        }
        // 损坏的文件和非 JSON 文件都被跳过
        fs::write(storage.saves_directory().join("broken.json"), "{").unwrap();
        fs::write(storage.saves_directory().join("notes.txt"), "hi").unwrap();

        let snapshots = storage.list_snapshots().unwrap();
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots
            .windows(2)
            .all(|pair| pair[0].saved_at >= pair[1].saved_at));
        assert!(snapshots.iter().all(|s| s.side_to_move == Color::White));
    }

    #[test]
    fn test_delete_snapshot() {
        let (storage, _temp_dir) = create_test_storage();

        let id = storage.save_snapshot("gone", &GameState::initial()).unwrap();
        storage.delete_snapshot(&id).unwrap();

        assert!(storage.load_snapshot(&id).is_err());
        assert!(storage.list_snapshots().unwrap().is_empty());
        // 删除不存在的文件不报错
        storage.delete_snapshot(&id).unwrap();
    }

    #[test]
    fn test_load_missing_snapshot() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(storage.load_snapshot("missing.json").is_err());
    }

    #[test]
    fn test_rejects_names_outside_saves_directory() {
        let (storage, temp_dir) = create_test_storage();
        let outside = temp_dir.path().join("outside.json");
        fs::write(&outside, "{}").unwrap();

        let escaped = format!("..{}outside.json", std::path::MAIN_SEPARATOR);
        let nested = StorageManager::with_dir(temp_dir.path().join("saves")).unwrap();
        assert!(nested.delete_snapshot(&escaped).is_err());
        assert!(nested.load_snapshot(&escaped).is_err());
        assert!(nested.load_snapshot("a/b.json").is_err());
        assert!(outside.exists());

        assert!(storage.delete_snapshot("..").is_err());
    }

    #[test]
    fn test_corrupt_board_is_an_error() {
        let (storage, _temp_dir) = create_test_storage();
        let id = storage.save_snapshot("short", &GameState::initial()).unwrap();
        let path = storage.saves_directory().join(&id);

        let mut value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["state"]["board"]["squares"] = serde_json::json!([]);
        fs::write(&path, value.to_string()).unwrap();

        assert!(storage.load_snapshot(&id).is_err());
        // 列表里跳过损坏的局面
        assert!(storage.list_snapshots().unwrap().is_empty());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
        assert_eq!(sanitize_filename(" before castling "), "before_castling");
        assert_eq!(sanitize_filename(""), "");
    }
}
