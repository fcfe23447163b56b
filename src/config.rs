//! 角色与场景列表配置
//!
//! 配置文件 `magic_config.json`:
//! ```json
//! {"characters": ["..."], "places": ["..."]}
//! ```
//! 文件缺失或解析失败时使用内置默认值。

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 配置文件名称
pub const CONFIG_FILE_NAME: &str = "magic_config.json";
/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "MAGIC_MIRROR_CONFIG";

pub const DEFAULT_CHARACTERS: [&str; 5] = [
    "Galactic Astronaut",
    "Brave Medieval Knight",
    "Magic Forest Elf",
    "Brave Super Hero",
    "Mystical Wizard",
];

pub const DEFAULT_PLACES: [&str; 4] = [
    "on a Glowing Alien Planet",
    "inside a Floating Crystal Palace",
    "in a Steampunk Workshop",
    "amidst a Field of Giant Flowers",
];

lazy_static! {
    static ref DEFAULT_CONFIG: MagicConfig = MagicConfig {
        characters: DEFAULT_CHARACTERS.iter().map(|v| v.to_string()).collect(),
        places: DEFAULT_PLACES.iter().map(|v| v.to_string()).collect(),
    };
}

/// 角色与场景列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicConfig {
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub places: Vec<String>,
}

impl Default for MagicConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl MagicConfig {
    /// 解析配置内容, 缺失或为空的列表回退为默认值
    pub fn from_json(content: &str) -> Result<Self, Error> {
        let mut config: MagicConfig = serde_json::from_str(content)?;
        if config.characters.is_empty() {
            config.characters = DEFAULT_CONFIG.characters.clone();
        }
        if config.places.is_empty() {
            config.places = DEFAULT_CONFIG.places.clone();
        }
        Ok(config)
    }
}

/// 配置文件路径
///
/// 优先级: 环境变量 > 模块所在目录 > 当前工作目录
pub fn resolve_config_path(env_override: Option<String>, module_dir: Option<&Path>) -> PathBuf {
    if let Some(path) = env_override.filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    match module_dir {
        Some(dir) => dir.join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}

/// 读取环境变量后解析配置文件路径
pub fn config_path(module_dir: Option<&Path>) -> PathBuf {
    resolve_config_path(env::var(CONFIG_ENV).ok(), module_dir)
}

/// 加载配置
///
/// 不会失败, 异常情况全部回退为默认值
pub fn load_config(path: &Path) -> MagicConfig {
    if !path.exists() {
        return MagicConfig::default();
    }

    let config = fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|content| MagicConfig::from_json(&content));

    match config {
        Ok(v) => v,
        Err(e) => {
            warn!("load {} failed, use default lists, {e}", path.display());
            MagicConfig::default()
        }
    }
}

/// 角色列表与场景列表
pub fn get_magic_lists(path: &Path) -> (Vec<String>, Vec<String>) {
    let config = load_config(path);
    (config.characters, config.places)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    /// 临时配置文件
    fn temp_config(name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
        let dir = env::temp_dir().join(format!("magic_mirror_{name}_{nanos}"));
        fs::create_dir_all(&dir)?;
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, content)?;
        Ok(path)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = env::temp_dir().join("magic_mirror_does_not_exist").join(CONFIG_FILE_NAME);
        let (characters, places) = get_magic_lists(&path);

        assert!(characters.contains(&"Galactic Astronaut".to_string()));
        assert!(places.contains(&"in a Steampunk Workshop".to_string()));
        assert_eq!(characters.len(), DEFAULT_CHARACTERS.len());
        assert_eq!(places.len(), DEFAULT_PLACES.len());
    }

    #[test]
    fn test_custom_lists() -> anyhow::Result<()> {
        let path = temp_config(
            "custom",
            r#"{"characters": ["Pirate", "Lego Character"], "places": ["on the Moon"], "extra": 1}"#,
        )?;
        let (characters, places) = get_magic_lists(&path);

        assert_eq!(characters, vec!["Pirate", "Lego Character"]);
        assert_eq!(places, vec!["on the Moon"]);
        Ok(())
    }

    #[test]
    fn test_invalid_json_uses_defaults() -> anyhow::Result<()> {
        let path = temp_config("invalid", "{ not json")?;
        assert_eq!(load_config(&path), MagicConfig::default());
        Ok(())
    }

    #[test]
    fn test_missing_key_falls_back_per_key() -> anyhow::Result<()> {
        let path = temp_config("partial", r#"{"characters": ["Pirate"]}"#)?;
        let config = load_config(&path);

        assert_eq!(config.characters, vec!["Pirate"]);
        assert_eq!(config.places, MagicConfig::default().places);
        Ok(())
    }

    #[test]
    fn test_empty_list_falls_back() -> anyhow::Result<()> {
        let config = MagicConfig::from_json(r#"{"characters": [], "places": ["under the Ocean"]}"#)?;

        assert_eq!(config.characters, MagicConfig::default().characters);
        assert_eq!(config.places, vec!["under the Ocean"]);
        Ok(())
    }

    #[test]
    fn test_resolve_config_path() {
        let module_dir = Path::new("/opt/ComfyUI/custom_nodes/magic-mirror");

        assert_eq!(
            resolve_config_path(Some("/etc/magic.json".to_string()), Some(module_dir)),
            PathBuf::from("/etc/magic.json")
        );
        assert_eq!(
            resolve_config_path(Some(String::new()), Some(module_dir)),
            module_dir.join(CONFIG_FILE_NAME)
        );
        // 仅空字符串视为未设置
        assert_eq!(
            resolve_config_path(Some(" ".to_string()), Some(module_dir)),
            PathBuf::from(" ")
        );
        assert_eq!(
            resolve_config_path(None, None),
            PathBuf::from(CONFIG_FILE_NAME)
        );
    }
}
