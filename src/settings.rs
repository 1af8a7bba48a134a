//! 应用设置
//!
//! 设置以 camelCase JSON 保存在应用数据目录下的 `settings.json`。
//! 文件不存在时使用默认值；文件存在但无法解析时返回 `AppError::Storage`，不覆盖用户文件。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clipboard::feed::{DEFAULT_HISTORY_CAPACITY, normalize_history_capacity};
use crate::error::AppError;
use crate::popup::PopupWindowState;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub history_capacity: usize,
    /// `PopupWindowState` 编码串
    pub popup_window_state: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            popup_window_state: PopupWindowState::default().encode(),
        }
    }
}

impl AppSettings {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("设置文件不存在，使用默认设置: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut settings = serde_json::from_str::<AppSettings>(&content)
            .map_err(|e| AppError::Storage(format!("解析设置文件失败: {}", e)))?;
        settings.history_capacity = normalize_history_capacity(settings.history_capacity);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("创建应用数据目录失败: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;
        fs::write(path, content)?;
        log::debug!("💾 设置已保存: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("clipboard-reminder-{}-{}", name, std::process::id()))
            .join(SETTINGS_FILE_NAME)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = AppSettings::load(Path::new("/definitely/not/here/settings.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.popup_window_state, "0/1/None");
    }

    #[test]
    fn save_then_load() {
        let path = temp_settings_path("roundtrip");
        let settings = AppSettings {
            history_capacity: 25,
            popup_window_state: "1/0/Top:10,0".to_string(),
        };
        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("historyCapacity"));
        assert!(raw.contains("popupWindowState"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn partial_file_fills_defaults_and_clamps() {
        let path = temp_settings_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "historyCapacity": 500 }"#).unwrap();
        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.history_capacity, 50);
        assert_eq!(settings.popup_window_state, "0/1/None");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_json_is_storage_error() {
        let path = temp_settings_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppSettings::load(&path), Err(AppError::Storage(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
