//! 剪贴板读取模块：把系统剪贴板当前内容转换为 `MimeSnapshot`
//!
//! 读取优先级：图片 → 文件列表（转为 `file://` URI）→ 文本。
//! 每一行都是绝对 URI 的文本按 URL 列表处理。

use std::path::Path;

use image::RgbaImage;

use super::snapshot::MimeSnapshot;
use crate::error::AppError;

const URI_SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "file://"];

fn is_absolute_uri(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    URI_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
        && !line.chars().any(char::is_whitespace)
}

/// 文本中每个非空行都是 URI 时返回 URI 列表
pub fn parse_uri_list(text: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() || !lines.iter().all(|line| is_absolute_uri(line)) {
        return None;
    }
    Some(lines.into_iter().map(str::to_string).collect())
}

/// 本地路径转 `file://` URI（Windows 反斜杠统一为正斜杠）
pub fn path_to_file_uri(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    if raw.starts_with('/') {
        format!("file://{raw}")
    } else {
        format!("file:///{raw}")
    }
}

/// 把纯文本分类为文本快照或 URL 列表快照
pub fn snapshot_from_text(text: String) -> MimeSnapshot {
    match parse_uri_list(&text) {
        Some(urls) => MimeSnapshot::urls(urls),
        None => MimeSnapshot::text(text),
    }
}

/// 读取系统剪贴板
///
/// # 返回
/// - `Ok(snapshot)`：当前内容；没有可识别格式时为空快照
/// - `Err(AppError::Clipboard)`：无法打开系统剪贴板
pub fn read_system_clipboard() -> Result<MimeSnapshot, AppError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;

    if let Ok(image_data) = clipboard.get_image() {
        let width = image_data.width as u32;
        let height = image_data.height as u32;
        match RgbaImage::from_raw(width, height, image_data.bytes.into_owned()) {
            Some(image) => return Ok(MimeSnapshot::image(image)),
            None => log::warn!("剪贴板图片数据与尺寸不匹配 ({}x{})，忽略图片格式", width, height),
        }
    }

    if let Ok(files) = clipboard.get().file_list() {
        if !files.is_empty() {
            log::debug!("📁 从剪贴板读取到 {} 个文件", files.len());
            let urls = files.iter().map(|path| path_to_file_uri(path)).collect();
            return Ok(MimeSnapshot::urls(urls));
        }
    }

    match clipboard.get_text() {
        Ok(text) if !text.is_empty() => Ok(snapshot_from_text(text)),
        _ => Ok(MimeSnapshot::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::snapshot::{MimeKind, MimePayload};
    use std::path::PathBuf;

    #[test]
    fn uri_list_is_detected() {
        let urls = parse_uri_list("https://a.com/x\n\nfile:///tmp/b.txt\n").unwrap();
        assert_eq!(urls, vec!["https://a.com/x", "file:///tmp/b.txt"]);
    }

    #[test]
    fn mixed_text_is_not_uri_list() {
        assert!(parse_uri_list("see https://a.com").is_none());
        assert!(parse_uri_list("https://a.com\nplain line").is_none());
        assert!(parse_uri_list("https://").is_none());
        assert!(parse_uri_list("   ").is_none());
    }

    #[test]
    fn text_classification() {
        assert_eq!(snapshot_from_text("hello".to_string()).kind(), MimeKind::Text);
        let snapshot = snapshot_from_text("HTTPS://Example.com".to_string());
        assert_eq!(
            snapshot.payload(),
            &MimePayload::Urls(vec!["HTTPS://Example.com".to_string()])
        );
    }

    #[test]
    fn unix_path_to_uri() {
        assert_eq!(
            path_to_file_uri(&PathBuf::from("/home/user/a.png")),
            "file:///home/user/a.png"
        );
    }

    #[test]
    fn windows_style_path_to_uri() {
        assert_eq!(
            path_to_file_uri(&PathBuf::from("C:\\Users\\a.png")),
            "file:///C:/Users/a.png"
        );
    }
}
