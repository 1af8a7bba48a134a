//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 核心状态机（停靠、列表同步、自动隐藏）均为全函数，不产生错误；
//! 只有与操作系统交互的边缘操作（读写剪贴板、图片编码、设置文件、窗口操作）
//! 才会失败，这些失败统一收敛到 `AppError`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `std::io::Error` 与 `image::ImageError` 提供 `From` 转换，配合 `?` 使用。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板读写操作失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 图片编码 / 解码失败
    #[error("图片处理失败: {0}")]
    Image(#[from] image::ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置文件或数据目录不可用
    #[error("存储不可用: {0}")]
    Storage(String),

    /// 窗口操作失败
    #[error("窗口操作失败: {0}")]
    Window(String),
}

/// Tauri IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
