//! 剪贴板快照模块
//!
//! # 设计思路
//!
//! 一次剪贴板捕获即一个 `MimeSnapshot`：创建后不可变，由历史队列以 `Arc` 持有，
//! 显示行仅持有 `Weak` 引用。负载使用带标签的枚举表达（文本 / URL 列表 / 图片 / 空），
//! 渲染与"写回剪贴板"逻辑都按标签分支，不使用继承层次。

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, Local};
use dpi::PhysicalSize;
use image::{ImageFormat, RgbaImage};
use serde::Serialize;

use super::writer::ClipboardSink;
use crate::error::AppError;

/// 无法识别的负载显示的占位文本
pub const UNKNOWN_PLACEHOLDER: &str = "UnKnown";

/// 负载种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MimeKind {
    Text,
    Urls,
    Image,
    Empty,
}

/// 剪贴板负载（标签即种类，保证最多只有一种内容被填充）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimePayload {
    Text(String),
    Urls(Vec<String>),
    Image(RgbaImage),
    Empty,
}

impl MimePayload {
    pub fn kind(&self) -> MimeKind {
        match self {
            MimePayload::Text(_) => MimeKind::Text,
            MimePayload::Urls(_) => MimeKind::Urls,
            MimePayload::Image(_) => MimeKind::Image,
            MimePayload::Empty => MimeKind::Empty,
        }
    }
}

/// 一次剪贴板捕获
#[derive(Debug, Clone)]
pub struct MimeSnapshot {
    payload: MimePayload,
    captured_at: DateTime<Local>,
}

impl MimeSnapshot {
    pub fn new(payload: MimePayload) -> Self {
        Self {
            payload,
            captured_at: Local::now(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MimePayload::Text(text.into()))
    }

    pub fn urls(urls: Vec<String>) -> Self {
        Self::new(MimePayload::Urls(urls))
    }

    pub fn image(image: RgbaImage) -> Self {
        Self::new(MimePayload::Image(image))
    }

    pub fn empty() -> Self {
        Self::new(MimePayload::Empty)
    }

    pub fn payload(&self) -> &MimePayload {
        &self.payload
    }

    pub fn kind(&self) -> MimeKind {
        self.payload.kind()
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// 空负载视为无效，不参与写回
    pub fn is_valid(&self) -> bool {
        self.kind() != MimeKind::Empty
    }

    /// 内容相同（忽略捕获时间），历史队列据此去重
    pub fn same_content(&self, other: &MimeSnapshot) -> bool {
        self.payload == other.payload
    }

    /// 将快照内容写回系统剪贴板
    pub fn copy_to_clipboard(&self, sink: &mut dyn ClipboardSink) -> Result<(), AppError> {
        if !self.is_valid() {
            return Err(AppError::Clipboard("空快照无法写回剪贴板".to_string()));
        }
        sink.write(&self.payload)
    }

    /// 文本化表示：文本原样；URL 每行一个且行尾带换行；其余为占位文本。
    ///
    /// 图片没有文本表示，返回 `None`。
    pub fn display_text(&self) -> Option<String> {
        match &self.payload {
            MimePayload::Image(_) => None,
            MimePayload::Text(text) => Some(text.clone()),
            MimePayload::Urls(urls) => Some(urls.iter().map(|url| format!("{url}\n")).collect()),
            MimePayload::Empty => Some(UNKNOWN_PLACEHOLDER.to_string()),
        }
    }

    pub fn image_size(&self) -> Option<PhysicalSize<u32>> {
        match &self.payload {
            MimePayload::Image(image) => Some(PhysicalSize::new(image.width(), image.height())),
            _ => None,
        }
    }

    /// 图片负载编码为 PNG data URL，供前端 `<img>` 直接使用
    pub fn png_data_url(&self) -> Result<Option<String>, AppError> {
        let MimePayload::Image(image) = &self.payload else {
            return Ok(None);
        };
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(Some(format!(
            "data:image/png;base64,{}",
            BASE64_STANDARD.encode(bytes)
        )))
    }
}

/// 按比例缩放到边界内（KeepAspectRatio 语义）
///
/// 任一尺寸为 0 时返回 `0x0`，不做除法。
pub fn fit_keep_aspect_ratio(
    source: PhysicalSize<u32>,
    bounds: PhysicalSize<u32>,
) -> PhysicalSize<u32> {
    if source.width == 0 || source.height == 0 || bounds.width == 0 || bounds.height == 0 {
        return PhysicalSize::new(0, 0);
    }

    let sw = source.width as u64;
    let sh = source.height as u64;
    let bw = bounds.width as u64;
    let bh = bounds.height as u64;

    // 比较 sw/sh 与 bw/bh，决定宽度受限还是高度受限
    if sw * bh <= bw * sh {
        let width = (sw * bh / sh).max(1);
        PhysicalSize::new(width as u32, bounds.height)
    } else {
        let height = (sh * bw / sw).max(1);
        PhysicalSize::new(bounds.width, height as u32)
    }
}
