//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! "写回剪贴板"是快照唯一会修改操作系统共享状态的操作，因此抽象为 `ClipboardSink`：
//! 生产环境使用基于 `arboard` 的 `SystemClipboard`，测试与无界面环境使用 `MemoryClipboard`。
//!
//! ## 实现思路
//!
//! - 其他剪贴板工具也在监听时，写入偶发失败（剪贴板被占用），做有限次数的退避重试。
//! - URL 列表以换行拼接的文本写回。

use std::borrow::Cow;
use std::thread;
use std::time::Duration;

use super::snapshot::MimePayload;
use crate::error::AppError;

/// 写入失败时最大重试次数
const CLIPBOARD_WRITE_RETRIES: u32 = 3;
/// 首次重试前的等待（毫秒），之后按 2 倍递增
const CLIPBOARD_RETRY_BASE_DELAY_MS: u64 = 30;
/// 单次退避延迟上限（毫秒）
const CLIPBOARD_RETRY_MAX_DELAY_MS: u64 = 200;

/// 剪贴板写入端
pub trait ClipboardSink {
    fn write(&mut self, payload: &MimePayload) -> Result<(), AppError>;
}

fn compute_retry_delay_ms(attempt: u32) -> u64 {
    let exp = 1_u64 << attempt.saturating_sub(1).min(6);
    CLIPBOARD_RETRY_BASE_DELAY_MS
        .saturating_mul(exp)
        .min(CLIPBOARD_RETRY_MAX_DELAY_MS)
}

/// 系统剪贴板（arboard）
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn write_once(payload: &MimePayload) -> Result<(), arboard::Error> {
        let mut clipboard = arboard::Clipboard::new()?;
        match payload {
            MimePayload::Text(text) => clipboard.set_text(text.clone()),
            MimePayload::Urls(urls) => clipboard.set_text(urls.join("\n")),
            MimePayload::Image(image) => clipboard.set_image(arboard::ImageData {
                width: image.width() as usize,
                height: image.height() as usize,
                bytes: Cow::Borrowed(image.as_raw().as_slice()),
            }),
            // 调用方已过滤空快照
            MimePayload::Empty => Ok(()),
        }
    }
}

impl ClipboardSink for SystemClipboard {
    fn write(&mut self, payload: &MimePayload) -> Result<(), AppError> {
        let mut attempt: u32 = 0;
        loop {
            match Self::write_once(payload) {
                Ok(()) => {
                    log::debug!("📋 已写回剪贴板: kind={:?}", payload.kind());
                    return Ok(());
                }
                Err(err) if attempt < CLIPBOARD_WRITE_RETRIES => {
                    attempt += 1;
                    let delay_ms = compute_retry_delay_ms(attempt);
                    log::warn!(
                        "写入剪贴板失败，{}ms 后重试（attempt={}）: {}",
                        delay_ms,
                        attempt,
                        err
                    );
                    thread::sleep(Duration::from_millis(delay_ms));
                }
                Err(err) => {
                    log::error!("写入剪贴板失败，已放弃: {}", err);
                    return Err(AppError::Clipboard(err.to_string()));
                }
            }
        }
    }
}

/// 内存剪贴板：记录每次写入，供测试与无界面环境使用
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub written: Vec<MimePayload>,
}

impl ClipboardSink for MemoryClipboard {
    fn write(&mut self, payload: &MimePayload) -> Result<(), AppError> {
        self.written.push(payload.clone());
        Ok(())
    }
}
