use std::thread;
use std::time::Duration;

use clipboard_master::{CallbackResult, ClipboardHandler, Master};

use super::capture::read_system_clipboard;
use super::feed::HistoryFeed;

const MONITOR_RESTART_BASE_DELAY_MS: u64 = 100;
const MONITOR_RESTART_MAX_DELAY_MS: u64 = 5_000;

fn compute_restart_backoff_ms(restart_attempt: u32) -> u64 {
    let exp = 1_u64 << restart_attempt.saturating_sub(1).min(6);
    MONITOR_RESTART_BASE_DELAY_MS
        .saturating_mul(exp)
        .min(MONITOR_RESTART_MAX_DELAY_MS)
}

/// 剪贴板事件处理器（内部实现）
///
/// 每次系统剪贴板变化时读取内容并写入历史队列；
/// 队列自身负责去重与通知，本处理器不触碰任何界面状态。
struct Handler {
    feed: &'static HistoryFeed,
}

impl ClipboardHandler for Handler {
    fn on_clipboard_change(&mut self) -> CallbackResult {
        match read_system_clipboard() {
            Ok(snapshot) => {
                let kind = snapshot.kind();
                if self.feed.add(snapshot) {
                    log::debug!("📋 捕获剪贴板变化: kind={:?}", kind);
                }
            }
            Err(err) => log::warn!("读取剪贴板失败: {}", err),
        }
        CallbackResult::Next
    }

    fn on_clipboard_error(&mut self, error: std::io::Error) -> CallbackResult {
        log::error!("剪贴板错误：{}", error);
        CallbackResult::Next
    }
}

/// 在后台线程启动剪贴板监控
///
/// 监听器退出或创建失败时按指数退避重启（100ms 起，上限 5s）。
///
/// # 参数
/// * `feed` - 接收快照的历史队列（通常为 `HistoryFeed::global()`）
pub fn start_monitoring(feed: &'static HistoryFeed) {
    thread::spawn(move || {
        let mut restart_attempt: u32 = 0;
        loop {
            match Master::new(Handler { feed }) {
                Ok(mut master) => {
                    restart_attempt = 0;
                    log::info!("📋 剪贴板监听已启动");
                    let _ = master.run();
                    log::warn!("📋 剪贴板监听已退出，将尝试重启");
                }
                Err(err) => {
                    log::error!("📋 创建剪贴板监听失败: {}", err);
                }
            }

            restart_attempt = restart_attempt.saturating_add(1);
            let backoff_ms = compute_restart_backoff_ms(restart_attempt);
            log::warn!("📋 剪贴板监听 {}ms 后重试（attempt={}）", backoff_ms, restart_attempt);
            thread::sleep(Duration::from_millis(backoff_ms));
        }
    });
}
