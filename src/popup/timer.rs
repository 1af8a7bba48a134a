//! 自动隐藏计时器（单次触发）
//!
//! 不持有线程或定时器句柄，只记录截止时间；事件循环每帧调用 `poll` 检查是否到期。

use std::time::{Duration, Instant};

/// 无交互后自动隐藏的延迟
pub const AUTO_HIDE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoHideTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for AutoHideTimer {
    fn default() -> Self {
        Self::new(AUTO_HIDE_DELAY)
    }
}

impl AutoHideTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    /// 从 `now` 开始计时；已在计时则重新开始
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 到期时返回 `true` 并解除计时，每次计时最多触发一次
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
