//! 停靠动画：单属性（窗口位置）的线性补间
//!
//! 时间由调用方注入（`Instant`），事件循环按帧调用 `sample` 推进，不阻塞。

use std::time::{Duration, Instant};

use dpi::PhysicalPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionTween {
    from: PhysicalPosition<i32>,
    to: PhysicalPosition<i32>,
    started: Instant,
    duration: Duration,
}

impl PositionTween {
    pub fn new(
        from: PhysicalPosition<i32>,
        to: PhysicalPosition<i32>,
        started: Instant,
        duration: Duration,
    ) -> Self {
        Self { from, to, started, duration }
    }

    pub fn from(&self) -> PhysicalPosition<i32> {
        self.from
    }

    pub fn target(&self) -> PhysicalPosition<i32> {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// 进度 `[0, 1]`；零时长视为已完成
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn sample(&self, now: Instant) -> PhysicalPosition<i32> {
        let t = self.progress(now);
        let lerp = |a: i32, b: i32| a + ((b - a) as f64 * t).round() as i32;
        PhysicalPosition::new(lerp(self.from.x, self.to.x), lerp(self.from.y, self.to.y))
    }
}

/// 两点在主轴上的距离（停靠动画只沿一条轴移动，取较大分量）
pub fn axis_distance(a: PhysicalPosition<i32>, b: PhysicalPosition<i32>) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

/// 按剩余距离折算动画时长，保持匀速；反向打断时从当前位置继续，不会跳变
pub fn scaled_duration(full: Duration, remaining: u32, span: u32) -> Duration {
    if span == 0 || remaining >= span {
        return full;
    }
    let nanos = full.as_nanos() * u128::from(remaining) / u128::from(span);
    Duration::from_nanos(nanos as u64)
}
