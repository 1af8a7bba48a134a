//! 停靠状态机
//!
//! # 状态
//!
//! ```text
//!            拖动松开且靠近屏幕边
//!   Free ─────────────────────────────▶ Docked(Shown)
//!    ▲                                    │  ▲
//!    │ 拖离屏幕边                 离开    │  │ 进入
//!    │                                    ▼  │
//!    └──────────────────────────── Animating{target} ◀──▶ Docked(Peeking)
//! ```
//!
//! - `Animating` 记录目标形态与补间；反向触发时从当前采样位置重新开始补间（取消而不排队）。
//! - 拖动期间忽略悬停进入 / 离开。
//! - 窗口位置由本状态机持有，界面层在每次操作或 `tick` 后读取 `position()` 应用到真实窗口。

use std::time::{Duration, Instant};

use dpi::{PhysicalPosition, PhysicalSize};

use super::animation::{PositionTween, axis_distance, scaled_duration};
use super::direction::{DockDirection, DockState, DockToken, DockVisibility};
use super::geometry::{
    MonitorArea, detect_dock_direction, find_monitor_index, nearest_monitor, resting_position,
    window_center,
};

/// 窗口边框与屏幕边的距离不超过该值时可停靠
pub const DOCK_ENABLE_DISTANCE: i32 = 5;
/// 露边状态下保留在屏幕内的像素
pub const DOCK_SHOW_DISTANCE: i32 = 3;
/// 露边 ↔ 完全显示的完整动画时长
pub const DOCK_ANIMATION_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockPhase {
    Free,
    Docked(DockVisibility),
    Animating {
        target: DockVisibility,
        tween: PositionTween,
    },
}

#[derive(Debug, Clone)]
pub struct DockController {
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
    monitors: Vec<MonitorArea>,
    direction: DockDirection,
    dock_monitor: Option<MonitorArea>,
    phase: DockPhase,
    /// 拖动锚点：指针相对窗口左上角的偏移
    drag_offset: Option<(i32, i32)>,
    pending: DockDirection,
}

impl DockController {
    pub fn new(
        position: PhysicalPosition<i32>,
        size: PhysicalSize<u32>,
        monitors: Vec<MonitorArea>,
    ) -> Self {
        Self {
            position,
            size,
            monitors,
            direction: DockDirection::None,
            dock_monitor: None,
            phase: DockPhase::Free,
            drag_offset: None,
            pending: DockDirection::None,
        }
    }

    pub fn position(&self) -> PhysicalPosition<i32> {
        self.position
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn direction(&self) -> DockDirection {
        self.direction
    }

    pub fn phase(&self) -> DockPhase {
        self.phase
    }

    pub fn dock_state(&self) -> DockState {
        DockState::new(self.direction)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, DockPhase::Animating { .. })
    }

    pub fn is_peeking(&self) -> bool {
        self.phase == DockPhase::Docked(DockVisibility::Peeking)
    }

    /// 拖动过程中最近一次计算的可停靠方向（用于界面提示）
    pub fn pending_dock(&self) -> DockDirection {
        self.pending
    }

    /// 显示器变化：停靠所在显示器消失时改用最近的显示器，并回到静止位置
    pub fn set_monitors(&mut self, monitors: Vec<MonitorArea>) {
        if monitors == self.monitors {
            return;
        }
        self.monitors = monitors;
        if !self.direction.is_edge() {
            return;
        }
        let still_present = self
            .dock_monitor
            .is_some_and(|monitor| self.monitors.contains(&monitor));
        if !still_present {
            let center = window_center(self.position, self.size);
            self.dock_monitor = nearest_monitor(center, &self.monitors);
        }
        self.settle();
    }

    /// 布局重排后窗口尺寸变化，停靠中的窗口回到对应的静止位置
    pub fn set_size(&mut self, size: PhysicalSize<u32>) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.settle();
    }

    fn settle(&mut self) {
        let visibility = match self.phase {
            DockPhase::Free => return,
            DockPhase::Docked(visibility) => visibility,
            DockPhase::Animating { target, .. } => target,
        };
        if let Some(resting) = self.resting(visibility) {
            self.position = resting;
        }
        self.phase = DockPhase::Docked(visibility);
    }

    fn resting(&self, visibility: DockVisibility) -> Option<PhysicalPosition<i32>> {
        let monitor = self.dock_monitor?;
        Some(resting_position(
            self.direction,
            visibility,
            self.position,
            self.size,
            &monitor,
            DOCK_SHOW_DISTANCE,
        ))
    }

    /// 窗口中心所在的显示器；中心已移出屏幕的停靠窗口沿用停靠时的显示器
    fn candidate_monitor(&self) -> Option<MonitorArea> {
        let center = window_center(self.position, self.size);
        match find_monitor_index(center, &self.monitors) {
            Some(index) => Some(self.monitors[index]),
            None if self.direction.is_edge() => self.dock_monitor,
            None => None,
        }
    }

    /// 当前位置可停靠的边（Top > Left > Right），没有则为 `None`
    pub fn can_dock(&self) -> DockDirection {
        match self.candidate_monitor() {
            Some(monitor) => {
                detect_dock_direction(self.position, self.size, &monitor, DOCK_ENABLE_DISTANCE)
            }
            None => DockDirection::None,
        }
    }

    pub fn on_drag_begin(&mut self, pointer: PhysicalPosition<i32>, now: Instant) {
        if let DockPhase::Animating { target, tween } = self.phase {
            self.position = tween.sample(now);
            self.phase = DockPhase::Docked(DockVisibility::Shown);
            log::debug!("拖动开始，取消进行中的停靠动画 (target={:?})", target);
        }
        self.drag_offset = Some((pointer.x - self.position.x, pointer.y - self.position.y));
        self.pending = self.can_dock();
    }

    /// 拖动中移动窗口，保持锚点偏移不变
    ///
    /// # 返回
    /// 新的窗口位置；未在拖动时返回 `None`
    pub fn on_drag_move(
        &mut self,
        pointer: PhysicalPosition<i32>,
    ) -> Option<PhysicalPosition<i32>> {
        let (dx, dy) = self.drag_offset?;
        self.position = PhysicalPosition::new(pointer.x - dx, pointer.y - dy);
        self.pending = self.can_dock();
        Some(self.position)
    }

    /// 拖动结束，提交停靠结果
    pub fn on_drag_end(&mut self, now: Instant) -> DockDirection {
        if self.drag_offset.take().is_none() {
            return self.direction;
        }

        let direction = self.can_dock();
        let monitor = self.candidate_monitor();
        let previous = self.direction;
        self.pending = direction;
        self.direction = direction;

        if direction.is_edge() {
            self.dock_monitor = monitor;
            self.animate_to(DockVisibility::Shown, now);
        } else {
            self.dock_monitor = None;
            self.phase = DockPhase::Free;
        }

        if previous != direction {
            log::info!("📌 停靠方向变化: {} -> {}", previous, direction);
        }
        direction
    }

    /// 不经拖动直接设置停靠（恢复状态时使用），停靠窗口以露边形态出现，不播放动画
    ///
    /// 取消停靠时窗口先回到完全显示的位置
    pub fn set_dock(&mut self, direction: DockDirection) {
        if !direction.is_edge() {
            if let Some(shown) = self.resting(DockVisibility::Shown) {
                self.position = shown;
            }
            self.direction = direction;
            self.dock_monitor = None;
            self.phase = DockPhase::Free;
            return;
        }

        self.direction = direction;
        let center = window_center(self.position, self.size);
        self.dock_monitor = nearest_monitor(center, &self.monitors);
        self.phase = DockPhase::Docked(DockVisibility::Peeking);
        match self.resting(DockVisibility::Peeking) {
            Some(resting) => self.position = resting,
            None => log::warn!("没有可用显示器，停靠位置保持不变"),
        }
    }

    pub fn dock_show(&mut self, now: Instant) {
        self.animate_to(DockVisibility::Shown, now);
    }

    pub fn dock_hide(&mut self, now: Instant) {
        self.animate_to(DockVisibility::Peeking, now);
    }

    fn animate_to(&mut self, target: DockVisibility, now: Instant) {
        if !self.direction.is_edge() {
            return;
        }

        let current = match self.phase {
            DockPhase::Animating { target: in_flight, .. } if in_flight == target => return,
            DockPhase::Animating { tween, .. } => tween.sample(now),
            _ => self.position,
        };
        self.position = current;

        let (Some(shown), Some(peeking)) = (
            self.resting(DockVisibility::Shown),
            self.resting(DockVisibility::Peeking),
        ) else {
            return;
        };
        let destination = match target {
            DockVisibility::Shown => shown,
            DockVisibility::Peeking => peeking,
        };

        if current == destination {
            self.phase = DockPhase::Docked(target);
            return;
        }

        let remaining = axis_distance(current, destination);
        let span = axis_distance(shown, peeking);
        let duration = scaled_duration(DOCK_ANIMATION_DURATION, remaining, span);
        log::debug!(
            "停靠动画开始: target={:?}, from=({}, {}), to=({}, {}), duration={}ms",
            target,
            current.x,
            current.y,
            destination.x,
            destination.y,
            duration.as_millis()
        );
        self.phase = DockPhase::Animating {
            target,
            tween: PositionTween::new(current, destination, now, duration),
        };
    }

    /// 指针进入窗口：停靠中则完全显示
    pub fn on_enter(&mut self, now: Instant) {
        if self.direction.is_edge() && !self.is_dragging() {
            self.dock_show(now);
        }
    }

    /// 指针离开窗口：停靠中则收回为露边
    pub fn on_leave(&mut self, now: Instant) {
        if self.direction.is_edge() && !self.is_dragging() {
            self.dock_hide(now);
        }
    }

    /// 推进动画
    ///
    /// # 返回
    /// `true` 表示窗口位置发生变化
    pub fn tick(&mut self, now: Instant) -> bool {
        let DockPhase::Animating { target, tween } = self.phase else {
            return false;
        };
        let next = tween.sample(now);
        let moved = next != self.position;
        self.position = next;
        if tween.is_finished(now) {
            self.phase = DockPhase::Docked(target);
        }
        moved
    }

    /// 持久化令牌；停靠窗口记录完全显示时的位置，保证恢复时窗口中心落在显示器内
    pub fn dock_token(&self) -> String {
        let origin = match self.phase {
            DockPhase::Free => self.position,
            _ => self.resting(DockVisibility::Shown).unwrap_or(self.position),
        };
        DockToken {
            direction: self.direction,
            origin: Some(origin),
        }
        .to_string()
    }

    /// 从令牌恢复；保存的位置已不在任何显示器内时忽略位置，只恢复方向
    pub fn load_dock_token(&mut self, raw: &str) {
        let token = DockToken::parse(raw);
        if let Some(origin) = token.origin {
            if find_monitor_index(window_center(origin, self.size), &self.monitors).is_some() {
                self.position = origin;
            } else {
                log::debug!("保存的窗口位置已不在任何显示器内，忽略: ({}, {})", origin.x, origin.y);
            }
        }
        self.drag_offset = None;
        self.set_dock(token.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> MonitorArea {
        MonitorArea::new(0, 0, 1920, 1080)
    }

    fn controller() -> DockController {
        DockController::new(
            PhysicalPosition::new(800, 300),
            PhysicalSize::new(300, 400),
            vec![screen()],
        )
    }

    fn drag(
        ctrl: &mut DockController,
        to_window_origin: PhysicalPosition<i32>,
        now: Instant,
    ) -> DockDirection {
        let grab = PhysicalPosition::new(ctrl.position().x + 100, ctrl.position().y + 50);
        ctrl.on_drag_begin(grab, now);
        ctrl.on_drag_move(PhysicalPosition::new(to_window_origin.x + 100, to_window_origin.y + 50));
        ctrl.on_drag_end(now)
    }

    #[test]
    fn drag_preserves_anchor_offset() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.on_drag_begin(PhysicalPosition::new(850, 320), now);
        let moved = ctrl.on_drag_move(PhysicalPosition::new(1000, 500));
        assert_eq!(moved, Some(PhysicalPosition::new(950, 480)));
    }

    #[test]
    fn drag_move_without_begin_is_ignored() {
        let mut ctrl = controller();
        assert_eq!(ctrl.on_drag_move(PhysicalPosition::new(10, 10)), None);
        assert_eq!(ctrl.position(), PhysicalPosition::new(800, 300));
    }

    #[test]
    fn release_near_top_docks_and_shows_flush() {
        let mut ctrl = controller();
        let now = Instant::now();
        assert_eq!(drag(&mut ctrl, PhysicalPosition::new(800, 2), now), DockDirection::Top);
        assert!(ctrl.dock_state().is_docked);
        assert!(ctrl.is_animating());

        ctrl.tick(now + Duration::from_millis(50));
        assert_eq!(ctrl.position(), PhysicalPosition::new(800, 0));
        assert_eq!(ctrl.phase(), DockPhase::Docked(DockVisibility::Shown));
    }

    #[test]
    fn release_in_the_middle_stays_free() {
        let mut ctrl = controller();
        let now = Instant::now();
        assert_eq!(drag(&mut ctrl, PhysicalPosition::new(600, 500), now), DockDirection::None);
        assert_eq!(ctrl.phase(), DockPhase::Free);
        assert_eq!(ctrl.position(), PhysicalPosition::new(600, 500));
    }

    #[test]
    fn pending_hint_tracks_drag() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.on_drag_begin(PhysicalPosition::new(900, 350), now);
        ctrl.on_drag_move(PhysicalPosition::new(1800, 350));
        assert_eq!(ctrl.pending_dock(), DockDirection::Right);
        ctrl.on_drag_move(PhysicalPosition::new(900, 350));
        assert_eq!(ctrl.pending_dock(), DockDirection::None);
        assert_eq!(ctrl.direction(), DockDirection::None);
    }

    #[test]
    fn set_dock_starts_peeking_without_animation() {
        let mut ctrl = controller();
        ctrl.set_dock(DockDirection::Left);
        assert!(ctrl.is_peeking());
        assert!(!ctrl.is_animating());
        assert_eq!(ctrl.position(), PhysicalPosition::new(-297, 300));
    }

    #[test]
    fn set_dock_none_frees_window() {
        let mut ctrl = controller();
        ctrl.set_dock(DockDirection::Right);
        ctrl.set_dock(DockDirection::None);
        assert_eq!(ctrl.phase(), DockPhase::Free);
        assert!(!ctrl.dock_state().is_docked);
        assert_eq!(ctrl.position(), PhysicalPosition::new(1620, 300));
    }

    #[test]
    fn undocking_peeking_window_brings_it_back_on_screen() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.set_dock(DockDirection::Left);
        assert_eq!(ctrl.position(), PhysicalPosition::new(-297, 300));

        ctrl.set_dock(DockDirection::None);
        assert_eq!(ctrl.phase(), DockPhase::Free);
        assert_eq!(ctrl.position(), PhysicalPosition::new(0, 300));

        ctrl.on_enter(now);
        assert!(!ctrl.is_animating());
        assert_eq!(ctrl.position(), PhysicalPosition::new(0, 300));
    }

    #[test]
    fn undocking_mid_animation_uses_shown_position() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.set_dock(DockDirection::Top);
        ctrl.on_enter(now);
        ctrl.tick(now + Duration::from_millis(50));
        ctrl.set_dock(DockDirection::None);
        assert_eq!(ctrl.position(), PhysicalPosition::new(800, 0));
        assert!(!ctrl.tick(now + Duration::from_secs(1)));
    }

    #[test]
    fn undocking_free_window_keeps_position() {
        let mut ctrl = controller();
        ctrl.set_dock(DockDirection::None);
        assert_eq!(ctrl.position(), PhysicalPosition::new(800, 300));
    }

    #[test]
    fn hover_shows_and_leave_hides() {
        let mut ctrl = controller();
        let t0 = Instant::now();
        ctrl.set_dock(DockDirection::Top);
        assert_eq!(ctrl.position().y, -397);

        ctrl.on_enter(t0);
        ctrl.tick(t0 + DOCK_ANIMATION_DURATION);
        assert_eq!(ctrl.position().y, 0);
        assert_eq!(ctrl.phase(), DockPhase::Docked(DockVisibility::Shown));

        let t1 = t0 + Duration::from_secs(1);
        ctrl.on_leave(t1);
        ctrl.tick(t1 + DOCK_ANIMATION_DURATION);
        assert_eq!(ctrl.position().y, -397);
        assert!(ctrl.is_peeking());
    }

    #[test]
    fn reverse_mid_flight_continues_from_current_position() {
        let mut ctrl = controller();
        let t0 = Instant::now();
        ctrl.set_dock(DockDirection::Top);
        ctrl.on_enter(t0);
        let mid = t0 + Duration::from_millis(100);
        ctrl.tick(mid);
        let halfway = ctrl.position();
        assert_eq!(halfway.y, -198);

        ctrl.on_leave(mid);
        assert_eq!(ctrl.position(), halfway);
        let DockPhase::Animating { target, tween } = ctrl.phase() else {
            panic!("expected reverse animation");
        };
        assert_eq!(target, DockVisibility::Peeking);
        assert_eq!(tween.from(), halfway);
        assert!(tween.duration() < DOCK_ANIMATION_DURATION);

        ctrl.tick(mid + Duration::from_millis(20));
        assert!(ctrl.position().y < halfway.y && ctrl.position().y > -397);
    }

    #[test]
    fn repeated_trigger_does_not_restart_animation() {
        let mut ctrl = controller();
        let t0 = Instant::now();
        ctrl.set_dock(DockDirection::Right);
        ctrl.on_enter(t0);
        let first = ctrl.phase();
        ctrl.on_enter(t0 + Duration::from_millis(50));
        assert_eq!(ctrl.phase(), first);
    }

    #[test]
    fn hover_is_ignored_while_dragging_or_free() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.on_enter(now);
        assert_eq!(ctrl.phase(), DockPhase::Free);

        ctrl.set_dock(DockDirection::Left);
        ctrl.on_drag_begin(PhysicalPosition::new(1, 310), now);
        ctrl.on_leave(now);
        assert!(!ctrl.is_animating());
    }

    #[test]
    fn drag_begin_cancels_hide_animation() {
        let mut ctrl = controller();
        let t0 = Instant::now();
        ctrl.set_dock(DockDirection::Top);
        ctrl.on_enter(t0);
        ctrl.tick(t0 + DOCK_ANIMATION_DURATION);
        ctrl.on_leave(t0 + Duration::from_secs(1));
        assert!(ctrl.is_animating());

        let grab_at = t0 + Duration::from_millis(1050);
        ctrl.on_drag_begin(PhysicalPosition::new(900, 5), grab_at);
        assert!(!ctrl.is_animating());
        let frozen = ctrl.position();
        assert!(frozen.y < 0 && frozen.y > -397);
        assert!(!ctrl.tick(grab_at + Duration::from_secs(1)));
        assert_eq!(ctrl.position(), frozen);
    }

    #[test]
    fn peeking_window_pressed_and_released_stays_docked() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.set_dock(DockDirection::Top);
        ctrl.on_drag_begin(PhysicalPosition::new(900, 1), now);
        assert_eq!(ctrl.on_drag_end(now), DockDirection::Top);
        ctrl.tick(now + DOCK_ANIMATION_DURATION);
        assert_eq!(ctrl.position().y, 0);
    }

    #[test]
    fn dragging_away_from_edge_undocks() {
        let mut ctrl = controller();
        let now = Instant::now();
        ctrl.set_dock(DockDirection::Left);
        ctrl.on_enter(now);
        ctrl.tick(now + DOCK_ANIMATION_DURATION);
        assert_eq!(drag(&mut ctrl, PhysicalPosition::new(400, 300), now), DockDirection::None);
        assert!(!ctrl.dock_state().is_docked);
        ctrl.on_leave(now);
        assert_eq!(ctrl.position(), PhysicalPosition::new(400, 300));
    }

    #[test]
    fn resize_while_peeking_replaces_window() {
        let mut ctrl = controller();
        ctrl.set_dock(DockDirection::Top);
        ctrl.set_size(PhysicalSize::new(300, 600));
        assert_eq!(ctrl.position().y, -597);
    }

    #[test]
    fn token_restores_direction_and_position() {
        let mut ctrl = controller();
        ctrl.set_dock(DockDirection::Right);
        let token = ctrl.dock_token();
        assert_eq!(token, "Right:1620,300");

        let mut restored = DockController::new(
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(300, 400),
            vec![screen()],
        );
        restored.load_dock_token(&token);
        assert_eq!(restored.direction(), DockDirection::Right);
        assert!(restored.is_peeking());
        assert_eq!(restored.position(), PhysicalPosition::new(1917, 300));
    }

    #[test]
    fn token_with_offscreen_origin_keeps_direction_only() {
        let mut ctrl = controller();
        ctrl.load_dock_token("Left:-9000,-9000");
        assert_eq!(ctrl.direction(), DockDirection::Left);
        assert_eq!(ctrl.position(), PhysicalPosition::new(-297, 300));
    }

    #[test]
    fn monitor_removal_moves_dock_to_remaining_monitor() {
        let second = MonitorArea::new(1920, 0, 1280, 1024);
        let mut ctrl = DockController::new(
            PhysicalPosition::new(2400, 300),
            PhysicalSize::new(300, 400),
            vec![screen(), second],
        );
        ctrl.set_dock(DockDirection::Right);
        assert_eq!(ctrl.position().x, 3200 - 3);

        ctrl.set_monitors(vec![screen()]);
        assert_eq!(ctrl.position().x, 1920 - 3);
        assert!(ctrl.is_peeking());
    }
}
