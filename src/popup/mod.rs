//! 弹窗编排模块
//!
//! `PopupWindow` 把历史列表同步、自动隐藏计时器与停靠状态机组合在一起，
//! 作为界面层唯一需要持有的状态对象。所有方法都在 UI 线程调用，时间由调用方注入。
//!
//! # 状态
//!
//! - `Hidden`：窗口隐藏
//! - `Visible`：窗口显示，未计时
//! - `VisibleWithAutoHideArmed`：窗口显示，无交互 1 秒后自动隐藏
//!
//! # 实现思路
//!
//! - 历史队列变更：同步行池，显示窗口；开启自动显示时开始计时。
//! - 指针按下：取消计时并开始拖动；松开：结束拖动，开启自动显示时重新计时。
//! - 展开 / 收起只切换行列表可见性并请求重新布局，不影响计时器。
//! - 计时器到期时无条件隐藏窗口。

pub mod state;
pub mod timer;

use std::sync::Arc;
use std::time::Instant;

use dpi::{PhysicalPosition, PhysicalSize};
use serde::Serialize;

use crate::clipboard::snapshot::MimeSnapshot;
use crate::clipboard::writer::ClipboardSink;
use crate::dock::{DockController, DockDirection, DockState, MonitorArea};
use crate::error::AppError;
use crate::history::{HistoryListSync, ReconcileOutcome, RowBinding, RowContent, RowId};

pub use state::PopupWindowState;
pub use timer::{AUTO_HIDE_DELAY, AutoHideTimer};

/// 行内图片的默认显示区域
pub const DEFAULT_ROW_BOUNDS: PhysicalSize<u32> = PhysicalSize {
    width: 280,
    height: 120,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupVisibility {
    Hidden,
    Visible,
    VisibleWithAutoHideArmed,
}

/// 一帧推进的结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// 停靠动画移动了窗口
    pub moved: bool,
    /// 自动隐藏计时器到期，窗口已隐藏
    pub hidden: bool,
}

/// 单行的界面数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: RowId,
    pub content: Option<RowContent>,
    /// 图片行的 PNG data URL
    pub image_url: Option<String>,
}

/// 界面层渲染所需的完整快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupView {
    pub visibility: PopupVisibility,
    pub expanded: bool,
    pub auto_show: bool,
    pub dock: DockState,
    pub pending_dock: DockDirection,
    pub peeking: bool,
    pub current: RowView,
    pub rows: Vec<RowView>,
}

#[derive(Debug)]
pub struct PopupWindow {
    visible: bool,
    expanded: bool,
    auto_show: bool,
    timer: AutoHideTimer,
    sync: HistoryListSync,
    dock: DockController,
    row_bounds: PhysicalSize<u32>,
    refit_requested: bool,
}

impl PopupWindow {
    pub fn new(
        position: PhysicalPosition<i32>,
        size: PhysicalSize<u32>,
        monitors: Vec<MonitorArea>,
    ) -> Self {
        let defaults = PopupWindowState::default();
        Self {
            visible: false,
            expanded: defaults.expanded,
            auto_show: defaults.auto_show,
            timer: AutoHideTimer::default(),
            sync: HistoryListSync::new(),
            dock: DockController::new(position, size, monitors),
            row_bounds: DEFAULT_ROW_BOUNDS,
            refit_requested: false,
        }
    }

    pub fn visibility(&self) -> PopupVisibility {
        match (self.visible, self.timer.is_armed()) {
            (false, _) => PopupVisibility::Hidden,
            (true, false) => PopupVisibility::Visible,
            (true, true) => PopupVisibility::VisibleWithAutoHideArmed,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn auto_show(&self) -> bool {
        self.auto_show
    }

    pub fn timer(&self) -> &AutoHideTimer {
        &self.timer
    }

    pub fn dock(&self) -> &DockController {
        &self.dock
    }

    pub fn dock_mut(&mut self) -> &mut DockController {
        &mut self.dock
    }

    pub fn history(&self) -> &HistoryListSync {
        &self.sync
    }

    pub fn set_row_bounds(&mut self, bounds: PhysicalSize<u32>) {
        self.row_bounds = bounds;
    }

    /// 历史队列变更
    pub fn on_feed_changed(
        &mut self,
        feed: &[Arc<MimeSnapshot>],
        now: Instant,
    ) -> ReconcileOutcome {
        let outcome = self.sync.reconcile(feed);
        if outcome.added > 0 || outcome.removed > 0 {
            self.refit_requested = true;
        }
        self.visible = true;
        if self.auto_show {
            self.timer.arm(now);
        }
        outcome
    }

    /// 窗口内任意位置按下都会取消自动隐藏；只有 `drag` 为真（按在标题栏上）时才开始拖动
    pub fn on_pointer_press(&mut self, pointer: PhysicalPosition<i32>, drag: bool, now: Instant) {
        self.timer.cancel();
        if drag {
            self.dock.on_drag_begin(pointer, now);
        }
    }

    pub fn on_pointer_move(
        &mut self,
        pointer: PhysicalPosition<i32>,
    ) -> Option<PhysicalPosition<i32>> {
        self.dock.on_drag_move(pointer)
    }

    pub fn on_pointer_release(&mut self, now: Instant) -> DockDirection {
        let direction = self.dock.on_drag_end(now);
        if self.auto_show && self.visible {
            self.timer.arm(now);
        }
        direction
    }

    pub fn on_enter(&mut self, now: Instant) {
        self.dock.on_enter(now);
    }

    pub fn on_leave(&mut self, now: Instant) {
        self.dock.on_leave(now);
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        if self.expanded != expanded {
            self.expanded = expanded;
            self.refit_requested = true;
            log::debug!("弹窗展开状态: {}", expanded);
        }
    }

    pub fn set_auto_show(&mut self, auto_show: bool, now: Instant) {
        self.auto_show = auto_show;
        if auto_show {
            if self.visible {
                self.timer.arm(now);
            }
        } else {
            self.timer.cancel();
        }
    }

    /// 托盘"显示"：显示窗口，不计时
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// 托盘"隐藏"：隐藏窗口并解除计时
    pub fn hide(&mut self) {
        self.visible = false;
        self.timer.cancel();
    }

    /// 每帧调用：推进停靠动画，检查自动隐藏
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let moved = self.dock.tick(now);
        let hidden = self.timer.poll(now);
        if hidden {
            self.visible = false;
            log::debug!("⏱️ 自动隐藏计时到期，隐藏弹窗");
        }
        TickOutcome { moved, hidden }
    }

    /// 取出并清除重新布局请求
    pub fn take_refit_request(&mut self) -> bool {
        std::mem::take(&mut self.refit_requested)
    }

    /// 布局完成后的窗口尺寸
    pub fn set_window_size(&mut self, size: PhysicalSize<u32>) {
        self.dock.set_size(size);
    }

    pub fn set_monitors(&mut self, monitors: Vec<MonitorArea>) {
        self.dock.set_monitors(monitors);
    }

    pub fn state(&self) -> PopupWindowState {
        PopupWindowState {
            expanded: self.expanded,
            auto_show: self.auto_show,
            dock: self.dock.dock_token(),
        }
    }

    pub fn load_state(&mut self, raw: &str) {
        let state = PopupWindowState::decode(raw);
        self.expanded = state.expanded;
        self.auto_show = state.auto_show;
        if !self.auto_show {
            self.timer.cancel();
        }
        self.dock.load_dock_token(&state.dock);
        self.refit_requested = true;
        log::info!("📐 已恢复弹窗状态: {}", state);
    }

    fn find_row(&self, id: RowId) -> Option<&RowBinding> {
        let current = self.sync.current();
        if current.id() == id {
            return Some(current);
        }
        self.sync.rows().find(|row| row.id() == id)
    }

    /// 行（含"当前值"）绑定的快照，供界面层在锁外写回剪贴板
    pub fn row_snapshot(&self, id: RowId) -> Option<Arc<MimeSnapshot>> {
        match self.find_row(id) {
            Some(row) => row.snapshot(),
            None => {
                log::warn!("⚠️ 行 {} 不存在，忽略双击", id);
                None
            }
        }
    }

    /// 双击行（含"当前值"），写回剪贴板
    pub fn activate_row(&self, id: RowId, sink: &mut dyn ClipboardSink) -> Result<bool, AppError> {
        match self.find_row(id) {
            Some(row) => row.activate(sink),
            None => {
                log::warn!("⚠️ 行 {} 不存在，忽略双击", id);
                Ok(false)
            }
        }
    }

    fn row_view(&self, row: &RowBinding) -> RowView {
        let image_url = row
            .snapshot()
            .and_then(|snapshot| match snapshot.png_data_url() {
                Ok(url) => url,
                Err(err) => {
                    log::warn!("行 {} 图片编码失败: {}", row.id(), err);
                    None
                }
            });
        RowView {
            id: row.id(),
            content: row.content(self.row_bounds),
            image_url,
        }
    }

    pub fn view(&self) -> PopupView {
        PopupView {
            visibility: self.visibility(),
            expanded: self.expanded,
            auto_show: self.auto_show,
            dock: self.dock.dock_state(),
            pending_dock: self.dock.pending_dock(),
            peeking: self.dock.is_peeking(),
            current: self.row_view(self.sync.current()),
            rows: self.sync.rows().map(|row| self.row_view(row)).collect(),
        }
    }
}
