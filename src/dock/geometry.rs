//! 停靠几何模块
//!
//! 该模块实现停靠相关的纯几何算法：
//! 1) 判断窗口属于哪块显示器；
//! 2) 判断窗口边框是否进入某条屏幕边的停靠距离；
//! 3) 计算停靠后"完全显示"与"露边"两种静止位置。
//!
//! 窗口中心不在任何显示器内时由调用方决定回退（见 `DockController::can_dock`）。
//!
//! # 设计思路
//!
//! - 不依赖任何窗口系统类型，输入为位置、尺寸与显示器矩形，输出唯一结果，便于单元测试。
//! - 显示器归属采用左闭右开区间，保证相邻显示器交界处不会重复命中。
//! - 停靠边只比较窗口边框到显示器同侧边的距离；边框越过屏幕边时距离为负，同样满足条件。

use dpi::{PhysicalPosition, PhysicalSize};

use super::direction::{DockDirection, DockVisibility};

/// 显示器矩形（全局坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorArea {
    pub position: PhysicalPosition<i32>,
    pub size: PhysicalSize<u32>,
}

impl MonitorArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            position: PhysicalPosition::new(x, y),
            size: PhysicalSize::new(width, height),
        }
    }

    pub fn left(&self) -> i32 {
        self.position.x
    }

    pub fn top(&self) -> i32 {
        self.position.y
    }

    pub fn right(&self) -> i32 {
        self.position.x + self.size.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.position.y + self.size.height as i32
    }

    /// 左闭右开区间 `[left, right)` × `[top, bottom)`
    pub fn contains(&self, point: PhysicalPosition<i32>) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// 点到矩形的平方距离（在矩形内为 0）
    fn distance_sq(&self, point: PhysicalPosition<i32>) -> i64 {
        let dx: i64 = if point.x < self.left() {
            (self.left() - point.x).into()
        } else if point.x >= self.right() {
            (point.x - self.right() + 1).into()
        } else {
            0
        };
        let dy: i64 = if point.y < self.top() {
            (self.top() - point.y).into()
        } else if point.y >= self.bottom() {
            (point.y - self.bottom() + 1).into()
        } else {
            0
        };
        dx * dx + dy * dy
    }
}

/// 窗口中心点
pub fn window_center(
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    PhysicalPosition::new(
        position.x + size.width as i32 / 2,
        position.y + size.height as i32 / 2,
    )
}

/// 查找包含指定点的显示器下标，均未命中时返回 `None`
pub fn find_monitor_index(point: PhysicalPosition<i32>, monitors: &[MonitorArea]) -> Option<usize> {
    monitors.iter().position(|monitor| monitor.contains(point))
}

/// 包含指定点的显示器；未命中时取距离最近的显示器，列表为空时返回 `None`
pub fn nearest_monitor(
    point: PhysicalPosition<i32>,
    monitors: &[MonitorArea],
) -> Option<MonitorArea> {
    if let Some(index) = find_monitor_index(point, monitors) {
        return Some(monitors[index]);
    }
    monitors
        .iter()
        .min_by_key(|monitor| monitor.distance_sq(point))
        .copied()
}

/// 判断窗口在给定显示器内可停靠的边
///
/// 优先级 Top > Left > Right；没有边满足条件时返回 `DockDirection::None`。
pub fn detect_dock_direction(
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
    monitor: &MonitorArea,
    threshold: i32,
) -> DockDirection {
    let window_right = position.x + size.width as i32;

    DockDirection::EDGES
        .into_iter()
        .find(|edge| {
            let distance = match edge {
                DockDirection::Top => position.y - monitor.top(),
                DockDirection::Left => position.x - monitor.left(),
                DockDirection::Right => monitor.right() - window_right,
                DockDirection::None => return false,
            };
            distance <= threshold
        })
        .unwrap_or(DockDirection::None)
}

/// 在显示器跨度内收敛一条轴上的窗口起点；窗口比显示器大时贴齐起始边
fn clamp_axis(value: i32, window_len: u32, monitor_start: i32, monitor_len: u32) -> i32 {
    let max = monitor_start + (monitor_len as i32 - window_len as i32).max(0);
    value.clamp(monitor_start, max)
}

/// 停靠后的静止位置
///
/// | 方向 | 完全显示 | 露边 |
/// |---|---|---|
/// | Top | `y = top` | `y = top - h + show` |
/// | Left | `x = left` | `x = left - w + show` |
/// | Right | `x = right - w` | `x = right - show` |
///
/// 另一条轴收敛在显示器范围内。`DockDirection::None` 原样返回当前位置。
pub fn resting_position(
    direction: DockDirection,
    visibility: DockVisibility,
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
    monitor: &MonitorArea,
    show_distance: i32,
) -> PhysicalPosition<i32> {
    let w = size.width as i32;
    let h = size.height as i32;
    let shown = visibility == DockVisibility::Shown;

    match direction {
        DockDirection::None => position,
        DockDirection::Top => PhysicalPosition::new(
            clamp_axis(position.x, size.width, monitor.left(), monitor.size.width),
            if shown { monitor.top() } else { monitor.top() - h + show_distance },
        ),
        DockDirection::Left => PhysicalPosition::new(
            if shown { monitor.left() } else { monitor.left() - w + show_distance },
            clamp_axis(position.y, size.height, monitor.top(), monitor.size.height),
        ),
        DockDirection::Right => PhysicalPosition::new(
            if shown { monitor.right() - w } else { monitor.right() - show_distance },
            clamp_axis(position.y, size.height, monitor.top(), monitor.size.height),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> MonitorArea {
        MonitorArea::new(0, 0, 1920, 1080)
    }

    fn window() -> PhysicalSize<u32> {
        PhysicalSize::new(300, 400)
    }

    #[test]
    fn monitor_bounds_are_half_open() {
        let monitor = screen();
        assert!(monitor.contains(PhysicalPosition::new(0, 0)));
        assert!(monitor.contains(PhysicalPosition::new(1919, 1079)));
        assert!(!monitor.contains(PhysicalPosition::new(1920, 500)));
        assert!(!monitor.contains(PhysicalPosition::new(500, -1)));
    }

    #[test]
    fn find_monitor_on_shared_border_picks_right_neighbour() {
        let monitors = [screen(), MonitorArea::new(1920, 0, 1280, 1024)];
        assert_eq!(find_monitor_index(PhysicalPosition::new(1920, 10), &monitors), Some(1));
        assert_eq!(find_monitor_index(PhysicalPosition::new(1919, 10), &monitors), Some(0));
        assert_eq!(find_monitor_index(PhysicalPosition::new(-5, 10), &monitors), None);
    }

    #[test]
    fn nearest_monitor_falls_back_by_distance() {
        let monitors = [screen(), MonitorArea::new(1920, 0, 1280, 1024)];
        let above_second = PhysicalPosition::new(2500, -150);
        assert_eq!(nearest_monitor(above_second, &monitors), Some(monitors[1]));
        assert_eq!(nearest_monitor(above_second, &[]), None);
    }

    #[test]
    fn top_edge_within_threshold() {
        let dir = detect_dock_direction(PhysicalPosition::new(500, 5), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::Top);
        let dir = detect_dock_direction(PhysicalPosition::new(500, 6), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::None);
    }

    #[test]
    fn window_pushed_past_edge_still_docks() {
        let dir = detect_dock_direction(PhysicalPosition::new(-40, 300), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::Left);
    }

    #[test]
    fn right_edge_uses_window_right_border() {
        let dir = detect_dock_direction(PhysicalPosition::new(1615, 300), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::Right);
        let dir = detect_dock_direction(PhysicalPosition::new(1614, 300), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::None);
    }

    #[test]
    fn corner_prefers_top_then_left() {
        let dir = detect_dock_direction(PhysicalPosition::new(2, 2), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::Top);
        let dir = detect_dock_direction(PhysicalPosition::new(1620, 0), window(), &screen(), 5);
        assert_eq!(dir, DockDirection::Top);
    }

    #[test]
    fn resting_positions_per_edge() {
        let at = PhysicalPosition::new(700, 200);
        let m = screen();
        let size = window();

        let rest = |direction, visibility| resting_position(direction, visibility, at, size, &m, 3);

        assert_eq!(rest(DockDirection::Top, DockVisibility::Shown), PhysicalPosition::new(700, 0));
        assert_eq!(
            rest(DockDirection::Top, DockVisibility::Peeking),
            PhysicalPosition::new(700, -397)
        );
        assert_eq!(rest(DockDirection::Left, DockVisibility::Shown), PhysicalPosition::new(0, 200));
        assert_eq!(
            rest(DockDirection::Left, DockVisibility::Peeking),
            PhysicalPosition::new(-297, 200)
        );
        assert_eq!(
            rest(DockDirection::Right, DockVisibility::Shown),
            PhysicalPosition::new(1620, 200)
        );
        assert_eq!(
            rest(DockDirection::Right, DockVisibility::Peeking),
            PhysicalPosition::new(1917, 200)
        );
        assert_eq!(rest(DockDirection::None, DockVisibility::Shown), at);
    }

    #[test]
    fn resting_position_clamps_free_axis() {
        let m = screen();
        let docked = resting_position(
            DockDirection::Left,
            DockVisibility::Shown,
            PhysicalPosition::new(-10, 900),
            window(),
            &m,
            3,
        );
        assert_eq!(docked, PhysicalPosition::new(0, 680));
    }
}
