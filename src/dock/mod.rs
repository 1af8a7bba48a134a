//! 窗口停靠模块
//!
//! 该模块负责以下核心能力：
//! - 拖动窗口到屏幕上 / 左 / 右边附近松开时停靠到该边
//! - 停靠后平时只露出边缘细条，指针进入时滑出完全显示，离开时滑回
//! - 停靠状态以令牌形式持久化，下次启动恢复
//!
//! # 设计思路
//!
//! 1. **纯逻辑与窗口系统分离**：本模块只处理位置、尺寸、显示器矩形与时间，
//!    坐标统一使用 `dpi::PhysicalPosition`（与 Tauri 相同的物理像素语义），
//!    界面层负责把计算结果应用到真实窗口。
//! 2. **显式状态机**：`DockController` 以 `DockPhase` 表达"自由 / 停靠 / 动画中"，
//!    动画打断、拖动取消等时序问题都在状态迁移里处理。
//!
//! # 实现思路
//!
//! - `direction`：停靠方向、对外状态与持久化令牌。
//! - `geometry`：显示器归属、停靠边判定、静止位置计算。
//! - `animation`：线性位置补间与按剩余距离折算时长。
//! - `controller`：拖动 / 悬停 / 动画帧驱动的状态机。
//!
//! # 坐标系统说明
//!
//! 左上角为原点，Y 轴向下增大；露边时窗口大部分位于显示器之外，坐标可以为负。

pub mod animation;
pub mod controller;
pub mod direction;
pub mod geometry;

pub use controller::{
    DOCK_ANIMATION_DURATION, DOCK_ENABLE_DISTANCE, DOCK_SHOW_DISTANCE, DockController, DockPhase,
};
pub use direction::{DockDirection, DockState, DockToken, DockVisibility};
pub use geometry::MonitorArea;
