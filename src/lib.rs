//! # 剪贴板提醒弹窗：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            前端 (ui/index.html, withGlobalTauri)          │
//! │   指针 / 悬停 / 双击 / 开关 ──invoke──▶   ◀──popup://view   │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>)      [feature = "desktop"]
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  desktop ──── 托管状态 · 命令 · 泵线程 · 帧定时器           │
//! │     │                                                    │
//! │  popup ────── PopupWindow：行池 + 自动隐藏 + 停靠          │
//! │     ├─ history   RowBinding · HistoryListSync            │
//! │     └─ dock      DockController · 几何 · 补间             │
//! │                                                          │
//! │  clipboard ── MimeSnapshot · HistoryFeed (全局, mpsc)     │
//! │     ├─ capture / listener   读取 + 监听 (arboard, clipboard-master) │
//! │     └─ writer               写回 (ClipboardSink)          │
//! │                                                          │
//! │  settings ─── settings.json     error ─── AppError        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`clipboard`] | 剪贴板快照、全局历史队列、系统剪贴板读取 / 监听 / 写回 |
//! | [`history`] | 显示行绑定与行池同步 |
//! | [`dock`] | 屏幕边停靠状态机、几何计算、停靠动画 |
//! | [`popup`] | 弹窗编排、自动隐藏计时器、持久化状态 |
//! | [`settings`] | `settings.json` 读写 |
//! | `desktop` | Tauri 外壳（`desktop` feature） |
//!
//! 核心模块不依赖任何窗口系统，时间以 `Instant` 注入，可在无界面环境下测试。

pub mod error;
pub mod clipboard;
pub mod history;
pub mod dock;
pub mod popup;
pub mod settings;

#[cfg(feature = "desktop")]
pub mod desktop;
