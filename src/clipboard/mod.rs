//! 剪贴板管理模块
//!
//! # 设计思路
//!
//! 统一管理剪贴板相关的核心能力：
//! - **快照**：`MimeSnapshot` 表达一次捕获（文本 / URL 列表 / 图片 / 空）
//! - **历史队列**：`HistoryFeed` 进程级有界队列，最新在前，变更通过通道通知
//! - **监控**：通过 `clipboard-master` 在后台线程监听系统剪贴板变化并写入队列
//! - **读写**：`arboard` 读取当前内容、把快照写回剪贴板
//!
//! # 实现思路
//!
//! - 监控线程只写队列，界面状态只在 UI 线程消费队列通知后更新。
//! - 写回剪贴板抽象为 `ClipboardSink`，测试时使用内存实现。
//! - 子模块按职责拆分：读取归 `capture`，写入归 `writer`，监听归 `listener`。

pub mod capture;
pub mod feed;
pub mod listener;
pub mod snapshot;
pub mod writer;

pub use feed::{FeedEvent, HistoryFeed};
pub use listener::start_monitoring;
pub use snapshot::{MimeKind, MimePayload, MimeSnapshot};
pub use writer::{ClipboardSink, MemoryClipboard, SystemClipboard};
