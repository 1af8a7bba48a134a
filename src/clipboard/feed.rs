//! 历史队列模块
//!
//! # 设计思路
//!
//! `HistoryFeed` 是进程级共享的有界队列（最新在前），由后台剪贴板监听线程写入、
//! UI 线程读取。它是核心里唯一跨线程共享的对象，因此：
//! - 内部状态放在 `Mutex` 中，锁中毒时继续使用恢复数据；
//! - 变更通知通过 `mpsc` 通道投递（消息传递），UI 侧在自己的线程消费，
//!   不在写入线程上直接触碰任何界面状态。
//!
//! # 实现思路
//!
//! - 连续重复内容（与队首相同）不入队、不通知。
//! - 空快照不入队。
//! - 超出容量时从队尾淘汰最旧的快照；每次变更（新增 / 淘汰）恰好发送一次事件。
//! - 订阅者断开后在下次发送时自动移除。

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;

use super::snapshot::MimeSnapshot;

/// 默认容量
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
/// 容量下限
pub const MIN_HISTORY_CAPACITY: usize = 1;
/// 容量上限
pub const MAX_HISTORY_CAPACITY: usize = 50;

static GLOBAL_FEED: Lazy<HistoryFeed> =
    Lazy::new(|| HistoryFeed::new(DEFAULT_HISTORY_CAPACITY));

/// 队列变更事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// 新快照入队，`evicted` 为因超出容量被淘汰的数量
    Added { len: usize, evicted: usize },
    /// 容量调小导致淘汰
    Trimmed { len: usize, evicted: usize },
}

#[derive(Debug)]
struct FeedInner {
    entries: VecDeque<Arc<MimeSnapshot>>,
    capacity: usize,
    subscribers: Vec<Sender<FeedEvent>>,
}

impl FeedInner {
    fn evict_overflow(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
            evicted += 1;
        }
        evicted
    }

    fn publish(&mut self, event: FeedEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

/// 有界剪贴板历史（最新在前）
#[derive(Debug)]
pub struct HistoryFeed {
    inner: Mutex<FeedInner>,
}

pub fn normalize_history_capacity(capacity: usize) -> usize {
    capacity.clamp(MIN_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY)
}

impl HistoryFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FeedInner {
                entries: VecDeque::new(),
                capacity: normalize_history_capacity(capacity),
                subscribers: Vec::new(),
            }),
        }
    }

    /// 进程级单例
    pub fn global() -> &'static HistoryFeed {
        &GLOBAL_FEED
    }

    fn lock_inner(&self) -> MutexGuard<'_, FeedInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("历史队列锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    /// 新快照入队
    ///
    /// # 返回
    /// `true` 表示队列发生变更并已通知订阅者；重复或空快照返回 `false`。
    pub fn add(&self, snapshot: MimeSnapshot) -> bool {
        if !snapshot.is_valid() {
            log::debug!("⏭️  空快照不入队");
            return false;
        }

        let mut inner = self.lock_inner();
        if inner
            .entries
            .front()
            .is_some_and(|newest| newest.same_content(&snapshot))
        {
            log::debug!("⏭️  与最新记录相同，跳过");
            return false;
        }

        inner.entries.push_front(Arc::new(snapshot));
        let evicted = inner.evict_overflow();
        let len = inner.entries.len();
        log::debug!("📋 历史队列新增快照: len={}, evicted={}", len, evicted);
        inner.publish(FeedEvent::Added { len, evicted });
        true
    }

    /// 当前快照列表（下标 0 为最新）
    pub fn data_list(&self) -> Vec<Arc<MimeSnapshot>> {
        self.lock_inner().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_inner().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock_inner().capacity
    }

    /// 调整容量（限制在 `[MIN_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY]`），必要时淘汰最旧快照
    pub fn set_capacity(&self, capacity: usize) -> usize {
        let normalized = normalize_history_capacity(capacity);
        let mut inner = self.lock_inner();
        inner.capacity = normalized;
        let evicted = inner.evict_overflow();
        if evicted > 0 {
            let len = inner.entries.len();
            log::debug!("📋 历史队列容量调整为 {}，淘汰 {} 条", normalized, evicted);
            inner.publish(FeedEvent::Trimmed { len, evicted });
        }
        normalized
    }

    /// 订阅变更通知
    pub fn subscribe(&self) -> Receiver<FeedEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock_inner().subscribers.push(tx);
        rx
    }
}
