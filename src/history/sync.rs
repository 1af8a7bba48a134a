//! 历史列表同步模块
//!
//! # 设计思路
//!
//! 历史队列每次变更后，显示行池与 `feed.len() - 1` 保持一一对应
//! （下标 0 的最新快照单独显示为"当前值"，不进入行池）。
//! 行按位置复用而不是按快照身份重建：行池是一个按下标寻址的 `VecDeque<RowBinding>`，
//! 每行带稳定的 `RowId`，便于界面层保留控件与动画。
//!
//! # 实现思路
//!
//! 1. `feed[0]` 绑定到"当前值"显示；空队列时解绑。
//! 2. 行池不足时在尾部追加新行。
//! 3. 行池过多时从**头部**移除（最靠前的显示位置），剩余行继续显示依次更旧的记录。
//! 4. 第 `i` 行重新绑定到 `feed[i + 1]`。
//!
//! 已绑定到同一快照的行不会被修改，因此对同一队列重复同步不会产生任何变更。

use std::collections::VecDeque;
use std::sync::Arc;

use super::row::{RowBinding, RowId};
use crate::clipboard::snapshot::MimeSnapshot;
use crate::clipboard::writer::ClipboardSink;
use crate::error::AppError;

/// 一次同步的变更统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub removed: usize,
    pub rebound: usize,
    pub current_changed: bool,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        *self == ReconcileOutcome::default()
    }
}

#[derive(Debug)]
pub struct HistoryListSync {
    current: RowBinding,
    rows: VecDeque<RowBinding>,
    next_row_id: RowId,
}

impl Default for HistoryListSync {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryListSync {
    pub fn new() -> Self {
        Self {
            current: RowBinding::new(0),
            rows: VecDeque::new(),
            next_row_id: 1,
        }
    }

    /// 同步行池与历史队列
    pub fn reconcile(&mut self, feed: &[Arc<MimeSnapshot>]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        outcome.current_changed = match feed.first() {
            Some(newest) => self.current.bind(newest),
            None => self.current.unbind(),
        };

        let target = feed.len().saturating_sub(1);

        while self.rows.len() < target {
            self.rows.push_back(RowBinding::new(self.next_row_id));
            self.next_row_id += 1;
            outcome.added += 1;
        }

        while self.rows.len() > target {
            self.rows.pop_front();
            outcome.removed += 1;
        }

        for (row, snapshot) in self.rows.iter_mut().zip(feed.iter().skip(1)) {
            if row.bind(snapshot) {
                outcome.rebound += 1;
            }
        }

        if !outcome.is_noop() {
            log::debug!(
                "🔄 历史列表同步: rows={}, added={}, removed={}, rebound={}, current_changed={}",
                self.rows.len(),
                outcome.added,
                outcome.removed,
                outcome.rebound,
                outcome.current_changed
            );
        }
        outcome
    }

    pub fn current(&self) -> &RowBinding {
        &self.current
    }

    pub fn rows(&self) -> impl Iterator<Item = &RowBinding> {
        self.rows.iter()
    }

    pub fn row(&self, index: usize) -> Option<&RowBinding> {
        self.rows.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 双击第 `index` 行
    pub fn activate_row(
        &self,
        index: usize,
        sink: &mut dyn ClipboardSink,
    ) -> Result<bool, AppError> {
        match self.rows.get(index) {
            Some(row) => row.activate(sink),
            None => {
                log::warn!("⚠️ 双击的行 {} 不存在（共 {} 行），忽略", index, self.rows.len());
                Ok(false)
            }
        }
    }
}
