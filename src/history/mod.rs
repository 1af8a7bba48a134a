//! 历史列表模块：显示行（`row`）与行池同步（`sync`）

pub mod row;
pub mod sync;

pub use row::{RowBinding, RowContent, RowId};
pub use sync::{HistoryListSync, ReconcileOutcome};
