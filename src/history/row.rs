//! 显示行模块
//!
//! `RowBinding` 一次只绑定一个快照，且只持有 `Weak` 引用：
//! 快照被历史队列淘汰后，行不会延长它的生命周期，下一次同步时重新绑定。

use std::sync::{Arc, Weak};

use dpi::PhysicalSize;
use serde::Serialize;

use crate::clipboard::snapshot::{MimeSnapshot, fit_keep_aspect_ratio};
use crate::clipboard::writer::ClipboardSink;
use crate::error::AppError;

/// 行的稳定标识，行被复用时保持不变
pub type RowId = u64;

/// 行的渲染结果（与具体界面库无关）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RowContent {
    /// 文本；不含换行的文本允许自动折行
    Text { text: String, word_wrap: bool },
    /// 图片，按比例缩放到行尺寸内
    Image {
        source_width: u32,
        source_height: u32,
        width: u32,
        height: u32,
    },
}

#[derive(Debug)]
pub struct RowBinding {
    id: RowId,
    bound: Option<Weak<MimeSnapshot>>,
}

impl RowBinding {
    pub fn new(id: RowId) -> Self {
        Self { id, bound: None }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    /// 绑定到快照；已绑定到同一快照时不做任何修改
    ///
    /// # 返回
    /// `true` 表示绑定发生了变化
    pub fn bind(&mut self, snapshot: &Arc<MimeSnapshot>) -> bool {
        if self.is_bound_to(snapshot) {
            return false;
        }
        self.bound = Some(Arc::downgrade(snapshot));
        true
    }

    pub fn unbind(&mut self) -> bool {
        self.bound.take().is_some()
    }

    pub fn is_bound_to(&self, snapshot: &Arc<MimeSnapshot>) -> bool {
        // Weak 持有分配本身，地址在其存活期间不会被复用
        self.bound
            .as_ref()
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), Arc::as_ptr(snapshot)))
    }

    /// 当前绑定且仍存活的快照
    pub fn snapshot(&self) -> Option<Arc<MimeSnapshot>> {
        self.bound.as_ref().and_then(Weak::upgrade)
    }

    /// 渲染绑定的快照；未绑定或快照已淘汰时返回 `None`
    pub fn content(&self, bounds: PhysicalSize<u32>) -> Option<RowContent> {
        let snapshot = self.snapshot()?;
        if let Some(source) = snapshot.image_size() {
            let fitted = fit_keep_aspect_ratio(source, bounds);
            return Some(RowContent::Image {
                source_width: source.width,
                source_height: source.height,
                width: fitted.width,
                height: fitted.height,
            });
        }

        let text = snapshot.display_text()?;
        Some(RowContent::Text {
            word_wrap: !text.contains('\n'),
            text,
        })
    }

    /// 双击：把绑定的快照写回剪贴板
    ///
    /// # 返回
    /// - `Ok(true)`：已写回
    /// - `Ok(false)`：行没有可用快照（不应在同步后出现），空操作
    pub fn activate(&self, sink: &mut dyn ClipboardSink) -> Result<bool, AppError> {
        let Some(snapshot) = self.snapshot() else {
            log::warn!("⚠️ 行 {} 没有绑定快照，忽略双击（行池可能未同步）", self.id);
            return Ok(false);
        };
        if !snapshot.is_valid() {
            return Ok(false);
        }
        snapshot.copy_to_clipboard(sink)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::snapshot::MimePayload;
    use crate::clipboard::writer::MemoryClipboard;
    use image::RgbaImage;

    fn bounds() -> PhysicalSize<u32> {
        PhysicalSize::new(200, 100)
    }

    #[test]
    fn rebinding_same_snapshot_is_noop() {
        let snapshot = Arc::new(MimeSnapshot::text("a"));
        let mut row = RowBinding::new(1);
        assert!(row.bind(&snapshot));
        assert!(!row.bind(&snapshot));
        assert!(row.bind(&Arc::new(MimeSnapshot::text("a"))));
    }

    #[test]
    fn row_does_not_keep_snapshot_alive() {
        let snapshot = Arc::new(MimeSnapshot::text("short lived"));
        let mut row = RowBinding::new(1);
        row.bind(&snapshot);
        drop(snapshot);
        assert!(row.snapshot().is_none());
        assert!(row.content(bounds()).is_none());
    }

    #[test]
    fn single_line_text_wraps_multi_line_does_not() {
        let mut row = RowBinding::new(1);
        let single = Arc::new(MimeSnapshot::text("one line"));
        row.bind(&single);
        assert_eq!(
            row.content(bounds()),
            Some(RowContent::Text { text: "one line".into(), word_wrap: true })
        );

        let multi = Arc::new(MimeSnapshot::text("a\nb"));
        row.bind(&multi);
        assert_eq!(
            row.content(bounds()),
            Some(RowContent::Text { text: "a\nb".into(), word_wrap: false })
        );
    }

    #[test]
    fn empty_payload_renders_placeholder() {
        let mut row = RowBinding::new(1);
        let snapshot = Arc::new(MimeSnapshot::empty());
        row.bind(&snapshot);
        assert_eq!(
            row.content(bounds()),
            Some(RowContent::Text { text: "UnKnown".into(), word_wrap: true })
        );
    }

    #[test]
    fn image_is_fitted_to_bounds() {
        let mut row = RowBinding::new(1);
        let snapshot = Arc::new(MimeSnapshot::image(RgbaImage::new(400, 400)));
        row.bind(&snapshot);
        assert_eq!(
            row.content(bounds()),
            Some(RowContent::Image {
                source_width: 400,
                source_height: 400,
                width: 100,
                height: 100,
            })
        );
    }

    #[test]
    fn activate_writes_bound_snapshot() {
        let mut row = RowBinding::new(1);
        let snapshot = Arc::new(MimeSnapshot::text("again"));
        row.bind(&snapshot);
        let mut sink = MemoryClipboard::default();
        assert!(row.activate(&mut sink).unwrap());
        assert_eq!(sink.written, vec![MimePayload::Text("again".into())]);
    }

    #[test]
    fn activate_unbound_row_is_noop() {
        let row = RowBinding::new(1);
        let mut sink = MemoryClipboard::default();
        assert!(!row.activate(&mut sink).unwrap());
        assert!(sink.written.is_empty());
    }

    #[test]
    fn activate_empty_snapshot_is_noop() {
        let mut row = RowBinding::new(1);
        let snapshot = Arc::new(MimeSnapshot::empty());
        row.bind(&snapshot);
        let mut sink = MemoryClipboard::default();
        assert!(!row.activate(&mut sink).unwrap());
    }

    #[test]
    fn content_serializes_with_type_tag() {
        let content = RowContent::Text {
            text: "x".into(),
            word_wrap: true,
        };
        let json = serde_json::to_value(content).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["wordWrap"], true);
    }
}
