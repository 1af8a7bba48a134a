//! 弹窗持久化状态
//!
//! 编码格式 `"<0|1>/<0|1>/<停靠令牌>"`：展开、自动显示、停靠令牌。
//! 停靠令牌保留第二个 `/` 之后的全部内容，保证格式正确的字符串解码再编码后不变。

use std::fmt;

use serde::Serialize;

use crate::dock::DockDirection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupWindowState {
    pub expanded: bool,
    pub auto_show: bool,
    pub dock: String,
}

impl Default for PopupWindowState {
    fn default() -> Self {
        Self {
            expanded: false,
            auto_show: true,
            dock: DockDirection::None.to_string(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

impl PopupWindowState {
    /// 解码；空串、字段不足 3 个或标志位不是 `0`/`1` 时整体回退为默认值
    pub fn decode(raw: &str) -> Self {
        let mut fields = raw.splitn(3, '/');
        let (Some(expanded), Some(auto_show), Some(dock)) =
            (fields.next(), fields.next(), fields.next())
        else {
            if !raw.is_empty() {
                log::debug!("弹窗状态字段不足，使用默认值: {:?}", raw);
            }
            return Self::default();
        };

        match (parse_flag(expanded), parse_flag(auto_show)) {
            (Some(expanded), Some(auto_show)) => Self {
                expanded,
                auto_show,
                dock: dock.to_string(),
            },
            _ => {
                log::debug!("弹窗状态标志位无效，使用默认值: {:?}", raw);
                Self::default()
            }
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PopupWindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            u8::from(self.expanded),
            u8::from(self.auto_show),
            self.dock
        )
    }
}
