//! 停靠方向与持久化令牌

use std::fmt;
use std::str::FromStr;

use dpi::PhysicalPosition;
use serde::{Deserialize, Serialize};

/// 停靠方向（不支持底边）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DockDirection {
    #[default]
    None,
    Top,
    Left,
    Right,
}

impl DockDirection {
    /// 可停靠的边，顺序即优先级
    pub const EDGES: [DockDirection; 3] =
        [DockDirection::Top, DockDirection::Left, DockDirection::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            DockDirection::None => "None",
            DockDirection::Top => "Top",
            DockDirection::Left => "Left",
            DockDirection::Right => "Right",
        }
    }

    pub fn is_edge(&self) -> bool {
        *self != DockDirection::None
    }
}

impl fmt::Display for DockDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DockDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(DockDirection::None),
            "top" | "up" => Ok(DockDirection::Top),
            "left" => Ok(DockDirection::Left),
            "right" => Ok(DockDirection::Right),
            other => Err(format!("未知的停靠方向: {other}")),
        }
    }
}

/// 停靠窗口的可见形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DockVisibility {
    /// 仅露出边缘细条
    Peeking,
    /// 完全显示
    Shown,
}

/// 对外暴露的停靠状态，`is_docked` 与 `direction != None` 恒等
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockState {
    pub direction: DockDirection,
    pub is_docked: bool,
}

impl DockState {
    pub fn new(direction: DockDirection) -> Self {
        Self {
            direction,
            is_docked: direction.is_edge(),
        }
    }
}

/// 停靠令牌：`"<方向>"` 或 `"<方向>:<x>,<y>"`
///
/// 解析是宽容的：方向无法识别时整体回退为 `None`，坐标无法识别时只丢弃坐标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DockToken {
    pub direction: DockDirection,
    pub origin: Option<PhysicalPosition<i32>>,
}

fn parse_origin(raw: &str) -> Option<PhysicalPosition<i32>> {
    let (x, y) = raw.split_once(',')?;
    Some(PhysicalPosition::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

impl DockToken {
    pub fn parse(raw: &str) -> Self {
        let (direction_part, origin_part) = match raw.split_once(':') {
            Some((direction, origin)) => (direction, Some(origin)),
            None => (raw, None),
        };

        let Ok(direction) = direction_part.parse::<DockDirection>() else {
            log::debug!("停靠令牌无法解析，回退为未停靠: {:?}", raw);
            return Self::default();
        };

        Self {
            direction,
            origin: origin_part.and_then(parse_origin),
        }
    }
}

impl fmt::Display for DockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "{}:{},{}", self.direction, origin.x, origin.y),
            None => write!(f, "{}", self.direction),
        }
    }
}
