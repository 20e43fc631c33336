//! 告警框状态
//!
//! 只负责决定"当前应显示哪个框、什么颜色"，不做任何绘制。
//! 告警框在触发后保留一段时间（默认 2 秒），期间新的告警会覆盖旧的。

use serde::Serialize;

use crate::estimator::{DrowsyLabel, FrameResult, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AlertColor {
    pub const YELLOW: AlertColor = AlertColor { r: 255, g: 255, b: 0 };
    pub const ORANGE: AlertColor = AlertColor { r: 255, g: 165, b: 0 };
    pub const RED: AlertColor = AlertColor { r: 255, g: 0, b: 0 };

    pub fn for_label(label: Option<DrowsyLabel>) -> Self {
        match label {
            Some(DrowsyLabel::Yawn) => Self::YELLOW,
            Some(DrowsyLabel::Drowsy) => Self::ORANGE,
            Some(DrowsyLabel::Sleep) | None => Self::RED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Highlight {
    pub label: DrowsyLabel,
    pub region: Rect,
    pub color: AlertColor,
    #[serde(skip)]
    shown_at: u64,
}

#[derive(Debug, Clone)]
pub struct HighlightTracker {
    hold_ms: u64,
    current: Option<Highlight>,
}

impl HighlightTracker {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            hold_ms,
            current: None,
        }
    }

    /// 用本帧结果更新，返回此刻应显示的告警框
    pub fn update(&mut self, result: &FrameResult, now: u64) -> Option<Highlight> {
        if let (Some(label), Some(region)) = (result.label, result.bounding_region) {
            self.current = Some(Highlight {
                label,
                region,
                color: AlertColor::for_label(Some(label)),
                shown_at: now,
            });
        } else {
            self.clear(false, now);
        }
        self.current
    }

    /// 超过保留时长才清除；`force` 立即清除
    pub fn clear(&mut self, force: bool, now: u64) {
        let expired = self
            .current
            .map_or(true, |h| now.saturating_sub(h.shown_at) > self.hold_ms);
        if force || expired {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<Highlight> {
        self.current
    }
}
