use serde::{Deserialize, Serialize};

/// 归一化坐标下的单个面部关键点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 源图像像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 单帧输入；`landmarks` 为 `None` 表示本帧未检测到人脸
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub timestamp_ms: u64,
    pub image: ImageSize,
    pub landmarks: Option<Vec<Landmark>>,
}

impl FrameInput {
    pub fn face(timestamp_ms: u64, image: ImageSize, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            image,
            landmarks: Some(landmarks),
        }
    }

    pub fn no_face(timestamp_ms: u64, image: ImageSize) -> Self {
        Self {
            timestamp_ms,
            image,
            landmarks: None,
        }
    }
}

/// 疲劳状态标签
///
/// 排序即严重程度：同一帧多个类别同时触发时取最大者。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DrowsyLabel {
    Drowsy,
    Yawn,
    Sleep,
}

impl DrowsyLabel {
    /// 评估顺序
    pub const ALL: [DrowsyLabel; 3] = [DrowsyLabel::Drowsy, DrowsyLabel::Yawn, DrowsyLabel::Sleep];

    pub fn as_str(&self) -> &'static str {
        match self {
            DrowsyLabel::Drowsy => "Drowsy",
            DrowsyLabel::Yawn => "Yawn",
            DrowsyLabel::Sleep => "Sleep",
        }
    }
}

impl std::fmt::Display for DrowsyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 像素坐标下的轴对齐矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// 所有关键点的包围盒，换算到像素坐标；空集合返回 `None`
    pub fn bounding(landmarks: &[Landmark], image: ImageSize) -> Option<Self> {
        let first = landmarks.first()?;
        let init = (first.x, first.x, first.y, first.y);
        let (min_x, max_x, min_y, max_y) =
            landmarks
                .iter()
                .fold(init, |(min_x, max_x, min_y, max_y), lm| {
                    (
                        min_x.min(lm.x),
                        max_x.max(lm.x),
                        min_y.min(lm.y),
                        max_y.max(lm.y),
                    )
                });
        let w = f64::from(image.width);
        let h = f64::from(image.height);
        Some(Self {
            left: min_x * w,
            top: min_y * h,
            right: max_x * w,
            bottom: max_y * h,
        })
    }
}

/// 会话内累计事件次数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub drowsy: u32,
    pub yawn: u32,
    pub sleep: u32,
}

impl EventCounts {
    pub fn get(&self, label: DrowsyLabel) -> u32 {
        match label {
            DrowsyLabel::Drowsy => self.drowsy,
            DrowsyLabel::Yawn => self.yawn,
            DrowsyLabel::Sleep => self.sleep,
        }
    }

    pub(crate) fn increment(&mut self, label: DrowsyLabel) {
        let slot = match label {
            DrowsyLabel::Drowsy => &mut self.drowsy,
            DrowsyLabel::Yawn => &mut self.yawn,
            DrowsyLabel::Sleep => &mut self.sleep,
        };
        *slot = slot.saturating_add(1);
    }
}

/// 校准得到的三项中位数基线
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub eye: f64,
    pub mouth: f64,
    pub fb: f64,
}

/// 每帧输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    pub label: Option<DrowsyLabel>,
    pub bounding_region: Option<Rect>,
    pub counts: EventCounts,
    /// 校准中时为剩余秒数
    pub calibrating: Option<u64>,
}

impl FrameResult {
    pub(crate) fn idle(counts: EventCounts) -> Self {
        Self {
            label: None,
            bounding_region: None,
            counts,
            calibrating: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_increment_per_label() {
        let mut counts = EventCounts::default();
        counts.increment(DrowsyLabel::Yawn);
        counts.increment(DrowsyLabel::Yawn);
        counts.increment(DrowsyLabel::Sleep);
        assert_eq!(counts.get(DrowsyLabel::Drowsy), 0);
        assert_eq!(counts.get(DrowsyLabel::Yawn), 2);
        assert_eq!(counts.get(DrowsyLabel::Sleep), 1);
    }

    #[test]
    fn severity_order_puts_sleep_last() {
        assert!(DrowsyLabel::Sleep > DrowsyLabel::Yawn);
        assert!(DrowsyLabel::Yawn > DrowsyLabel::Drowsy);
        assert_eq!(DrowsyLabel::ALL.iter().max(), Some(&DrowsyLabel::Sleep));
    }

    #[test]
    fn bounding_rect_is_scaled_to_pixels() {
        let lms = vec![
            Landmark::new(0.25, 0.5),
            Landmark::new(0.75, 0.1),
            Landmark::new(0.5, 0.9),
        ];
        let rect = Rect::bounding(&lms, ImageSize::new(200, 100)).expect("non-empty");
        assert!((rect.left - 50.0).abs() < 1e-9);
        assert!((rect.right - 150.0).abs() < 1e-9);
        assert!((rect.top - 10.0).abs() < 1e-9);
        assert!((rect.bottom - 90.0).abs() < 1e-9);
        assert!(Rect::bounding(&[], ImageSize::new(1, 1)).is_none());
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = FrameResult {
            label: Some(DrowsyLabel::Yawn),
            bounding_region: None,
            counts: EventCounts {
                drowsy: 0,
                yawn: 1,
                sleep: 0,
            },
            calibrating: None,
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["label"], "Yawn");
        assert_eq!(json["counts"]["yawn"], 1);
        assert!(json.get("boundingRegion").is_some());
    }
}
