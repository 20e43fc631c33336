//! 基线校准
//!
//! 人脸出现的上升沿开启一个固定时长的采样窗口，窗口内收集三项指标，
//! 窗口结束后各取中位数作为基线。若某项缓冲区为空，保持校准状态并在
//! 后续每帧重新检查（窗口计时不重启），直到三项基线全部就绪。

use crate::estimator::features::FrameFeatures;
use crate::estimator::types::Baseline;

/// 升序排序后取下标 ⌊n/2⌋ 的元素（偶数长度取上中位数）
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    /// 尚未见到人脸，或人脸已丢失
    Idle,
    Calibrating { started_at: u64 },
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStatus {
    Calibrating { seconds_remaining: u64 },
    Ready(Baseline),
}

#[derive(Debug, Clone, Default)]
struct MetricBuffer {
    samples: Vec<f64>,
    median: Option<f64>,
}

impl MetricBuffer {
    fn push(&mut self, value: f64) {
        self.samples.push(value);
    }

    /// 已有基线时不再重算
    fn settle(&mut self) {
        if self.median.is_none() {
            self.median = median(&self.samples);
        }
    }

    fn clear(&mut self) {
        self.samples.clear();
        self.median = None;
    }
}

#[derive(Debug, Clone)]
pub struct Calibrator {
    window_ms: u64,
    phase: CalibrationPhase,
    fb: MetricBuffer,
    mouth: MetricBuffer,
    eye: MetricBuffer,
}

impl Calibrator {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            phase: CalibrationPhase::Idle,
            fb: MetricBuffer::default(),
            mouth: MetricBuffer::default(),
            eye: MetricBuffer::default(),
        }
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.phase
    }

    /// 人脸出现的上升沿：清空缓冲区与基线，从 `now` 开始新窗口
    pub fn begin(&mut self, now: u64) {
        self.clear_buffers();
        self.phase = CalibrationPhase::Calibrating { started_at: now };
    }

    /// 回到空闲状态，丢弃缓冲区与基线
    pub fn clear(&mut self) {
        self.clear_buffers();
        self.phase = CalibrationPhase::Idle;
    }

    pub fn baseline(&self) -> Option<Baseline> {
        Some(Baseline {
            eye: self.eye.median?,
            mouth: self.mouth.median?,
            fb: self.fb.median?,
        })
    }

    /// 喂入一帧特征
    ///
    /// 空闲状态下调用等同于在 `now` 处遇到上升沿。
    pub fn observe(&mut self, features: &FrameFeatures, now: u64) -> CalibrationStatus {
        let started_at = match self.phase {
            CalibrationPhase::Active => {
                if let Some(baseline) = self.baseline() {
                    return CalibrationStatus::Ready(baseline);
                }
                // 基线缺失的 Active 不应出现，按新会话处理
                self.begin(now);
                now
            }
            CalibrationPhase::Idle => {
                self.begin(now);
                now
            }
            CalibrationPhase::Calibrating { started_at } => started_at,
        };

        let elapsed = now.saturating_sub(started_at);
        if elapsed < self.window_ms {
            self.fb.push(features.fb_dist);
            self.mouth.push(features.mouth_ratio);
            self.eye.push(features.eye_ratio);
            let seconds_remaining = (self.window_ms / 1000).saturating_sub(elapsed / 1000);
            return CalibrationStatus::Calibrating { seconds_remaining };
        }

        self.fb.settle();
        self.mouth.settle();
        self.eye.settle();

        match self.baseline() {
            Some(baseline) => {
                self.phase = CalibrationPhase::Active;
                tracing::debug!(
                    eye = baseline.eye,
                    mouth = baseline.mouth,
                    fb = baseline.fb,
                    samples = self.eye.samples.len(),
                    "Calibration complete"
                );
                CalibrationStatus::Ready(baseline)
            }
            None => CalibrationStatus::Calibrating {
                seconds_remaining: 0,
            },
        }
    }

    fn clear_buffers(&mut self) {
        self.fb.clear();
        self.mouth.clear();
        self.eye.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(eye: f64, mouth: f64, fb: f64) -> FrameFeatures {
        FrameFeatures {
            eye_ratio: eye,
            mouth_ratio: mouth,
            fb_dist: fb,
            head_angle_deg: 90.0,
        }
    }

    #[test]
    fn median_takes_index_half_len() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[2.0, 1.0]), Some(2.0));
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 2.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn countdown_then_ready() {
        let mut cal = Calibrator::new(5000);
        cal.begin(1000);

        assert_eq!(
            cal.observe(&sample(10.0, 5.0, 20.0), 1000),
            CalibrationStatus::Calibrating {
                seconds_remaining: 5
            }
        );
        assert_eq!(
            cal.observe(&sample(12.0, 4.0, 22.0), 3500),
            CalibrationStatus::Calibrating {
                seconds_remaining: 3
            }
        );
        assert_eq!(
            cal.observe(&sample(8.0, 6.0, 18.0), 5999),
            CalibrationStatus::Calibrating {
                seconds_remaining: 1
            }
        );

        // 窗口结束帧不计入样本
        let status = cal.observe(&sample(100.0, 100.0, 100.0), 6000);
        let expected = Baseline {
            eye: 10.0,
            mouth: 5.0,
            fb: 20.0,
        };
        assert_eq!(status, CalibrationStatus::Ready(expected));
        assert_eq!(cal.phase(), CalibrationPhase::Active);

        // 基线一旦确定不再变化
        assert_eq!(
            cal.observe(&sample(1.0, 1.0, 1.0), 9000),
            CalibrationStatus::Ready(expected)
        );
    }

    #[test]
    fn empty_window_extends_calibration() {
        let mut cal = Calibrator::new(0);
        cal.begin(0);

        for now in [0, 10, 5000] {
            assert_eq!(
                cal.observe(&sample(10.0, 5.0, 20.0), now),
                CalibrationStatus::Calibrating {
                    seconds_remaining: 0
                }
            );
        }
        assert!(cal.baseline().is_none());
        assert_eq!(cal.phase(), CalibrationPhase::Calibrating { started_at: 0 });
    }

    #[test]
    fn begin_discards_previous_baseline() {
        let mut cal = Calibrator::new(100);
        cal.begin(0);
        cal.observe(&sample(10.0, 5.0, 20.0), 0);
        assert!(matches!(
            cal.observe(&sample(10.0, 5.0, 20.0), 100),
            CalibrationStatus::Ready(_)
        ));

        cal.begin(500);
        assert!(cal.baseline().is_none());
        assert_eq!(cal.phase(), CalibrationPhase::Calibrating { started_at: 500 });

        cal.clear();
        assert_eq!(cal.phase(), CalibrationPhase::Idle);
    }
}
