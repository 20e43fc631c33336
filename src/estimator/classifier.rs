//! 疲劳状态判定
//!
//! 三个类别各自维护一个去抖计时器，按 Drowsy → Yawn → Sleep 顺序评估：
//! - Drowsy：闭眼且头部未倾斜，持续 1.5 秒
//! - Yawn：嘴部比值低于基线一半，持续 1.5 秒
//! - Sleep：闭眼且头部倾斜，或头部前后倾过大，持续 2.5 秒
//!
//! 同一帧多个类别触发时，计数器都会增加，输出标签取最严重者。

use serde::Serialize;

use crate::config::EstimatorConfig;
use crate::estimator::features::FrameFeatures;
use crate::estimator::hysteresis::HysteresisTimer;
use crate::estimator::types::{Baseline, DrowsyLabel, EventCounts};

/// 单帧布尔判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicates {
    pub eye_closed: bool,
    /// 注意：比值低于阈值即视为张嘴，与直觉相反
    pub mouth_open: bool,
    pub head_tilt: bool,
    pub fb_tilt: bool,
}

impl Predicates {
    pub fn evaluate(features: &FrameFeatures, baseline: &Baseline, cfg: &EstimatorConfig) -> Self {
        let fb = features.fb_dist;
        Self {
            eye_closed: features.eye_ratio < baseline.eye * cfg.eye_closed_factor,
            mouth_open: features.mouth_ratio < baseline.mouth * cfg.mouth_open_factor,
            head_tilt: features.head_angle_deg < cfg.head_tilt_min_deg
                || features.head_angle_deg > cfg.head_tilt_max_deg,
            fb_tilt: fb < baseline.fb * cfg.fb_tilt_lower_factor
                || fb > baseline.fb * cfg.fb_tilt_upper_factor,
        }
    }

    /// 各类别的触发条件
    pub fn triggers(&self, label: DrowsyLabel) -> bool {
        match label {
            DrowsyLabel::Drowsy => self.eye_closed && !self.head_tilt,
            DrowsyLabel::Yawn => self.mouth_open,
            DrowsyLabel::Sleep => (self.eye_closed && self.head_tilt) || self.fb_tilt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    drowsy: HysteresisTimer,
    yawn: HysteresisTimer,
    sleep: HysteresisTimer,
}

impl Classifier {
    pub fn new(cfg: &EstimatorConfig) -> Self {
        Self {
            drowsy: HysteresisTimer::new(cfg.drowsy_threshold_ms),
            yawn: HysteresisTimer::new(cfg.yawn_threshold_ms),
            sleep: HysteresisTimer::new(cfg.sleep_threshold_ms),
        }
    }

    fn timer_mut(&mut self, label: DrowsyLabel) -> &mut HysteresisTimer {
        match label {
            DrowsyLabel::Drowsy => &mut self.drowsy,
            DrowsyLabel::Yawn => &mut self.yawn,
            DrowsyLabel::Sleep => &mut self.sleep,
        }
    }

    /// 推进所有计时器，更新计数，返回本帧最严重的触发标签
    pub fn step(
        &mut self,
        predicates: &Predicates,
        now: u64,
        counts: &mut EventCounts,
    ) -> Option<DrowsyLabel> {
        let mut fired = None;
        for label in DrowsyLabel::ALL {
            let active = predicates.triggers(label);
            if self.timer_mut(label).update(active, now) {
                counts.increment(label);
                fired = fired.max(Some(label));
            }
        }
        fired
    }

    pub fn clear(&mut self) {
        self.drowsy.clear();
        self.yawn.clear();
        self.sleep.clear();
    }

    pub fn any_running(&self) -> bool {
        self.drowsy.is_running() || self.yawn.is_running() || self.sleep.is_running()
    }
}
