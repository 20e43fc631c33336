//! 逐帧疲劳状态估计
//!
//! 数据流：关键点 → 几何特征 → 校准或判定 → 标签与计数。
//! 估计器持有一个会话的全部可变状态，调用方需串行喂帧。

pub mod calibration;
pub mod classifier;
pub mod features;
pub mod hysteresis;
pub mod types;

pub use calibration::{CalibrationPhase, CalibrationStatus, Calibrator};
pub use classifier::{Classifier, Predicates};
pub use features::FrameFeatures;
pub use hysteresis::HysteresisTimer;
pub use types::{
    Baseline, DrowsyLabel, EventCounts, FrameInput, FrameResult, ImageSize, Landmark, Rect,
};

use crate::config::EstimatorConfig;
use crate::error::EstimatorError;

#[derive(Debug, Clone)]
pub struct DrowsinessEstimator {
    config: EstimatorConfig,
    calibrator: Calibrator,
    classifier: Classifier,
    counts: EventCounts,
    face_present: bool,
}

impl DrowsinessEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            calibrator: Calibrator::new(config.calibration_window_ms),
            classifier: Classifier::new(&config),
            counts: EventCounts::default(),
            face_present: false,
            config,
        }
    }

    pub fn process(&mut self, frame: &FrameInput) -> Result<FrameResult, EstimatorError> {
        self.observe(frame.landmarks.as_deref(), frame.image, frame.timestamp_ms)
    }

    /// 处理一帧
    ///
    /// `landmarks` 为 `None` 表示本帧无人脸，执行软重置。输入有误时返回错误，
    /// 状态保持不变。
    pub fn observe(
        &mut self,
        landmarks: Option<&[Landmark]>,
        image: ImageSize,
        now: u64,
    ) -> Result<FrameResult, EstimatorError> {
        let Some(landmarks) = landmarks else {
            self.clear_session();
            return Ok(FrameResult::idle(self.counts));
        };

        let features = FrameFeatures::extract(landmarks, image)?;

        if !self.face_present {
            tracing::debug!(now, "Face entered view, calibrating");
            self.calibrator.begin(now);
            self.classifier.clear();
            self.face_present = true;
        }

        let baseline = match self.calibrator.observe(&features, now) {
            CalibrationStatus::Calibrating { seconds_remaining } => {
                return Ok(FrameResult {
                    calibrating: Some(seconds_remaining),
                    ..FrameResult::idle(self.counts)
                });
            }
            CalibrationStatus::Ready(baseline) => baseline,
        };

        let predicates = Predicates::evaluate(&features, &baseline, &self.config);
        let label = self.classifier.step(&predicates, now, &mut self.counts);

        let bounding_region = match label {
            Some(label) => {
                tracing::info!(
                    %label,
                    count = self.counts.get(label),
                    drowsy = self.counts.drowsy,
                    yawn = self.counts.yawn,
                    sleep = self.counts.sleep,
                    "Fatigue event"
                );
                Rect::bounding(landmarks, image)
            }
            None => None,
        };

        Ok(FrameResult {
            label,
            bounding_region,
            counts: self.counts,
            calibrating: None,
        })
    }

    /// `hard=true` 同时清零计数（会话结束）；重复调用结果相同
    pub fn reset(&mut self, hard: bool) {
        self.clear_session();
        if hard {
            self.counts = EventCounts::default();
        }
        tracing::debug!(hard, "Estimator reset");
    }

    pub fn counts(&self) -> EventCounts {
        self.counts
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.calibrator.baseline()
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.calibrator.phase()
    }

    pub fn is_calibrating(&self) -> bool {
        matches!(self.phase(), CalibrationPhase::Calibrating { .. })
    }

    pub fn timers_running(&self) -> bool {
        self.classifier.any_running()
    }

    fn clear_session(&mut self) {
        self.calibrator.clear();
        self.classifier.clear();
        self.face_present = false;
    }
}

impl Default for DrowsinessEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}
