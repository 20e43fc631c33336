//! 面部几何特征提取
//!
//! 从 11 个关键点计算四个像素空间标量：
//! - 眼部比值：左右眼上下眼睑距离的平均值
//! - 嘴部比值：|嘴角水平距离 - 上下唇垂直距离|
//! - fbDist：鼻尖到头顶/下巴中点的距离，反映头部前后倾
//! - 头部角度：头顶指向下巴的向量与水平方向夹角的绝对值（度），直立约 90°

use serde::Serialize;

use crate::constants::*;
use crate::error::EstimatorError;
use crate::estimator::types::{ImageSize, Landmark};

/// 像素空间二维点
#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// 单帧几何特征
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameFeatures {
    pub eye_ratio: f64,
    pub mouth_ratio: f64,
    pub fb_dist: f64,
    pub head_angle_deg: f64,
}

impl FrameFeatures {
    /// 纯函数，不修改任何状态
    pub fn extract(landmarks: &[Landmark], image: ImageSize) -> Result<Self, EstimatorError> {
        if image.width == 0 || image.height == 0 {
            return Err(EstimatorError::InvalidGeometry {
                width: image.width,
                height: image.height,
            });
        }

        let w = f64::from(image.width);
        let h = f64::from(image.height);
        let point = |index: usize| -> Result<Point, EstimatorError> {
            let lm = landmarks
                .get(index)
                .ok_or_else(|| EstimatorError::missing_landmark(index, landmarks.len()))?;
            if !lm.x.is_finite() || !lm.y.is_finite() {
                return Err(EstimatorError::non_finite_landmark(index));
            }
            Ok(Point {
                x: lm.x * w,
                y: lm.y * h,
            })
        };

        let head_top = point(LM_HEAD_TOP)?;
        let chin = point(LM_CHIN)?;
        let nose = point(LM_NOSE)?;
        let mouth_top = point(LM_MOUTH_TOP)?;
        let mouth_bottom = point(LM_MOUTH_BOTTOM)?;
        let mouth_left = point(LM_MOUTH_LEFT)?;
        let mouth_right = point(LM_MOUTH_RIGHT)?;
        let left_eye_top = point(LM_LEFT_EYE_TOP)?;
        let left_eye_bottom = point(LM_LEFT_EYE_BOTTOM)?;
        let right_eye_top = point(LM_RIGHT_EYE_TOP)?;
        let right_eye_bottom = point(LM_RIGHT_EYE_BOTTOM)?;

        let left_eye = left_eye_top.distance(&left_eye_bottom);
        let right_eye = right_eye_top.distance(&right_eye_bottom);
        let eye_ratio = (left_eye + right_eye) / 2.0;

        let mouth_width = mouth_left.distance(&mouth_right);
        let mouth_height = mouth_top.distance(&mouth_bottom);
        let mouth_ratio = (mouth_width - mouth_height).abs();

        let fb_dist = nose.distance(&head_top.midpoint(&chin));

        let head_angle_deg = (chin.y - head_top.y)
            .atan2(chin.x - head_top.x)
            .to_degrees()
            .abs();

        Ok(Self {
            eye_ratio,
            mouth_ratio,
            fb_dist,
            head_angle_deg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_face() -> Vec<Landmark> {
        let mut lms = vec![Landmark::new(0.5, 0.5); 468];
        lms[LM_HEAD_TOP] = Landmark::new(0.5, 0.1);
        lms[LM_CHIN] = Landmark::new(0.5, 0.9);
        lms[LM_NOSE] = Landmark::new(0.6, 0.5);
        lms[LM_MOUTH_TOP] = Landmark::new(0.5, 0.70);
        lms[LM_MOUTH_BOTTOM] = Landmark::new(0.5, 0.72);
        lms[LM_MOUTH_LEFT] = Landmark::new(0.4, 0.71);
        lms[LM_MOUTH_RIGHT] = Landmark::new(0.6, 0.71);
        lms[LM_LEFT_EYE_TOP] = Landmark::new(0.35, 0.40);
        lms[LM_LEFT_EYE_BOTTOM] = Landmark::new(0.35, 0.44);
        lms[LM_RIGHT_EYE_TOP] = Landmark::new(0.65, 0.40);
        lms[LM_RIGHT_EYE_BOTTOM] = Landmark::new(0.65, 0.42);
        lms
    }

    #[test]
    fn extracts_pixel_space_features() {
        let f = FrameFeatures::extract(&base_face(), ImageSize::new(100, 200)).expect("valid");
        // 左眼 0.04*200=8，右眼 0.02*200=4
        assert!((f.eye_ratio - 6.0).abs() < 1e-9);
        // 嘴宽 0.2*100=20，嘴高 0.02*200=4
        assert!((f.mouth_ratio - 16.0).abs() < 1e-9);
        // 中点 (50,100)，鼻尖 (60,100)
        assert!((f.fb_dist - 10.0).abs() < 1e-9);
        assert!((f.head_angle_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn head_angle_is_absolute() {
        let mut lms = base_face();
        // 下巴在头顶正上方：atan2(-y, 0) = -90°，取绝对值
        lms[LM_CHIN] = Landmark::new(0.5, 0.0);
        lms[LM_HEAD_TOP] = Landmark::new(0.5, 0.8);
        let f = FrameFeatures::extract(&lms, ImageSize::new(100, 100)).expect("valid");
        assert!((f.head_angle_deg - 90.0).abs() < 1e-9);

        // 水平向右：0°
        lms[LM_HEAD_TOP] = Landmark::new(0.1, 0.5);
        lms[LM_CHIN] = Landmark::new(0.9, 0.5);
        let f = FrameFeatures::extract(&lms, ImageSize::new(100, 100)).expect("valid");
        assert!(f.head_angle_deg.abs() < 1e-9);
    }

    #[test]
    fn missing_landmark_is_malformed() {
        let lms = base_face()[..300].to_vec();
        let err = FrameFeatures::extract(&lms, ImageSize::new(100, 100)).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err, EstimatorError::missing_landmark(LM_MOUTH_RIGHT, 300));
    }

    #[test]
    fn non_finite_landmark_is_malformed() {
        let mut lms = base_face();
        lms[LM_NOSE] = Landmark::new(f64::NAN, 0.5);
        let err = FrameFeatures::extract(&lms, ImageSize::new(100, 100)).unwrap_err();
        assert_eq!(err, EstimatorError::non_finite_landmark(LM_NOSE));
    }

    #[test]
    fn zero_dimension_is_invalid_geometry() {
        let err = FrameFeatures::extract(&base_face(), ImageSize::new(0, 100)).unwrap_err();
        assert_eq!(
            err,
            EstimatorError::InvalidGeometry {
                width: 0,
                height: 100
            }
        );
        assert!(FrameFeatures::extract(&base_face(), ImageSize::new(100, 0)).is_err());
    }
}
