use drowsiness_monitor::constants::*;
use drowsiness_monitor::estimator::{ImageSize, Landmark};

pub const IMAGE: ImageSize = ImageSize {
    width: 1000,
    height: 1000,
};

/// 合成人脸的目标几何特征（像素单位，基于 1000x1000 图像）
#[derive(Debug, Clone, Copy)]
pub struct FaceGeometry {
    pub eye: f64,
    pub mouth: f64,
    pub fb: f64,
    pub head_angle_deg: f64,
}

impl FaceGeometry {
    pub fn neutral() -> Self {
        Self {
            eye: 10.0,
            mouth: 5.0,
            fb: 20.0,
            head_angle_deg: 90.0,
        }
    }
}

/// 生成 468 点关键点集，使提取出的特征等于给定几何
pub fn synth_face(g: FaceGeometry) -> Vec<Landmark> {
    let scale = f64::from(IMAGE.width);
    let px = |x: f64, y: f64| Landmark::new(x / scale, y / scale);

    let mut lms = vec![px(500.0, 500.0); 468];

    let theta = g.head_angle_deg.to_radians();
    let top = (500.0, 200.0);
    let chin = (top.0 + 400.0 * theta.cos(), top.1 + 400.0 * theta.sin());
    let mid = ((top.0 + chin.0) / 2.0, (top.1 + chin.1) / 2.0);
    lms[LM_HEAD_TOP] = px(top.0, top.1);
    lms[LM_CHIN] = px(chin.0, chin.1);
    lms[LM_NOSE] = px(mid.0 + g.fb, mid.1);

    lms[LM_MOUTH_TOP] = px(500.0, 650.0);
    lms[LM_MOUTH_BOTTOM] = px(500.0, 650.0);
    lms[LM_MOUTH_LEFT] = px(500.0 - g.mouth / 2.0, 650.0);
    lms[LM_MOUTH_RIGHT] = px(500.0 + g.mouth / 2.0, 650.0);

    lms[LM_LEFT_EYE_TOP] = px(400.0, 400.0);
    lms[LM_LEFT_EYE_BOTTOM] = px(400.0, 400.0 + g.eye);
    lms[LM_RIGHT_EYE_TOP] = px(600.0, 400.0);
    lms[LM_RIGHT_EYE_BOTTOM] = px(600.0, 400.0 + g.eye);

    lms
}

pub fn neutral_face() -> Vec<Landmark> {
    synth_face(FaceGeometry::neutral())
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
