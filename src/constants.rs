//! MediaPipe FaceMesh 关键点索引与默认阈值

/// 头顶
pub const LM_HEAD_TOP: usize = 10;
/// 下巴
pub const LM_CHIN: usize = 152;
/// 鼻尖
pub const LM_NOSE: usize = 1;
/// 上唇中点
pub const LM_MOUTH_TOP: usize = 13;
/// 下唇中点
pub const LM_MOUTH_BOTTOM: usize = 14;
/// 左嘴角
pub const LM_MOUTH_LEFT: usize = 78;
/// 右嘴角
pub const LM_MOUTH_RIGHT: usize = 308;
/// 左眼上眼睑
pub const LM_LEFT_EYE_TOP: usize = 159;
/// 左眼下眼睑
pub const LM_LEFT_EYE_BOTTOM: usize = 145;
/// 右眼上眼睑
pub const LM_RIGHT_EYE_TOP: usize = 386;
/// 右眼下眼睑
pub const LM_RIGHT_EYE_BOTTOM: usize = 374;

/// 特征提取实际使用的全部关键点
pub const REQUIRED_LANDMARKS: [usize; 11] = [
    LM_HEAD_TOP,
    LM_CHIN,
    LM_NOSE,
    LM_MOUTH_TOP,
    LM_MOUTH_BOTTOM,
    LM_MOUTH_LEFT,
    LM_MOUTH_RIGHT,
    LM_LEFT_EYE_TOP,
    LM_LEFT_EYE_BOTTOM,
    LM_RIGHT_EYE_TOP,
    LM_RIGHT_EYE_BOTTOM,
];

/// 校准窗口（毫秒）
pub const DEFAULT_CALIBRATION_WINDOW_MS: u64 = 5_000;

/// 闭眼判定：眼部比值低于基线的该比例
pub const DEFAULT_EYE_CLOSED_FACTOR: f64 = 0.8;

/// 张嘴判定：嘴部比值低于基线的该比例
pub const DEFAULT_MOUTH_OPEN_FACTOR: f64 = 0.5;

/// 前后倾判定下限（fbDist / 基线）
pub const DEFAULT_FB_TILT_LOWER_FACTOR: f64 = 0.5;

/// 前后倾判定上限（fbDist / 基线）
pub const DEFAULT_FB_TILT_UPPER_FACTOR: f64 = 1.5;

/// 头部角度正常区间下限（度）
pub const DEFAULT_HEAD_TILT_MIN_DEG: f64 = 70.0;

/// 头部角度正常区间上限（度）
pub const DEFAULT_HEAD_TILT_MAX_DEG: f64 = 110.0;

pub const DEFAULT_DROWSY_THRESHOLD_MS: u64 = 1_500;
pub const DEFAULT_YAWN_THRESHOLD_MS: u64 = 1_500;
pub const DEFAULT_SLEEP_THRESHOLD_MS: u64 = 2_500;

/// 告警框在画面上保留的时长（毫秒）
pub const DEFAULT_HIGHLIGHT_HOLD_MS: u64 = 2_000;

/// 回放管道中帧缓冲通道容量
pub const DEFAULT_REPLAY_CHANNEL_CAPACITY: usize = 64;
