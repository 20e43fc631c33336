//! 基于面部关键点的驾驶疲劳检测
//!
//! ## 模块
//! - `estimator`: 逐帧疲劳状态估计（特征提取、基线校准、去抖判定）
//! - `overlay`: 告警框颜色与保留时长
//! - `replay`: 关键点流回放
//! - `config` / `logging` / `error` / `constants`: 配套设施

pub mod config;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod logging;
pub mod overlay;
pub mod replay;

pub use config::EstimatorConfig;
pub use error::EstimatorError;
pub use estimator::{DrowsinessEstimator, DrowsyLabel, FrameInput, FrameResult};
