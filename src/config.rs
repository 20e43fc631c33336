use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub replay: ReplayConfig,
    pub estimator: EstimatorConfig,
}

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// 为空时从标准输入读取
    pub input: Option<String>,
    pub channel_capacity: usize,
    pub highlight_hold_ms: u64,
}

/// 估计器阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimatorConfig {
    pub calibration_window_ms: u64,
    pub eye_closed_factor: f64,
    pub mouth_open_factor: f64,
    pub fb_tilt_lower_factor: f64,
    pub fb_tilt_upper_factor: f64,
    pub head_tilt_min_deg: f64,
    pub head_tilt_max_deg: f64,
    pub drowsy_threshold_ms: u64,
    pub yawn_threshold_ms: u64,
    pub sleep_threshold_ms: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            calibration_window_ms: DEFAULT_CALIBRATION_WINDOW_MS,
            eye_closed_factor: DEFAULT_EYE_CLOSED_FACTOR,
            mouth_open_factor: DEFAULT_MOUTH_OPEN_FACTOR,
            fb_tilt_lower_factor: DEFAULT_FB_TILT_LOWER_FACTOR,
            fb_tilt_upper_factor: DEFAULT_FB_TILT_UPPER_FACTOR,
            head_tilt_min_deg: DEFAULT_HEAD_TILT_MIN_DEG,
            head_tilt_max_deg: DEFAULT_HEAD_TILT_MAX_DEG,
            drowsy_threshold_ms: DEFAULT_DROWSY_THRESHOLD_MS,
            yawn_threshold_ms: DEFAULT_YAWN_THRESHOLD_MS,
            sleep_threshold_ms: DEFAULT_SLEEP_THRESHOLD_MS,
        }
    }
}

impl EstimatorConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            calibration_window_ms: env_or_parse("CALIBRATION_WINDOW_MS", d.calibration_window_ms),
            eye_closed_factor: env_or_parse("EYE_CLOSED_FACTOR", d.eye_closed_factor),
            mouth_open_factor: env_or_parse("MOUTH_OPEN_FACTOR", d.mouth_open_factor),
            fb_tilt_lower_factor: env_or_parse("FB_TILT_LOWER_FACTOR", d.fb_tilt_lower_factor),
            fb_tilt_upper_factor: env_or_parse("FB_TILT_UPPER_FACTOR", d.fb_tilt_upper_factor),
            head_tilt_min_deg: env_or_parse("HEAD_TILT_MIN_DEG", d.head_tilt_min_deg),
            head_tilt_max_deg: env_or_parse("HEAD_TILT_MAX_DEG", d.head_tilt_max_deg),
            drowsy_threshold_ms: env_or_parse("DROWSY_THRESHOLD_MS", d.drowsy_threshold_ms),
            yawn_threshold_ms: env_or_parse("YAWN_THRESHOLD_MS", d.yawn_threshold_ms),
            sleep_threshold_ms: env_or_parse("SLEEP_THRESHOLD_MS", d.sleep_threshold_ms),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.calibration_window_ms == 0 {
            // 窗口为 0 时缓冲区永远为空，校准无法完成
            return Err("calibration_window_ms must be > 0".to_string());
        }
        for (name, factor) in [
            ("eye_closed_factor", self.eye_closed_factor),
            ("mouth_open_factor", self.mouth_open_factor),
            ("fb_tilt_lower_factor", self.fb_tilt_lower_factor),
            ("fb_tilt_upper_factor", self.fb_tilt_upper_factor),
        ] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(format!("{name} must be a positive number"));
            }
        }
        if self.fb_tilt_lower_factor >= self.fb_tilt_upper_factor {
            return Err("fb_tilt_lower_factor must be < fb_tilt_upper_factor".to_string());
        }
        if !(0.0..=180.0).contains(&self.head_tilt_min_deg)
            || !(0.0..=180.0).contains(&self.head_tilt_max_deg)
        {
            return Err("head tilt bounds must be in [0,180]".to_string());
        }
        if self.head_tilt_min_deg >= self.head_tilt_max_deg {
            return Err("head_tilt_min_deg must be < head_tilt_max_deg".to_string());
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Self {
        let input = env_or("REPLAY_INPUT", "");
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            replay: ReplayConfig {
                input: (!input.trim().is_empty()).then_some(input),
                channel_capacity: env_or_parse(
                    "REPLAY_CHANNEL_CAPACITY",
                    DEFAULT_REPLAY_CHANNEL_CAPACITY,
                )
                .max(1),
                highlight_hold_ms: env_or_parse("HIGHLIGHT_HOLD_MS", DEFAULT_HIGHLIGHT_HOLD_MS),
            },
            estimator: EstimatorConfig::from_env(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
