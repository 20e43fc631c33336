use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("invalid geometry: image size {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}

impl EstimatorError {
    pub fn missing_landmark(index: usize, len: usize) -> Self {
        Self::MalformedInput(format!(
            "landmark {index} missing (set has {len} landmarks)"
        ))
    }

    pub fn non_finite_landmark(index: usize) -> Self {
        Self::MalformedInput(format!("landmark {index} has a non-finite coordinate"))
    }

    /// 调用方应把该帧视为未检测到人脸
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }
}
