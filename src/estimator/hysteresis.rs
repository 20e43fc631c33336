/// 去抖计时器
///
/// 条件持续为真超过阈值才触发一次；条件一旦为假立即清零，
/// 下次条件为真时重新计时。触发后计时器也会清零。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HysteresisTimer {
    threshold_ms: u64,
    started_at: Option<u64>,
}

impl HysteresisTimer {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            started_at: None,
        }
    }

    /// 返回本帧是否触发
    pub fn update(&mut self, active: bool, now: u64) -> bool {
        if !active {
            self.started_at = None;
            return false;
        }

        let started_at = *self.started_at.get_or_insert(now);
        if now.saturating_sub(started_at) > self.threshold_ms {
            self.started_at = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}
