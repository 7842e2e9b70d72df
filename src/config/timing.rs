use std::time::Duration;

/// How a round is timed, derived from the signed turn timeout.
///
/// - positive: rounds last `timeout`, extended by every successful claim
/// - zero: rounds last until the board holds no set; elapsed time is shown
/// - negative: as zero, with no time display at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    Countdown { timeout: Duration, warning: Duration },
    Elapsed,
    Silent,
}

impl TimerMode {
    pub fn new(timeout_millis: i64, warning_millis: u64) -> Self {
        match timeout_millis {
            t if t > 0 => Self::Countdown {
                timeout: Duration::from_millis(t.unsigned_abs()),
                warning: Duration::from_millis(warning_millis),
            },
            0 => Self::Elapsed,
            _ => Self::Silent,
        }
    }
    pub fn is_countdown(&self) -> bool {
        matches!(self, Self::Countdown { .. })
    }
}
