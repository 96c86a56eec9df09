use std::time::Duration;

/// Timing of the job-status poll loop. The defaults bound a single job to
/// 30 attempts spaced 2 seconds apart (at most ~60s of waiting), each with
/// its own short request timeout. Tests inject zero delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub attempt_timeout: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration, attempt_timeout: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            attempt_timeout,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}
