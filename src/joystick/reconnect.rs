use std::fmt;
use std::time::Duration;

/// Timing used while waiting for the device to come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Added to the probe delay after every failed probe.
    pub step: Duration,
    /// Give up once the probe delay has grown past this.
    pub ceiling: Duration,
    /// Pause after a stream failure before probing again.
    pub disconnect_pause: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(25),
            ceiling: Duration::from_secs(2),
            disconnect_pause: Duration::from_secs(1),
        }
    }
}

/// Probe delay generator.
///
/// Despite the name the delay grows linearly: each failed probe adds one
/// `step`. [`Backoff::next_delay`] returns `None` once the current delay is
/// already past the ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    step: Duration,
    ceiling: Duration,
    delay: Duration,
    waited: Duration,
}

impl Backoff {
    pub fn new(step: Duration, ceiling: Duration) -> Self {
        Self {
            step,
            ceiling,
            delay: Duration::ZERO,
            waited: Duration::ZERO,
        }
    }

    pub fn from_policy(policy: &ReconnectPolicy) -> Self {
        Self::new(policy.step, policy.ceiling)
    }

    /// How long to sleep before the next probe, or `None` to give up.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.delay > self.ceiling {
            return None;
        }
        self.delay += self.step;
        self.waited += self.delay;
        Some(self.delay)
    }

    /// Total time handed out so far.
    pub fn waited(&self) -> Duration {
        self.waited
    }

    /// Start the schedule over from the first step.
    pub fn reset(&mut self) {
        self.delay = Duration::ZERO;
        self.waited = Duration::ZERO;
    }
}

/// Device link as seen by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Probing,
    Connected,
    Aborted,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Probing => "probing",
            LinkState::Connected => "connected",
            LinkState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
