use std::time::{Duration, Instant};

/// Default navigation timeout, in seconds
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// Default quiet period before a page counts as network-idle, in milliseconds
pub const DEFAULT_IDLE_WINDOW_MS: u64 = 500;

/// Default interval between network activity checks, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default number of requests allowed in flight on an idle page
pub const DEFAULT_MAX_INFLIGHT: u64 = 0;

/// Settings for the network-idle heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkIdle {
    /// How long network activity must stay quiet
    pub idle_window: Duration,
    /// How often the page is checked
    pub poll_interval: Duration,
    /// Requests that may stay in flight on a page that counts as idle
    pub max_inflight: u64,
}

impl Default for NetworkIdle {
    fn default() -> Self {
        Self {
            idle_window: Duration::from_millis(DEFAULT_IDLE_WINDOW_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_inflight: DEFAULT_MAX_INFLIGHT,
        }
    }
}

/// When a navigation counts as complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// The document load event is enough
    Load { timeout: Duration },
    /// The document is loaded and the network has been quiet for a while
    NetworkIdle { idle: NetworkIdle, timeout: Duration },
}

impl ReadinessPolicy {
    /// Upper bound on navigation plus settling
    pub fn timeout(&self) -> Duration {
        match self {
            ReadinessPolicy::Load { timeout } | ReadinessPolicy::NetworkIdle { timeout, .. } => {
                *timeout
            }
        }
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        ReadinessPolicy::NetworkIdle {
            idle: NetworkIdle::default(),
            timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
        }
    }
}

/// One observation of a page's network activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySample {
    /// `document.readyState` is `complete`
    pub ready: bool,
    /// Requests started by the page that have not finished yet
    pub inflight: u64,
    /// Number of network resources that have finished loading
    pub resources: u64,
}

/// Decides when a page has gone network-idle.
///
/// The page settles once it is loaded, has no more than `max_inflight`
/// requests open, and no resource has started or finished for the whole idle
/// window. Any busy sample restarts the window.
#[derive(Debug)]
pub struct IdleTracker {
    idle_window: Duration,
    max_inflight: u64,
    last_resources: Option<u64>,
    quiet_since: Option<Instant>,
}

impl IdleTracker {
    pub fn new(idle: &NetworkIdle) -> Self {
        Self {
            idle_window: idle.idle_window,
            max_inflight: idle.max_inflight,
            last_resources: None,
            quiet_since: None,
        }
    }

    /// Record a sample taken at `now` and report whether the page has settled
    pub fn observe(&mut self, now: Instant, sample: ActivitySample) -> bool {
        if !sample.ready || sample.inflight > self.max_inflight {
            self.last_resources = None;
            self.quiet_since = None;
            return false;
        }

        if self.last_resources != Some(sample.resources) {
            self.last_resources = Some(sample.resources);
            self.quiet_since = Some(now);
            return false;
        }

        match self.quiet_since {
            Some(since) => now.saturating_duration_since(since) >= self.idle_window,
            None => {
                self.quiet_since = Some(now);
                false
            }
        }
    }
}
