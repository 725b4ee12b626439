use super::BrowserSession;
use crate::devices::DeviceProfile;
use crate::error::SessionError;
use crate::readiness::ReadinessPolicy;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything a [`FakeSession`] was asked to do
#[derive(Debug, Default)]
pub struct SessionLog {
    pub navigations: Vec<String>,
    pub profiles: Vec<DeviceProfile>,
    pub captures: Vec<String>,
    pub closed: usize,
}

/// In-memory site: each URL maps to the links its page contains
#[derive(Debug, Default)]
pub struct FakeSession {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    broken_extraction: HashSet<String>,
    current: Option<String>,
    log: Arc<Mutex<SessionLog>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Navigations to `url` time out (the browser still ends up on it)
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Link extraction errors while `url` is loaded
    pub fn broken_extraction(mut self, url: &str) -> Self {
        self.broken_extraction.insert(url.to_string());
        self
    }

    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str, readiness: &ReadinessPolicy) -> Result<(), SessionError> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        self.current = Some(url.to_string());
        if self.failing.contains(url) {
            return Err(SessionError::ReadinessTimeout {
                url: url.to_string(),
                waited: readiness.timeout(),
            });
        }
        Ok(())
    }

    async fn apply_profile(&mut self, profile: &DeviceProfile) -> Result<(), SessionError> {
        self.log.lock().unwrap().profiles.push(profile.clone());
        Ok(())
    }

    async fn extract_links(&mut self) -> Result<Vec<String>, SessionError> {
        let current = self.current.clone().unwrap_or_default();
        if self.broken_extraction.contains(&current) {
            return Err(SessionError::Protocol(format!("page {} crashed", current)));
        }
        Ok(self.pages.get(&current).cloned().unwrap_or_default())
    }

    async fn capture_full_page(&mut self) -> Result<Vec<u8>, SessionError> {
        let current = self.current.clone().unwrap_or_default();
        self.log.lock().unwrap().captures.push(current.clone());
        Ok(format!("png:{}", current).into_bytes())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.log.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Short readiness policy for tests
pub fn quick_readiness() -> ReadinessPolicy {
    ReadinessPolicy::Load {
        timeout: Duration::from_millis(50),
    }
}
