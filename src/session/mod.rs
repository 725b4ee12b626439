pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

use crate::devices::DeviceProfile;
use crate::error::SessionError;
use crate::readiness::ReadinessPolicy;

/// The browser capabilities the crawler depends on.
///
/// One session drives one page; calls are issued strictly one at a time.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    /// Navigate the page and wait until it satisfies `readiness`
    async fn navigate(&mut self, url: &str, readiness: &ReadinessPolicy) -> Result<(), SessionError>;

    /// Apply a viewport or full device emulation to the page
    async fn apply_profile(&mut self, profile: &DeviceProfile) -> Result<(), SessionError>;

    /// Every anchor target in the loaded document, in document order
    async fn extract_links(&mut self) -> Result<Vec<String>, SessionError>;

    /// PNG snapshot spanning the whole scrollable document
    async fn capture_full_page(&mut self) -> Result<Vec<u8>, SessionError>;

    /// End the session
    async fn close(self) -> Result<(), SessionError>
    where
        Self: Sized;
}
