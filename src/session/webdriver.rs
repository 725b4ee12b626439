use super::BrowserSession;
use crate::config::CrawlConfig;
use crate::devices::{DeviceProfile, Viewport};
use crate::error::SessionError;
use crate::links;
use crate::readiness::{ActivitySample, IdleTracker, NetworkIdle, ReadinessPolicy};
use fantoccini::wd::{Capabilities, WebDriverCompatibleCommand};
use fantoccini::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Instant;
use tokio::time::timeout;

/// Counts fetch and XHR requests the page has open. Installed on every new
/// document before any page script runs.
const INFLIGHT_TRACKER: &str = r#"(() => {
    if (window.__pagesnapInflight !== undefined) return;
    window.__pagesnapInflight = 0;
    if (window.performance && performance.setResourceTimingBufferSize) {
        performance.setResourceTimingBufferSize(100000);
    }
    const begin = () => { window.__pagesnapInflight += 1; };
    const end = () => { window.__pagesnapInflight = Math.max(0, window.__pagesnapInflight - 1); };
    const fetch = window.fetch;
    if (fetch) {
        window.fetch = function (...args) {
            begin();
            try {
                return fetch.apply(this, args).finally(end);
            } catch (e) {
                end();
                throw e;
            }
        };
    }
    const send = XMLHttpRequest.prototype.send;
    XMLHttpRequest.prototype.send = function (...args) {
        begin();
        this.addEventListener('loadend', end, { once: true });
        try {
            return send.apply(this, args);
        } catch (e) {
            end();
            throw e;
        }
    };
})();"#;

/// Reports document readiness, open requests and finished resources
const NETWORK_ACTIVITY: &str = "return { \
    ready: document.readyState === 'complete', \
    inflight: window.__pagesnapInflight || 0, \
    resources: performance.getEntriesByType('resource').length \
};";

/// Height of the full scrollable document in CSS pixels
const DOCUMENT_HEIGHT: &str = "const d = document.documentElement; \
    const b = document.body; \
    return Math.ceil(Math.max(d.scrollHeight, d.offsetHeight, \
        b ? b.scrollHeight : 0, b ? b.offsetHeight : 0));";

/// Local WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A Chrome DevTools command sent through ChromeDriver's CDP passthrough
#[derive(Debug)]
struct CdpCommand {
    method: &'static str,
    params: Value,
}

impl WebDriverCompatibleCommand for CdpCommand {
    fn endpoint(
        &self,
        base_url: &url::Url,
        session_id: Option<&str>,
    ) -> Result<url::Url, url::ParseError> {
        // Only issued on an established session
        let session_id = session_id.ok_or(url::ParseError::EmptyHost)?;
        base_url.join(&format!("session/{}/goog/cdp/execute", session_id))
    }

    fn method_and_body(&self, _request_url: &url::Url) -> (http::Method, Option<String>) {
        let body = json!({ "cmd": self.method, "params": self.params });
        (http::Method::POST, Some(body.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct NetworkActivity {
    ready: bool,
    inflight: u64,
    resources: u64,
}

impl From<NetworkActivity> for ActivitySample {
    fn from(activity: NetworkActivity) -> Self {
        ActivitySample {
            ready: activity.ready,
            inflight: activity.inflight,
            resources: activity.resources,
        }
    }
}

/// Browser session backed by a Chromium WebDriver server
pub struct WebDriverSession {
    client: Client,
    profile: DeviceProfile,
}

impl WebDriverSession {
    /// Start a browser session, trying common local WebDriver ports if the
    /// configured one is unreachable
    pub async fn connect(config: &CrawlConfig) -> Result<Self, SessionError> {
        let capabilities = chrome_capabilities(config);

        let first_error = match connect_to(&config.webdriver_url, &capabilities).await {
            Ok(client) => return Self::start(client).await,
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    config.webdriver_url,
                    e
                );
                e
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == config.webdriver_url {
                continue; // Skip if it's the same as the one we already tried
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = connect_to(url, &capabilities).await {
                return Self::start(client).await;
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(SessionError::Connect {
            url: config.webdriver_url.clone(),
            message: first_error.to_string(),
        })
    }

    async fn start(client: Client) -> Result<Self, SessionError> {
        let session = Self {
            client,
            profile: DeviceProfile::desktop(),
        };
        session
            .cdp(
                "Page.addScriptToEvaluateOnNewDocument",
                json!({ "source": INFLIGHT_TRACKER }),
            )
            .await?;
        Ok(session)
    }

    async fn cdp(&self, method: &'static str, params: Value) -> Result<Value, SessionError> {
        ::log::trace!("CDP {} {}", method, params);
        Ok(self.client.issue_cmd(CdpCommand { method, params }).await?)
    }

    async fn override_metrics(&self, viewport: &Viewport, height: u32) -> Result<(), SessionError> {
        let orientation = if viewport.is_landscape {
            json!({ "type": "landscapePrimary", "angle": 90 })
        } else {
            json!({ "type": "portraitPrimary", "angle": 0 })
        };
        self.cdp(
            "Emulation.setDeviceMetricsOverride",
            json!({
                "width": viewport.width,
                "height": height,
                "deviceScaleFactor": viewport.device_scale_factor,
                "mobile": viewport.is_mobile,
                "screenOrientation": orientation,
            }),
        )
        .await?;
        Ok(())
    }

    async fn navigate_and_settle(
        &self,
        url: &str,
        readiness: &ReadinessPolicy,
    ) -> Result<(), SessionError> {
        self.client.goto(url).await?;
        if let ReadinessPolicy::NetworkIdle { idle, .. } = readiness {
            self.wait_for_network_idle(idle).await?;
        }
        Ok(())
    }

    async fn wait_for_network_idle(&self, idle: &NetworkIdle) -> Result<(), SessionError> {
        let mut tracker = IdleTracker::new(idle);
        loop {
            let activity: NetworkActivity =
                serde_json::from_value(self.client.execute(NETWORK_ACTIVITY, vec![]).await?)
                    .map_err(|e| SessionError::Protocol(format!("network activity: {}", e)))?;

            if tracker.observe(Instant::now(), activity.into()) {
                return Ok(());
            }
            tokio::time::sleep(idle.poll_interval).await;
        }
    }

    async fn document_height(&self) -> Result<u32, SessionError> {
        let value = self.client.execute(DOCUMENT_HEIGHT, vec![]).await?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.ceil() as u64))
            .map(|h| h.min(u32::MAX as u64) as u32)
            .ok_or_else(|| SessionError::Protocol(format!("document height: {}", value)))
    }
}

impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str, readiness: &ReadinessPolicy) -> Result<(), SessionError> {
        ::log::debug!("Navigating to {}", url);
        let waited = readiness.timeout();
        match timeout(waited, self.navigate_and_settle(url, readiness)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::ReadinessTimeout {
                url: url.to_string(),
                waited,
            }),
        }
    }

    async fn apply_profile(&mut self, profile: &DeviceProfile) -> Result<(), SessionError> {
        let viewport = profile.viewport();
        if let Some(user_agent) = profile.user_agent() {
            self.cdp(
                "Emulation.setUserAgentOverride",
                json!({ "userAgent": user_agent }),
            )
            .await?;
        }
        self.override_metrics(viewport, viewport.height).await?;
        self.cdp(
            "Emulation.setTouchEmulationEnabled",
            json!({ "enabled": viewport.has_touch }),
        )
        .await?;

        self.profile = profile.clone();
        Ok(())
    }

    async fn extract_links(&mut self) -> Result<Vec<String>, SessionError> {
        let html = self.client.source().await?;
        let page_url = self.client.current_url().await?;
        Ok(links::extract_links(&html, page_url.as_str()))
    }

    async fn capture_full_page(&mut self) -> Result<Vec<u8>, SessionError> {
        let viewport = *self.profile.viewport();
        let height = self.document_height().await?.max(viewport.height);

        // Stretch the viewport over the whole document, then restore it
        self.override_metrics(&viewport, height).await?;
        let screenshot = self.client.screenshot().await.map_err(SessionError::from);
        let restored = self.override_metrics(&viewport, viewport.height).await;

        keep_screenshot(screenshot, restored)
    }

    async fn close(self) -> Result<(), SessionError> {
        self.client.close().await?;
        ::log::debug!("WebDriver session closed");
        Ok(())
    }
}

/// A failed viewport restore is only worth a warning once the PNG is taken
fn keep_screenshot(
    screenshot: Result<Vec<u8>, SessionError>,
    restored: Result<(), SessionError>,
) -> Result<Vec<u8>, SessionError> {
    if let Err(e) = restored {
        ::log::warn!("Failed to restore the viewport after capture: {}", e);
    }
    screenshot
}

async fn connect_to(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    let client = builder.connect(webdriver_url).await?;
    ::log::debug!("Connected to WebDriver at {}", webdriver_url);
    Ok(client)
}

/// Session capabilities for a Chromium browser
fn chrome_capabilities(config: &CrawlConfig) -> Capabilities {
    let mut args = vec![
        "--hide-scrollbars",
        "--disable-gpu",
        "--disable-dev-shm-usage",
        "--no-first-run",
        "--no-default-browser-check",
    ];
    if config.headless {
        args.push("--headless=new");
    }

    let mut chrome_options = json!({ "args": args });
    if let Some(binary) = &config.browser_binary {
        chrome_options["binary"] = json!(binary);
    }

    let mut capabilities = Capabilities::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".to_string(), chrome_options);
    capabilities
}
