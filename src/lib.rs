// Re-export modules
pub mod capture;
pub mod config;
pub mod crawler;
pub mod devices;
pub mod error;
pub mod filter;
pub mod links;
pub mod naming;
pub mod prompt;
pub mod readiness;
pub mod session;

// Re-export commonly used types for convenience
pub use crawler::{CrawlController, CrawlReport, SeedUrl};
pub use devices::{DeviceProfile, DeviceSelection, DeviceType};

use config::CrawlConfig;
use crawler::CrawlSettings;
use error::{ConfigError, CrawlError};
use session::webdriver::WebDriverSession;
use std::path::PathBuf;

/// Main builder for a screenshot crawl against a WebDriver browser
pub struct ScreenshotCrawl {
    seed: SeedUrl,
    selection: DeviceSelection,
    config: CrawlConfig,
}

impl ScreenshotCrawl {
    /// Create a desktop crawl of `seed` with the default configuration
    pub fn new(seed: SeedUrl) -> Self {
        Self {
            seed,
            selection: DeviceSelection::desktop(),
            config: CrawlConfig::default(),
        }
    }

    /// Capture every page as the given device
    pub fn with_device(mut self, selection: DeviceSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, ConfigError> {
        let config = CrawlConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, ConfigError> {
        let config = CrawlConfig::from_json_str(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the root directory for screenshot folders
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Stop after this many distinct pages
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// Launch the browser session and crawl until no unvisited link remains
    pub async fn run(self) -> Result<CrawlReport, CrawlError> {
        let settings = CrawlSettings::from_config(&self.config, &self.seed)?;

        ::log::info!(
            "Connecting to WebDriver at {} ({} capture)",
            self.config.webdriver_url,
            self.selection.device_type.as_str()
        );
        let session = WebDriverSession::connect(&self.config).await?;

        let controller = CrawlController::new(session, self.seed, self.selection, settings);
        Ok(controller.run().await)
    }
}
