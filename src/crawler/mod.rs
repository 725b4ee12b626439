pub mod visited;


pub use visited::VisitedSet;

use crate::capture::{self, CaptureOutcome};
use crate::config::CrawlConfig;
use crate::devices::DeviceSelection;
use crate::error::{ConfigError, InputError};
use crate::filter::UrlFilter;
use crate::readiness::ReadinessPolicy;
use crate::session::BrowserSession;
use std::path::PathBuf;
use url::Url;

/// A validated seed URL.
///
/// The operator's exact string is kept: it is what gets navigated to,
/// named and recorded as visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUrl {
    raw: String,
    parsed: Url,
}

impl SeedUrl {
    /// Validate the operator's input as an absolute URL
    pub fn parse(input: Option<&str>) -> Result<Self, InputError> {
        let raw = input.ok_or(InputError::MissingUrl)?;
        let parsed = Url::parse(raw).map_err(|source| InputError::InvalidUrl {
            input: raw.to_string(),
            source,
        })?;
        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.parsed
    }
}

/// Per-run crawl behaviour derived from the configuration
#[derive(Debug)]
pub struct CrawlSettings {
    pub output_dir: PathBuf,
    pub readiness: ReadinessPolicy,
    pub max_pages: Option<usize>,
    pub recapture_seed: bool,
    pub filter: UrlFilter,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlConfig, seed: &SeedUrl) -> Result<Self, ConfigError> {
        Ok(Self {
            output_dir: config.output_dir.clone(),
            readiness: config.readiness(),
            max_pages: config.max_pages,
            recapture_seed: config.recapture_seed,
            filter: UrlFilter::new(&config.filter, seed.url())?,
        })
    }
}

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The current page links only to visited (or filtered) pages
    NoUnvisitedLinks,
    /// The configured page limit was reached
    PageLimit,
}

/// Crawl state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlPhase {
    Bootstrapping,
    Crawling { current: String },
    Terminated(Termination),
}

/// Summary of a finished crawl
#[derive(Debug)]
pub struct CrawlReport {
    /// Distinct pages, in visit order
    pub visited: Vec<String>,
    /// Every capture attempt, in order
    pub captures: Vec<CaptureOutcome>,
    pub termination: Termination,
}

impl CrawlReport {
    pub fn succeeded(&self) -> usize {
        self.captures.iter().filter(|c| c.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.captures.len() - self.succeeded()
    }
}

/// Walks a site one page at a time, always following the first link on the
/// current page that has not been visited yet.
///
/// Only the current page's links are considered, so the crawl can stop while
/// earlier pages still hold unvisited links.
pub struct CrawlController<S: BrowserSession> {
    session: S,
    seed: SeedUrl,
    selection: DeviceSelection,
    settings: CrawlSettings,
    visited: VisitedSet,
    captures: Vec<CaptureOutcome>,
}

impl<S: BrowserSession> CrawlController<S> {
    pub fn new(
        session: S,
        seed: SeedUrl,
        selection: DeviceSelection,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            session,
            seed,
            selection,
            settings,
            visited: VisitedSet::new(),
            captures: Vec::new(),
        }
    }

    /// Run the crawl to completion and close the session
    pub async fn run(mut self) -> CrawlReport {
        ::log::info!("Starting screenshot crawl for: {}", self.seed.as_str());

        let mut phase = CrawlPhase::Bootstrapping;
        let termination = loop {
            phase = match phase {
                CrawlPhase::Bootstrapping => self.bootstrap().await,
                CrawlPhase::Crawling { current } => self.step(current).await,
                CrawlPhase::Terminated(reason) => break reason,
            };
        };

        ::log::info!(
            "Crawl finished ({:?}) after {} pages",
            termination,
            self.visited.len()
        );

        if let Err(e) = self.session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        CrawlReport {
            visited: self.visited.into_vec(),
            captures: self.captures,
            termination,
        }
    }

    async fn bootstrap(&mut self) -> CrawlPhase {
        let seed = self.seed.as_str().to_string();
        self.visited.insert(&seed);

        if self.settings.recapture_seed {
            self.navigate(&seed).await;
            self.capture(&seed).await;
        }

        CrawlPhase::Crawling { current: seed }
    }

    async fn step(&mut self, current: String) -> CrawlPhase {
        ::log::debug!("Crawling page {}: {}", self.visited.len(), current);

        self.navigate(&current).await;
        self.capture(&current).await;

        if let Some(max_pages) = self.settings.max_pages {
            if self.visited.len() >= max_pages {
                ::log::info!("Reached page limit of {}", max_pages);
                return CrawlPhase::Terminated(Termination::PageLimit);
            }
        }

        let links = self.links_on_page(&current).await;
        match self.next_link(&links) {
            Some(next) => {
                ::log::info!("Next page: {}", next);
                self.visited.insert(&next);
                CrawlPhase::Crawling { current: next }
            }
            None => {
                ::log::info!("All {} links on {} have been visited", links.len(), current);
                CrawlPhase::Terminated(Termination::NoUnvisitedLinks)
            }
        }
    }

    /// First link in document order that is unvisited and allowed by the filter
    fn next_link(&self, links: &[String]) -> Option<String> {
        links
            .iter()
            .find(|link| !self.visited.contains(link) && self.settings.filter.allows(link))
            .cloned()
    }

    async fn navigate(&mut self, url: &str) {
        if let Err(e) = self.session.navigate(url, &self.settings.readiness).await {
            ::log::warn!("Failed to load {}: {}", url, e);
        }
    }

    async fn capture(&mut self, url: &str) {
        let outcome = capture::capture(
            &mut self.session,
            url,
            &self.selection,
            &self.settings.output_dir,
            &self.settings.readiness,
        )
        .await;
        self.captures.push(outcome);
    }

    async fn links_on_page(&mut self, url: &str) -> Vec<String> {
        match self.session.extract_links().await {
            Ok(links) => {
                ::log::info!("Found {} links in {}", links.len(), url);
                links
            }
            Err(e) => {
                ::log::warn!("Failed to extract links from {}: {}", url, e);
                Vec::new()
            }
        }
    }
}
