use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Optional restrictions on which discovered links the crawl may follow.
///
/// The default configuration accepts every link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Only follow links on the same host as the seed URL
    #[serde(default)]
    pub same_host_only: bool,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// URL filter that uses regex patterns and host scoping to decide which links to follow
#[derive(Debug, Default)]
pub struct UrlFilter {
    required_host: Option<String>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    /// Create a new URL filter scoped to the seed URL
    pub fn new(config: &UrlFilterConfig, seed: &Url) -> Result<Self, regex::Error> {
        // Compile regex patterns
        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        let required_host = if config.same_host_only {
            seed.host_str().map(|host| host.to_string())
        } else {
            None
        };

        Ok(Self {
            required_host,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Whether this filter accepts everything
    pub fn is_open(&self) -> bool {
        self.required_host.is_none()
            && self.include_regexes.is_empty()
            && self.exclude_regexes.is_empty()
    }

    /// Determine if a link may be followed
    pub fn allows(&self, link: &str) -> bool {
        if self.is_open() {
            return true;
        }

        // Check host restriction
        if let Some(required_host) = &self.required_host {
            match Url::parse(link) {
                Ok(url) if url.host_str() == Some(required_host.as_str()) => {}
                _ => return false,
            }
        }

        // Check regex exclusions (these take precedence)
        if self.exclude_regexes.iter().any(|regex| regex.is_match(link)) {
            return false;
        }

        // If include patterns are specified, at least one must match
        self.include_regexes.is_empty() || self.include_regexes.iter().any(|regex| regex.is_match(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Url {
        Url::parse("https://example.com/docs/").unwrap()
    }

    #[test]
    fn test_default_filter_accepts_everything() {
        let filter = UrlFilter::new(&UrlFilterConfig::default(), &seed()).unwrap();
        assert!(filter.is_open());
        assert!(filter.allows("https://other.com/image.jpg"));
        assert!(filter.allows("mailto:someone@example.com"));
        assert!(filter.allows("not even a url"));
    }

    #[test]
    fn test_host_restriction() {
        let config = UrlFilterConfig {
            same_host_only: true,
            ..UrlFilterConfig::default()
        };
        let filter = UrlFilter::new(&config, &seed()).unwrap();

        // Same host should be allowed, whatever the path
        assert!(filter.allows("https://example.com/blog/post"));
        assert!(filter.allows("http://example.com/"));

        // Different or missing host should be excluded
        assert!(!filter.allows("https://other.com/page"));
        assert!(!filter.allows("https://sub.example.com/page"));
        assert!(!filter.allows("mailto:someone@example.com"));
    }

    #[test]
    fn test_regex_patterns() {
        let config = UrlFilterConfig {
            same_host_only: false,
            include_patterns: vec![r"/docs/.*\.html$".to_string()],
            exclude_patterns: vec![r"/docs/draft/".to_string()],
        };
        let filter = UrlFilter::new(&config, &seed()).unwrap();

        // Matching include pattern should be allowed
        assert!(filter.allows("https://example.com/docs/page.html"));

        // Non-matching include pattern should be excluded
        assert!(!filter.allows("https://example.com/docs/page.txt"));

        // Matching exclude pattern should be excluded even if it matches include
        assert!(!filter.allows("https://example.com/docs/draft/page.html"));
    }

    #[test]
    fn test_invalid_pattern() {
        let config = UrlFilterConfig {
            exclude_patterns: vec!["(unclosed".to_string()],
            ..UrlFilterConfig::default()
        };
        assert!(UrlFilter::new(&config, &seed()).is_err());
    }
}
