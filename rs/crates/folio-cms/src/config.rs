use std::time::Duration;

use folio_grid::pagination::DEFAULT_PAGE_SIZE;

use crate::error::{CmsError, CmsResult};

pub const DEFAULT_API_URL: &str = "http://localhost:1337/api";
pub const DEFAULT_MEDIA_URL: &str = "http://localhost:1337";

/// Where the CMS lives and how hard to try reaching it.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// REST root, e.g. `http://localhost:1337/api`.
    pub api_url: String,
    /// Prefix for relative media URLs.
    pub media_url: String,
    pub page_size: u32,
    pub timeout: Duration,
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// First backoff; doubles per retry.
    pub retry_backoff: Duration,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(10),
            retries: 2,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl CmsConfig {
    pub fn validate(&self) -> CmsResult<()> {
        for (name, url) in [("api_url", &self.api_url), ("media_url", &self.media_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CmsError::Config(format!("{} must be an http(s) URL, got '{}'", name, url)));
            }
        }
        if self.page_size == 0 {
            return Err(CmsError::Config("page_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Backoff before retry number `attempt` (1-based): 200ms, 400ms, 800ms...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff * (1u32 << (attempt.saturating_sub(1)).min(4))
    }

    /// Absolute URL for a media path the CMS returned.
    pub fn media(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") {
            return url.to_string();
        }
        let base = self.media_url.trim_end_matches('/');
        if url.starts_with('/') {
            format!("{}{}", base, url)
        } else {
            format!("{}/{}", base, url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_prefixing() {
        let config = CmsConfig::default();
        assert_eq!(config.media("/uploads/a.jpg"), "http://localhost:1337/uploads/a.jpg");
        assert_eq!(config.media("uploads/a.jpg"), "http://localhost:1337/uploads/a.jpg");
        assert_eq!(config.media("https://cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn test_backoff_doubles() {
        let config = CmsConfig::default();
        assert_eq!(config.backoff(1), Duration::from_millis(200));
        assert_eq!(config.backoff(2), Duration::from_millis(400));
        assert_eq!(config.backoff(3), Duration::from_millis(800));
        assert_eq!(config.backoff(20), Duration::from_millis(3200));
    }

    #[test]
    fn test_validate() {
        assert!(CmsConfig::default().validate().is_ok());
        let bad = CmsConfig { api_url: "localhost:1337".into(), ..CmsConfig::default() };
        assert!(matches!(bad.validate(), Err(CmsError::Config(_))));
        let zero = CmsConfig { page_size: 0, ..CmsConfig::default() };
        assert!(zero.validate().is_err());
    }
}
