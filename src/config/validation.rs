use crate::config::types::{Config, CrawlerConfig, FetcherConfig, FetcherKind, PageEntry, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use std::collections::HashSet;
use url::Url;

/// Largest accepted `max-depth`
pub const MAX_DEPTH_LIMIT: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;

    if config.fetcher.kind == FetcherKind::Http {
        validate_http_seed(&config.crawler.seed)?;
        let user_agent = config.user_agent.as_ref().ok_or_else(|| {
            ConfigError::Validation("[user-agent] is required for the http fetcher".to_string())
        })?;
        validate_user_agent_config(user_agent)?;
    } else if let Some(user_agent) = &config.user_agent {
        validate_user_agent_config(user_agent)?;
    }

    if let Some(path) = &config.output.summary_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "summary_path cannot be empty".to_string(),
            ));
        }
    }

    validate_pages(&config.pages)?;
    Ok(())
}

/// Applies command-line overrides to a loaded configuration
///
/// The result is validated again, so an override can never bypass the
/// checks the file itself went through.
pub fn apply_overrides(
    mut config: Config,
    seed: Option<String>,
    max_depth: Option<u32>,
) -> ConfigResult<Config> {
    if let Some(seed) = seed {
        config.crawler.seed = seed;
    }
    if let Some(max_depth) = max_depth {
        config.crawler.max_depth = max_depth;
    }

    validate(&config)?;
    Ok(config)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_crawl_target(&config.seed, config.max_depth)
}

/// Checks the seed and depth a crawl is started with
///
/// The seed must be a non-empty identifier and the depth at most
/// [`MAX_DEPTH_LIMIT`].
pub fn validate_crawl_target(seed: &str, max_depth: u32) -> ConfigResult<()> {
    if seed.trim().is_empty() {
        return Err(ConfigError::Validation("seed cannot be empty".to_string()));
    }

    if max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, max_depth
        )));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }
    Ok(())
}

/// The http fetcher needs a seed it can actually request
fn validate_http_seed(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            seed
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Fixture pages must have unique, non-empty ids and non-empty links
fn validate_pages(pages: &[PageEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for page in pages {
        if page.id.is_empty() {
            return Err(ConfigError::Validation(
                "page id cannot be empty".to_string(),
            ));
        }

        if !seen.insert(page.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate page id '{}'",
                page.id
            )));
        }

        if page.links.iter().any(|link| link.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "page '{}' has an empty link",
                page.id
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ConfigError::Validation(format!("Invalid email format: '{}'", email)))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;

    fn fixture_config(seed: &str, max_depth: u32) -> Config {
        Config {
            crawler: CrawlerConfig {
                seed: seed.to_string(),
                max_depth,
            },
            fetcher: FetcherConfig::default(),
            user_agent: None,
            output: OutputConfig::default(),
            pages: vec![],
        }
    }

    fn user_agent() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn page(id: &str, links: &[&str]) -> PageEntry {
        PageEntry {
            id: id.to_string(),
            body: String::new(),
            links: links.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_fixture_seed_is_opaque() {
        // Fixture identifiers need not be URLs
        assert!(validate(&fixture_config("A", 0)).is_ok());
        assert!(validate(&fixture_config("not a url at all", 3)).is_ok());
    }

    #[test]
    fn test_empty_seed_rejected() {
        assert!(validate(&fixture_config("", 1)).is_err());
        assert!(validate(&fixture_config("   ", 1)).is_err());
    }

    #[test]
    fn test_max_depth_limit() {
        assert!(validate(&fixture_config("A", MAX_DEPTH_LIMIT)).is_ok());
        assert!(validate(&fixture_config("A", MAX_DEPTH_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_validate_crawl_target() {
        assert!(validate_crawl_target("https://golang.org/", 4).is_ok());
        assert!(matches!(
            validate_crawl_target("", 4),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            validate_crawl_target("A", 4_000_000_000),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = apply_overrides(fixture_config("A", 1), Some("B".to_string()), Some(3)).unwrap();
        assert_eq!(config.crawler.seed, "B");
        assert_eq!(config.crawler.max_depth, 3);

        let kept = apply_overrides(fixture_config("A", 1), None, None).unwrap();
        assert_eq!(kept.crawler.seed, "A");
        assert_eq!(kept.crawler.max_depth, 1);

        assert!(apply_overrides(fixture_config("A", 1), Some(String::new()), None).is_err());
        assert!(apply_overrides(fixture_config("A", 1), None, Some(MAX_DEPTH_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_override_seed_must_suit_http_fetcher() {
        let mut config = fixture_config("https://example.com/", 2);
        config.fetcher.kind = FetcherKind::Http;
        config.user_agent = Some(user_agent());

        let result = apply_overrides(config, Some("not-a-url".to_string()), None);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_requires_user_agent_and_url_seed() {
        let mut config = fixture_config("https://example.com/", 2);
        config.fetcher.kind = FetcherKind::Http;
        assert!(validate(&config).is_err());

        config.user_agent = Some(user_agent());
        assert!(validate(&config).is_ok());

        config.crawler.seed = "ftp://example.com/".to_string();
        assert!(validate(&config).is_err());

        config.crawler.seed = "A".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_crawler_name() {
        let mut config = fixture_config("A", 1);
        let mut ua = user_agent();
        ua.crawler_name = "bad name!".to_string();
        config.user_agent = Some(ua);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = fixture_config("A", 1);
        config.fetcher.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_pages() {
        assert!(validate_pages(&[page("A", &["B"]), page("B", &[])]).is_ok());
        assert!(validate_pages(&[page("", &[])]).is_err());
        assert!(validate_pages(&[page("A", &[]), page("A", &[])]).is_err());
        assert!(validate_pages(&[page("A", &[""])]).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
