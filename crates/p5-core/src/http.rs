//! Shared HTTP plumbing for the registry and release clients

use crate::error::ProjectError;
use url::Url;

/// Build a client with a custom user agent
pub(crate) fn client(user_agent: &str) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Build a URL by appending path segments, preserving query parameters
pub(crate) fn build_url(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("URL cannot have path segments: {}", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Read a base URL from `env_var`, falling back to `default`
pub(crate) fn base_url(env_var: &str, default: &str) -> crate::error::Result<Url> {
    let (origin, url_str) = match std::env::var(env_var) {
        Ok(value) => (env_var.to_string(), value),
        Err(_) => ("built-in default".to_string(), default.to_string()),
    };
    Url::parse(&url_str).map_err(|e| ProjectError::InvalidUrl {
        origin,
        url: url_str,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_appends_segments() {
        let base = Url::parse("https://registry.npmjs.org").unwrap();
        let url = build_url(&base, &["p5", "latest"]).unwrap();
        assert_eq!(url.as_str(), "https://registry.npmjs.org/p5/latest");
    }

    #[test]
    fn test_build_url_keeps_base_path_and_query() {
        let base = Url::parse("https://github.com/processing/p5.js/?mirror=1").unwrap();
        let url = build_url(&base, &["releases", "download", "v1.9.2", "p5.min.js"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/processing/p5.js/releases/download/v1.9.2/p5.min.js?mirror=1"
        );
    }

    #[test]
    fn test_build_url_rejects_cannot_be_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(build_url(&base, &["p5"]).is_err());
    }

    #[test]
    fn test_base_url_uses_default_when_unset() {
        let url = base_url("P5_TEST_UNSET_URL_VARIABLE", "https://example.com/registry").unwrap();
        assert_eq!(url.as_str(), "https://example.com/registry");
    }

    #[test]
    fn test_base_url_prefers_env_override() {
        std::env::set_var("P5_TEST_MIRROR_URL", "http://localhost:4873/mirror");
        let url = base_url("P5_TEST_MIRROR_URL", "https://example.com/registry").unwrap();
        assert_eq!(url.as_str(), "http://localhost:4873/mirror");
    }

    #[test]
    fn test_base_url_malformed_override() {
        std::env::set_var("P5_TEST_BROKEN_URL", "not a url");
        let err = base_url("P5_TEST_BROKEN_URL", "https://example.com/registry").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidUrl);
        assert!(err.to_string().contains("P5_TEST_BROKEN_URL"));
        assert!(err.to_string().contains("not a url"));
    }
}
