//! HTTP client for the media metadata provider.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::UpstreamConfig;
use crate::media::error::HandlerError;

/// Thin JSON client over a TMDB-compatible API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish()
    }
}

impl UpstreamClient {
    /// Build a client from validated configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, HandlerError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| HandlerError::InvalidBaseUrl(config.base_url.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HandlerError::Client)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    /// Full request URL for `path` (relative to the base URL) and extra query parameters.
    pub fn url_for(&self, path: &str, params: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("api_key", &self.api_key)
                .append_pair("language", &self.language);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        url
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, HandlerError> {
        let url = self.url_for(path, params);
        tracing::debug!(path = %path, "Calling upstream");

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                HandlerError::UpstreamTimeout
            } else {
                HandlerError::UpstreamTransport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path = %path, status = %status, "Upstream returned error status");
            return Err(HandlerError::UpstreamStatus(status));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                HandlerError::UpstreamTimeout
            } else {
                HandlerError::UpstreamDecode(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig {
            base_url: base_url.into(),
            api_key: "k3y".into(),
            language: "en-US".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_keeps_base_path() {
        let url = client("https://api.themoviedb.org/3").url_for(
            "search/multi",
            &[("query", "the matrix".into()), ("page", "2".into())],
        );
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/search/multi?api_key=k3y&language=en-US&query=the+matrix&page=2"
        );
    }

    #[test]
    fn test_url_with_trailing_slash_base() {
        let url = client("http://127.0.0.1:9000/v3/").url_for("/movie/603", &[]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/v3/movie/603?api_key=k3y&language=en-US"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = UpstreamClient::new(&UpstreamConfig {
            base_url: "mailto:someone@example.com".into(),
            ..UpstreamConfig::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        assert!(!format!("{:?}", client("https://api.themoviedb.org/3")).contains("k3y"));
    }
}
