//! HTTP page source for the upstream order-history endpoint

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::PageSource;
use crate::services::Config;
use crate::types::{FoodtrackError, Result};

pub struct HttpPageSource {
    client: Client,
    orders_url: String,
}

impl HttpPageSource {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &config.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| FoodtrackError::Config(format!("invalid cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| FoodtrackError::Config(format!("invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| FoodtrackError::Http(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            orders_url: config.orders_url(),
        })
    }

    /// Shared client, also used for host readiness probes
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page: u32) -> Result<Value> {
        let response = self
            .client
            .get(&self.orders_url)
            .query(&[("page", page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FoodtrackError::Fetch {
                status: status.as_u16(),
            });
        }

        let mut body = response.bytes().await?.to_vec();
        debug!(page, bytes = body.len(), "received page");
        simd_json::serde::from_slice::<Value>(&mut body)
            .map_err(|e| FoodtrackError::Parse(format!("page {}: {}", page, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        Config {
            base_url: server.uri(),
            cookie: Some("sid=abc123".into()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_page_sends_page_and_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webroutes/user/orders"))
            .and(query_param("page", "3"))
            .and(header("cookie", "sid=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entities": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpPageSource::new(&config_for(&server)).unwrap();
        let body = source.fetch_page(3).await.unwrap();

        assert_eq!(body, json!({ "entities": {} }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = HttpPageSource::new(&config_for(&server)).unwrap();
        let err = source.fetch_page(1).await.unwrap_err();

        assert!(matches!(err, FoodtrackError::Fetch { status: 401 }));
        assert_eq!(err.to_string(), "HTTP error! status: 401");
    }

    #[tokio::test]
    async fn test_invalid_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let source = HttpPageSource::new(&config_for(&server)).unwrap();
        let err = source.fetch_page(1).await.unwrap_err();

        assert!(matches!(err, FoodtrackError::Parse(_)));
    }

    #[test]
    fn test_invalid_cookie_rejected() {
        let config = Config {
            cookie: Some("bad\nvalue".into()),
            ..Config::default()
        };
        assert!(matches!(
            HttpPageSource::new(&config),
            Err(FoodtrackError::Config(_))
        ));
    }
}
