//! HTTP renderer backed by reqwest
//!
//! Every render builds its own client, so cookies and pooled connections
//! never leak between attempts or pages.

use super::fetcher::{RenderError, Renderer};
use async_trait::async_trait;
use std::time::Duration;

/// Renderer that fetches markup with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    user_agent: String,
    settle_delay: Duration,
}

impl HttpRenderer {
    /// Creates a renderer
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User-Agent header sent with every request
    /// * `settle_delay` - Pause after the body is read, before returning
    pub fn new(user_agent: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            settle_delay,
        }
    }

    /// Builds an isolated client for a single render
    fn build_client(
        &self,
        url: &str,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<reqwest::Client, RenderError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(timeout)
            .connect_timeout(timeout)
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| RenderError::Http {
                url: url.to_string(),
                source: e,
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| RenderError::Session(format!("failed to build client: {}", e)))
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(
        &self,
        url: &str,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        let client = self.build_client(url, proxy, timeout)?;

        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RenderError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| RenderError::Http {
            url: url.to_string(),
            source: e,
        })?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn renderer() -> HttpRenderer {
        HttpRenderer::new("schema-crawler-test/1.0", Duration::ZERO)
    }

    #[tokio::test]
    async fn test_render_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .and(header("user-agent", "schema-crawler-test/1.0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>About</body></html>"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/about", server.uri());
        let body = renderer()
            .render(&url, None, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(body, "<html><body>About</body></html>");
    }

    #[tokio::test]
    async fn test_render_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing", server.uri());
        let err = renderer()
            .render(&url, None, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, RenderError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_render_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let url = format!("{}/slow", server.uri());
        let err = renderer()
            .render(&url, None, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Timeout { .. } | RenderError::Http { .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_proxy_is_an_error() {
        let err = renderer()
            .render(
                "http://127.0.0.1:9/",
                Some("::not a proxy::"),
                Duration::from_secs(1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RenderError::Http { .. }));
    }
}
