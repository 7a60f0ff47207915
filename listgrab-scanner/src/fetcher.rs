use crate::config::SiteConfig;
use crate::error::{FetchError, Result, ScanError};
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// A successfully fetched page body.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Final URL after redirects; relative links resolve against this.
    pub url: Url,
    pub status_code: u16,
    pub body: String,
    pub response_time: Duration,
}

/// Issues one request per call. Retrying is the engine's job.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = std::result::Result<RawDocument, FetchError>> + Send;
}

/// reqwest-backed fetcher carrying a site's headers and timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(headers: HeaderMap, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ScanError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn for_site(site: &SiteConfig) -> Result<Self> {
        Self::new(site.headers().clone(), site.timeout())
    }

    fn classify(url: &Url, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> std::result::Result<RawDocument, FetchError> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| Self::classify(url, e))?;
        let response_time = start.elapsed();

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(RawDocument {
            url: final_url,
            status_code: status.as_u16(),
            body,
            response_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn fetcher(timeout: Duration) -> HttpFetcher {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", "listgrab-test".parse().unwrap());
        HttpFetcher::new(headers, timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_sends_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/list"))
            .and(header("user-agent", "listgrab-test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>ok</body></html>"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/list", mock_server.uri())).unwrap();
        let doc = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();

        assert_eq!(doc.status_code, 200);
        assert!(doc.body.contains("ok"));
        assert_eq!(doc.url, url);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri()).unwrap();
        let err = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { code: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("   \n"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri()).unwrap();
        let err = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyBody { .. }));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri()).unwrap();
        let err = fetcher(Duration::from_millis(200)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is almost never listening on test hosts.
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher(Duration::from_secs(2)).fetch(&url).await.unwrap_err();
        assert!(
            matches!(err, FetchError::Connection { .. } | FetchError::Timeout { .. }),
            "got {:?}",
            err
        );
        assert_eq!(err.url(), "http://127.0.0.1:9/");
    }
}
