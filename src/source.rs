use std::time::Duration;

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::Client;

use crate::error::SlideshowError;
use crate::slide::LoadResponse;

/// Where slide fragments come from.
///
/// Every HTTP response, whatever its status, is returned as `Ok`; only a
/// missing response (connection refused, reset, timeout) is an error.
#[async_trait]
pub trait SlideSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<LoadResponse, SlideshowError>;
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Option<Duration>) -> Result<Self, SlideshowError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl SlideSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<LoadResponse, SlideshowError> {
        let transport = |source: reqwest::Error| SlideshowError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        // hyper only records the phrase when it differs from the standard one.
        let status_text = response
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .or(status.canonical_reason())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(transport)?;

        Ok(LoadResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn returns_body_of_successful_slide() {
        let base = serve(Router::new().route("/slides/0", get(|| async { "<p>Hello</p>" }))).await;
        let source = HttpSource::new(None).expect("client");

        let response = source.fetch(&format!("{base}/slides/0")).await.expect("fetch");
        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.body, "<p>Hello</p>");
    }

    #[tokio::test]
    async fn error_status_is_a_response_not_an_error() {
        let app = Router::new().route(
            "/slides/3",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<pre>trace</pre>") }),
        );
        let base = serve(app).await;
        let source = HttpSource::new(None).expect("client");

        let missing = source.fetch(&format!("{base}/slides/9")).await.expect("fetch");
        assert_eq!(missing.status, 404);
        assert_eq!(missing.status_text, "Not Found");

        let broken = source.fetch(&format!("{base}/slides/3")).await.expect("fetch");
        assert_eq!(broken.status, 500);
        assert_eq!(broken.status_text, "Internal Server Error");
        assert_eq!(broken.body, "<pre>trace</pre>");
    }

    #[tokio::test]
    async fn server_reason_phrase_is_kept() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await.expect("read request");
            stream
                .write_all(b"HTTP/1.1 404 Slide Retired\r\nContent-Length: 4\r\nConnection: close\r\n\r\ngone")
                .await
                .expect("write response");
        });

        let source = HttpSource::new(None).expect("client");
        let response = source.fetch(&format!("http://{addr}/slides/4")).await.expect("fetch");
        assert_eq!(response.status, 404);
        assert_eq!(response.status_text, "Slide Retired");
        assert_eq!(response.body, "gone");
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let source = HttpSource::new(Some(Duration::from_secs(5))).expect("client");
        let err = source
            .fetch(&format!("http://{addr}/slides/0"))
            .await
            .expect_err("nothing is listening");
        assert!(matches!(err, SlideshowError::Transport { ref url, .. } if url.ends_with("/slides/0")));
    }
}
