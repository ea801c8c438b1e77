use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlideshowError {
    #[error("invalid slide delay {0}: expected a finite, non-negative number of seconds")]
    InvalidDelay(f64),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
