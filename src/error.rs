use thiserror::Error;

/// Why a series could not be retrieved.
///
/// These never reach the presentation layer: the fetcher logs them and
/// substitutes an empty series.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with HTTP {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("world bank api error: {0}")]
    Api(String),
}
