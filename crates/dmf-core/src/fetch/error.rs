//! Error from a single download attempt.

/// Every variant is retried by the fetch loop; the `Display` text of the last
/// one is what ends up in the run report.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Transfer succeeded but produced no bytes.
    #[error("empty response body")]
    Empty,
    /// Fewer bytes on disk than were received (e.g. short write).
    #[error("size mismatch: received {received} bytes, {on_disk} on disk")]
    SizeMismatch { received: u64, on_disk: u64 },
    /// Disk/storage operation failed (create, write, rename, remove).
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// Artifact endpoint could not be combined with the query parameters.
    #[error("invalid artifact endpoint: {0}")]
    Url(#[from] url::ParseError),
}
