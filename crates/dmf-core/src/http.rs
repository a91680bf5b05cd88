//! Blocking HTTP GET over libcurl (via the `curl` crate).
//!
//! Both remote services are plain GETs; the body is handed to a caller
//! supplied sink chunk by chunk so large artifacts never sit in memory.

use std::time::Duration;

const USER_AGENT: &str = concat!("dmf/", env!("CARGO_PKG_VERSION"));
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-request limits.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    /// Upper bound on the whole request, connect through last body byte.
    pub timeout: Duration,
}

impl HttpOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Performs a GET on `url`, passing each body chunk to `on_data`.
///
/// Returning `false` from `on_data` aborts the transfer (curl reports a write
/// error). Redirects are followed. Returns the final HTTP status code; non-2xx
/// codes are not treated as errors here.
pub fn get<F>(url: &str, opts: &HttpOptions, mut on_data: F) -> Result<u32, curl::Error>
where
    F: FnMut(&[u8]) -> bool,
{
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.useragent(USER_AGENT)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.timeout.min(MAX_CONNECT_TIMEOUT))?;
    easy.timeout(opts.timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| Ok(if on_data(data) { data.len() } else { 0 }))?;
        transfer.perform()?;
    }

    easy.response_code()
}

/// GET that buffers the whole body; for small JSON payloads.
pub fn get_bytes(url: &str, opts: &HttpOptions) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body = Vec::new();
    let code = get(url, opts, |data| {
        body.extend_from_slice(data);
        true
    })?;
    Ok((code, body))
}

pub fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
