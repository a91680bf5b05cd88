//! Manifest download client: `GET {endpoint}?apikey=..&depotid=..&manifestid=..`.
//!
//! Streams the body straight into the destination file.

use super::part::PartFile;
use super::{ArtifactSource, FetchError};
use crate::http::{self, HttpOptions};
use crate::item::ResolvedItem;
use std::fmt;
use std::path::Path;
use url::Url;

#[derive(Clone)]
pub struct HttpArtifactSource {
    endpoint: String,
    api_key: String,
    http: HttpOptions,
}

// The API key stays out of logs.
impl fmt::Debug for HttpArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpArtifactSource")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("http", &self.http)
            .finish()
    }
}

impl HttpArtifactSource {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, http: HttpOptions) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http,
        }
    }

    pub fn url_for(&self, item: &ResolvedItem) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("apikey", self.api_key.as_str()),
                ("depotid", item.depot.as_str()),
                ("manifestid", item.manifest.as_str()),
            ],
        )
    }
}

impl ArtifactSource for HttpArtifactSource {
    fn download(&self, item: &ResolvedItem, dest: &Path) -> Result<u64, FetchError> {
        let url = self.url_for(item)?;
        tracing::debug!(item = %item, dest = %dest.display(), "GET manifest");

        let mut part = PartFile::create(dest)?;
        let mut write_err: Option<std::io::Error> = None;
        let result = http::get(url.as_str(), &self.http, |data| match part.write(data) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %dest.display(), "manifest write failed: {}", e);
                write_err = Some(e);
                false
            }
        });
        if let Some(e) = write_err {
            return Err(FetchError::Storage(e));
        }
        let code = result?;
        if !http::is_success(code) {
            return Err(FetchError::Http(code));
        }
        Ok(part.sync()?)
    }
}
