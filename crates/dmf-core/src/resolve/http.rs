//! Info service client: `GET {endpoint}/{app}`.

use super::{AppInfo, InfoSource, ResolveError};
use crate::http::{self, HttpOptions};
use crate::item::AppId;

#[derive(Debug, Clone)]
pub struct HttpInfoSource {
    endpoint: String,
    http: HttpOptions,
}

impl HttpInfoSource {
    pub fn new(endpoint: impl Into<String>, http: HttpOptions) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn url_for(&self, app: &AppId) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), app)
    }
}

impl InfoSource for HttpInfoSource {
    fn app_info(&self, app: &AppId) -> Result<AppInfo, ResolveError> {
        let url = self.url_for(app);
        tracing::info!(%url, "requesting app info");
        let (code, body) = http::get_bytes(&url, &self.http)?;
        if !http::is_success(code) {
            return Err(ResolveError::Http(code));
        }
        AppInfo::from_slice(app.clone(), &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn url_appends_app_id() {
        let opts = HttpOptions::with_timeout(Duration::from_secs(30));
        let app = AppId::parse("730").unwrap();
        assert_eq!(
            HttpInfoSource::new("https://info.example/v1/info/", opts).url_for(&app),
            "https://info.example/v1/info/730"
        );
        assert_eq!(
            HttpInfoSource::new("https://info.example/v1/info", opts).url_for(&app),
            "https://info.example/v1/info/730"
        );
    }
}
