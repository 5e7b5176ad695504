//! Repository manager access over HTTP.

use crate::error::TransportError;
use crate::repository::{ArtifactStore, Credentials, ProxyTarget};

/// [`ArtifactStore`] backed by reqwest
///
/// Only proxies from the user settings are used; proxy environment
/// variables are ignored.
#[derive(Debug, Clone, Default)]
pub struct HttpArtifactStore;

impl HttpArtifactStore {
    /// Create an HTTP store
    pub fn new() -> Self {
        Self
    }

    fn client(&self, url: &str, proxy: Option<&ProxyTarget>) -> Result<reqwest::Client, TransportError> {
        let request_error = |reason: String| TransportError::Request {
            url: url.to_string(),
            reason,
        };

        let builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        let builder = match proxy {
            Some(proxy) => {
                let mut settings = reqwest::Proxy::all(proxy.url.as_str())
                    .map_err(|e| request_error(format!("invalid proxy: {}", e)))?;
                if let Some(credentials) = &proxy.credentials {
                    settings = settings.basic_auth(&credentials.username, &credentials.password);
                }
                if let Some(hosts) = &proxy.no_proxy {
                    settings = settings.no_proxy(reqwest::NoProxy::from_string(hosts));
                }
                builder.proxy(settings)
            }
            None => builder.no_proxy(),
        };

        builder
            .build()
            .map_err(|e| request_error(format!("failed to build HTTP client: {}", e)))
    }
}

impl ArtifactStore for HttpArtifactStore {
    async fn http_delete(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        proxy: Option<&ProxyTarget>,
    ) -> Result<u16, TransportError> {
        let client = self.client(url, proxy)?;

        let mut request = client.delete(url);
        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        log::debug!("DELETE {} answered {}", url, status);
        Ok(status.as_u16())
    }
}
