use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub const USER_AGENT: &str = concat!(
    "Robofinder/",
    env!("CARGO_PKG_VERSION"),
    " (historical robots.txt discovery)"
);

/// Client construction options shared by the index client and the snapshot fetcher
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// When false, certificate errors are ignored. Traffic can then be read or
    /// altered by anyone on the path, including an intercepting proxy.
    pub verify_tls: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            verify_tls: false,
        }
    }
}

impl HttpOptions {
    pub fn build_client(&self) -> Result<Client> {
        if !self.verify_tls {
            info!("TLS certificate verification is disabled");
        }

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!self.verify_tls)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }

        Ok(builder.build()?)
    }
}
