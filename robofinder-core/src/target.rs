// Target construction and usage validation

use robofinder_scanner::HttpOptions;
use robofinder_scanner::archive::DEFAULT_CDX_ENDPOINT;
use robofinder_scanner::snapshot::DEFAULT_REPLAY_BASE;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Usage errors. The display strings are the messages shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("[-] Enter URL in following format: scheme://domain.tld")]
    EmptyUrl,

    #[error("[-] Enter URL with its scheme. (http|https)")]
    MissingScheme,

    #[error("[-] Only enter domain name, not full URL\nFormat: scheme://domain.tld")]
    UrlHasPath,

    #[error("[-] Cannot use -s with -v at the same time.")]
    SilentAndVerbose,

    #[error("[-] Either use -p or -sm in order to extract data.")]
    NothingToExtract,

    #[error("[-] Delay must be a non-negative number of seconds, got {0}")]
    InvalidDelay(f64),

    #[error("[-] Archive URL must be an http(s) URL, got '{0}'")]
    InvalidArchiveUrl(String),
}

/// Raw, unvalidated scan parameters as collected from the command line
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub url: String,
    pub delay_secs: f64,
    pub limit: i64,
    pub paths: bool,
    pub sitemaps: bool,
    pub silent: bool,
    pub verbose: bool,
    /// Zero disables the request timeout
    pub timeout_secs: u64,
    pub verify_tls: bool,
    pub archive_url: Option<String>,
    pub output: Option<PathBuf>,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            delay_secs: 0.5,
            limit: 10,
            paths: false,
            sitemaps: false,
            silent: false,
            verbose: false,
            timeout_secs: 30,
            verify_tls: false,
            archive_url: None,
            output: None,
        }
    }
}

/// Where the index is queried and captures are replayed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEndpoints {
    pub cdx: String,
    pub replay: String,
}

impl ArchiveEndpoints {
    /// Endpoints of an archive host laid out like web.archive.org
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            cdx: format!("{}/cdx/search/cdx", base),
            replay: format!("{}/web", base),
        }
    }
}

impl Default for ArchiveEndpoints {
    fn default() -> Self {
        Self {
            cdx: DEFAULT_CDX_ENDPOINT.to_string(),
            replay: DEFAULT_REPLAY_BASE.to_string(),
        }
    }
}

/// A validated scan target. Only obtainable through [`TargetSpec::validate`].
#[derive(Debug, Clone)]
pub struct TargetSpec {
    base_domain: String,
    delay: Duration,
    limit: i64,
    want_paths: bool,
    want_sitemaps: bool,
    silent: bool,
    verbose: bool,
    http: HttpOptions,
    endpoints: ArchiveEndpoints,
    output: Option<PathBuf>,
}

impl TargetSpec {
    pub fn validate(request: ScanRequest) -> Result<Self, ValidationError> {
        let url = request.url.as_str();

        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        if !url.to_lowercase().starts_with("http") {
            return Err(ValidationError::MissingScheme);
        }

        if url.matches('/').count() > 3 {
            return Err(ValidationError::UrlHasPath);
        }

        if request.silent && request.verbose {
            return Err(ValidationError::SilentAndVerbose);
        }

        if !request.paths && !request.sitemaps {
            return Err(ValidationError::NothingToExtract);
        }

        // Anything a Duration cannot hold, negative and NaN included
        let delay = Duration::try_from_secs_f64(request.delay_secs)
            .map_err(|_| ValidationError::InvalidDelay(request.delay_secs))?;

        let endpoints = match request.archive_url {
            Some(ref archive_url) => {
                let parsed = Url::parse(archive_url)
                    .map_err(|_| ValidationError::InvalidArchiveUrl(archive_url.clone()))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(ValidationError::InvalidArchiveUrl(archive_url.clone()));
                }
                ArchiveEndpoints::from_base(archive_url)
            }
            None => ArchiveEndpoints::default(),
        };

        let base_domain = url.strip_suffix('/').unwrap_or(url).to_string();

        let timeout = match request.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            base_domain,
            delay,
            limit: request.limit,
            want_paths: request.paths,
            want_sitemaps: request.sitemaps,
            silent: request.silent,
            verbose: request.verbose,
            http: HttpOptions {
                timeout,
                verify_tls: request.verify_tls,
            },
            endpoints,
            output: request.output,
        })
    }

    /// Scheme and host the user asked about, without a trailing slash
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// The page whose captures are listed
    pub fn robots_url(&self) -> String {
        format!("{}/robots.txt", self.base_domain)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn want_paths(&self) -> bool {
        self.want_paths
    }

    pub fn want_sitemaps(&self) -> bool {
        self.want_sitemaps
    }

    pub fn silent(&self) -> bool {
        self.silent
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn http_options(&self) -> &HttpOptions {
        &self.http
    }

    pub fn endpoints(&self) -> &ArchiveEndpoints {
        &self.endpoints
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
