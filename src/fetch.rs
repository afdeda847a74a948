use std::io::Write;
use std::path::Path;
use std::time::Duration;

use crate::error::DownloadError;

const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Per-request timeout. The providers are plain web servers; a request
/// that has not answered within this budget is not coming back. The
/// original tool set no timeout at all, which is changed here on purpose.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    HttpError(u16),
    TransportError,
}

/// Result of a single GET. Any failure yields an empty body; callers must
/// treat an empty body as "no content".
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub status: FetchStatus,
    pub body: Vec<u8>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FetchStatus::Success)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn failed(status: FetchStatus) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

/// Seam between provider strategies and the network.
///
/// `fetch` never errors: HTTP and transport failures are reported in the
/// outcome. Retry policy belongs to the callers, not this layer.
pub trait Fetch {
    fn fetch(&self, url: &str) -> FetchOutcome;

    /// Download `url` into `dest`. Bytes land in a sibling temp file and
    /// only move to `dest` once the full body has been captured, so no
    /// partial file ever appears under the final name.
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let outcome = self.fetch(url);
        match outcome.status {
            FetchStatus::Success => {
                let dir = dest.parent().unwrap_or_else(|| Path::new("."));
                let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
                tmp.write_all(&outcome.body)?;
                tmp.persist(dest).map_err(|e| DownloadError::Io(e.error))?;
                Ok(())
            }
            FetchStatus::HttpError(status) => {
                log::warn!("(HTTP {status}) when downloading {url}");
                Err(DownloadError::Status {
                    status,
                    url: url.to_string(),
                })
            }
            FetchStatus::TransportError => Err(DownloadError::Transport {
                url: url.to_string(),
            }),
        }
    }
}

pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT_DEFAULT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    fn fetch(&self, url: &str) -> FetchOutcome {
        let resp = match self.client.get(url).send() {
            Ok(r) => r,
            Err(err) => {
                log::warn!("{url}: {err}");
                return FetchOutcome::failed(FetchStatus::TransportError);
            }
        };

        let status = resp.status();
        if !status.is_success() {
            log::warn!("(HTTP {}) {url}", status.as_u16());
            return FetchOutcome::failed(FetchStatus::HttpError(status.as_u16()));
        }

        match resp.bytes() {
            Ok(bytes) => FetchOutcome {
                status: FetchStatus::Success,
                body: bytes.into(),
            },
            Err(err) => {
                log::warn!("{url}: reading body: {err}");
                FetchOutcome::failed(FetchStatus::TransportError)
            }
        }
    }
}

#[cfg(test)]
pub mod fakes {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned-response network for strategy tests. Unknown URLs behave
    /// like a transport failure.
    #[derive(Default)]
    pub struct FakeFetch {
        responses: HashMap<String, (FetchStatus, Vec<u8>)>,
        pub requests: RefCell<Vec<String>>,
    }

    impl FakeFetch {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn ok(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses
                .insert(url.to_string(), (FetchStatus::Success, body.into()));
            self
        }

        pub fn status(mut self, url: &str, code: u16) -> Self {
            self.responses
                .insert(url.to_string(), (FetchStatus::HttpError(code), Vec::new()));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Fetch for FakeFetch {
        fn fetch(&self, url: &str) -> FetchOutcome {
            self.requests.borrow_mut().push(url.to_string());
            match self.responses.get(url) {
                Some((status, body)) => FetchOutcome {
                    status: status.clone(),
                    body: body.clone(),
                },
                None => FetchOutcome::failed(FetchStatus::TransportError),
            }
        }
    }
}
