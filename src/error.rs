use thiserror::Error;

/// Why a provider run failed to produce an installed image.
///
/// None of these are fatal to the process; the run logs the reason and
/// reports failure through its exit code.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("page unreachable: {url}")]
    PageUnreachable { url: String },

    #[error("no pattern matched for {provider} at {url}")]
    NoMatch { provider: String, url: String },

    #[error("{provider}: matched a candidate that does not resolve against {base}")]
    AmbiguousButUnresolved { provider: String, base: String },

    #[error("{provider}: remote API error: {message}")]
    Api { provider: String, message: String },

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("no usable entry within the last {window} days")]
    WindowExhausted { window: u32 },
}

/// Binary fetch failures. The destination file is never created on error.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP {status} when downloading {url}")]
    Status { status: u16, url: String },

    #[error("transport failure downloading {url}")]
    Transport { url: String },

    #[error("writing download: {0}")]
    Io(#[from] std::io::Error),
}
