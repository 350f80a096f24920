use thiserror::Error;

/// Page-level failures. Every variant is recovered by skipping the page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection failure, timeout, or unreadable body.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Any non-2xx response.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Markup that yields no usable document.
    #[error("could not parse {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl ScrapeError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        ScrapeError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn parse(url: &str, reason: impl Into<String>) -> Self {
        ScrapeError::Parse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
