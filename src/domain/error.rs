//! Proxy Error Taxonomy
//!
//! Every failure a single proxied request can hit. Each one is terminal
//! for the request and is rendered exactly once by the HTTP layer.

use thiserror::Error;

/// Request-level failure, from validation through upstream parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// A required inbound parameter is missing. Never reaches upstream.
    #[error("{0}")]
    Validation(String),

    /// Credentials are unset for a signed route.
    #[error("{0}")]
    Configuration(String),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned {status}: {body}")]
    UpstreamHttp {
        /// Status code returned by the exchange.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// DNS, connect, or timeout failure reaching upstream.
    #[error("{0}")]
    Transport(String),

    /// Anything else, e.g. a 2xx body that is not JSON.
    #[error("{0}")]
    Unexpected(String),
}

impl ProxyError {
    /// Short label used as the `error` field and as a metrics outcome.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation error",
            Self::Configuration(_) => "Configuration error",
            Self::UpstreamHttp { .. } => "Upstream error",
            Self::Transport(_) => "Transport error",
            Self::Unexpected(_) => "Unexpected error",
        }
    }

    /// Metrics label for the outcome of a request that failed with `self`.
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::UpstreamHttp { .. } => "upstream",
            Self::Transport(_) => "transport",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// True only for errors generated locally from bad caller input.
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
