// ABOUTME: Provider API error types with SNAFU pattern.
// ABOUTME: Separates credential failures from rejections and transport errors.

use snafu::Snafu;

/// Failure of a single call to the hosting provider's management API.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    #[snafu(display("provider rejected credentials (HTTP {status})"))]
    Unauthorized { status: u16 },

    #[snafu(display("provider rejected request (HTTP {status}): {body}"))]
    Rejected { status: u16, body: String },

    #[snafu(display("provider request failed: {source}"))]
    Transport { source: reqwest::Error },

    #[snafu(display("invalid provider response: {message}"))]
    Decode { message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Authentication or authorization failed. Retrying cannot help.
    Auth,
    /// The provider answered but refused the request.
    Rejected,
    /// Network failure or timeout.
    Transport,
    /// The response body did not match the expected shape.
    Decode,
}

impl ProviderError {
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Unauthorized { .. } => ProviderErrorKind::Auth,
            ProviderError::Rejected { .. } => ProviderErrorKind::Rejected,
            ProviderError::Transport { .. } => ProviderErrorKind::Transport,
            ProviderError::Decode { .. } => ProviderErrorKind::Decode,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ProviderErrorKind::Auth
    }
}
