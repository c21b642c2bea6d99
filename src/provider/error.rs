//! Error types for the CI provider client.
//!
//! [`ProviderError`] covers the three ways an outbound call can go wrong:
//! the request never completes, the provider answers with a non-200 status,
//! or the body is not the JSON we expect. The diagnostic is relayed to the
//! caller verbatim, so each variant carries the URL that was requested.

use thiserror::Error;

/// Errors that can occur while talking to the CI provider's REST API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be built or sent (DNS, refused connection, timeout).
    #[error("error requesting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with something other than 200 OK.
    #[error("bad status code from {url}: {status}")]
    Status { url: String, status: u16 },

    /// The body could not be read or deserialized.
    #[error("error decoding response from {url}: {message}")]
    Decode { url: String, message: String },
}
