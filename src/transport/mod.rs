pub mod doh;

pub use doh::DohTransport;

use async_trait::async_trait;
use thiserror::Error;

use crate::dns::DnsMessage;
use crate::error::DnsError;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] DnsError),
}

/// Anything that can carry a DNS query to a resolver and bring the
/// response back. Implementations do not retry; a failed exchange
/// propagates to the caller as-is.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn send(&self, query: &DnsMessage) -> Result<DnsMessage, TransportError>;
}
