//! DNS-over-HTTPS client transport.
//!
//! Sends the wire-format query base64-encoded in the `dns` query
//! parameter of a GET request, with `ct` naming the wire content type and
//! `ts` a cache-busting request timestamp, and decodes the response body
//! as a DNS wire message.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::trace;

use super::{QueryTransport, TransportError};
use crate::dns::DnsMessage;

const WIRE_CONTENT_TYPE: &str = "application/dns-udpwireformat";

pub struct DohTransport {
    client: reqwest::Client,
    url: String,
}

impl DohTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl QueryTransport for DohTransport {
    async fn send(&self, query: &DnsMessage) -> Result<DnsMessage, TransportError> {
        let wire = query.encode();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            .to_string();
        trace!(url = %self.url, query_len = wire.len(), "sending DoH request");

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("ct", WIRE_CONTENT_TYPE),
                ("dns", BASE64.encode(&wire).as_str()),
                ("ts", ts.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        trace!(response_len = body.len(), "received DoH response");

        Ok(DnsMessage::decode(&body)?)
    }
}
