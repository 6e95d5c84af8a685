//! Ships batches to an HTTP SIEM collector (Splunk HEC / webhook style
//! ingest) as newline-delimited JSON.

use crate::adapter::{SinkAdapter, SinkHealth};
use crate::error::SendErrorKind;
use async_trait::async_trait;
use audit_recorder::AuditRecord;
use std::time::Duration;

pub struct HttpSinkAdapter {
    client: reqwest::Client,
    endpoint: String,
    auth_header: Option<String>,
    max_payload_size: usize,
}

impl HttpSinkAdapter {
    pub fn new(endpoint: impl Into<String>, auth_header: Option<String>, max_payload_size: usize) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client builds with static config"),
            endpoint: endpoint.into(),
            auth_header,
            max_payload_size,
        }
    }
}

#[async_trait]
impl SinkAdapter for HttpSinkAdapter {
    async fn send_batch(&self, records: &[AuditRecord]) -> Result<usize, SendErrorKind> {
        let body = records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SendErrorKind::Rejected(e.to_string()))?
            .join("\n");

        let mut req = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/x-ndjson")
            .body(body);
        if let Some(auth) = &self.auth_header {
            req = req.header("authorization", auth.clone());
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                SendErrorKind::Timeout
            } else {
                SendErrorKind::Transport(e.to_string())
            }
        })?;

        if resp.status().is_success() {
            Ok(records.len())
        } else if resp.status().is_client_error() {
            Err(SendErrorKind::Rejected(resp.status().to_string()))
        } else {
            Err(SendErrorKind::Transport(resp.status().to_string()))
        }
    }

    async fn health(&self) -> SinkHealth {
        match self.client.head(&self.endpoint).send().await {
            Ok(resp) if resp.status().is_success() => SinkHealth::Healthy,
            Ok(resp) => SinkHealth::Degraded(resp.status().to_string()),
            Err(e) => SinkHealth::Unhealthy(e.to_string()),
        }
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}
