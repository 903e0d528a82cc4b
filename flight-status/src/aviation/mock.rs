//! Mock aviation transport for testing without API access.
//!
//! Serves canned JSON documents per endpoint and records every call, so
//! tests can assert both what was asked and how often the network would
//! have been hit.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::client::FlightTransport;
use super::error::TransportError;
use super::types::{Params, RawResponse};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub params: Params,
}

/// Mock transport that serves JSON documents keyed by endpoint.
///
/// Every call returns a freshly allocated copy of the canned document, so a
/// response that is pointer-equal to an earlier one must have come from a
/// cache above this transport.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<String, Value>,
    failure: Option<u16>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Create an empty mock; every call fails until responses are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `endpoint`.
    pub fn with_response(mut self, endpoint: impl Into<String>, body: Value) -> Self {
        self.responses.insert(endpoint.into(), body);
        self
    }

    /// Fail every call with the given HTTP status.
    pub fn failing(mut self, status: u16) -> Self {
        self.failure = Some(status);
        self
    }

    /// Load responses from a directory of `{endpoint}.json` files.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, TransportError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| TransportError::Status {
            status: 0,
            message: format!("Failed to read mock data directory: {}", e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| TransportError::Status {
                status: 0,
                message: format!("Failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let endpoint = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| TransportError::Status {
                    status: 0,
                    message: format!("Invalid filename: {:?}", path),
                })?
                .to_string();

            let json = std::fs::read_to_string(&path).map_err(|e| TransportError::Status {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

            let body: Value = serde_json::from_str(&json).map_err(|e| TransportError::Json {
                message: format!("Failed to parse {:?}: {}", path, e),
                body: None,
            })?;

            responses.insert(endpoint, body);
        }

        if responses.is_empty() {
            return Err(TransportError::Status {
                status: 0,
                message: format!("No mock response files found in {:?}", data_dir),
            });
        }

        Ok(Self {
            responses,
            ..Self::default()
        })
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock_calls().clone()
    }

    /// Endpoints with a canned response.
    pub fn available_endpoints(&self) -> Vec<&str> {
        self.responses.keys().map(String::as_str).collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn respond(&self, endpoint: &str, params: &Params) -> Result<RawResponse, TransportError> {
        self.lock_calls().push(RecordedCall {
            endpoint: endpoint.to_string(),
            params: params.clone(),
        });

        if let Some(status) = self.failure {
            return Err(TransportError::Status {
                status,
                message: "mock failure".to_string(),
            });
        }

        let body = self
            .responses
            .get(endpoint)
            .ok_or_else(|| TransportError::Status {
                status: 404,
                message: format!(
                    "No mock data for endpoint {}. Available: {:?}",
                    endpoint,
                    self.available_endpoints()
                ),
            })?;

        Ok(Arc::new(body.clone()))
    }
}

impl FlightTransport for MockTransport {
    async fn call(&self, endpoint: &str, params: &Params) -> Result<RawResponse, TransportError> {
        self.respond(endpoint, params)
    }
}
