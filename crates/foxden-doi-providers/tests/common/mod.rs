// crates/foxden-doi-providers/tests/common/mod.rs
// ============================================================================
// Module: Provider Test Helpers
// Description: Scripted HTTP servers and request fixtures for provider tests.
// Purpose: Record provider requests and replay canned registry responses.
// Dependencies: foxden-doi-core, serde_json, tiny_http
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use foxden_doi_core::DatasetId;
use foxden_doi_core::MetadataRecord;
use foxden_doi_providers::ProviderHttpConfig;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Request observed by a scripted server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path and query.
    pub url: String,
    /// Authorization header, if any.
    pub authorization: Option<String>,
    /// Content-Type header, if any.
    pub content_type: Option<String>,
    /// Raw request body.
    pub body: String,
}

impl RecordedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Canned response: status code and JSON body.
///
/// Occurrences of `{base}` in the body are replaced with the server base URL.
pub type Scripted = (u16, Value);

/// Placeholder substituted with the server base URL in canned bodies.
pub const BASE_PLACEHOLDER: &str = "{base}";

/// How long the server waits for the next expected request.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Server answering a fixed sequence of requests.
pub struct ScriptedServer {
    /// Base URL of the server.
    pub base_url: String,
    /// Worker returning every recorded request.
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl ScriptedServer {
    /// Starts a server that answers `responses` in order, then stops.
    ///
    /// The server also stops once no request arrives within a few seconds.
    pub fn start(responses: Vec<Scripted>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let base_url = format!("http://{addr}");
        let base = base_url.clone();
        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let Ok(Some(mut request)) = server.recv_timeout(RECV_TIMEOUT) else {
                    break;
                };
                let header = |name: &'static str| {
                    request
                        .headers()
                        .iter()
                        .find(|header| header.field.equiv(name))
                        .map(|header| header.value.as_str().to_string())
                };
                let authorization = header("Authorization");
                let content_type = header("Content-Type");
                let mut received = String::new();
                let _ = request.as_reader().read_to_string(&mut received);
                recorded.push(RecordedRequest {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    authorization,
                    content_type,
                    body: received,
                });
                let text = body.to_string().replace(BASE_PLACEHOLDER, &base);
                let response = Response::from_string(text)
                    .with_status_code(status)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
                let _ = request.respond(response);
            }
            recorded
        });
        Self { base_url, handle }
    }

    /// Builds a URL on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Waits for the worker and returns the recorded requests.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().unwrap()
    }
}

/// HTTP settings suitable for local test servers.
pub fn http_config() -> ProviderHttpConfig {
    ProviderHttpConfig {
        timeout_ms: 5_000,
        ..ProviderHttpConfig::default()
    }
}

/// Dataset used across provider tests.
pub fn sample_did() -> DatasetId {
    DatasetId::new("/beamline=3a/btr=123-a/cycle=2024-3/sample_name=bar")
}

/// Metadata record matching [`sample_did`].
pub fn sample_record() -> MetadataRecord {
    serde_json::from_value(json!({
        "did": sample_did().as_str(),
        "beamline": ["3a"],
        "btr": "123-a",
        "sample_name": "bar",
    }))
    .unwrap()
}
