// crates/foxden-doi-services/tests/common/mod.rs
// ============================================================================
// Module: Service Test Helpers
// Description: Scripted metadata service for catalog client tests.
// Purpose: Record catalog requests and replay canned service responses.
// Dependencies: tiny_http
// ============================================================================

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// How long the server waits for the next expected request.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Request observed by the scripted service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path and query.
    pub url: String,
    /// Authorization header, if any.
    pub authorization: Option<String>,
    /// Raw request body.
    pub body: String,
}

/// Metadata service stub answering a fixed sequence of requests.
pub struct MetadataService {
    /// Base URL of the service.
    pub base_url: String,
    /// Worker returning every recorded request.
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl MetadataService {
    /// Starts a service that answers `responses` (status, raw body) in order.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let Ok(Some(mut request)) = server.recv_timeout(RECV_TIMEOUT) else {
                    break;
                };
                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_string());
                let mut received = String::new();
                let _ = request.as_reader().read_to_string(&mut received);
                recorded.push(RecordedRequest {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    authorization,
                    body: received,
                });
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
                let _ = request.respond(response);
            }
            recorded
        });
        Self {
            base_url: format!("http://{addr}/meta"),
            handle,
        }
    }

    /// Waits for the worker and returns the recorded requests.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().unwrap()
    }
}
