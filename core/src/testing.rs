//! Test doubles: a transport that replays canned responses.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued responses in order and records every request it sees.
///
/// Running out of responses is reported as a transport failure, so a test
/// that issues an unexpected call fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, String>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub fn push_json(&self, body: Value) {
        self.push(HttpResponse::ok(body.to_string()));
    }

    /// Queue a connection-level failure.
    pub fn push_failure(&self, reason: &str) {
        self.responses.borrow_mut().push_back(Err(reason.to_string()));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Request bodies parsed back into JSON.
    pub fn request_bodies(&self) -> Vec<Value> {
        self.requests
            .borrow()
            .iter()
            .map(|request| serde_json::from_str(&request.body).unwrap_or(Value::Null))
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let endpoint = request.url.clone();
        self.requests.borrow_mut().push(request);
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response left".to_string()));
        next.map_err(|reason| TransportError::Request {
            endpoint,
            source: reason.into(),
        })
    }
}

/// A successful envelope around `content`.
pub fn envelope(content: Value) -> Value {
    json!({
        "ResponseCode": 200,
        "Message": "Success",
        "Errors": [],
        "Content": content,
        "UsageKey": "00000000-0000-0000-0000-000000000000"
    })
}

/// `CreateAPISession` content carrying `token`.
pub fn session_content(token: &str) -> Value {
    json!({
        "CompanyName": "Koontz Bryant Johnson Williams, INC.",
        "UsingICRMobile": true,
        "SessionToken": token,
        "SessionExpiration": "2023-10-08T13:20:48.3275167-04:00",
        "APIURL": "http://ajera.test/AjeraAPI.ashx",
        "AjeraVersion": "9.90.02",
        "ICRConfigFile": {
            "icrURL": "deltek",
            "icrClientId": "client-id",
            "icrUserName": "deltek.ajera",
            "icrApiKey": "api-key"
        }
    })
}
