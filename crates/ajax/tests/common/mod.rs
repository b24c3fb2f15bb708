//! In-memory transport that records every call and replays scripted replies.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use ajax::{BoxError, RequestInit, Transport, TransportResponse};
use async_trait::async_trait;

/// Scripted response. `body` is returned from `text()`; an `Err` simulates a
/// failed body read.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Result<String, String>,
}

impl MockResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: Ok(body.to_owned()),
        }
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: Ok(body.to_owned()),
        }
    }

    pub fn unreadable(message: &str) -> Self {
        Self {
            status: 200,
            body: Err(message.to_owned()),
        }
    }
}

#[async_trait]
impl TransportResponse for MockResponse {
    async fn text(self) -> Result<String, BoxError> {
        self.body.map_err(Into::into)
    }
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<(String, RequestInit)>>,
    replies: Mutex<VecDeque<Result<MockResponse, String>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, response: MockResponse) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_owned()));
        self
    }

    pub fn calls(&self) -> Vec<(String, RequestInit)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> (String, RequestInit) {
        self.calls().pop().expect("transport was not called")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    type Response = MockResponse;

    async fn perform_request(
        &self,
        url: &str,
        init: &RequestInit,
    ) -> Result<Self::Response, BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_owned(), init.clone()));
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Ok(MockResponse::ok("")),
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ajax=trace")
        .with_test_writer()
        .try_init();
}
