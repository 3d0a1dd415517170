//! Test doubles for the model boundary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{LlmError, ModelInvoker, ModelRequest};

/// 1x1 PNG, small enough to inline in request fixtures.
pub const TINY_PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

enum Reply {
    Value(Value),
    Timeout,
    Unreachable,
    Empty,
}

/// Canned `ModelInvoker` that counts calls and keeps the last request.
pub struct StubModel {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<ModelRequest>>,
}

impl StubModel {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn returning(value: Value) -> Self {
        Self::with(Reply::Value(value))
    }

    pub fn timing_out() -> Self {
        Self::with(Reply::Timeout)
    }

    pub fn unreachable() -> Self {
        Self::with(Reply::Unreachable)
    }

    pub fn empty() -> Self {
        Self::with(Reply::Empty)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelInvoker for StubModel {
    async fn invoke(&self, request: &ModelRequest) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match &self.reply {
            Reply::Value(value) => Ok(value.clone()),
            Reply::Timeout => Err(LlmError::Timeout),
            Reply::Unreachable => Err(LlmError::Api {
                status: 529,
                message: "Overloaded".to_string(),
            }),
            Reply::Empty => Err(LlmError::EmptyContent),
        }
    }
}
