//! Scripted in-memory transport (for testing and offline use)

use super::{Payload, Transport};
use crate::error::{BookalopeError, ProtocolError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A request seen by a [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// A canned server reply
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Attachment(Vec<u8>),
    Empty,
    Status(u16, String),
}

#[derive(Default)]
struct State {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    requests: Vec<RecordedRequest>,
}

/// Transport that answers from scripted replies and records every request.
///
/// Replies for a route are served in order; the last one keeps being
/// served, so a status endpoint can be scripted as `processing` then
/// `available`. Unscripted routes answer 404.
#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<State>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a reply for `method path`
    pub fn reply(&self, method: Method, path: impl Into<String>, reply: Reply) -> &Self {
        self.state()
            .routes
            .entry((method, path.into()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn on_get_json(&self, path: impl Into<String>, body: Value) -> &Self {
        self.reply(Method::GET, path, Reply::Json(body))
    }

    pub fn on_get_bytes(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &Self {
        self.reply(Method::GET, path, Reply::Attachment(bytes.into()))
    }

    pub fn on_post_json(&self, path: impl Into<String>, body: Value) -> &Self {
        self.reply(Method::POST, path, Reply::Json(body))
    }

    pub fn on_post_empty(&self, path: impl Into<String>) -> &Self {
        self.reply(Method::POST, path, Reply::Empty)
    }

    pub fn on_delete(&self, path: impl Into<String>) -> &Self {
        self.reply(Method::DELETE, path, Reply::Empty)
    }

    /// Drop all queued replies for a route, so the next ones replace them
    pub fn reset_route(&self, method: Method, path: &str) -> &Self {
        self.state().routes.remove(&(method, path.to_string()));
        self
    }

    /// All requests seen so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state().requests.last().cloned()
    }

    fn answer(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Reply> {
        let mut state = self.state();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        });

        let key = (method, path.to_string());
        let reply = match state.routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Status(status, body)) => Err(BookalopeError::Http { status, body }),
            Some(reply) => Ok(reply),
            None => Err(BookalopeError::Http {
                status: 404,
                body: format!("no route for {} {}", key.0, key.1),
            }),
        }
    }
}

fn unexpected(what: &str) -> BookalopeError {
    ProtocolError::UnexpectedResponse(what.to_string()).into()
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Payload> {
        match self.answer(Method::GET, path, query, None)? {
            Reply::Json(value) => Ok(Payload::Json(value)),
            Reply::Attachment(bytes) => Ok(Payload::Attachment(bytes)),
            _ => Err(unexpected("GET reply is neither JSON nor an attachment")),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        match self.answer(Method::POST, path, &[], Some(body.clone()))? {
            Reply::Json(value) => Ok(Some(value)),
            Reply::Empty => Ok(None),
            _ => Err(unexpected("POST reply is not JSON")),
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        match self.answer(Method::DELETE, path, &[], None)? {
            Reply::Empty => Ok(()),
            _ => Err(unexpected("DELETE reply has a body")),
        }
    }
}
