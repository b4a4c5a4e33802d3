//! The per-request unit of work.
//!
//! One `RequestContext` is created for each request or process that handles
//! lifecycle events and passed by reference through the recorder. It is
//! dropped with the request, so nothing leaks into unrelated requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::Actor;

/// Where the triggering request came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Path of the script that handled the request (e.g. `/index.php`).
    pub script: String,
    /// Request URL, when the request came over HTTP.
    pub request_url: Option<String>,
}

impl Caller {
    pub fn script(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            request_url: None,
        }
    }

    pub fn with_request_url(mut self, url: impl Into<String>) -> Self {
        self.request_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlates log lines emitted while handling this request.
    pub request_id: Uuid,
    pub actor: Actor,
    pub caller: Option<Caller>,
}

impl RequestContext {
    pub fn new(actor: Actor) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            actor,
            caller: None,
        }
    }

    /// A context for system-triggered work (cron jobs, imports).
    pub fn system() -> Self {
        Self::new(Actor::system())
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }
}
