//! Shared test doubles for curio behavior tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use curio_core::{
    ContextUpdate, HostCapabilities, HostRejection, HostShell, HttpClient, HttpFailure,
    HttpResponse, OutboundCall,
};
use serde_json::Value;

/// Transport whose response never arrives; exercises the timeout race.
pub struct PendingTransport;

impl HttpClient for PendingTransport {
    fn execute<'a>(
        &'a self,
        _call: OutboundCall,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpFailure>> + Send + 'a>> {
        Box::pin(std::future::pending())
    }
}

/// Transport answering instantly with a fixed body and counting calls.
pub struct InstantTransport {
    body: String,
    pub calls: AtomicUsize,
}

impl InstantTransport {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for InstantTransport {
    fn execute<'a>(
        &'a self,
        _call: OutboundCall,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpFailure>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body.clone();
        Box::pin(async move { Ok(HttpResponse::ok_json(body)) })
    }
}

/// Scriptable host shell that records every delivery attempt.
pub struct RecordingHost {
    capabilities: Option<HostCapabilities>,
    accept_widget_state: bool,
    accept_content: bool,
    accept_structured: bool,
    widget_state_attempts: AtomicUsize,
    update_attempts: AtomicUsize,
    last_widget_state: Mutex<Option<Value>>,
    last_update: Mutex<Option<ContextUpdate>>,
}

impl RecordingHost {
    pub fn accepting_all() -> Self {
        Self {
            capabilities: None,
            accept_widget_state: true,
            accept_content: true,
            accept_structured: true,
            widget_state_attempts: AtomicUsize::new(0),
            update_attempts: AtomicUsize::new(0),
            last_widget_state: Mutex::new(None),
            last_update: Mutex::new(None),
        }
    }

    pub fn rejecting_all() -> Self {
        Self {
            accept_widget_state: false,
            accept_content: false,
            accept_structured: false,
            ..Self::accepting_all()
        }
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn with_widget_state_accepted(mut self, accept: bool) -> Self {
        self.accept_widget_state = accept;
        self
    }

    pub fn with_content_accepted(mut self, accept: bool) -> Self {
        self.accept_content = accept;
        self
    }

    pub fn with_structured_accepted(mut self, accept: bool) -> Self {
        self.accept_structured = accept;
        self
    }

    pub fn widget_state_attempts(&self) -> usize {
        self.widget_state_attempts.load(Ordering::SeqCst)
    }

    pub fn update_attempts(&self) -> usize {
        self.update_attempts.load(Ordering::SeqCst)
    }

    pub fn total_attempts(&self) -> usize {
        self.widget_state_attempts() + self.update_attempts()
    }

    pub fn last_widget_state(&self) -> Option<Value> {
        self.last_widget_state
            .lock()
            .expect("recording lock is not poisoned")
            .clone()
    }

    pub fn last_update(&self) -> Option<ContextUpdate> {
        self.last_update
            .lock()
            .expect("recording lock is not poisoned")
            .clone()
    }
}

impl HostShell for RecordingHost {
    fn capabilities(&self) -> Option<HostCapabilities> {
        self.capabilities
    }

    fn set_widget_state<'a>(
        &'a self,
        state: &'a Value,
    ) -> Pin<Box<dyn Future<Output = Result<(), HostRejection>> + Send + 'a>> {
        self.widget_state_attempts.fetch_add(1, Ordering::SeqCst);
        let accepted = self.accept_widget_state;
        if accepted {
            *self
                .last_widget_state
                .lock()
                .expect("recording lock is not poisoned") = Some(state.clone());
        }
        Box::pin(async move {
            if accepted {
                Ok(())
            } else {
                Err(HostRejection::new("widget state channel refused"))
            }
        })
    }

    fn update_context<'a>(
        &'a self,
        update: ContextUpdate,
    ) -> Pin<Box<dyn Future<Output = Result<(), HostRejection>> + Send + 'a>> {
        self.update_attempts.fetch_add(1, Ordering::SeqCst);

        let content_ok = update.content.is_none() || self.accept_content;
        let structured_ok = update.structured.is_none() || self.accept_structured;
        let accepted = content_ok && structured_ok;

        if accepted {
            *self
                .last_update
                .lock()
                .expect("recording lock is not poisoned") = Some(update);
        }
        Box::pin(async move {
            if accepted {
                Ok(())
            } else {
                Err(HostRejection::new("context update channel refused"))
            }
        })
    }
}
