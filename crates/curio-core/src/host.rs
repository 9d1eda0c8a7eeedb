//! Hosting-shell contract for context publication.
//!
//! The hosting environment (an embedding shell around the widget) may expose
//! a side-channel widget-state setter, a generic context-update call, or
//! both, and may reject content blocks and structured data independently.
//! Which shapes it accepts is unknown until tried unless it advertises a
//! capability descriptor.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

/// Host-declared acceptance matrix for payload shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub widget_state: bool,
    pub content_blocks: bool,
    pub structured_content: bool,
}

impl HostCapabilities {
    pub const fn new(widget_state: bool, content_blocks: bool, structured_content: bool) -> Self {
        Self {
            widget_state,
            content_blocks,
            structured_content,
        }
    }

    pub const fn full() -> Self {
        Self::new(true, true, true)
    }

    pub const fn none() -> Self {
        Self::new(false, false, false)
    }
}

/// One generic context update; either half may be omitted for hosts that
/// reject the other.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextUpdate {
    pub content: Option<String>,
    pub structured: Option<Value>,
}

impl ContextUpdate {
    pub fn combined(content: String, structured: Value) -> Self {
        Self {
            content: Some(content),
            structured: Some(structured),
        }
    }

    pub fn content_only(content: String) -> Self {
        Self {
            content: Some(content),
            structured: None,
        }
    }

    pub fn structured_only(structured: Value) -> Self {
        Self {
            content: None,
            structured: Some(structured),
        }
    }
}

/// A host's refusal of one delivery attempt. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRejection {
    message: String,
}

impl HostRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HostRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HostRejection {}

type HostFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HostRejection>> + Send + 'a>>;

/// Hosting-shell contract.
pub trait HostShell: Send + Sync {
    /// The host's declared acceptance matrix, when it advertises one.
    fn capabilities(&self) -> Option<HostCapabilities>;

    /// Side-channel widget-state setter.
    fn set_widget_state<'a>(&'a self, state: &'a Value) -> HostFuture<'a>;

    /// Generic context update carrying content and/or structured data.
    fn update_context<'a>(&'a self, update: ContextUpdate) -> HostFuture<'a>;
}

/// Host that accepts and discards everything; used when no real shell is
/// attached (publication is an enhancement, never a requirement).
#[derive(Debug, Default)]
pub struct NoopHostShell;

impl HostShell for NoopHostShell {
    fn capabilities(&self) -> Option<HostCapabilities> {
        Some(HostCapabilities::full())
    }

    fn set_widget_state<'a>(&'a self, state: &'a Value) -> HostFuture<'a> {
        let _ = state;
        Box::pin(async move { Ok(()) })
    }

    fn update_context<'a>(&'a self, update: ContextUpdate) -> HostFuture<'a> {
        let _ = update;
        Box::pin(async move { Ok(()) })
    }
}
