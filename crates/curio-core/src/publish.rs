//! Signature-deduplicated context publication with layered fallback.
//!
//! A payload is delivered through the first channel the host accepts, in
//! fixed preference order. An unchanged payload is never re-delivered, and a
//! host that rejects every channel degrades the publish to a no-op instead
//! of failing the interaction.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::domain::{ArtworkCard, ArtworkDetail, SearchQuery};
use crate::host::{ContextUpdate, HostShell};

/// Derived fingerprint of a payload, used to suppress redundant re-delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublishSignature(String);

impl PublishSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PublishSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable results-or-selection summary handed to the host.
///
/// Constructed fresh per publish attempt and never mutated afterwards; a
/// newer payload supersedes it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextPayload {
    Results {
        query: String,
        total: u64,
        page: u32,
        cards: Vec<ArtworkCard>,
    },
    Selection {
        detail: ArtworkDetail,
    },
}

impl ContextPayload {
    pub fn from_results(query: &SearchQuery, total: u64, cards: &[ArtworkCard]) -> Self {
        Self::Results {
            query: query.text().to_owned(),
            total,
            page: query.page(),
            cards: cards.to_vec(),
        }
    }

    pub fn from_selection(detail: &ArtworkDetail) -> Self {
        Self::Selection {
            detail: detail.clone(),
        }
    }

    /// Canonical human-readable rendering, used for content-block delivery
    /// and as the signature input.
    pub fn canonical_text(&self) -> String {
        match self {
            Self::Results {
                query,
                total,
                page,
                cards,
            } => {
                let mut lines = Vec::with_capacity(cards.len() + 1);
                lines.push(format!(
                    "Search \"{query}\" matched {total} artwork(s); page {page} shows {}.",
                    cards.len()
                ));
                for card in cards {
                    lines.push(format!(
                        "- [{}] {} — {} ({})",
                        card.id, card.title, card.artist, card.date_line
                    ));
                }
                lines.join("\n")
            }
            Self::Selection { detail } => format!(
                "Selected [{}] {} — {} ({}). {}. {}",
                detail.id,
                detail.title,
                detail.artist,
                detail.date_line,
                detail.medium,
                detail.credit_line
            ),
        }
    }

    /// Structured rendering for hosts that consume data instead of text.
    pub fn structured(&self) -> Value {
        match self {
            Self::Results {
                query,
                total,
                page,
                cards,
            } => json!({
                "kind": "results",
                "query": query,
                "total": total,
                "page": page,
                "cards": cards,
            }),
            Self::Selection { detail } => json!({
                "kind": "selection",
                "artwork": detail,
            }),
        }
    }

    /// Side-channel widget state: the structured form plus the canonical
    /// text, which is what downstream widget consumers read most reliably.
    pub fn widget_state(&self) -> Value {
        json!({
            "context": self.structured(),
            "summary": self.canonical_text(),
        })
    }

    pub fn signature(&self) -> PublishSignature {
        let canonical = format!("{}\n{}", self.canonical_text(), self.structured());
        PublishSignature(format!("{:016x}", fold_hash(&canonical)))
    }
}

fn fold_hash(input: &str) -> u64 {
    input.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, byte| {
        (acc ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Delivery channels in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    WidgetState,
    ContentAndStructured,
    ContentOnly,
    StructuredOnly,
}

impl Strategy {
    const ORDERED: [Self; 4] = [
        Self::WidgetState,
        Self::ContentAndStructured,
        Self::ContentOnly,
        Self::StructuredOnly,
    ];

    fn permitted(self, caps: crate::host::HostCapabilities) -> bool {
        match self {
            Self::WidgetState => caps.widget_state,
            Self::ContentAndStructured => caps.content_blocks && caps.structured_content,
            Self::ContentOnly => caps.content_blocks,
            Self::StructuredOnly => caps.structured_content,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::WidgetState => "widget_state",
            Self::ContentAndStructured => "content+structured",
            Self::ContentOnly => "content",
            Self::StructuredOnly => "structured",
        }
    }
}

/// Result of one publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Delivered through some channel; carries the new signature.
    Published(PublishSignature),
    /// Payload identical to the last published one; nothing was sent.
    Unchanged(PublishSignature),
    /// Every channel refused; the previous signature (if any) is retained.
    NotPublished(Option<PublishSignature>),
}

impl PublishOutcome {
    pub fn delivered(&self) -> bool {
        matches!(self, Self::Published(_))
    }
}

/// Publisher owning the last-published signature for its host.
pub struct ContextPublisher {
    host: Arc<dyn HostShell>,
    last_signature: Mutex<Option<PublishSignature>>,
}

impl ContextPublisher {
    pub fn new(host: Arc<dyn HostShell>) -> Self {
        Self {
            host,
            last_signature: Mutex::new(None),
        }
    }

    pub async fn last_signature(&self) -> Option<PublishSignature> {
        self.last_signature.lock().await.clone()
    }

    /// Delivers `payload` through the first accepting channel.
    pub async fn publish(&self, payload: &ContextPayload) -> PublishOutcome {
        let signature = payload.signature();

        let mut last = self.last_signature.lock().await;
        if last.as_ref() == Some(&signature) {
            return PublishOutcome::Unchanged(signature);
        }

        let caps = self.host.capabilities();
        for strategy in Strategy::ORDERED {
            if let Some(caps) = caps {
                if !strategy.permitted(caps) {
                    continue;
                }
            }

            match self.attempt(strategy, payload).await {
                Ok(()) => {
                    *last = Some(signature.clone());
                    return PublishOutcome::Published(signature);
                }
                Err(rejection) => {
                    tracing::debug!(
                        channel = strategy.label(),
                        reason = rejection.message(),
                        "context delivery channel refused"
                    );
                }
            }
        }

        tracing::warn!("context publish degraded: no delivery channel accepted the payload");
        PublishOutcome::NotPublished(last.clone())
    }

    async fn attempt(
        &self,
        strategy: Strategy,
        payload: &ContextPayload,
    ) -> Result<(), crate::host::HostRejection> {
        match strategy {
            Strategy::WidgetState => {
                let state = payload.widget_state();
                self.host.set_widget_state(&state).await
            }
            Strategy::ContentAndStructured => {
                self.host
                    .update_context(ContextUpdate::combined(
                        payload.canonical_text(),
                        payload.structured(),
                    ))
                    .await
            }
            Strategy::ContentOnly => {
                self.host
                    .update_context(ContextUpdate::content_only(payload.canonical_text()))
                    .await
            }
            Strategy::StructuredOnly => {
                self.host
                    .update_context(ContextUpdate::structured_only(payload.structured()))
                    .await
            }
        }
    }
}
