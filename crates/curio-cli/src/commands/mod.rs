mod artwork;
mod search;
mod sources;

use std::sync::Arc;
use std::time::Duration;

use curio_core::{
    ArticAdapter, CallThrottle, CollectionSource, Envelope, EnvelopeError, EnvelopeMeta,
    ExploreSession, FixtureAdapter, NoopHostShell, ReqwestHttpClient, SessionConfig, SessionError,
    SourceId, TimedClient,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

const SCHEMA_VERSION: &str = "v1.0.0";

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let source_id: SourceId = cli.source.parse()?;
    let source = build_source(source_id, cli.timeout_ms);

    let result = match &cli.command {
        Command::Search(args) => {
            let session = build_session(Arc::clone(&source))?;
            search::run(&session, args).await?
        }
        Command::Artwork(args) => {
            let session = build_session(Arc::clone(&source))?;
            artwork::run(&session, args).await?
        }
        Command::Sources => sources::run(source.as_ref(), cli.timeout_ms)?,
    };

    let mut meta = EnvelopeMeta::new(
        format!("req-{}", Uuid::new_v4()),
        SCHEMA_VERSION,
        source_id,
        result.latency_ms,
    )?;
    for warning in result.warnings {
        meta.push_warning(warning);
    }

    let mut envelope = Envelope::success(meta, result.data);
    for error in result.errors {
        envelope.push_error(error)?;
    }

    Ok(envelope)
}

fn build_source(source_id: SourceId, timeout_ms: u64) -> Arc<dyn CollectionSource> {
    match source_id {
        SourceId::Artic => {
            let client = TimedClient::new(
                Arc::new(ReqwestHttpClient::new()),
                CallThrottle::default(),
            );
            Arc::new(
                ArticAdapter::new(client).with_call_timeout(Duration::from_millis(timeout_ms)),
            )
        }
        SourceId::Fixture => Arc::new(FixtureAdapter::default()),
    }
}

fn build_session(source: Arc<dyn CollectionSource>) -> Result<ExploreSession, CliError> {
    ExploreSession::new(source, Arc::new(NoopHostShell), SessionConfig::default())
        .map_err(CliError::Validation)
}

/// Maps a session failure into a structured envelope error whose message is
/// always safe to show.
pub fn session_error_to_envelope(error: &SessionError, source: SourceId) -> EnvelopeError {
    let (code, retryable) = match error {
        SessionError::Call(call) => (call.code(), call.retryable()),
        SessionError::HydrationFailed { .. } => ("session.hydration_failed", true),
        SessionError::Validation(_) => ("session.invalid_request", false),
    };

    EnvelopeError::new(code, error.user_message())
        .expect("code and user message are non-empty")
        .with_retryable(retryable)
        .with_source(source)
}
