use std::time::Instant;

use curio_core::{ArtworkId, ExploreSession, SelectionOutcome, SessionError};
use serde_json::{json, Value};

use crate::cli::ArtworkArgs;
use crate::error::CliError;

use super::{session_error_to_envelope, CommandResult};

pub async fn run(session: &ExploreSession, args: &ArtworkArgs) -> Result<CommandResult, CliError> {
    let id = ArtworkId::new(args.id)?;

    let started = Instant::now();
    let outcome = session.open_artwork(id).await;
    let latency_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

    match outcome {
        Ok(SelectionOutcome::Applied(detail)) => {
            let data = json!({ "artwork": detail });
            Ok(CommandResult::ok(data).with_latency(latency_ms))
        }
        Ok(SelectionOutcome::Superseded) => Err(CliError::Command(String::from(
            "selection was superseded before it completed",
        ))),
        Err(SessionError::Validation(error)) => Err(error.into()),
        Err(error) => Ok(CommandResult::ok(Value::Null)
            .with_latency(latency_ms)
            .with_error(session_error_to_envelope(&error, session.source_id()))),
    }
}
