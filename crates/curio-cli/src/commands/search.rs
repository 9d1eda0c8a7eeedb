use std::time::Instant;

use curio_core::{ExploreSession, SearchOutcome, SearchQuery, SessionError};
use serde_json::{json, Value};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::{session_error_to_envelope, CommandResult};

pub async fn run(session: &ExploreSession, args: &SearchArgs) -> Result<CommandResult, CliError> {
    let query = SearchQuery::new(args.text.as_str(), args.page, args.limit)?;

    let started = Instant::now();
    let outcome = session.search(query).await;
    let latency_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

    match outcome {
        Ok(SearchOutcome::Applied(summary)) => {
            let view = session.view().await;
            let data = json!({
                "query": view.query,
                "total": summary.total,
                "page": summary.page,
                "total_pages": summary.total_pages,
                "cards": view.cards,
            });

            let mut result = CommandResult::ok(data).with_latency(latency_ms);
            if let Some(note) = summary.note {
                result = result.with_warning(note);
            }
            if !summary.published {
                result = result.with_warning("results were not published to the hosting shell");
            }
            Ok(result)
        }
        // A single-command process runs one search; a superseded outcome
        // would mean a competing caller, which the CLI does not have.
        Ok(SearchOutcome::Superseded) => Err(CliError::Command(String::from(
            "search was superseded before it completed",
        ))),
        Err(SessionError::Validation(error)) => Err(error.into()),
        Err(error) => Ok(CommandResult::ok(Value::Null)
            .with_latency(latency_ms)
            .with_error(session_error_to_envelope(&error, session.source_id()))),
    }
}
