use curio_core::CollectionSource;
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

pub fn run(source: &dyn CollectionSource, timeout_ms: u64) -> Result<CommandResult, CliError> {
    let capabilities = source.capabilities();
    let health = source.health();

    let data = json!({
        "sources": [{
            "id": source.id().as_str(),
            "operations": capabilities.supported_operations(),
            "status": health.status_label(),
            "timeout_ms": timeout_ms,
        }],
    });

    Ok(CommandResult::ok(data))
}
