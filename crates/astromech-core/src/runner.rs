use crate::client::BackendClient;
use crate::error::Result;
use crate::script::{self, Script};

/// Parse, validate and submit a script to the executor.
///
/// Nothing is sent unless the text parses and passes shape validation.
/// Returns the submitted script.
pub fn run(client: &BackendClient, script_text: &str) -> Result<Script> {
    let script = script::parse_and_validate(script_text)?;
    tracing::debug!(commands = script.len(), "submitting routine");
    client.execute_routine(&script)?;
    Ok(script)
}
