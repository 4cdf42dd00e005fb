//! API documentation handler.

use serde_json::Value;

use aadhar_api::AadharClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Documented paths, one per line.
fn paths(doc: &Value) -> String {
    doc.get("paths")
        .and_then(Value::as_object)
        .map(|paths| paths.keys().cloned().collect::<Vec<_>>().join("\n"))
        .unwrap_or_default()
}

pub async fn handle(client: &AadharClient, global: &GlobalOpts) -> Result<(), CliError> {
    let doc = client.swagger().await?;
    let out = output::render_single(
        &global.output,
        &doc,
        |d| output::render_json(d, false),
        paths,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
