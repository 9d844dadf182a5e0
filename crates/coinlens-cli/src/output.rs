use std::fmt::Write as _;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::envelope::Envelope;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let rendered = match format {
        OutputFormat::Json => render_json(&output.envelope, pretty)?,
        OutputFormat::Table => render_table(&output.envelope, output.text.as_deref())?,
    };
    println!("{rendered}");
    Ok(())
}

fn render_json(envelope: &Envelope<Value>, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    Ok(payload)
}

/// Metadata lines, then the text view when the command has one and the
/// indented JSON data otherwise.
fn render_table(envelope: &Envelope<Value>, text: Option<&str>) -> Result<String, CliError> {
    let meta = &envelope.meta;
    let sources = meta
        .sources
        .iter()
        .map(|source| source.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut out = String::new();
    let _ = writeln!(out, "request_id  : {}", meta.request_id);
    let _ = writeln!(out, "schema      : {}", meta.schema_version);
    let _ = writeln!(out, "generated_at: {}", meta.generated_at);
    let _ = writeln!(out, "sources     : {sources}");
    let _ = writeln!(out, "latency_ms  : {}", meta.latency_ms);

    if !meta.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &meta.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    match text {
        Some(text) => {
            out.push('\n');
            out.push_str(text.trim_end());
            out.push('\n');
        }
        None => {
            out.push_str("data:\n");
            for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
    }

    if !envelope.errors.is_empty() {
        out.push_str("errors:\n");
        for error in &envelope.errors {
            let _ = writeln!(out, "  - {}: {}", error.code, error.message);
        }
    }

    Ok(out.trim_end().to_owned())
}
