use crate::cli::{CommandOutput, OutputFormat};
use anyhow::Result;
use std::io::Write;

pub fn emit(output: &CommandOutput, format: OutputFormat, compact: bool, quiet: bool) -> Result<()> {
    match output {
        CommandOutput::Rendered(text) => emit_rendered(text, quiet),
        CommandOutput::Json(value) => emit_value(value, format, compact, quiet),
    }
}

fn emit_rendered(text: &str, quiet: bool) -> Result<()> {
    if text.is_empty() || quiet {
        return Ok(());
    }
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n")?;
    }
    Ok(())
}

pub fn emit_value(
    value: &serde_json::Value,
    _format: OutputFormat,
    compact: bool,
    quiet: bool,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if compact || quiet {
        serde_json::to_writer(&mut handle, value)?;
    } else {
        serde_json::to_writer_pretty(&mut handle, value)?;
    }
    handle.write_all(b"\n")?;
    Ok(())
}
