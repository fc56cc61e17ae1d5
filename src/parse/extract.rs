//! Parameter extraction from raw `cl.exe` command lines

use super::normalize::unquote;
use super::tokenizer::MarkerTokens;
use crate::error::RecordError;

pub const DEFINE_MARKER: &str = " /D";
pub const INCLUDE_MARKER: &str = " /I";
pub const OUTPUT_DIR_MARKER: &str = " /Fo";

const SOURCE_TERMINATOR: &str = "\n\"";

/// All tokens following `marker`, in occurrence order.
pub fn extract_from_pattern(cmd_line: &str, marker: &str) -> Vec<String> {
    MarkerTokens::new(cmd_line, marker)
        .map(str::to_string)
        .collect()
}

/// The `/Fo` value. Only the first occurrence counts.
pub fn extract_output_dir(cmd_line: &str) -> Option<String> {
    MarkerTokens::new(cmd_line, OUTPUT_DIR_MARKER)
        .next()
        .map(str::to_string)
}

/// The source file: the last argument before the record terminator.
///
/// The terminator is the last newline immediately followed by `"`. A record
/// without one may instead end in a line break. Whitespace before the
/// terminator is ignored and the source runs from the last space; when that argument ends in a quote the
/// opening quote is honored, so a quoted path may contain spaces.
pub fn extract_source_file(cmd_line: &str) -> Result<String, RecordError> {
    let end = match cmd_line.rfind(SOURCE_TERMINATOR) {
        Some(index) => index,
        None => {
            let stripped = cmd_line
                .strip_suffix('\n')
                .ok_or(RecordError::MissingTerminator)?;
            stripped.strip_suffix('\r').unwrap_or(stripped).len()
        }
    };

    let head = cmd_line[..end].trim_end();
    let start = source_start(head).ok_or(RecordError::MissingSeparator)?;
    let source = &head[start..];

    if unquote(source).0.trim().is_empty() {
        return Err(RecordError::EmptySource);
    }
    Ok(source.to_string())
}

/// Start of the last argument in `head`, which has no trailing whitespace.
fn source_start(head: &str) -> Option<usize> {
    if let Some(body) = head.strip_suffix('"') {
        if let Some(open) = body.rfind('"') {
            if open > 0 && head[..open].ends_with(' ') {
                return Some(open);
            }
        }
    }

    head.rfind(' ').map(|space| space + 1)
}
