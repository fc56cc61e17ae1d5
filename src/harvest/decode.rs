//! Log decoding and record splitting

use std::fmt;
use std::str::FromStr;

const BOM: char = '\u{feff}';

/// Text encoding of invocation logs. MSBuild writes tlogs as UTF-16LE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogEncoding {
    #[default]
    Utf16Le,
    Utf8,
}

impl FromStr for LogEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "utf-16le" | "utf16le" | "utf-16" => Ok(LogEncoding::Utf16Le),
            "utf-8" | "utf8" => Ok(LogEncoding::Utf8),
            other => Err(format!("unknown log encoding: {}", other)),
        }
    }
}

impl fmt::Display for LogEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEncoding::Utf16Le => write!(f, "utf-16le"),
            LogEncoding::Utf8 => write!(f, "utf-8"),
        }
    }
}

/// Decodes raw log bytes, dropping a leading byte-order mark.
pub fn decode_log(bytes: &[u8], encoding: LogEncoding) -> Result<String, String> {
    let text = match encoding {
        LogEncoding::Utf16Le => {
            if bytes.len() % 2 != 0 {
                return Err(format!(
                    "odd byte count ({}) for UTF-16LE content",
                    bytes.len()
                ));
            }
            let units = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|e| format!("invalid UTF-16LE: {}", e))?
        }
        LogEncoding::Utf8 => std::str::from_utf8(bytes)
            .map_err(|e| format!("invalid UTF-8: {}", e))?
            .to_string(),
    };

    Ok(match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Splits decoded log text into invocation records.
///
/// The first line is the log header and is always dropped. Lines starting
/// with `^` name the tracked source and are dropped too, as are blank lines.
/// Kept records retain their trailing line break.
pub fn split_records(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    text.split_inclusive('\n')
        .skip(1)
        .filter(|line| !line.starts_with('^'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
