use super::extract::{
    extract_from_pattern, extract_output_dir, extract_source_file, DEFINE_MARKER, INCLUDE_MARKER,
};
use super::normalize::PathNormalizer;
use crate::error::RecordError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Compilation parameters of one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileArgs {
    /// Macro definitions as written, e.g. `WIN32` or `VERSION=2`
    #[serde(default)]
    pub defines: Vec<String>,
    /// Normalized include directories
    #[serde(default)]
    pub includes: Vec<String>,
    /// Normalized object output directory (`/Fo`)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub out_dir: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// A parsed compiler invocation keyed by its normalized source path.
///
/// Serialized as a single-entry object: `{ "<source>": { "defines": ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, CompileArgs>",
    try_from = "BTreeMap<String, CompileArgs>"
)]
pub struct CompileInvocation {
    pub source_file: String,
    pub args: CompileArgs,
}

impl From<CompileInvocation> for BTreeMap<String, CompileArgs> {
    fn from(invocation: CompileInvocation) -> Self {
        BTreeMap::from([(invocation.source_file, invocation.args)])
    }
}

impl TryFrom<BTreeMap<String, CompileArgs>> for CompileInvocation {
    type Error = String;

    fn try_from(map: BTreeMap<String, CompileArgs>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "expected exactly one source file per invocation, found {}",
                map.len()
            ));
        }
        let (source_file, args) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty invocation".to_string())?;
        if source_file.trim().is_empty() {
            return Err("invocation has an empty source path".to_string());
        }
        Ok(Self { source_file, args })
    }
}

/// Turns raw `cl.exe` command lines into [`CompileInvocation`]s.
///
/// Holds no per-record state; every call to [`parse`](Self::parse) is
/// independent.
#[derive(Debug, Clone)]
pub struct InvocationParser {
    normalizer: PathNormalizer,
}

impl InvocationParser {
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &PathNormalizer {
        &self.normalizer
    }

    pub fn parse(&self, cmd_line: &str) -> Result<CompileInvocation, RecordError> {
        let source_file = extract_source_file(cmd_line)?;
        let source_file = self.normalizer.normalize(&source_file)?;

        let defines = extract_from_pattern(cmd_line, DEFINE_MARKER);
        let includes = self
            .normalizer
            .normalize_all(&extract_from_pattern(cmd_line, INCLUDE_MARKER))?;
        let out_dir = extract_output_dir(cmd_line)
            .map(|dir| self.normalizer.normalize(&dir))
            .transpose()?;

        Ok(CompileInvocation {
            source_file,
            args: CompileArgs {
                defines,
                includes,
                out_dir,
            },
        })
    }
}
