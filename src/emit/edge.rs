use super::escape::ninja_escape;
use crate::parse::normalize::unquote;
use crate::parse::CompileInvocation;
use std::path::Path;

pub const RULE_NAME: &str = "COMPILE";
pub const ARTIFACT_SUFFIX: &str = ".indx";

const SOURCE_FLAG: &str = "--source_file";
const DEFINE_FLAG: &str = "-D";
const INCLUDE_FLAG: &str = "--include";
const OUTPUT_FLAG: &str = "--output_file";

/// One `build` statement, with every field already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEdge {
    pub output: String,
    pub input: String,
    pub command: String,
    pub rule: &'static str,
}

impl BuildEdge {
    pub fn from_invocation(invocation: &CompileInvocation, tool: &str) -> Self {
        let artifact = artifact_path(invocation);
        let command = command_line(invocation, tool, &artifact);

        Self {
            output: ninja_escape(&artifact),
            input: ninja_escape(&invocation.source_file),
            command: ninja_escape(&command),
            rule: RULE_NAME,
        }
    }
}

/// `<source base name>.indx`, placed under the output directory when the
/// invocation has one.
pub fn artifact_path(invocation: &CompileInvocation) -> String {
    let (source, _) = unquote(&invocation.source_file);
    let base_name = source.rsplit(['/', '\\']).next().unwrap_or(source);
    let file_name = format!("{}{}", base_name, ARTIFACT_SUFFIX);

    match invocation.args.out_dir.as_deref() {
        Some(out_dir) => {
            let (out_dir, _) = unquote(out_dir);
            Path::new(out_dir)
                .join(file_name)
                .to_string_lossy()
                .into_owned()
        }
        None => file_name,
    }
}

/// The unescaped command line that produces `artifact`.
pub fn command_line(invocation: &CompileInvocation, tool: &str, artifact: &str) -> String {
    let mut line = format!("{} {} {}", tool, SOURCE_FLAG, invocation.source_file);

    for define in &invocation.args.defines {
        line.push_str(&format!(" {}{}", DEFINE_FLAG, define));
    }
    for include in &invocation.args.includes {
        line.push_str(&format!(" {} {}", INCLUDE_FLAG, include));
    }

    line.push_str(&format!(" {} {}", OUTPUT_FLAG, artifact));
    line
}
